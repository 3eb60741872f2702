pub mod project;
pub mod user;

pub use project::{Project, ProjectChanges, ProjectInput, ProjectView};
pub use user::{Credentials, UserRecord};
