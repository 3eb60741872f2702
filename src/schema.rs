//!
//! # Schema Registry
//!
//! Table and column names for the two persisted tables, collected in one
//! place so the store modules build their SQL from named constants instead of
//! scattering string literals. Values are interpolated into query *text* only;
//! user data always travels through bind parameters.

/// The `auth.users` table: one row per registered account.
pub mod users {
    pub const TABLE: &str = "auth.users";

    pub const ID: &str = "id";
    pub const EMAIL: &str = "email";
    pub const PASSWORD_HASH: &str = "password_hash";
    pub const FIRST_NAME: &str = "first_name";
    pub const LAST_NAME: &str = "last_name";
    pub const PROFILE_PICTURE: &str = "profile_picture";
    pub const ROLE: &str = "role";
    pub const STATUS: &str = "status";
    pub const CREATED_AT: &str = "created_at";
    pub const UPDATED_AT: &str = "updated_at";
    pub const LAST_LOGIN: &str = "last_login";
    pub const IS_VERIFIED: &str = "is_verified";
    pub const DELETED_AT: &str = "deleted_at";
    pub const PLAN: &str = "plan";
}

/// The `projects.saved_projects` table: user-created projects, keyed by the
/// composite `(project_id, email)`.
pub mod saved_projects {
    pub const TABLE: &str = "projects.saved_projects";

    pub const PROJECT_ID: &str = "project_id";
    pub const EMAIL: &str = "email";
    pub const PROJECT_NAME: &str = "project_name";
    pub const PROJECT_DESCRIPTION: &str = "project_description";
    pub const TASKS: &str = "tasks";
    pub const STATUS: &str = "status";
    pub const CREATED_AT: &str = "created_at";
    pub const UPDATED_AT: &str = "updated_at";
    pub const DELETED_AT: &str = "deleted_at";

    pub const STATUS_ACTIVE: &str = "active";
    pub const STATUS_DELETED: &str = "deleted";
}
