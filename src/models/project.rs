use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::FromRow;
use validator::Validate;

/// A row from `projects.saved_projects`.
///
/// `project_id` is sequential *per owner*, so the full identity of a row is
/// the composite `(project_id, email)`. The `tasks` payload is an opaque JSON
/// blob that round-trips exactly as given; its internal structure is owned by
/// the frontend. Serializes with the storage layer's snake_case keys.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Project {
    pub project_id: i32,
    pub email: String,
    pub project_name: String,
    pub project_description: String,
    pub tasks: Option<JsonValue>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// The camelCase rendering of a project, used by the list-projects response
/// only. Other project routes keep the snake_case keys; the asymmetry matches
/// what the frontend already consumes.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectView {
    pub project_id: i32,
    pub email: String,
    pub project_name: String,
    pub project_description: String,
    pub tasks: Option<JsonValue>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl From<Project> for ProjectView {
    fn from(p: Project) -> Self {
        Self {
            project_id: p.project_id,
            email: p.email,
            project_name: p.project_name,
            project_description: p.project_description,
            tasks: p.tasks,
            status: p.status,
            created_at: p.created_at,
            updated_at: p.updated_at,
            deleted_at: p.deleted_at,
        }
    }
}

/// Input payload for creating a project. Name and description are required
/// and must be non-empty; `tasks` is passed through untouched.
#[derive(Debug, Deserialize, Validate)]
pub struct ProjectInput {
    #[validate(length(min = 1, max = 200))]
    pub project_name: String,
    #[validate(length(min = 1, max = 2000))]
    pub project_description: String,
    pub tasks: Option<JsonValue>,
}

/// The optional fields of a project update. The store rejects an update where
/// every field is `None`.
#[derive(Debug, Default, Deserialize)]
pub struct ProjectChanges {
    pub project_name: Option<String>,
    pub project_description: Option<String>,
    pub tasks: Option<JsonValue>,
}

impl ProjectChanges {
    pub fn is_empty(&self) -> bool {
        self.project_name.is_none() && self.project_description.is_none() && self.tasks.is_none()
    }
}
