use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from `auth.users` as exposed over the API.
///
/// The password hash column is never selected into this struct, so hashes
/// cannot leak through a serialized response.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct UserRecord {
    pub id: i32,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profile_picture: Option<String>,
    pub role: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
    pub is_verified: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub plan: Option<String>,
}

/// The identity returned by a successful login check: who the caller is and
/// which plan they are on. Nothing credential-shaped survives past this point.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub plan: Option<String>,
}
