pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use serde::{Deserialize, Serialize};
use validator::Validate;

// Re-export necessary items
pub use extractors::AuthenticatedUser;
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password};
pub use token::{Claims, RevocationList, TokenService};

/// Payload for a user login request. Deliberately unvalidated: a malformed
/// email or short password fails credential verification like any other bad
/// login, keeping the rejection uniform.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Payload for a new user registration request. Name fields and plan are
/// optional; identity is the email alone.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6))]
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub plan: Option<String>,
}

/// Payload for the delete-user route. The email must match the identity
/// carried by the bearer token.
#[derive(Debug, Deserialize)]
pub struct DeleteUserRequest {
    pub email: String,
}

/// Response after a successful login: a short-lived access token, a
/// refresh token, and the caller's identity and plan.
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub email_address: String,
    pub plan: Option<String>,
}

/// Response from the refresh route: a fresh access token only.
#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub access_token: String,
}
