use crate::error::AppError;
use bcrypt::{hash, verify};

/// Hashes a plaintext password with bcrypt (salted, adaptive, cost 12).
/// The plaintext never goes anywhere else.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, 12)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

/// Compares a plaintext candidate against a stored bcrypt hash. bcrypt's
/// check is constant-time with respect to the hash contents.
pub fn verify_password(password: &str, hashed_password: &str) -> Result<bool, AppError> {
    verify(password, hashed_password)
        .map_err(|e| AppError::Internal(format!("Failed to verify password: {}", e)))
}
