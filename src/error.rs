//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the
//! application. The data-access layer raises typed variants; the handler layer
//! relies on `actix_web::error::ResponseError` to turn them into JSON
//! responses with the right HTTP status.
//!
//! `From` implementations for `sqlx::Error`, `validator::ValidationErrors`,
//! `jsonwebtoken::errors::Error`, and `bcrypt::BcryptError` allow conversion
//! with the `?` operator. Unique-constraint violations from Postgres are
//! surfaced as `Conflict` so the register race fails deterministically.

use actix_web::{error::ResponseError, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// Represents all possible errors that can occur within the application.
#[derive(Debug)]
pub enum AppError {
    /// Bad or missing input fields (HTTP 400).
    Validation(String),
    /// A duplicate unique key, e.g. registering an email twice (HTTP 400).
    Conflict(String),
    /// Login failure. Deliberately carries no detail: unknown email and wrong
    /// password are indistinguishable to the client (HTTP 401).
    InvalidCredentials,
    /// A bearer token past its expiry (HTTP 401).
    ExpiredToken,
    /// A malformed token, a bad signature, or the wrong token kind (HTTP 401).
    InvalidToken(String),
    /// A token whose id has been revoked by logout (HTTP 401).
    Revoked,
    /// The caller is authenticated but not allowed to act on the target (HTTP 403).
    Forbidden(String),
    /// The target row for an update/delete/select-one is absent (HTTP 404).
    NotFound(String),
    /// A referenced entity (an owner email) does not exist (HTTP 500).
    Reference(String),
    /// An error originating from database operations (HTTP 500).
    Database(String),
    /// Any other unexpected server-side error (HTTP 500).
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Validation(msg) => write!(f, "Validation error: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::InvalidCredentials => write!(f, "Invalid credentials"),
            AppError::ExpiredToken => write!(f, "Token has expired"),
            AppError::InvalidToken(msg) => write!(f, "Invalid token: {}", msg),
            AppError::Revoked => write!(f, "Token has been revoked"),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::Reference(msg) => write!(f, "Reference error: {}", msg),
            AppError::Database(msg) => write!(f, "Database error: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal Server Error: {}", msg),
        }
    }
}

/// Converts `AppError` variants into `HttpResponse` objects.
///
/// Every error body is the uniform `{"error": message}` shape.
impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let body = json!({ "error": self.to_string() });
        match self {
            AppError::Validation(_) | AppError::Conflict(_) => {
                HttpResponse::BadRequest().json(body)
            }
            AppError::InvalidCredentials
            | AppError::ExpiredToken
            | AppError::InvalidToken(_)
            | AppError::Revoked => HttpResponse::Unauthorized().json(body),
            AppError::Forbidden(_) => HttpResponse::Forbidden().json(body),
            AppError::NotFound(_) => HttpResponse::NotFound().json(body),
            AppError::Reference(_) | AppError::Database(_) | AppError::Internal(_) => {
                HttpResponse::InternalServerError().json(body)
            }
        }
    }
}

/// Converts `sqlx::Error` into `AppError`.
///
/// `RowNotFound` maps to `NotFound`, a unique-key violation (SQLSTATE 23505)
/// maps to `Conflict`, and everything else becomes `Database`.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
                AppError::Conflict("Duplicate key".into())
            }
            _ => AppError::Database(error.to_string()),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::Validation(error.to_string())
    }
}

/// Converts `jsonwebtoken::errors::Error` into the token-failure taxonomy.
///
/// An expired signature is kept distinct from every other decoding failure so
/// clients can tell a stale session from a bad one.
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> AppError {
        match error.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::ExpiredToken,
            _ => AppError::InvalidToken(error.to_string()),
        }
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::Internal(error.to_string())
    }
}
