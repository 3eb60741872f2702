//!
//! # Token Service
//!
//! Issues, verifies, refreshes, and revokes the bearer tokens used as session
//! credentials. Tokens are HS256 JWTs carrying the user's email as subject, a
//! unique id (`jti`), and a flag marking refresh tokens. Logout puts the jti
//! into a revocation list that every verification consults.
//!
//! The revocation list is in-memory and process-lifetime: a restart clears
//! all revocations. That is a documented limitation of the deployment, not an
//! oversight; tokens expire on their own, so the list is bounded in practice.

use std::collections::HashSet;
use std::sync::{Arc, RwLock};

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

/// Default lifetime of an access token issued at login.
pub fn access_token_ttl() -> chrono::Duration {
    chrono::Duration::hours(12)
}

/// Default lifetime of a refresh token.
pub fn refresh_token_ttl() -> chrono::Duration {
    chrono::Duration::days(30)
}

/// Claims encoded within a bearer token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject: the user's email address.
    pub sub: String,
    /// Expiration timestamp (seconds since epoch).
    pub exp: usize,
    /// Unique token id, the unit of revocation.
    pub jti: Uuid,
    /// Marks a refresh-capable token. Refresh tokens are only accepted by the
    /// refresh route; access tokens everywhere else.
    pub refresh: bool,
}

/// Thread-safe set of revoked token ids, shared between the token service
/// and whatever constructed it. Cloning shares the underlying set.
#[derive(Debug, Clone, Default)]
pub struct RevocationList {
    revoked: Arc<RwLock<HashSet<Uuid>>>,
}

impl RevocationList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn revoke(&self, jti: Uuid) {
        self.revoked
            .write()
            .expect("revocation list lock poisoned")
            .insert(jti);
    }

    pub fn is_revoked(&self, jti: &Uuid) -> bool {
        self.revoked
            .read()
            .expect("revocation list lock poisoned")
            .contains(jti)
    }
}

/// Issues and verifies bearer tokens against a fixed signing secret and an
/// injected revocation list.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    revocations: RevocationList,
}

impl TokenService {
    pub fn new(secret: &str, revocations: RevocationList) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            revocations,
        }
    }

    fn issue(
        &self,
        email: &str,
        ttl: chrono::Duration,
        refresh: bool,
    ) -> Result<String, AppError> {
        let expiration = chrono::Utc::now()
            .checked_add_signed(ttl)
            .ok_or_else(|| AppError::Internal("Token expiry out of range".into()))?
            .timestamp();

        let claims = Claims {
            sub: email.to_string(),
            exp: expiration as usize,
            jti: Uuid::new_v4(),
            refresh,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))
    }

    /// Issues an access token for `email` with the given lifetime.
    pub fn issue_access(&self, email: &str, ttl: chrono::Duration) -> Result<String, AppError> {
        self.issue(email, ttl, false)
    }

    /// Issues a refresh token for `email` with the default refresh lifetime.
    pub fn issue_refresh(&self, email: &str) -> Result<String, AppError> {
        self.issue(email, refresh_token_ttl(), true)
    }

    /// Verifies a token string: signature, expiry, and revocation state.
    ///
    /// Expired and revoked tokens fail with distinct errors; every other
    /// decoding problem comes back as `InvalidToken`.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        let data = decode::<Claims>(token, &self.decoding_key, &Validation::default())?;

        if self.revocations.is_revoked(&data.claims.jti) {
            return Err(AppError::Revoked);
        }

        Ok(data.claims)
    }

    /// Revokes the token behind `claims` (logout). Verification of the same
    /// jti fails with `Revoked` from here on.
    pub fn revoke(&self, claims: &Claims) {
        self.revocations.revoke(claims.jti);
    }
}
