//!
//! # Transactional Unit
//!
//! Pool construction plus `with_tx`, the scoped transaction helper. Every
//! data-access call site runs inside exactly one `with_tx` body: the body gets
//! a live connection, a success commits, any error rolls back, and the
//! connection goes back to the pool in all cases. Units do not nest; each one
//! is independent, with no cross-unit atomicity.

use futures::future::BoxFuture;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgConnection, PgPool};

use crate::error::AppError;

/// Connects to Postgres and returns the shared connection pool.
pub async fn connect(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
}

/// Runs `body` inside a single database transaction.
///
/// Commits when the body returns `Ok`, rolls back when it returns `Err`, and
/// releases the connection either way. The body receives `&mut PgConnection`
/// so store functions can chain several statements on the same transaction.
pub async fn with_tx<T, F>(pool: &PgPool, body: F) -> Result<T, AppError>
where
    F: for<'c> FnOnce(&'c mut PgConnection) -> BoxFuture<'c, Result<T, AppError>>,
{
    let mut tx = pool.begin().await?;
    match body(&mut tx).await {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                log::error!("rollback failed: {}", rollback_err);
            } else {
                log::warn!("transaction rolled back: {}", err);
            }
            Err(err)
        }
    }
}
