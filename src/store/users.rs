//!
//! # Credential Store
//!
//! Operations against `auth.users`. Every function takes a live transaction
//! connection from [`crate::db::with_tx`]; none of them commit on their own.
//! Passwords enter as plaintext, are hashed with bcrypt before the insert,
//! and only the hash is ever read back for comparison.

use sqlx::PgConnection;

use crate::auth::password::{hash_password, verify_password};
use crate::error::AppError;
use crate::models::{Credentials, UserRecord};
use crate::schema::users;

fn record_columns() -> String {
    // Every column except password_hash.
    [
        users::ID,
        users::EMAIL,
        users::FIRST_NAME,
        users::LAST_NAME,
        users::PROFILE_PICTURE,
        users::ROLE,
        users::STATUS,
        users::CREATED_AT,
        users::UPDATED_AT,
        users::LAST_LOGIN,
        users::IS_VERIFIED,
        users::DELETED_AT,
        users::PLAN,
    ]
    .join(", ")
}

/// Asserts that `email` belongs to a registered user.
///
/// Absence is an error, not a `false`: callers treat a missing owner as an
/// invalid reference, so this raises `AppError::Reference`.
pub async fn email_exists(conn: &mut PgConnection, email: &str) -> Result<(), AppError> {
    let sql = format!(
        "SELECT 1 FROM {table} WHERE {email} = $1",
        table = users::TABLE,
        email = users::EMAIL,
    );

    let found: Option<i32> = sqlx::query_scalar(&sql)
        .bind(email)
        .fetch_optional(&mut *conn)
        .await?;

    match found {
        Some(_) => Ok(()),
        None => Err(AppError::Reference(format!("{} is not registered", email))),
    }
}

/// Registers a new user.
///
/// The existence check runs as a separate query before the insert, so two
/// concurrent registrations can both pass it; the unique constraint on the
/// email column turns the loser into a deterministic `Conflict`.
pub async fn register(
    conn: &mut PgConnection,
    email: &str,
    password: &str,
    first_name: Option<&str>,
    last_name: Option<&str>,
    plan: Option<&str>,
) -> Result<(), AppError> {
    let select_sql = format!(
        "SELECT {id} FROM {table} WHERE {email} = $1",
        id = users::ID,
        table = users::TABLE,
        email = users::EMAIL,
    );

    let existing: Option<i32> = sqlx::query_scalar(&select_sql)
        .bind(email)
        .fetch_optional(&mut *conn)
        .await?;

    if existing.is_some() {
        return Err(AppError::Conflict("User already exists".into()));
    }

    let password_hash = hash_password(password)?;

    let insert_sql = format!(
        "INSERT INTO {table} ({email}, {hash}, {first}, {last}, {plan}) \
         VALUES ($1, $2, $3, $4, $5)",
        table = users::TABLE,
        email = users::EMAIL,
        hash = users::PASSWORD_HASH,
        first = users::FIRST_NAME,
        last = users::LAST_NAME,
        plan = users::PLAN,
    );

    sqlx::query(&insert_sql)
        .bind(email)
        .bind(password_hash)
        .bind(first_name)
        .bind(last_name)
        .bind(plan)
        .execute(&mut *conn)
        .await?;

    Ok(())
}

/// Checks a login attempt against the stored hash.
///
/// An unknown email and a wrong password both come back as
/// `InvalidCredentials` so the response leaks nothing about which one it was.
/// A successful check stamps `last_login`.
pub async fn verify_login(
    conn: &mut PgConnection,
    email: &str,
    password: &str,
) -> Result<Credentials, AppError> {
    let sql = format!(
        "SELECT {hash}, {plan} FROM {table} WHERE {email} = $1 LIMIT 1",
        hash = users::PASSWORD_HASH,
        plan = users::PLAN,
        table = users::TABLE,
        email = users::EMAIL,
    );

    let row: Option<(String, Option<String>)> = sqlx::query_as(&sql)
        .bind(email)
        .fetch_optional(&mut *conn)
        .await?;

    let (stored_hash, plan) = row.ok_or(AppError::InvalidCredentials)?;

    if !verify_password(password, &stored_hash)? {
        return Err(AppError::InvalidCredentials);
    }

    let touch_sql = format!(
        "UPDATE {table} SET {last_login} = CURRENT_TIMESTAMP WHERE {email} = $1",
        table = users::TABLE,
        last_login = users::LAST_LOGIN,
        email = users::EMAIL,
    );

    sqlx::query(&touch_sql)
        .bind(email)
        .execute(&mut *conn)
        .await?;

    Ok(Credentials {
        email: email.to_string(),
        plan,
    })
}

/// Removes a user row outright. Project rows cascade at the storage layer.
pub async fn delete_user(conn: &mut PgConnection, email: &str) -> Result<(), AppError> {
    let sql = format!(
        "DELETE FROM {table} WHERE {email} = $1",
        table = users::TABLE,
        email = users::EMAIL,
    );

    let result = sqlx::query(&sql).bind(email).execute(&mut *conn).await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("User not found".into()));
    }

    Ok(())
}

/// Returns every user row, without the password hash column.
pub async fn list_all(conn: &mut PgConnection) -> Result<Vec<UserRecord>, AppError> {
    let sql = format!(
        "SELECT {columns} FROM {table}",
        columns = record_columns(),
        table = users::TABLE,
    );

    let records = sqlx::query_as::<_, UserRecord>(&sql)
        .fetch_all(&mut *conn)
        .await?;

    Ok(records)
}
