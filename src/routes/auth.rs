use crate::{
    auth::{
        token::access_token_ttl, AuthenticatedUser, DeleteUserRequest, LoginRequest,
        LoginResponse, RefreshResponse, RegisterRequest, TokenService,
    },
    db,
    error::AppError,
    store,
};
use actix_web::{delete, get, post, web, HttpResponse, Responder};
use serde_json::json;
use sqlx::PgPool;
use validator::Validate;

/// List all registered users.
///
/// Password hashes never appear in the response; the store selects around
/// that column.
#[get("/users")]
pub async fn get_users(pool: web::Data<PgPool>) -> Result<impl Responder, AppError> {
    let users = db::with_tx(&pool, |conn| {
        Box::pin(async move { store::users::list_all(conn).await })
    })
    .await?;

    Ok(HttpResponse::Ok().json(users))
}

/// Register a new user.
///
/// The email becomes the account's identity and must not already be taken.
#[post("/register")]
pub async fn register(
    pool: web::Data<PgPool>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    register_data.validate()?;
    let data = register_data.into_inner();

    db::with_tx(&pool, move |conn| {
        Box::pin(async move {
            store::users::register(
                conn,
                &data.email,
                &data.password,
                data.first_name.as_deref(),
                data.last_name.as_deref(),
                data.plan.as_deref(),
            )
            .await
        })
    })
    .await?;

    Ok(HttpResponse::Created().json(json!({ "message": "User registered successfully" })))
}

/// Authenticate a user and hand out a token pair.
///
/// The access token carries the default 12-hour lifetime; the refresh token
/// lets the client mint new access tokens without re-sending credentials.
#[post("/login")]
pub async fn login(
    pool: web::Data<PgPool>,
    tokens: web::Data<TokenService>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    let data = login_data.into_inner();

    let credentials = db::with_tx(&pool, move |conn| {
        Box::pin(async move { store::users::verify_login(conn, &data.email, &data.password).await })
    })
    .await?;

    let access_token = tokens.issue_access(&credentials.email, access_token_ttl())?;
    let refresh_token = tokens.issue_refresh(&credentials.email)?;

    Ok(HttpResponse::Ok().json(LoginResponse {
        access_token,
        refresh_token,
        email_address: credentials.email,
        plan: credentials.plan,
    }))
}

/// Invalidate the presented token.
///
/// Revocation is by token id, so other sessions of the same user stay valid.
#[post("/logout")]
pub async fn logout(
    tokens: web::Data<TokenService>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    tokens.revoke(&user.0);
    Ok(HttpResponse::Ok().json(json!({ "message": "Successfully logged out" })))
}

/// Delete the caller's own account.
///
/// The email in the body must match the token identity; deleting someone
/// else's account is refused. Project rows cascade at the storage layer.
#[delete("/delete_user")]
pub async fn delete_user(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
    delete_data: web::Json<DeleteUserRequest>,
) -> Result<impl Responder, AppError> {
    if user.email() != delete_data.email {
        return Err(AppError::Forbidden("Unauthorized action".into()));
    }

    let email = delete_data.into_inner().email;
    db::with_tx(&pool, move |conn| {
        Box::pin(async move { store::users::delete_user(conn, &email).await })
    })
    .await?;

    Ok(HttpResponse::Ok().json(json!({ "message": "User deleted successfully" })))
}

/// Exchange a refresh token for a fresh access token.
///
/// The middleware only lets refresh-marked tokens through to this route;
/// credentials are not re-checked.
#[post("/refresh")]
pub async fn refresh(
    tokens: web::Data<TokenService>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let access_token = tokens.issue_access(user.email(), access_token_ttl())?;
    Ok(HttpResponse::Ok().json(RefreshResponse { access_token }))
}
