use actix_web::{http::StatusCode, test, web, App};
use dotenv::dotenv;
use minerva::auth::{LoginResponse, RevocationList, TokenService};
use minerva::routes;
use serde_json::{json, Value};
use sqlx::PgPool;

// Full HTTP flow against a live database. Run with:
//   DATABASE_URL=postgres://... cargo test -- --ignored

async fn test_pool() -> PgPool {
    dotenv().ok();
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");
    let pool = PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to test DB");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate test DB");
    pool
}

async fn cleanup_user(pool: &PgPool, email: &str) {
    let _ = sqlx::query("DELETE FROM auth.users WHERE email = $1")
        .bind(email)
        .execute(pool)
        .await;
}

macro_rules! call_app {
    ($app:expr, $req:expr) => {{
        match test::try_call_service(&$app, $req).await {
            Ok(resp) => {
                let status = resp.status();
                let bytes = test::read_body(resp).await;
                let json = serde_json::from_slice::<Value>(&bytes).unwrap_or(Value::Null);
                (status, json)
            }
            Err(err) => {
                let resp = err.error_response();
                let status = resp.status();
                let bytes = actix_web::body::to_bytes(resp.into_body()).await.unwrap();
                let json = serde_json::from_slice::<Value>(&bytes).unwrap_or(Value::Null);
                (status, json)
            }
        }
    }};
}

#[ignore]
#[actix_rt::test]
async fn test_register_login_logout_delete_flow() {
    let pool = test_pool().await;
    let email = "auth_flow@example.com";
    cleanup_user(&pool, email).await;

    let tokens = web::Data::new(TokenService::new("auth-flow-secret", RevocationList::new()));
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(tokens.clone())
            .configure(routes::config),
    )
    .await;

    // Register.
    let register_payload = json!({
        "email": email,
        "password": "Password123!",
        "first_name": "Auth",
        "last_name": "Flow",
        "plan": "free"
    });
    let req = test::TestRequest::post()
        .uri("/auth/register")
        .set_json(&register_payload)
        .to_request();
    let (status, body) = call_app!(app, req);
    assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);

    // Registering the same email twice fails.
    let req = test::TestRequest::post()
        .uri("/auth/register")
        .set_json(&register_payload)
        .to_request();
    let (status, body) = call_app!(app, req);
    assert_eq!(status, StatusCode::BAD_REQUEST, "duplicate register: {}", body);

    // Login with the right password.
    let req = test::TestRequest::post()
        .uri("/auth/login")
        .set_json(json!({ "email": email, "password": "Password123!" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let login: LoginResponse =
        serde_json::from_slice(&test::read_body(resp).await).expect("login response");
    assert_eq!(login.email_address, email);
    assert_eq!(login.plan.as_deref(), Some("free"));
    assert!(!login.access_token.is_empty());
    assert!(!login.refresh_token.is_empty());

    // The issued token verifies back to the same identity.
    let claims = tokens.verify(&login.access_token).unwrap();
    assert_eq!(claims.sub, email);

    // Wrong password and unknown email produce identical responses.
    let req = test::TestRequest::post()
        .uri("/auth/login")
        .set_json(json!({ "email": email, "password": "WrongPassword!" }))
        .to_request();
    let (wrong_status, wrong_body) = call_app!(app, req);
    let req = test::TestRequest::post()
        .uri("/auth/login")
        .set_json(json!({ "email": "nobody@example.com", "password": "Password123!" }))
        .to_request();
    let (unknown_status, unknown_body) = call_app!(app, req);
    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_body, unknown_body, "credential failures must not differ");

    // A too-short password is a credential failure like any other, not a
    // payload rejection.
    let req = test::TestRequest::post()
        .uri("/auth/login")
        .set_json(json!({ "email": email, "password": "abc" }))
        .to_request();
    let (short_status, short_body) = call_app!(app, req);
    assert_eq!(short_status, StatusCode::UNAUTHORIZED);
    assert_eq!(short_body, wrong_body, "credential failures must not differ");

    // The user listing never contains hashes.
    let req = test::TestRequest::get()
        .uri("/auth/users")
        .insert_header(("Authorization", format!("Bearer {}", login.access_token)))
        .to_request();
    let (status, body) = call_app!(app, req);
    assert_eq!(status, StatusCode::OK);
    assert!(!body.to_string().contains("password_hash"));

    // Deleting someone else's account is forbidden.
    let req = test::TestRequest::delete()
        .uri("/auth/delete_user")
        .insert_header(("Authorization", format!("Bearer {}", login.access_token)))
        .set_json(json!({ "email": "someone_else@example.com" }))
        .to_request();
    let (status, _) = call_app!(app, req);
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Deleting the caller's own account works.
    let req = test::TestRequest::delete()
        .uri("/auth/delete_user")
        .insert_header(("Authorization", format!("Bearer {}", login.access_token)))
        .set_json(json!({ "email": email }))
        .to_request();
    let (status, _) = call_app!(app, req);
    assert_eq!(status, StatusCode::OK);

    // A second delete finds nothing.
    let req = test::TestRequest::delete()
        .uri("/auth/delete_user")
        .insert_header(("Authorization", format!("Bearer {}", login.access_token)))
        .set_json(json!({ "email": email }))
        .to_request();
    let (status, _) = call_app!(app, req);
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[ignore]
#[actix_rt::test]
async fn test_delete_user_cascades_to_projects() {
    let pool = test_pool().await;
    let email = "cascade_delete@example.com";
    cleanup_user(&pool, email).await;

    let tokens = web::Data::new(TokenService::new("auth-flow-secret", RevocationList::new()));
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(tokens.clone())
            .configure(routes::config),
    )
    .await;

    // Register and log in.
    let req = test::TestRequest::post()
        .uri("/auth/register")
        .set_json(json!({ "email": email, "password": "Password123!" }))
        .to_request();
    let (status, _) = call_app!(app, req);
    assert_eq!(status, StatusCode::CREATED);

    let req = test::TestRequest::post()
        .uri("/auth/login")
        .set_json(json!({ "email": email, "password": "Password123!" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let login: LoginResponse =
        serde_json::from_slice(&test::read_body(resp).await).expect("login response");

    // Create a project owned by the user.
    let req = test::TestRequest::post()
        .uri("/projects/create_project")
        .insert_header(("Authorization", format!("Bearer {}", login.access_token)))
        .set_json(json!({
            "project_name": "doomed with its owner",
            "project_description": "exists only to be cascaded away"
        }))
        .to_request();
    let (status, body) = call_app!(app, req);
    assert_eq!(status, StatusCode::CREATED, "create failed: {}", body);

    let count_rows = |pool: PgPool, email: String| async move {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM projects.saved_projects WHERE email = $1",
        )
        .bind(email)
        .fetch_one(&pool)
        .await
        .unwrap()
    };
    assert_eq!(count_rows(pool.clone(), email.to_string()).await, 1);

    // Deleting the user takes the project row with it at the storage layer.
    let req = test::TestRequest::delete()
        .uri("/auth/delete_user")
        .insert_header(("Authorization", format!("Bearer {}", login.access_token)))
        .set_json(json!({ "email": email }))
        .to_request();
    let (status, _) = call_app!(app, req);
    assert_eq!(status, StatusCode::OK);

    assert_eq!(count_rows(pool.clone(), email.to_string()).await, 0);
}

#[ignore]
#[actix_rt::test]
async fn test_register_validation_rejects_bad_payloads() {
    let pool = test_pool().await;
    let tokens = web::Data::new(TokenService::new("auth-flow-secret", RevocationList::new()));
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(tokens.clone())
            .configure(routes::config),
    )
    .await;

    // Malformed email.
    let req = test::TestRequest::post()
        .uri("/auth/register")
        .set_json(json!({ "email": "not-an-email", "password": "Password123!" }))
        .to_request();
    let (status, _) = call_app!(app, req);
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Password too short.
    let req = test::TestRequest::post()
        .uri("/auth/register")
        .set_json(json!({ "email": "short_pw@example.com", "password": "abc" }))
        .to_request();
    let (status, _) = call_app!(app, req);
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
