//! HTTP-level integration tests for registration and the auth endpoints.

mod common;

use axum::http::StatusCode;
use common::{assert_json, body_json, post_json, seed_user, TEST_PASSWORD};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn register_creates_user_without_leaking_password(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/users/register",
        None,
        serde_json::json!({
            "email": "new@example.com",
            "password": "sufficiently-long",
            "password2": "sufficiently-long",
            "city": "Amsterdam"
        }),
    )
    .await;

    let json = assert_json(response, StatusCode::CREATED).await;
    assert_eq!(json["email"], "new@example.com");
    assert_eq!(json["city"], "Amsterdam");
    assert!(json["id"].is_number());
    // No password material anywhere in the response body.
    let body = json.to_string();
    assert!(!body.contains("password"), "response must not mention passwords: {body}");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn register_mismatched_passwords_names_the_password_field(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/users/register",
        None,
        serde_json::json!({
            "email": "new@example.com",
            "password": "sufficiently-long",
            "password2": "different-password"
        }),
    )
    .await;

    let json = assert_json(response, StatusCode::BAD_REQUEST).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    let fields = json["fields"].as_array().expect("fields array");
    assert!(fields.iter().any(|f| f["field"] == "password"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn register_rejects_invalid_email(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/users/register",
        None,
        serde_json::json!({
            "email": "not-an-email",
            "password": "sufficiently-long",
            "password2": "sufficiently-long"
        }),
    )
    .await;

    let json = assert_json(response, StatusCode::BAD_REQUEST).await;
    let fields = json["fields"].as_array().expect("fields array");
    assert!(fields.iter().any(|f| f["field"] == "email"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn register_duplicate_email_conflicts(pool: PgPool) {
    seed_user(&pool, "taken@example.com").await;

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/users/register",
        None,
        serde_json::json!({
            "email": "taken@example.com",
            "password": "sufficiently-long",
            "password2": "sufficiently-long"
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

// ---------------------------------------------------------------------------
// Login / refresh / logout
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn login_returns_tokens_and_profile(pool: PgPool) {
    let (user_id, _) = seed_user(&pool, "login@example.com").await;

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/auth/login",
        None,
        serde_json::json!({"email": "login@example.com", "password": TEST_PASSWORD}),
    )
    .await;

    let json = assert_json(response, StatusCode::OK).await;
    assert!(json["access_token"].is_string());
    assert!(json["refresh_token"].is_string());
    assert_eq!(json["expires_in"], 3600);
    assert_eq!(json["user"]["id"], user_id);
    assert_eq!(json["user"]["email"], "login@example.com");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn login_wrong_password_is_unauthorized(pool: PgPool) {
    seed_user(&pool, "login@example.com").await;

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/auth/login",
        None,
        serde_json::json!({"email": "login@example.com", "password": "wrong"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn login_deactivated_account_is_forbidden(pool: PgPool) {
    let (user_id, _) = seed_user(&pool, "stale@example.com").await;
    sqlx::query("UPDATE users SET is_active = false WHERE id = $1")
        .bind(user_id)
        .execute(&pool)
        .await
        .unwrap();

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/auth/login",
        None,
        serde_json::json!({"email": "stale@example.com", "password": TEST_PASSWORD}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn refresh_rotates_the_session(pool: PgPool) {
    seed_user(&pool, "rotate@example.com").await;

    let app = common::build_test_app(pool.clone());
    let login = post_json(
        app,
        "/api/v1/auth/login",
        None,
        serde_json::json!({"email": "rotate@example.com", "password": TEST_PASSWORD}),
    )
    .await;
    let login_json = body_json(login).await;
    let refresh_token = login_json["refresh_token"].as_str().unwrap().to_string();

    // First refresh succeeds.
    let app = common::build_test_app(pool.clone());
    let refreshed = post_json(
        app,
        "/api/v1/auth/refresh",
        None,
        serde_json::json!({"refresh_token": refresh_token}),
    )
    .await;
    assert_eq!(refreshed.status(), StatusCode::OK);

    // The old token is revoked by rotation; reusing it fails.
    let app = common::build_test_app(pool);
    let reused = post_json(
        app,
        "/api/v1/auth/refresh",
        None,
        serde_json::json!({"refresh_token": refresh_token}),
    )
    .await;
    assert_eq!(reused.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn logout_revokes_all_sessions(pool: PgPool) {
    let (_, token) = seed_user(&pool, "logout@example.com").await;

    let app = common::build_test_app(pool.clone());
    let login = post_json(
        app,
        "/api/v1/auth/login",
        None,
        serde_json::json!({"email": "logout@example.com", "password": TEST_PASSWORD}),
    )
    .await;
    let refresh_token = body_json(login).await["refresh_token"]
        .as_str()
        .unwrap()
        .to_string();

    let app = common::build_test_app(pool.clone());
    let logout = post_json(app, "/api/v1/auth/logout", Some(&token), serde_json::json!({})).await;
    assert_eq!(logout.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool);
    let reused = post_json(
        app,
        "/api/v1/auth/refresh",
        None,
        serde_json::json!({"refresh_token": refresh_token}),
    )
    .await;
    assert_eq!(reused.status(), StatusCode::UNAUTHORIZED);
}
