//! Shared helpers for HTTP-level integration tests.
//!
//! Uses Axum's `tower::ServiceExt` to send requests directly to the
//! router without an actual TCP listener. The app is rebuilt per
//! request (the router is consumed by `oneshot`), always from the same
//! configuration production uses.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use campus_api::auth::jwt::{generate_access_token, JwtConfig};
use campus_api::auth::password::hash_password;
use campus_api::config::ServerConfig;
use campus_api::router::build_app_router;
use campus_api::state::AppState;
use campus_core::groups::GROUP_MODERATORS;
use campus_core::types::DbId;
use campus_db::models::user::CreateUser;
use campus_db::repositories::{GroupRepo, UserRepo};
use campus_events::EventBus;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

/// Password used by every seeded test user.
pub const TEST_PASSWORD: &str = "integration-test-password";

/// Build a test `ServerConfig` with safe defaults and a fixed JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            access_token_expiry_mins: 60,
            refresh_token_expiry_days: 1,
        },
    }
}

/// Build the full application router with all middleware layers, using
/// the given database pool. Checkout is unconfigured (`billing: None`),
/// so any provider call fails loudly -- useful for proving an endpoint
/// did NOT contact the provider.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        event_bus: Arc::new(EventBus::default()),
        billing: None,
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Seeding
// ---------------------------------------------------------------------------

/// Insert a user with [`TEST_PASSWORD`], returning its id and a valid
/// access token.
pub async fn seed_user(pool: &PgPool, email: &str) -> (DbId, String) {
    let password_hash = hash_password(TEST_PASSWORD).expect("hashing should succeed");
    let user = UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            password_hash,
            first_name: None,
            last_name: None,
            phone: None,
            city: None,
        },
    )
    .await
    .expect("user insert should succeed");

    let token = generate_access_token(user.id, email, &[], &test_config().jwt)
        .expect("token generation should succeed");
    (user.id, token)
}

/// Insert a user and add it to the moderators group.
pub async fn seed_moderator(pool: &PgPool, email: &str) -> (DbId, String) {
    let (id, _) = seed_user(pool, email).await;
    let added = GroupRepo::add_user(pool, id, GROUP_MODERATORS)
        .await
        .expect("group insert should succeed");
    assert!(added, "moderators group must be seeded by migrations");

    let groups = vec![GROUP_MODERATORS.to_string()];
    let token = generate_access_token(id, email, &groups, &test_config().jwt)
        .expect("token generation should succeed");
    (id, token)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Send a request with an optional bearer token and JSON body.
pub async fn send(
    app: Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .expect("request should build"),
        None => builder.body(Body::empty()).expect("request should build"),
    };
    app.oneshot(request).await.expect("request should not fail")
}

pub async fn get(app: Router, uri: &str, token: Option<&str>) -> Response<Body> {
    send(app, "GET", uri, token, None).await
}

pub async fn post_json(
    app: Router,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, "POST", uri, token, Some(body)).await
}

pub async fn put_json(
    app: Router,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, "PUT", uri, token, Some(body)).await
}

pub async fn patch_json(
    app: Router,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, "PATCH", uri, token, Some(body)).await
}

pub async fn delete(app: Router, uri: &str, token: Option<&str>) -> Response<Body> {
    send(app, "DELETE", uri, token, None).await
}

/// Decode a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be valid JSON")
}

/// Assert a status and return the JSON body in one step.
pub async fn assert_json(response: Response<Body>, expected: StatusCode) -> serde_json::Value {
    assert_eq!(response.status(), expected);
    body_json(response).await
}
