pub mod auth;
pub mod courses;
pub mod health;
pub mod lessons;
pub mod payments;
pub mod subscriptions;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                    login (public)
/// /auth/refresh                  refresh (public)
/// /auth/logout                   logout (requires auth)
///
/// /users/register                register (public)
/// /users                         list (auth)
/// /users/{id}                    profile with payments, patch (self)
///
/// /courses                       list, create
/// /courses/{id}                  get, update, delete
///
/// /lessons                       list, create
/// /lessons/{id}                  get, update, delete
///
/// /subscriptions                 toggle (POST)
///
/// /payments                      list, create checkout
/// /payments/{id}/status          poll provider status
/// /payments/success              checkout success landing
/// /payments/cancel               checkout cancel landing
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/courses", courses::router())
        .nest("/lessons", lessons::router())
        .nest("/subscriptions", subscriptions::router())
        .nest("/payments", payments::router())
}
