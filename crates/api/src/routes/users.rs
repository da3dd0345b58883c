//! Route definitions for the `/users` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// POST /register  -> register (public)
/// GET  /          -> list
/// GET  /{id}      -> profile with payment history
/// PATCH /{id}     -> update own profile
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(users::register))
        .route("/", get(users::list))
        .route("/{id}", get(users::get_by_id).patch(users::update))
}
