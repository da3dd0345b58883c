//! Route definitions for the `/payments` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::payments;
use crate::state::AppState;

/// Routes mounted at `/payments`.
///
/// ```text
/// GET  /             -> list (filtered, ordered)
/// POST /             -> create checkout payment
/// GET  /{id}/status  -> poll provider status
/// GET  /success      -> checkout success landing
/// GET  /cancel       -> checkout cancel landing
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(payments::list).post(payments::create))
        .route("/success", get(payments::success))
        .route("/cancel", get(payments::cancel))
        .route("/{id}/status", get(payments::status))
}
