//! Route definition for the subscription toggle.

use axum::routing::post;
use axum::Router;

use crate::handlers::subscriptions;
use crate::state::AppState;

/// Routes mounted at `/subscriptions`.
///
/// ```text
/// POST / -> toggle (create-or-remove)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(subscriptions::toggle))
}
