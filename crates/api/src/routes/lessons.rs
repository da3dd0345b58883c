//! Route definitions for the `/lessons` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::lessons;
use crate::state::AppState;

/// Routes mounted at `/lessons`.
///
/// ```text
/// GET    /      -> list (moderators: all, others: own)
/// POST   /      -> create
/// GET    /{id}  -> get_by_id
/// PUT    /{id}  -> update
/// DELETE /{id}  -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(lessons::list).post(lessons::create))
        .route(
            "/{id}",
            get(lessons::get_by_id)
                .put(lessons::update)
                .delete(lessons::delete),
        )
}
