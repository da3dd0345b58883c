//! Handler for the subscription toggle endpoint.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use campus_core::error::CoreError;
use campus_core::types::DbId;
use campus_db::repositories::SubscriptionRepo;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::handlers::courses::find_course;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Request body for `POST /subscriptions`.
#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    /// Required; its absence is a 400, an unknown course a 404.
    pub course_id: Option<DbId>,
}

/// Response body for the toggle endpoint.
#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub message: &'static str,
    /// Subscription state after the toggle.
    pub subscribed: bool,
}

/// POST /api/v1/subscriptions
///
/// Toggle the authenticated user's subscription to a course: subscribe
/// if no subscription exists, unsubscribe otherwise. Two consecutive
/// calls restore the original state.
///
/// Two concurrent toggles may both observe "absent"; the duplicate
/// insert then violates `uq_subscriptions_user_course` and the losing
/// request receives a 409.
pub async fn toggle(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(input): Json<ToggleRequest>,
) -> AppResult<(StatusCode, Json<ToggleResponse>)> {
    let course_id = input
        .course_id
        .ok_or_else(|| AppError::BadRequest("course_id is required".into()))?;

    // 404 before any mutation if the course does not exist.
    find_course(&state, course_id).await?;

    let existing = SubscriptionRepo::find(&state.pool, auth_user.user_id, course_id).await?;

    if existing.is_some() {
        SubscriptionRepo::delete(&state.pool, auth_user.user_id, course_id).await?;
        tracing::info!(user_id = auth_user.user_id, course_id, "Subscription removed");
        Ok((
            StatusCode::OK,
            Json(ToggleResponse {
                message: "subscription removed",
                subscribed: false,
            }),
        ))
    } else {
        SubscriptionRepo::create(&state.pool, auth_user.user_id, course_id)
            .await
            .map_err(map_duplicate_to_conflict)?;
        tracing::info!(user_id = auth_user.user_id, course_id, "Subscription added");
        Ok((
            StatusCode::CREATED,
            Json(ToggleResponse {
                message: "subscription added",
                subscribed: true,
            }),
        ))
    }
}

/// Turn the unique-constraint violation from a lost toggle race into an
/// explicit conflict; other database errors pass through unchanged.
fn map_duplicate_to_conflict(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some("23505") {
            return AppError::Core(CoreError::Conflict(
                "Subscription already exists".into(),
            ));
        }
    }
    AppError::Database(err)
}
