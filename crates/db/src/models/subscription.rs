//! Subscription entity model.

use campus_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `subscriptions` table: one user's opt-in to update
/// notifications for one course. (user_id, course_id) is unique.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Subscription {
    pub id: DbId,
    pub user_id: DbId,
    pub course_id: DbId,
    pub created_at: Timestamp,
}
