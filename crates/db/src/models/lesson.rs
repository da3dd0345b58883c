//! Lesson entity model and DTOs.

use campus_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `lessons` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Lesson {
    pub id: DbId,
    pub course_id: DbId,
    pub title: String,
    pub description: String,
    pub preview_url: Option<String>,
    pub video_url: Option<String>,
    pub owner_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a lesson.
#[derive(Debug, Deserialize)]
pub struct CreateLesson {
    pub course_id: DbId,
    pub title: String,
    pub description: String,
    pub preview_url: Option<String>,
    pub video_url: Option<String>,
}

/// DTO for updating a lesson. All fields are optional; `course_id` is
/// immutable after creation.
#[derive(Debug, Deserialize)]
pub struct UpdateLesson {
    pub title: Option<String>,
    pub description: Option<String>,
    pub preview_url: Option<String>,
    pub video_url: Option<String>,
}
