//! Course entity model and DTOs.

use campus_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::lesson::Lesson;

/// A row from the `courses` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Course {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub preview_url: Option<String>,
    /// `None` once the owning user has been deleted (FK is SET NULL).
    pub owner_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Course representation enriched for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct CourseResponse {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub preview_url: Option<String>,
    pub owner_id: Option<DbId>,
    pub lessons_count: i64,
    /// Whether the requesting user is subscribed to this course.
    pub is_subscribed: bool,
    /// Nested lessons; present on detail responses only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lessons: Option<Vec<Lesson>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl CourseResponse {
    pub fn new(course: Course, lessons_count: i64, is_subscribed: bool) -> Self {
        Self {
            id: course.id,
            title: course.title,
            description: course.description,
            preview_url: course.preview_url,
            owner_id: course.owner_id,
            lessons_count,
            is_subscribed,
            lessons: None,
            created_at: course.created_at,
            updated_at: course.updated_at,
        }
    }

    pub fn with_lessons(mut self, lessons: Vec<Lesson>) -> Self {
        self.lessons_count = lessons.len() as i64;
        self.lessons = Some(lessons);
        self
    }
}

/// DTO for creating a course. The owner comes from the authenticated
/// request, never from the payload.
#[derive(Debug, Deserialize)]
pub struct CreateCourse {
    pub title: String,
    pub description: String,
    pub preview_url: Option<String>,
}

/// DTO for updating a course. All fields are optional.
#[derive(Debug, Deserialize)]
pub struct UpdateCourse {
    pub title: Option<String>,
    pub description: Option<String>,
    pub preview_url: Option<String>,
}
