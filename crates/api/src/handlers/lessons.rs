//! Handlers for the `/lessons` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use campus_core::access::{check_material, Action};
use campus_core::error::CoreError;
use campus_core::types::DbId;
use campus_core::validation::validate_lesson;
use campus_db::models::lesson::{CreateLesson, Lesson, UpdateLesson};
use campus_db::repositories::LessonRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::courses::{find_course, maybe_notify_course_updated};
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::state::AppState;

/// POST /api/v1/lessons
pub async fn create(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(input): Json<CreateLesson>,
) -> AppResult<(StatusCode, Json<Lesson>)> {
    check_material(Action::Create, &auth_user.access_context(None))?;

    // The parent course must exist before anything else.
    find_course(&state, input.course_id).await?;

    validate_lesson(&input.title, &input.description, input.video_url.as_deref())
        .map_err(CoreError::Validation)?;

    let lesson = LessonRepo::create(&state.pool, auth_user.user_id, &input).await?;

    tracing::info!(lesson_id = lesson.id, course_id = lesson.course_id, "Lesson created");

    Ok((StatusCode::CREATED, Json(lesson)))
}

/// GET /api/v1/lessons
///
/// Moderators see every lesson; everyone else sees only their own.
pub async fn list(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(pagination): Query<PaginationParams>,
) -> AppResult<Json<Vec<Lesson>>> {
    check_material(Action::Read, &auth_user.access_context(None))?;

    let lessons = if auth_user.is_moderator() {
        LessonRepo::list_all(&state.pool, pagination.limit(), pagination.offset()).await?
    } else {
        LessonRepo::list_by_owner(
            &state.pool,
            auth_user.user_id,
            pagination.limit(),
            pagination.offset(),
        )
        .await?
    };

    Ok(Json(lessons))
}

/// GET /api/v1/lessons/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Lesson>> {
    let lesson = find_lesson(&state, id).await?;
    check_material(Action::Read, &auth_user.access_context(lesson.owner_id))?;
    Ok(Json(lesson))
}

/// PUT /api/v1/lessons/{id}
///
/// Owners and moderators may update. A lesson update counts as an
/// update of its parent course for subscriber notification purposes.
pub async fn update(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateLesson>,
) -> AppResult<Json<Lesson>> {
    let existing = find_lesson(&state, id).await?;
    check_material(Action::Update, &auth_user.access_context(existing.owner_id))?;

    let title = input.title.as_deref().unwrap_or(&existing.title);
    let description = input
        .description
        .as_deref()
        .unwrap_or(&existing.description);
    let video_url = input
        .video_url
        .as_deref()
        .or(existing.video_url.as_deref());
    validate_lesson(title, description, video_url).map_err(CoreError::Validation)?;

    let lesson = LessonRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Lesson",
            id,
        }))?;

    // Notify the parent course's subscribers, subject to its cooldown.
    let course = find_course(&state, lesson.course_id).await?;
    maybe_notify_course_updated(&state, &course, auth_user.user_id);

    Ok(Json(lesson))
}

/// DELETE /api/v1/lessons/{id}
///
/// Owner only; moderators are excluded.
pub async fn delete(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let lesson = find_lesson(&state, id).await?;
    check_material(Action::Delete, &auth_user.access_context(lesson.owner_id))?;

    LessonRepo::delete(&state.pool, id).await?;
    tracing::info!(lesson_id = id, "Lesson deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Look up a lesson or return 404.
async fn find_lesson(state: &AppState, id: DbId) -> AppResult<Lesson> {
    LessonRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Lesson",
            id,
        }))
}
