//! Handlers for the `/courses` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use campus_core::access::{check_material, Action};
use campus_core::error::CoreError;
use campus_core::types::DbId;
use campus_core::validation::validate_course;
use campus_db::models::course::{Course, CourseResponse, CreateCourse, UpdateCourse};
use campus_db::repositories::{CourseRepo, LessonRepo, SubscriptionRepo};
use campus_events::bus::EVENT_COURSE_UPDATED;
use campus_events::PlatformEvent;
use chrono::Utc;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::state::AppState;

/// Minimum gap in hours between two subscriber notifications for one
/// course. Updates landing inside the window are saved but do not
/// re-notify.
const NOTIFY_COOLDOWN_HOURS: i64 = 4;

/// POST /api/v1/courses
pub async fn create(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(input): Json<CreateCourse>,
) -> AppResult<(StatusCode, Json<CourseResponse>)> {
    check_material(Action::Create, &auth_user.access_context(None))?;

    validate_course(&input.title, &input.description).map_err(CoreError::Validation)?;

    if CourseRepo::title_exists(&state.pool, &input.title, None).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "A course with this title already exists".into(),
        )));
    }

    let course = CourseRepo::create(&state.pool, auth_user.user_id, &input).await?;

    tracing::info!(course_id = course.id, owner_id = auth_user.user_id, "Course created");

    Ok((StatusCode::CREATED, Json(CourseResponse::new(course, 0, false))))
}

/// GET /api/v1/courses
///
/// Moderators see every course; everyone else sees only their own.
pub async fn list(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(pagination): Query<PaginationParams>,
) -> AppResult<Json<Vec<CourseResponse>>> {
    check_material(Action::Read, &auth_user.access_context(None))?;

    let courses = if auth_user.is_moderator() {
        CourseRepo::list_all(&state.pool, pagination.limit(), pagination.offset()).await?
    } else {
        CourseRepo::list_by_owner(
            &state.pool,
            auth_user.user_id,
            pagination.limit(),
            pagination.offset(),
        )
        .await?
    };

    let subscribed: std::collections::HashSet<DbId> =
        SubscriptionRepo::course_ids_for_user(&state.pool, auth_user.user_id)
            .await?
            .into_iter()
            .collect();

    let mut responses = Vec::with_capacity(courses.len());
    for course in courses {
        let lessons_count = LessonRepo::count_by_course(&state.pool, course.id).await?;
        let is_subscribed = subscribed.contains(&course.id);
        responses.push(CourseResponse::new(course, lessons_count, is_subscribed));
    }

    Ok(Json(responses))
}

/// GET /api/v1/courses/{id}
///
/// Detail view with nested lessons.
pub async fn get_by_id(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<CourseResponse>> {
    let course = find_course(&state, id).await?;
    check_material(Action::Read, &auth_user.access_context(course.owner_id))?;

    let lessons = LessonRepo::list_by_course(&state.pool, id).await?;
    let is_subscribed = SubscriptionRepo::find(&state.pool, auth_user.user_id, id)
        .await?
        .is_some();

    let response = CourseResponse::new(course, 0, is_subscribed).with_lessons(lessons);
    Ok(Json(response))
}

/// PUT /api/v1/courses/{id}
///
/// Owners and moderators may update. A successful update outside the
/// notification cooldown publishes a `course.updated` event consumed by
/// the subscriber notifier.
pub async fn update(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCourse>,
) -> AppResult<Json<CourseResponse>> {
    let existing = find_course(&state, id).await?;
    check_material(Action::Update, &auth_user.access_context(existing.owner_id))?;

    // Validate the effective (merged) payload so partial updates cannot
    // sneak invalid values past the rules.
    let title = input.title.as_deref().unwrap_or(&existing.title);
    let description = input
        .description
        .as_deref()
        .unwrap_or(&existing.description);
    validate_course(title, description).map_err(CoreError::Validation)?;

    if let Some(new_title) = &input.title {
        if CourseRepo::title_exists(&state.pool, new_title, Some(id)).await? {
            return Err(AppError::Core(CoreError::Conflict(
                "A course with this title already exists".into(),
            )));
        }
    }

    let course = CourseRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Course",
            id,
        }))?;

    maybe_notify_course_updated(&state, &existing, auth_user.user_id);

    let lessons_count = LessonRepo::count_by_course(&state.pool, id).await?;
    let is_subscribed = SubscriptionRepo::find(&state.pool, auth_user.user_id, id)
        .await?
        .is_some();

    Ok(Json(CourseResponse::new(course, lessons_count, is_subscribed)))
}

/// DELETE /api/v1/courses/{id}
///
/// Owner only. Lessons and subscriptions cascade.
pub async fn delete(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let course = find_course(&state, id).await?;
    check_material(Action::Delete, &auth_user.access_context(course.owner_id))?;

    CourseRepo::delete(&state.pool, id).await?;
    tracing::info!(course_id = id, "Course deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Look up a course or return 404.
pub(crate) async fn find_course(state: &AppState, id: DbId) -> AppResult<Course> {
    CourseRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Course",
            id,
        }))
}

/// Publish a `course.updated` event if the course's previous update is
/// older than the cooldown window.
///
/// `before` is the course row as it was before the current write; the
/// cooldown compares against its `updated_at`. Fire-and-forget: the
/// request never waits for the notifier.
pub(crate) fn maybe_notify_course_updated(state: &AppState, before: &Course, actor_id: DbId) {
    if Utc::now() - before.updated_at <= chrono::Duration::hours(NOTIFY_COOLDOWN_HOURS) {
        tracing::debug!(
            course_id = before.id,
            "Course updated inside notification cooldown, not notifying"
        );
        return;
    }

    state.event_bus.publish(
        PlatformEvent::new(EVENT_COURSE_UPDATED)
            .with_source("course", before.id)
            .with_actor(actor_id)
            .with_payload(serde_json::json!({
                "course_id": before.id,
                "title": before.title,
            })),
    );
}
