//! Handlers for the `/users` resource (registration, profiles).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use campus_core::error::CoreError;
use campus_core::types::DbId;
use campus_core::validation::{is_valid_email, FieldViolation};
use campus_db::models::payment::Payment;
use campus_db::models::user::{CreateUser, UpdateUser, UserResponse};
use campus_db::repositories::{PaymentRepo, UserRepo};
use serde::{Deserialize, Serialize};

use crate::auth::password::{hash_password, validate_password_strength};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /users/register`. Open to unauthenticated
/// callers.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    /// Confirmation; must match `password`.
    pub password2: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
}

/// User profile with embedded payment history.
#[derive(Debug, Serialize)]
pub struct UserProfileResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub payments: Vec<Payment>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/users/register
///
/// Create a new account. The response never contains password material.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let mut violations = Vec::new();

    if !is_valid_email(&input.email) {
        violations.push(FieldViolation::new("email", "Enter a valid email address"));
    }
    if input.password != input.password2 {
        violations.push(FieldViolation::new("password", "Passwords do not match"));
    } else if let Err(msg) = validate_password_strength(&input.password) {
        violations.push(FieldViolation::new("password", msg));
    }

    if !violations.is_empty() {
        return Err(AppError::Core(CoreError::Validation(violations)));
    }

    if UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Conflict(
            "A user with this email already exists".into(),
        )));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            email: input.email,
            password_hash,
            first_name: input.first_name,
            last_name: input.last_name,
            phone: input.phone,
            city: input.city,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, "User registered");

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// GET /api/v1/users
pub async fn list(
    State(state): State<AppState>,
    _auth_user: AuthUser,
) -> AppResult<Json<Vec<UserResponse>>> {
    let users = UserRepo::list(&state.pool).await?;
    Ok(Json(users.into_iter().map(Into::into).collect()))
}

/// GET /api/v1/users/{id}
///
/// Profile view with the user's payment history embedded.
pub async fn get_by_id(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<UserProfileResponse>> {
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;

    let payments = PaymentRepo::list_for_user(&state.pool, id).await?;

    Ok(Json(UserProfileResponse {
        user: user.into(),
        payments,
    }))
}

/// PATCH /api/v1/users/{id}
///
/// Profile edits are restricted to the account owner.
pub async fn update(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateUser>,
) -> AppResult<Json<UserResponse>> {
    if auth_user.user_id != id {
        return Err(AppError::Core(CoreError::Forbidden(
            "You may only edit your own profile".into(),
        )));
    }

    let user = UserRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;

    Ok(Json(user.into()))
}
