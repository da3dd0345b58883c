//! Handlers for the `/payments` resource: filtered listing, checkout
//! creation, and status polling against the payment provider.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use campus_core::error::CoreError;
use campus_core::types::DbId;
use campus_core::validation::FieldViolation;
use campus_db::models::payment::{
    CreatePayment, Payment, PaymentListQuery, PaymentMethod, PaymentStatus,
};
use campus_db::repositories::{CourseRepo, LessonRepo, PaymentRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /payments`.
///
/// Exactly one of `paid_course_id` / `paid_lesson_id` must be set.
#[derive(Debug, Deserialize)]
pub struct CreatePaymentRequest {
    /// Amount in minor currency units. Must be positive.
    pub amount_minor: i64,
    pub paid_course_id: Option<DbId>,
    pub paid_lesson_id: Option<DbId>,
}

/// Response body for the status-check endpoint.
#[derive(Debug, Serialize)]
pub struct PaymentStatusResponse {
    pub payment_id: DbId,
    pub payment_status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_url: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/payments
///
/// Filtered, ordered listing. Moderators see all payments; everyone
/// else only their own.
pub async fn list(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(query): Query<PaymentListQuery>,
) -> AppResult<Json<Vec<Payment>>> {
    let scope = if auth_user.is_moderator() {
        None
    } else {
        Some(auth_user.user_id)
    };
    let payments = PaymentRepo::list(&state.pool, scope, &query).await?;
    Ok(Json(payments))
}

/// POST /api/v1/payments
///
/// Create a checkout session with the payment provider and persist a
/// `pending` payment. All provider calls must succeed before the local
/// row is written; any provider failure aborts with 502 and leaves no
/// row behind.
pub async fn create(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(input): Json<CreatePaymentRequest>,
) -> AppResult<(StatusCode, Json<Payment>)> {
    validate_create_request(&input)?;

    // Resolve the purchased item's title for the provider product.
    let (product_name, product_description) = match (input.paid_course_id, input.paid_lesson_id) {
        (Some(course_id), None) => {
            let course = CourseRepo::find_by_id(&state.pool, course_id)
                .await?
                .ok_or(AppError::Core(CoreError::NotFound {
                    entity: "Course",
                    id: course_id,
                }))?;
            (course.title, course.description)
        }
        (None, Some(lesson_id)) => {
            let lesson = LessonRepo::find_by_id(&state.pool, lesson_id)
                .await?
                .ok_or(AppError::Core(CoreError::NotFound {
                    entity: "Lesson",
                    id: lesson_id,
                }))?;
            (lesson.title, lesson.description)
        }
        // validate_create_request rules the other arms out.
        _ => unreachable!("validated: exactly one payment target"),
    };

    let billing = state.billing.as_ref().ok_or_else(|| {
        AppError::Core(CoreError::ExternalService(
            "Payment provider is not configured".into(),
        ))
    })?;

    // Provider calls, in order. Nothing is persisted until all succeed.
    let product_id = billing
        .create_product(&product_name, &product_description)
        .await?;
    let price_id = billing.create_price(input.amount_minor, &product_id).await?;
    let session = billing.create_checkout_session(&price_id).await?;

    let payment = PaymentRepo::create(
        &state.pool,
        &CreatePayment {
            user_id: auth_user.user_id,
            amount_minor: input.amount_minor,
            payment_method: PaymentMethod::Card,
            paid_course_id: input.paid_course_id,
            paid_lesson_id: input.paid_lesson_id,
            provider_product_id: Some(product_id),
            provider_price_id: Some(price_id),
            provider_session_id: Some(session.id),
            payment_url: Some(session.url),
        },
    )
    .await?;

    tracing::info!(
        payment_id = payment.id,
        user_id = auth_user.user_id,
        amount_minor = input.amount_minor,
        "Checkout payment created"
    );

    Ok((StatusCode::CREATED, Json(payment)))
}

/// GET /api/v1/payments/{id}/status
///
/// Poll the provider for the payment's checkout status. A payment that
/// is already `paid` locally is returned immediately without contacting
/// the provider.
pub async fn status(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<PaymentStatusResponse>> {
    let payment = PaymentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Payment",
            id,
        }))?;

    if payment.user_id != auth_user.user_id && !auth_user.is_moderator() {
        return Err(AppError::Core(CoreError::Forbidden(
            "You may only check your own payments".into(),
        )));
    }

    // Terminal-paid short-circuit: no provider round trip.
    if payment.status() == Some(PaymentStatus::Paid) {
        return Ok(Json(status_response(payment)));
    }

    let Some(session_id) = payment.provider_session_id.clone() else {
        // Cash/transfer payments have no checkout session to poll.
        return Ok(Json(status_response(payment)));
    };

    let billing = state.billing.as_ref().ok_or_else(|| {
        AppError::Core(CoreError::ExternalService(
            "Payment provider is not configured".into(),
        ))
    })?;

    let session = billing.retrieve_session(&session_id).await?;

    if session.is_paid() {
        PaymentRepo::mark_paid(&state.pool, payment.id).await?;
        tracing::info!(payment_id = payment.id, "Payment marked paid");
        let updated = PaymentRepo::find_by_id(&state.pool, payment.id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Payment",
                id,
            }))?;
        return Ok(Json(status_response(updated)));
    }

    // Still pending at the provider. No pending -> failed transition is
    // inferred from polling; failure requires an explicit provider signal.
    Ok(Json(status_response(payment)))
}

/// GET /api/v1/payments/success
///
/// Landing endpoint the provider redirects to after a completed checkout.
pub async fn success() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Payment completed. Check the payment status for confirmation."
    }))
}

/// GET /api/v1/payments/cancel
///
/// Landing endpoint the provider redirects to after a cancelled checkout.
pub async fn cancel() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Payment cancelled. You can retry the checkout at any time."
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn status_response(payment: Payment) -> PaymentStatusResponse {
    PaymentStatusResponse {
        payment_id: payment.id,
        payment_status: payment.payment_status,
        payment_url: payment.payment_url,
    }
}

/// Reject payloads that do not target exactly one item with a positive
/// amount. All violations are reported together.
fn validate_create_request(input: &CreatePaymentRequest) -> Result<(), AppError> {
    let mut violations = Vec::new();

    match (input.paid_course_id, input.paid_lesson_id) {
        (None, None) => violations.push(FieldViolation::new(
            "paid_course_id",
            "Either a course or a lesson must be specified",
        )),
        (Some(_), Some(_)) => violations.push(FieldViolation::new(
            "paid_lesson_id",
            "A payment cannot target both a course and a lesson",
        )),
        _ => {}
    }

    if input.amount_minor <= 0 {
        violations.push(FieldViolation::new(
            "amount_minor",
            "Amount must be greater than zero",
        ));
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Validation(violations)))
    }
}
