//! Repository for the `payments` table.

use campus_core::types::DbId;
use sqlx::PgPool;

use crate::models::payment::{CreatePayment, Payment, PaymentListQuery, PaymentStatus};

const COLUMNS: &str = "id, user_id, amount_minor, payment_method, payment_status, \
                        paid_course_id, paid_lesson_id, provider_product_id, provider_price_id, \
                        provider_session_id, payment_url, payment_date";

/// Default page size for payment listings.
const DEFAULT_LIMIT: i64 = 50;
/// Hard cap on page size.
const MAX_LIMIT: i64 = 100;

/// Provides CRUD and status-transition operations for payments.
pub struct PaymentRepo;

impl PaymentRepo {
    /// Insert a payment row in `pending` status, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreatePayment) -> Result<Payment, sqlx::Error> {
        let query = format!(
            "INSERT INTO payments (user_id, amount_minor, payment_method, paid_course_id,
                                   paid_lesson_id, provider_product_id, provider_price_id,
                                   provider_session_id, payment_url)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Payment>(&query)
            .bind(input.user_id)
            .bind(input.amount_minor)
            .bind(input.payment_method.as_str())
            .bind(input.paid_course_id)
            .bind(input.paid_lesson_id)
            .bind(&input.provider_product_id)
            .bind(&input.provider_price_id)
            .bind(&input.provider_session_id)
            .bind(&input.payment_url)
            .fetch_one(pool)
            .await
    }

    /// Find a payment by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Payment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM payments WHERE id = $1");
        sqlx::query_as::<_, Payment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List payments with optional filters and ordering.
    ///
    /// When `scope_user_id` is set, only that user's payments are
    /// returned (non-moderator view). Ordering accepts `payment_date`,
    /// `amount`, and their `-`-prefixed descending forms; anything else
    /// falls back to newest first.
    pub async fn list(
        pool: &PgPool,
        scope_user_id: Option<DbId>,
        query_params: &PaymentListQuery,
    ) -> Result<Vec<Payment>, sqlx::Error> {
        let order_by = match query_params.ordering.as_deref() {
            Some("payment_date") => "payment_date ASC",
            Some("amount") => "amount_minor ASC",
            Some("-amount") => "amount_minor DESC",
            _ => "payment_date DESC",
        };
        let limit = query_params
            .limit
            .unwrap_or(DEFAULT_LIMIT)
            .clamp(1, MAX_LIMIT);
        let offset = query_params.offset.unwrap_or(0).max(0);

        let query = format!(
            "SELECT {COLUMNS} FROM payments
             WHERE ($1::BIGINT IS NULL OR user_id = $1)
               AND ($2::BIGINT IS NULL OR paid_course_id = $2)
               AND ($3::BIGINT IS NULL OR paid_lesson_id = $3)
               AND ($4::TEXT IS NULL OR payment_method = $4)
             ORDER BY {order_by}
             LIMIT $5 OFFSET $6"
        );
        sqlx::query_as::<_, Payment>(&query)
            .bind(scope_user_id)
            .bind(query_params.paid_course_id)
            .bind(query_params.paid_lesson_id)
            .bind(&query_params.payment_method)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// List a user's payments, newest first. Used for profile embedding.
    pub async fn list_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Payment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM payments WHERE user_id = $1 ORDER BY payment_date DESC"
        );
        sqlx::query_as::<_, Payment>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Transition a payment from `pending` to `paid`.
    ///
    /// The guard on the current status makes terminal states sticky:
    /// a payment already `paid` or `failed` is never modified.
    pub async fn mark_paid(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE payments SET payment_status = $2 WHERE id = $1 AND payment_status = $3",
        )
        .bind(id)
        .bind(PaymentStatus::Paid.as_str())
        .bind(PaymentStatus::Pending.as_str())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
