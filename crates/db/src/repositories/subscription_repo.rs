//! Repository for the `subscriptions` table.

use campus_core::types::DbId;
use sqlx::PgPool;

use crate::models::subscription::Subscription;

const COLUMNS: &str = "id, user_id, course_id, created_at";

/// Provides subscription lookups and the toggle primitives.
pub struct SubscriptionRepo;

impl SubscriptionRepo {
    /// Find the subscription row for a (user, course) pair.
    pub async fn find(
        pool: &PgPool,
        user_id: DbId,
        course_id: DbId,
    ) -> Result<Option<Subscription>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM subscriptions WHERE user_id = $1 AND course_id = $2"
        );
        sqlx::query_as::<_, Subscription>(&query)
            .bind(user_id)
            .bind(course_id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a subscription, returning the created row.
    ///
    /// A concurrent duplicate insert violates
    /// `uq_subscriptions_user_course` and surfaces as a database error
    /// the API layer maps to 409.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        course_id: DbId,
    ) -> Result<Subscription, sqlx::Error> {
        let query = format!(
            "INSERT INTO subscriptions (user_id, course_id)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Subscription>(&query)
            .bind(user_id)
            .bind(course_id)
            .fetch_one(pool)
            .await
    }

    /// Delete the subscription for a (user, course) pair.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(
        pool: &PgPool,
        user_id: DbId,
        course_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM subscriptions WHERE user_id = $1 AND course_id = $2")
            .bind(user_id)
            .bind(course_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Course ids the user is subscribed to. Used to decorate course
    /// listings with `is_subscribed`.
    pub async fn course_ids_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        let rows: Vec<(DbId,)> =
            sqlx::query_as("SELECT course_id FROM subscriptions WHERE user_id = $1")
                .bind(user_id)
                .fetch_all(pool)
                .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Email addresses of every subscriber of a course.
    pub async fn subscriber_emails(
        pool: &PgPool,
        course_id: DbId,
    ) -> Result<Vec<String>, sqlx::Error> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT u.email FROM subscriptions s
             JOIN users u ON u.id = s.user_id
             WHERE s.course_id = $1
             ORDER BY u.email",
        )
        .bind(course_id)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(|(email,)| email).collect())
    }
}
