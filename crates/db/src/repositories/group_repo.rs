//! Repository for the `groups` and `user_groups` tables.

use campus_core::types::DbId;
use sqlx::PgPool;

/// Provides group-membership lookups and assignment.
pub struct GroupRepo;

impl GroupRepo {
    /// Names of all groups the user belongs to.
    pub async fn names_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<String>, sqlx::Error> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT g.name FROM groups g
             JOIN user_groups ug ON ug.group_id = g.id
             WHERE ug.user_id = $1
             ORDER BY g.name",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(|(name,)| name).collect())
    }

    /// Add a user to a group by group name.
    ///
    /// Returns `false` when the group name does not exist or the user
    /// was already a member.
    pub async fn add_user(pool: &PgPool, user_id: DbId, group_name: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO user_groups (user_id, group_id)
             SELECT $1, id FROM groups WHERE name = $2
             ON CONFLICT DO NOTHING",
        )
        .bind(user_id)
        .bind(group_name)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
