use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Every user starts with this many generation credits. The periodic
/// reset of `last_reset_at` runs outside this service.
pub const DEFAULT_CREDITS: i32 = 30;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserCredits {
    pub user_id: Uuid,
    pub email: String,
    pub credits_remaining: i32,
    pub last_reset_at: OffsetDateTime,
}

impl UserCredits {
    /// Read the ledger row, lazily inserting the default on first access.
    /// The no-op DO UPDATE makes an existing row come back via RETURNING.
    pub async fn get_or_create(
        db: &PgPool,
        user_id: Uuid,
        email: &str,
    ) -> anyhow::Result<UserCredits> {
        let row = sqlx::query_as::<_, UserCredits>(
            r#"
            INSERT INTO user_credits (user_id, email)
            VALUES ($1, $2)
            ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id
            RETURNING user_id, email, credits_remaining, last_reset_at
            "#,
        )
        .bind(user_id)
        .bind(email)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    /// Atomic conditional decrement: the `credits_remaining > 0` guard
    /// keeps the counter non-negative under concurrent requests and turns
    /// the two-tab lost-update into a clean refusal. Returns the new
    /// remaining count, or `None` when the balance was already 0.
    pub async fn spend(db: &PgPool, user_id: Uuid) -> anyhow::Result<Option<i32>> {
        let remaining = sqlx::query_scalar::<_, i32>(
            r#"
            UPDATE user_credits
            SET credits_remaining = credits_remaining - 1
            WHERE user_id = $1 AND credits_remaining > 0
            RETURNING credits_remaining
            "#,
        )
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(remaining)
    }
}
