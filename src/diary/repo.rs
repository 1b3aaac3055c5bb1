use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

/// One logged food on one calendar day. Nutrients are per reference
/// serving; `servings` is the multiplier the UI steps in quarters.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FoodEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: Date,
    pub food_name: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub servings: f64,
    pub created_at: OffsetDateTime,
}

impl FoodEntry {
    #[allow(clippy::too_many_arguments)]
    pub async fn insert(
        db: &PgPool,
        user_id: Uuid,
        date: Date,
        food_name: &str,
        calories: f64,
        protein: f64,
        carbs: f64,
        fat: f64,
        servings: f64,
    ) -> anyhow::Result<FoodEntry> {
        let row = sqlx::query_as::<_, FoodEntry>(
            r#"
            INSERT INTO daily_food_entries
                (user_id, date, food_name, calories, protein, carbs, fat, servings)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, user_id, date, food_name, calories, protein, carbs, fat,
                      servings, created_at
            "#,
        )
        .bind(user_id)
        .bind(date)
        .bind(food_name)
        .bind(calories)
        .bind(protein)
        .bind(carbs)
        .bind(fat)
        .bind(servings)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    pub async fn list_for_date(
        db: &PgPool,
        user_id: Uuid,
        date: Date,
    ) -> anyhow::Result<Vec<FoodEntry>> {
        let rows = sqlx::query_as::<_, FoodEntry>(
            r#"
            SELECT id, user_id, date, food_name, calories, protein, carbs, fat,
                   servings, created_at
            FROM daily_food_entries
            WHERE user_id = $1 AND date = $2
            ORDER BY created_at ASC
            "#,
        )
        .bind(user_id)
        .bind(date)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    /// Update one entry's multiplier. Row identity is always
    /// (id, user_id); another user's entry reads as not found.
    pub async fn update_servings(
        db: &PgPool,
        user_id: Uuid,
        id: Uuid,
        servings: f64,
    ) -> anyhow::Result<Option<FoodEntry>> {
        let row = sqlx::query_as::<_, FoodEntry>(
            r#"
            UPDATE daily_food_entries
            SET servings = $3
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, date, food_name, calories, protein, carbs, fat,
                      servings, created_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(servings)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn delete(db: &PgPool, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM daily_food_entries
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
