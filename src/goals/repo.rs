use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Goal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub goal_type: String,
    pub calories: i32,
    pub protein: i32,
    pub carbs: i32,
    pub fats: i32,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

pub async fn get_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Option<Goal>> {
    let goal = sqlx::query_as::<_, Goal>(
        r#"
        SELECT id, user_id, goal_type, calories, protein, carbs, fats, created_at, updated_at
        FROM goals
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(db)
    .await?;
    Ok(goal)
}

/// One goal row per user; a second upsert overwrites the first.
pub async fn upsert(
    db: &PgPool,
    user_id: Uuid,
    goal_type: &str,
    calories: i32,
    protein: i32,
    carbs: i32,
    fats: i32,
) -> anyhow::Result<Goal> {
    let goal = sqlx::query_as::<_, Goal>(
        r#"
        INSERT INTO goals (user_id, goal_type, calories, protein, carbs, fats)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (user_id) DO UPDATE SET
            goal_type  = EXCLUDED.goal_type,
            calories   = EXCLUDED.calories,
            protein    = EXCLUDED.protein,
            carbs      = EXCLUDED.carbs,
            fats       = EXCLUDED.fats,
            updated_at = now()
        RETURNING id, user_id, goal_type, calories, protein, carbs, fats, created_at, updated_at
        "#,
    )
    .bind(user_id)
    .bind(goal_type)
    .bind(calories)
    .bind(protein)
    .bind(carbs)
    .bind(fats)
    .fetch_one(db)
    .await?;
    Ok(goal)
}
