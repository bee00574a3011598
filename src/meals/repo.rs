use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Meal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub meal_name: String,
    pub meal_date: Date,
    pub calories: i32,
    pub protein: i32,
    pub carbs: i32,
    pub fats: i32,
    pub meal_type: Option<String>,
    pub photo_key: Option<String>,
    pub created_at: OffsetDateTime,
}

/// Just the columns the aggregation code cares about.
#[derive(Debug, Clone, FromRow)]
pub struct MacroRow {
    pub meal_date: Date,
    pub calories: i32,
    pub protein: i32,
    pub carbs: i32,
    pub fats: i32,
}

const MEAL_COLUMNS: &str =
    "id, user_id, meal_name, meal_date, calories, protein, carbs, fats, meal_type, photo_key, created_at";

pub async fn insert(
    db: &PgPool,
    user_id: Uuid,
    meal_name: &str,
    meal_date: Date,
    calories: i32,
    protein: i32,
    carbs: i32,
    fats: i32,
    meal_type: Option<&str>,
) -> anyhow::Result<Meal> {
    let meal = sqlx::query_as::<_, Meal>(&format!(
        r#"
        INSERT INTO meals (user_id, meal_name, meal_date, calories, protein, carbs, fats, meal_type)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING {MEAL_COLUMNS}
        "#
    ))
    .bind(user_id)
    .bind(meal_name)
    .bind(meal_date)
    .bind(calories)
    .bind(protein)
    .bind(carbs)
    .bind(fats)
    .bind(meal_type)
    .fetch_one(db)
    .await?;
    Ok(meal)
}

pub async fn list_by_user(
    db: &PgPool,
    user_id: Uuid,
    limit: i64,
    offset: i64,
) -> anyhow::Result<Vec<Meal>> {
    let rows = sqlx::query_as::<_, Meal>(&format!(
        r#"
        SELECT {MEAL_COLUMNS}
        FROM meals
        WHERE user_id = $1
        ORDER BY created_at DESC
        LIMIT $2 OFFSET $3
        "#
    ))
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn list_by_user_on(db: &PgPool, user_id: Uuid, day: Date) -> anyhow::Result<Vec<Meal>> {
    let rows = sqlx::query_as::<_, Meal>(&format!(
        r#"
        SELECT {MEAL_COLUMNS}
        FROM meals
        WHERE user_id = $1 AND meal_date = $2
        ORDER BY created_at DESC
        "#
    ))
    .bind(user_id)
    .bind(day)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn list_by_user_between(
    db: &PgPool,
    user_id: Uuid,
    from: Date,
    to: Date,
    limit: i64,
    offset: i64,
) -> anyhow::Result<Vec<Meal>> {
    let rows = sqlx::query_as::<_, Meal>(&format!(
        r#"
        SELECT {MEAL_COLUMNS}
        FROM meals
        WHERE user_id = $1 AND meal_date BETWEEN $2 AND $3
        ORDER BY created_at DESC
        LIMIT $4 OFFSET $5
        "#
    ))
    .bind(user_id)
    .bind(from)
    .bind(to)
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn get_by_id(db: &PgPool, user_id: Uuid, meal_id: Uuid) -> anyhow::Result<Option<Meal>> {
    let meal = sqlx::query_as::<_, Meal>(&format!(
        r#"
        SELECT {MEAL_COLUMNS}
        FROM meals
        WHERE id = $1 AND user_id = $2
        "#
    ))
    .bind(meal_id)
    .bind(user_id)
    .fetch_optional(db)
    .await?;
    Ok(meal)
}

/// Returns false when the meal does not exist (or belongs to someone else).
pub async fn delete(db: &PgPool, user_id: Uuid, meal_id: Uuid) -> anyhow::Result<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM meals
        WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(meal_id)
    .bind(user_id)
    .execute(db)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn set_photo_key(
    db: &PgPool,
    user_id: Uuid,
    meal_id: Uuid,
    photo_key: &str,
) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        UPDATE meals
        SET photo_key = $3
        WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(meal_id)
    .bind(user_id)
    .bind(photo_key)
    .execute(db)
    .await?;
    Ok(())
}

/// Macro columns for every meal on or after `from`, oldest day first.
pub async fn macros_since(db: &PgPool, user_id: Uuid, from: Date) -> anyhow::Result<Vec<MacroRow>> {
    let rows = sqlx::query_as::<_, MacroRow>(
        r#"
        SELECT meal_date, calories, protein, carbs, fats
        FROM meals
        WHERE user_id = $1 AND meal_date >= $2
        ORDER BY meal_date ASC
        "#,
    )
    .bind(user_id)
    .bind(from)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// Macro columns for a single day.
pub async fn macros_on(db: &PgPool, user_id: Uuid, day: Date) -> anyhow::Result<Vec<MacroRow>> {
    let rows = sqlx::query_as::<_, MacroRow>(
        r#"
        SELECT meal_date, calories, protein, carbs, fats
        FROM meals
        WHERE user_id = $1 AND meal_date = $2
        "#,
    )
    .bind(user_id)
    .bind(day)
    .fetch_all(db)
    .await?;
    Ok(rows)
}
