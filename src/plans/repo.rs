use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MealPlan {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Recipe {
    pub id: Uuid,
    #[serde(skip_serializing)]
    pub user_id: Uuid,
    pub meal_plan_id: Option<Uuid>,
    pub name: String,
    pub description: Option<String>,
    pub calories: i32,
    pub protein: i32,
    pub carbs: i32,
    pub fats: i32,
    pub time: String,
    pub difficulty: String,
    pub ingredients: Option<Vec<String>>,
    pub steps: Option<Vec<String>>,
    pub created_at: OffsetDateTime,
}

const RECIPE_COLUMNS: &str = "id, user_id, meal_plan_id, name, description, calories, protein, \
                              carbs, fats, time, difficulty, ingredients, steps, created_at";

// ---- meal plans ----

pub async fn list_plans(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<MealPlan>> {
    let rows = sqlx::query_as::<_, MealPlan>(
        r#"
        SELECT id, user_id, name, description, created_at, updated_at
        FROM meal_plans
        WHERE user_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn insert_plan(
    db: &PgPool,
    user_id: Uuid,
    name: &str,
    description: Option<&str>,
) -> anyhow::Result<MealPlan> {
    let plan = sqlx::query_as::<_, MealPlan>(
        r#"
        INSERT INTO meal_plans (user_id, name, description)
        VALUES ($1, $2, $3)
        RETURNING id, user_id, name, description, created_at, updated_at
        "#,
    )
    .bind(user_id)
    .bind(name)
    .bind(description)
    .fetch_one(db)
    .await?;
    Ok(plan)
}

pub async fn get_plan(db: &PgPool, user_id: Uuid, plan_id: Uuid) -> anyhow::Result<Option<MealPlan>> {
    let plan = sqlx::query_as::<_, MealPlan>(
        r#"
        SELECT id, user_id, name, description, created_at, updated_at
        FROM meal_plans
        WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(plan_id)
    .bind(user_id)
    .fetch_optional(db)
    .await?;
    Ok(plan)
}

pub async fn update_plan(
    db: &PgPool,
    user_id: Uuid,
    plan_id: Uuid,
    name: &str,
    description: Option<&str>,
) -> anyhow::Result<Option<MealPlan>> {
    let plan = sqlx::query_as::<_, MealPlan>(
        r#"
        UPDATE meal_plans
        SET name = $3, description = $4, updated_at = now()
        WHERE id = $1 AND user_id = $2
        RETURNING id, user_id, name, description, created_at, updated_at
        "#,
    )
    .bind(plan_id)
    .bind(user_id)
    .bind(name)
    .bind(description)
    .fetch_optional(db)
    .await?;
    Ok(plan)
}

/// Recipes attached to the plan go with it (FK ON DELETE CASCADE).
pub async fn delete_plan(db: &PgPool, user_id: Uuid, plan_id: Uuid) -> anyhow::Result<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM meal_plans
        WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(plan_id)
    .bind(user_id)
    .execute(db)
    .await?;
    Ok(result.rows_affected() > 0)
}

// ---- recipes ----

pub async fn list_recipes(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<Recipe>> {
    let rows = sqlx::query_as::<_, Recipe>(&format!(
        r#"
        SELECT {RECIPE_COLUMNS}
        FROM recipes
        WHERE user_id = $1
        ORDER BY created_at DESC
        "#
    ))
    .bind(user_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn list_recipes_by_plan(
    db: &PgPool,
    user_id: Uuid,
    plan_id: Uuid,
) -> anyhow::Result<Vec<Recipe>> {
    let rows = sqlx::query_as::<_, Recipe>(&format!(
        r#"
        SELECT {RECIPE_COLUMNS}
        FROM recipes
        WHERE user_id = $1 AND meal_plan_id = $2
        ORDER BY created_at ASC
        "#
    ))
    .bind(user_id)
    .bind(plan_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

#[allow(clippy::too_many_arguments)]
pub async fn insert_recipe(
    db: &PgPool,
    user_id: Uuid,
    meal_plan_id: Option<Uuid>,
    name: &str,
    description: Option<&str>,
    calories: i32,
    protein: i32,
    carbs: i32,
    fats: i32,
    time: &str,
    difficulty: &str,
    ingredients: Option<&[String]>,
    steps: Option<&[String]>,
) -> anyhow::Result<Recipe> {
    let recipe = sqlx::query_as::<_, Recipe>(&format!(
        r#"
        INSERT INTO recipes
            (user_id, meal_plan_id, name, description, calories, protein, carbs, fats,
             time, difficulty, ingredients, steps)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        RETURNING {RECIPE_COLUMNS}
        "#
    ))
    .bind(user_id)
    .bind(meal_plan_id)
    .bind(name)
    .bind(description)
    .bind(calories)
    .bind(protein)
    .bind(carbs)
    .bind(fats)
    .bind(time)
    .bind(difficulty)
    .bind(ingredients)
    .bind(steps)
    .fetch_one(db)
    .await?;
    Ok(recipe)
}

pub async fn get_recipe(
    db: &PgPool,
    user_id: Uuid,
    recipe_id: Uuid,
) -> anyhow::Result<Option<Recipe>> {
    let recipe = sqlx::query_as::<_, Recipe>(&format!(
        r#"
        SELECT {RECIPE_COLUMNS}
        FROM recipes
        WHERE id = $1 AND user_id = $2
        "#
    ))
    .bind(recipe_id)
    .bind(user_id)
    .fetch_optional(db)
    .await?;
    Ok(recipe)
}

pub async fn delete_recipe(db: &PgPool, user_id: Uuid, recipe_id: Uuid) -> anyhow::Result<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM recipes
        WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(recipe_id)
    .bind(user_id)
    .execute(db)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Attach to a plan, or detach with None.
pub async fn set_recipe_plan(
    db: &PgPool,
    user_id: Uuid,
    recipe_id: Uuid,
    meal_plan_id: Option<Uuid>,
) -> anyhow::Result<Option<Recipe>> {
    let recipe = sqlx::query_as::<_, Recipe>(&format!(
        r#"
        UPDATE recipes
        SET meal_plan_id = $3
        WHERE id = $1 AND user_id = $2
        RETURNING {RECIPE_COLUMNS}
        "#
    ))
    .bind(recipe_id)
    .bind(user_id)
    .bind(meal_plan_id)
    .fetch_optional(db)
    .await?;
    Ok(recipe)
}
