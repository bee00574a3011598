use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use tracing::{error, instrument};
use uuid::Uuid;

use super::dto::{
    AttachRecipeRequest, CreatePlanRequest, CreateRecipeRequest, PlanResponse, PlanWithRecipes,
    UpdatePlanRequest,
};
use super::repo::{self, MealPlan, Recipe};
use crate::{auth::AuthUser, state::AppState};

pub fn plan_routes() -> Router<AppState> {
    Router::new()
        .route("/meal-plans", get(list_plans).post(create_plan))
        .route(
            "/meal-plans/:id",
            get(get_plan).put(update_plan).delete(delete_plan),
        )
}

pub fn recipe_routes() -> Router<AppState> {
    Router::new()
        .route("/recipes", get(list_recipes).post(create_recipe))
        .route("/recipes/:id", get(get_recipe).delete(delete_recipe))
        .route("/recipes/:id/plan", put(attach_recipe))
}

// ---- meal plan handlers ----

#[instrument(skip(state))]
pub async fn list_plans(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<PlanResponse>>, (StatusCode, String)> {
    let plans = repo::list_plans(&state.db, user_id).await.map_err(internal)?;
    Ok(Json(plans.into_iter().map(to_plan_response).collect()))
}

#[instrument(skip(state, payload))]
pub async fn create_plan(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreatePlanRequest>,
) -> Result<(StatusCode, Json<PlanResponse>), (StatusCode, String)> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "name is required".into()));
    }

    let plan = repo::insert_plan(&state.db, user_id, name, payload.description.as_deref())
        .await
        .map_err(internal)?;
    Ok((StatusCode::CREATED, Json(to_plan_response(plan))))
}

#[instrument(skip(state))]
pub async fn get_plan(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<PlanWithRecipes>, (StatusCode, String)> {
    let plan = match repo::get_plan(&state.db, user_id, id).await {
        Ok(Some(p)) => p,
        Ok(None) => return Err((StatusCode::NOT_FOUND, "Meal plan not found".into())),
        Err(e) => {
            error!(error = %e, %user_id, %id, "get_plan failed");
            return Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()));
        }
    };

    let recipes = repo::list_recipes_by_plan(&state.db, user_id, id)
        .await
        .map_err(internal)?;

    Ok(Json(PlanWithRecipes {
        plan: to_plan_response(plan),
        recipes,
    }))
}

#[instrument(skip(state, payload))]
pub async fn update_plan(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePlanRequest>,
) -> Result<Json<PlanResponse>, (StatusCode, String)> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "name is required".into()));
    }

    match repo::update_plan(&state.db, user_id, id, name, payload.description.as_deref()).await {
        Ok(Some(p)) => Ok(Json(to_plan_response(p))),
        Ok(None) => Err((StatusCode::NOT_FOUND, "Meal plan not found".into())),
        Err(e) => {
            error!(error = %e, %user_id, %id, "update_plan failed");
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}

#[instrument(skip(state))]
pub async fn delete_plan(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    let deleted = repo::delete_plan(&state.db, user_id, id).await.map_err(internal)?;
    if !deleted {
        return Err((StatusCode::NOT_FOUND, "Meal plan not found".into()));
    }
    Ok(StatusCode::NO_CONTENT)
}

// ---- recipe handlers ----

#[instrument(skip(state))]
pub async fn list_recipes(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<Recipe>>, (StatusCode, String)> {
    let recipes = repo::list_recipes(&state.db, user_id).await.map_err(internal)?;
    Ok(Json(recipes))
}

#[instrument(skip(state, payload))]
pub async fn create_recipe(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateRecipeRequest>,
) -> Result<(StatusCode, Json<Recipe>), (StatusCode, String)> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "name is required".into()));
    }

    // An attached plan must be the caller's own
    if let Some(plan_id) = payload.meal_plan_id {
        match repo::get_plan(&state.db, user_id, plan_id).await {
            Ok(Some(_)) => {}
            Ok(None) => return Err((StatusCode::NOT_FOUND, "Meal plan not found".into())),
            Err(e) => return Err(internal(e)),
        }
    }

    let recipe = repo::insert_recipe(
        &state.db,
        user_id,
        payload.meal_plan_id,
        name,
        payload.description.as_deref(),
        payload.calories,
        payload.protein,
        payload.carbs,
        payload.fats,
        &payload.time,
        &payload.difficulty,
        payload.ingredients.as_deref(),
        payload.steps.as_deref(),
    )
    .await
    .map_err(internal)?;

    Ok((StatusCode::CREATED, Json(recipe)))
}

#[instrument(skip(state))]
pub async fn get_recipe(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Recipe>, (StatusCode, String)> {
    match repo::get_recipe(&state.db, user_id, id).await {
        Ok(Some(r)) => Ok(Json(r)),
        Ok(None) => Err((StatusCode::NOT_FOUND, "Recipe not found".into())),
        Err(e) => {
            error!(error = %e, %user_id, %id, "get_recipe failed");
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}

#[instrument(skip(state))]
pub async fn delete_recipe(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    let deleted = repo::delete_recipe(&state.db, user_id, id).await.map_err(internal)?;
    if !deleted {
        return Err((StatusCode::NOT_FOUND, "Recipe not found".into()));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /recipes/:id/plan — the "Add to Plan" action; null detaches.
#[instrument(skip(state, payload))]
pub async fn attach_recipe(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AttachRecipeRequest>,
) -> Result<Json<Recipe>, (StatusCode, String)> {
    if let Some(plan_id) = payload.meal_plan_id {
        match repo::get_plan(&state.db, user_id, plan_id).await {
            Ok(Some(_)) => {}
            Ok(None) => return Err((StatusCode::NOT_FOUND, "Meal plan not found".into())),
            Err(e) => return Err(internal(e)),
        }
    }

    match repo::set_recipe_plan(&state.db, user_id, id, payload.meal_plan_id).await {
        Ok(Some(r)) => Ok(Json(r)),
        Ok(None) => Err((StatusCode::NOT_FOUND, "Recipe not found".into())),
        Err(e) => {
            error!(error = %e, %user_id, %id, "attach_recipe failed");
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}

fn to_plan_response(plan: MealPlan) -> PlanResponse {
    PlanResponse {
        id: plan.id,
        name: plan.name,
        description: plan.description,
        created_at: plan.created_at,
        updated_at: plan.updated_at,
    }
}

fn internal(e: anyhow::Error) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}
