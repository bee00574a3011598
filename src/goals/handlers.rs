use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use tracing::{error, instrument, warn};

use super::dto::{GoalResponse, UpsertGoalRequest, GOAL_TYPES};
use super::repo::{self, Goal};
use crate::{auth::AuthUser, state::AppState};

pub fn goal_routes() -> Router<AppState> {
    Router::new().route("/goals", get(get_goal).put(upsert_goal))
}

#[instrument(skip(state))]
pub async fn get_goal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<GoalResponse>, (StatusCode, String)> {
    let goal = match repo::get_by_user(&state.db, user_id).await {
        Ok(Some(g)) => g,
        Ok(None) => return Err((StatusCode::NOT_FOUND, "No goal set".into())),
        Err(e) => {
            error!(error = %e, %user_id, "load goal failed");
            return Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()));
        }
    };
    Ok(Json(to_response(goal)))
}

#[instrument(skip(state, payload))]
pub async fn upsert_goal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<UpsertGoalRequest>,
) -> Result<Json<GoalResponse>, (StatusCode, String)> {
    if !GOAL_TYPES.contains(&payload.goal_type.as_str()) {
        warn!(goal_type = %payload.goal_type, "unknown goal type");
        return Err((
            StatusCode::BAD_REQUEST,
            "goal_type must be one of lose, maintain, gain".into(),
        ));
    }
    if payload.calories < 0 || payload.protein < 0 || payload.carbs < 0 || payload.fats < 0 {
        return Err((StatusCode::BAD_REQUEST, "targets must be non-negative".into()));
    }

    let goal = repo::upsert(
        &state.db,
        user_id,
        &payload.goal_type,
        payload.calories,
        payload.protein,
        payload.carbs,
        payload.fats,
    )
    .await
    .map_err(|e| {
        error!(error = %e, %user_id, "upsert goal failed");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    Ok(Json(to_response(goal)))
}

fn to_response(goal: Goal) -> GoalResponse {
    GoalResponse {
        goal_type: goal.goal_type,
        calories: goal.calories,
        protein: goal.protein,
        carbs: goal.carbs,
        fats: goal.fats,
        updated_at: goal.updated_at,
    }
}
