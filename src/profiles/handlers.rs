use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use tracing::{error, instrument};

use super::dto::{ProfileResponse, UpdateProfileRequest};
use super::repo;
use crate::{auth::AuthUser, state::AppState};

pub fn profile_routes() -> Router<AppState> {
    Router::new().route("/me/profile", get(get_profile).put(update_profile))
}

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<ProfileResponse>, (StatusCode, String)> {
    let profile = match repo::get_by_user(&state.db, user_id).await {
        Ok(Some(p)) => p,
        Ok(None) => return Err((StatusCode::NOT_FOUND, "Profile not found".into())),
        Err(e) => {
            error!(error = %e, %user_id, "load profile failed");
            return Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()));
        }
    };

    Ok(Json(ProfileResponse {
        id: profile.id,
        full_name: profile.full_name,
        avatar_url: profile.avatar_url,
        updated_at: profile.updated_at,
    }))
}

#[instrument(skip(state, payload))]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, (StatusCode, String)> {
    let profile = repo::upsert(
        &state.db,
        user_id,
        payload.full_name.as_deref(),
        payload.avatar_url.as_deref(),
    )
    .await
    .map_err(|e| {
        error!(error = %e, %user_id, "upsert profile failed");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    Ok(Json(ProfileResponse {
        id: profile.id,
        full_name: profile.full_name,
        avatar_url: profile.avatar_url,
        updated_at: profile.updated_at,
    }))
}
