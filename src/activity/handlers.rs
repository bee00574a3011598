use axum::{extract::State, http::StatusCode, routing::post, Router};
use tracing::{error, instrument};

use super::repo;
use crate::{auth::AuthUser, dates, state::AppState};

pub fn activity_routes() -> Router<AppState> {
    Router::new().route("/activity", post(record_activity))
}

/// Clients ping this on app load; login and register also record a visit.
#[instrument(skip(state))]
pub async fn record_activity(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<StatusCode, (StatusCode, String)> {
    repo::record_login(&state.db, user_id, dates::today_utc())
        .await
        .map_err(|e| {
            error!(error = %e, %user_id, "record activity failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?;
    Ok(StatusCode::NO_CONTENT)
}
