use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use tracing::{error, instrument};

use super::repo::{self, DailyQuote};
use crate::{dates, state::AppState};

pub fn quote_routes() -> Router<AppState> {
    Router::new().route("/quotes/today", get(quote_of_the_day))
}

#[instrument(skip(state))]
pub async fn quote_of_the_day(
    State(state): State<AppState>,
) -> Result<Json<DailyQuote>, (StatusCode, String)> {
    let today = dates::today_utc();
    let found = match repo::find_by_date(&state.db, today).await {
        Ok(q) => q,
        Err(e) => {
            error!(error = %e, "load quote failed");
            return Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()));
        }
    };

    // No quote scheduled for today: fall back to any quote at all
    let quote = match found {
        Some(q) => Some(q),
        None => repo::find_any(&state.db).await.map_err(|e| {
            error!(error = %e, "load fallback quote failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?,
    };

    match quote {
        Some(q) => Ok(Json(q)),
        None => Err((StatusCode::NOT_FOUND, "No quotes available".into())),
    }
}
