use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use time::Duration;
use tracing::{error, instrument};

use super::dto::{DailyQuery, DaySummary, WeeklyReport};
use super::services::{average_calories, daily_totals, goal_streak, DayTotals};
use crate::{auth::AuthUser, dates, goals, meals, state::AppState};

/// The streak walks back through history; a quarter is more than any
/// plausible run and keeps the fetch bounded.
const STREAK_WINDOW_DAYS: i64 = 90;

pub fn analytics_routes() -> Router<AppState> {
    Router::new()
        .route("/analytics/daily", get(daily_summary))
        .route("/analytics/weekly", get(weekly_report))
}

#[instrument(skip(state))]
pub async fn daily_summary(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<DailyQuery>,
) -> Result<Json<DaySummary>, (StatusCode, String)> {
    let day = q.date.unwrap_or_else(dates::today_utc);

    let rows = meals::repo::macros_on(&state.db, user_id, day)
        .await
        .map_err(|e| {
            error!(error = %e, %user_id, "daily summary query failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?;

    let totals = daily_totals(&rows);
    let t = totals.get(&day).copied().unwrap_or_default();
    Ok(Json(to_summary(day, t)))
}

#[instrument(skip(state))]
pub async fn weekly_report(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<WeeklyReport>, (StatusCode, String)> {
    let today = dates::today_utc();
    let rows = meals::repo::macros_since(
        &state.db,
        user_id,
        today - Duration::days(STREAK_WINDOW_DAYS - 1),
    )
    .await
    .map_err(|e| {
        error!(error = %e, %user_id, "weekly report query failed");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    let totals = daily_totals(&rows);

    let week: Vec<(time::Date, DayTotals)> = (0..7)
        .rev()
        .map(|back| {
            let day = today - Duration::days(back);
            (day, totals.get(&day).copied().unwrap_or_default())
        })
        .collect();

    let avg_calories = average_calories(week.iter().map(|(_, t)| t));
    let days_logged = week.iter().filter(|(_, t)| t.meals > 0).count() as u32;

    // No goal yet means no streak to speak of
    let streak = match goals::repo::get_by_user(&state.db, user_id).await {
        Ok(Some(goal)) => goal_streak(&totals, goal.calories, today),
        Ok(None) => 0,
        Err(e) => {
            error!(error = %e, %user_id, "load goal for streak failed");
            return Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()));
        }
    };

    Ok(Json(WeeklyReport {
        days: week.into_iter().map(|(d, t)| to_summary(d, t)).collect(),
        avg_calories,
        days_logged,
        goal_streak: streak,
    }))
}

fn to_summary(date: time::Date, t: DayTotals) -> DaySummary {
    DaySummary {
        date,
        calories: t.calories,
        protein: t.protein,
        carbs: t.carbs,
        fats: t.fats,
        meals_logged: t.meals,
    }
}
