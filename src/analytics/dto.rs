use serde::{Deserialize, Serialize};
use time::Date;

#[derive(Debug, Deserialize)]
pub struct DailyQuery {
    /// Defaults to today (UTC).
    #[serde(default, with = "crate::dates::day::option")]
    pub date: Option<Date>,
}

#[derive(Debug, Serialize)]
pub struct DaySummary {
    #[serde(with = "crate::dates::day")]
    pub date: Date,
    pub calories: i64,
    pub protein: i64,
    pub carbs: i64,
    pub fats: i64,
    pub meals_logged: u32,
}

#[derive(Debug, Serialize)]
pub struct WeeklyReport {
    /// Oldest first, one entry per day of the trailing week.
    pub days: Vec<DaySummary>,
    pub avg_calories: i64,
    pub days_logged: u32,
    pub goal_streak: u32,
}
