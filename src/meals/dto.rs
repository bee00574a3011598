use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct CreateMealRequest {
    pub meal_name: String,
    /// Defaults to today (UTC) when omitted.
    #[serde(default, with = "crate::dates::day::option")]
    pub meal_date: Option<Date>,
    pub calories: i32,
    pub protein: i32,
    pub carbs: i32,
    pub fats: i32,
    pub meal_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MealListItem {
    pub id: Uuid,
    pub meal_name: String,
    #[serde(with = "crate::dates::day")]
    pub meal_date: Date,
    pub calories: i32,
    pub protein: i32,
    pub carbs: i32,
    pub fats: i32,
    pub meal_type: Option<String>,
    pub has_photo: bool,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Serialize)]
pub struct MealDetails {
    pub id: Uuid,
    pub meal_name: String,
    #[serde(with = "crate::dates::day")]
    pub meal_date: Date,
    pub calories: i32,
    pub protein: i32,
    pub carbs: i32,
    pub fats: i32,
    pub meal_type: Option<String>,
    pub photo_url: Option<String>,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Serialize)]
pub struct PhotoUploadResponse {
    pub photo_url: String,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Single calendar day; takes precedence over from/to.
    #[serde(default, with = "crate::dates::day::option")]
    pub date: Option<Date>,
    #[serde(default, with = "crate::dates::day::option")]
    pub from: Option<Date>,
    #[serde(default, with = "crate::dates::day::option")]
    pub to: Option<Date>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}
fn default_limit() -> i64 { 20 }

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn list_query_defaults() {
        let q: ListQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(q.limit, 20);
        assert_eq!(q.offset, 0);
        assert!(q.date.is_none() && q.from.is_none() && q.to.is_none());
    }

    #[test]
    fn create_meal_request_parses_day() {
        let r: CreateMealRequest = serde_json::from_str(
            r#"{"meal_name":"Oatmeal with Berries","meal_date":"2025-03-02",
                "calories":350,"protein":12,"carbs":65,"fats":8,"meal_type":"breakfast"}"#,
        )
        .unwrap();
        assert_eq!(r.meal_date, Some(date!(2025 - 03 - 02)));
        assert_eq!(r.meal_type.as_deref(), Some("breakfast"));
    }
}
