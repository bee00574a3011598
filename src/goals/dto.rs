use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

pub const GOAL_TYPES: [&str; 3] = ["lose", "maintain", "gain"];

#[derive(Debug, Deserialize)]
pub struct UpsertGoalRequest {
    pub goal_type: String,
    pub calories: i32,
    pub protein: i32,
    pub carbs: i32,
    pub fats: i32,
}

#[derive(Debug, Serialize)]
pub struct GoalResponse {
    pub goal_type: String,
    pub calories: i32,
    pub protein: i32,
    pub carbs: i32,
    pub fats: i32,
    pub updated_at: OffsetDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_goal_types() {
        for t in GOAL_TYPES {
            assert!(matches!(t, "lose" | "maintain" | "gain"));
        }
    }

    #[test]
    fn upsert_request_deserializes() {
        let r: UpsertGoalRequest = serde_json::from_str(
            r#"{"goal_type":"maintain","calories":2000,"protein":150,"carbs":250,"fats":70}"#,
        )
        .unwrap();
        assert_eq!(r.goal_type, "maintain");
        assert_eq!(r.calories, 2000);
    }
}
