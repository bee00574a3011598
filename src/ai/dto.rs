use serde::{Deserialize, Serialize};

/// Image is a data URL; it wins over the description when both are sent.
#[derive(Debug, Deserialize)]
pub struct AnalyzeMealRequest {
    pub description: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GoalRecommendationRequest {
    pub goal_type: String,
    pub current_calories: i32,
    pub current_protein: i32,
    pub current_carbs: i32,
    pub current_fats: i32,
    #[serde(default)]
    pub detailed: bool,
}

#[derive(Debug, Serialize)]
pub struct GoalRecommendationResponse {
    pub recommendation: String,
}

#[derive(Debug, Deserialize)]
pub struct SuggestRecipesRequest {
    pub goal_type: String,
    pub calories: i32,
    pub protein: i32,
    pub carbs: i32,
    pub fats: i32,
}

#[derive(Debug, Serialize)]
pub struct SuggestRecipesResponse {
    pub recipes: serde_json::Value,
}
