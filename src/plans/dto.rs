use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo::Recipe;

#[derive(Debug, Deserialize)]
pub struct CreatePlanRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePlanRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PlanResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Serialize)]
pub struct PlanWithRecipes {
    #[serde(flatten)]
    pub plan: PlanResponse,
    pub recipes: Vec<Recipe>,
}

#[derive(Debug, Deserialize)]
pub struct CreateRecipeRequest {
    pub name: String,
    pub description: Option<String>,
    pub calories: i32,
    pub protein: i32,
    pub carbs: i32,
    pub fats: i32,
    pub time: String,
    pub difficulty: String,
    pub meal_plan_id: Option<Uuid>,
    pub ingredients: Option<Vec<String>>,
    pub steps: Option<Vec<String>>,
}

/// `meal_plan_id: null` detaches the recipe from its plan.
#[derive(Debug, Deserialize)]
pub struct AttachRecipeRequest {
    pub meal_plan_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attach_request_null_detaches() {
        let r: AttachRecipeRequest = serde_json::from_str(r#"{"meal_plan_id":null}"#).unwrap();
        assert!(r.meal_plan_id.is_none());
    }

    #[test]
    fn create_recipe_accepts_suggestion_shape() {
        // shape returned by the recipe suggestion proxy, plus user-added steps
        let r: CreateRecipeRequest = serde_json::from_str(
            r#"{"name":"Salmon & Sweet Potato","description":"Pan-seared salmon",
                "calories":480,"protein":38,"carbs":42,"fats":18,
                "time":"30 min","difficulty":"Medium",
                "ingredients":["salmon fillet","sweet potato"],
                "steps":["bake the potato","sear the salmon"]}"#,
        )
        .unwrap();
        assert_eq!(r.difficulty, "Medium");
        assert_eq!(r.ingredients.as_ref().map(Vec::len), Some(2));
        assert!(r.meal_plan_id.is_none());
    }
}
