use axum::{extract::State, routing::post, Json, Router};
use serde_json::Value;
use tracing::{info, instrument};

use super::client::{AiError, ChatMessage, ContentPart, ImageUrl};
use super::dto::{
    AnalyzeMealRequest, GoalRecommendationRequest, GoalRecommendationResponse,
    SuggestRecipesRequest, SuggestRecipesResponse,
};
use crate::{auth::AuthUser, state::AppState};

pub fn ai_routes() -> Router<AppState> {
    Router::new()
        .route("/ai/analyze-meal", post(analyze_meal))
        .route("/ai/goal-recommendations", post(goal_recommendations))
        .route("/ai/suggest-recipes", post(suggest_recipes))
}

const ANALYZE_SYSTEM_PROMPT: &str = "You are a nutrition expert. Analyze food images or \
    descriptions and provide accurate nutritional information. Return ONLY valid JSON with this \
    exact structure: {\"foodName\": \"name\", \"calories\": number, \"protein\": number, \
    \"carbs\": number, \"fats\": number}. All nutrient values should be in grams except calories \
    in kcal.";

const ANALYZE_IMAGE_PROMPT: &str = "Analyze this meal image and provide the nutritional \
    information including food name, calories (kcal), protein (g), carbs (g), and fats (g). \
    Return only JSON.";

#[instrument(skip(state, payload))]
pub async fn analyze_meal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<AnalyzeMealRequest>,
) -> Result<Json<Value>, AiError> {
    let user_message = if let Some(image) = payload.image {
        info!(%user_id, "analyzing meal image");
        ChatMessage::user_parts(vec![
            ContentPart::Text { text: ANALYZE_IMAGE_PROMPT.into() },
            ContentPart::ImageUrl { image_url: ImageUrl { url: image } },
        ])
    } else if let Some(description) = payload.description {
        info!(%user_id, "analyzing meal description");
        ChatMessage::user(format!(
            "Analyze this food description and provide nutritional information: {description}. \
             Return only JSON with foodName, calories, protein, carbs, and fats."
        ))
    } else {
        return Err(AiError::InvalidRequest(
            "Either image or description must be provided".into(),
        ));
    };

    let content = state
        .ai
        .chat(vec![ChatMessage::system(ANALYZE_SYSTEM_PROMPT), user_message])
        .await?;

    let nutrition = parse_json_payload(&content)?;
    Ok(Json(nutrition))
}

#[instrument(skip(state, payload))]
pub async fn goal_recommendations(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<GoalRecommendationRequest>,
) -> Result<Json<GoalRecommendationResponse>, AiError> {
    let (system_prompt, user_prompt) = goal_prompts(&payload);

    let recommendation = state
        .ai
        .chat(vec![ChatMessage::system(system_prompt), ChatMessage::user(user_prompt)])
        .await?;

    Ok(Json(GoalRecommendationResponse { recommendation }))
}

#[instrument(skip(state, payload))]
pub async fn suggest_recipes(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<SuggestRecipesRequest>,
) -> Result<Json<SuggestRecipesResponse>, AiError> {
    let system_prompt = "You are a nutritionist AI that suggests healthy recipes. Return exactly \
        3 recipe suggestions in valid JSON format only. No markdown, no code blocks, just pure \
        JSON.";
    let user_prompt = recipe_prompt(&payload);

    let content = state
        .ai
        .chat(vec![ChatMessage::system(system_prompt), ChatMessage::user(user_prompt)])
        .await?;

    let recipes = parse_json_payload(&content)?;
    Ok(Json(SuggestRecipesResponse { recipes }))
}

// ---- prompt building ----

fn goal_label(goal_type: &str) -> &'static str {
    match goal_type {
        "lose" => "lose weight",
        "gain" => "gain muscle",
        _ => "maintain my weight",
    }
}

fn goal_prompts(req: &GoalRecommendationRequest) -> (String, String) {
    let system = if req.detailed {
        "You are a professional nutritionist providing detailed, personalized advice. Explain \
         the science behind recommendations, provide specific meal examples, and offer practical \
         tips for success. Be comprehensive but conversational."
    } else {
        "You are a professional nutritionist providing brief, actionable nutrition advice. Be \
         concise and focus on the most important recommendations."
    };

    let goal = goal_label(&req.goal_type);
    let user = if req.detailed {
        format!(
            "I want to {goal}.\n\
             My current targets are: {} calories, {}g protein, {}g carbs, {}g fats.\n\n\
             Please provide:\n\
             1. Detailed explanation of optimal calorie and macro targets for my goal\n\
             2. Science-based reasoning for these recommendations\n\
             3. Specific meal timing and composition suggestions\n\
             4. Tips for meal planning and preparation\n\
             5. Common pitfalls to avoid\n\n\
             Make it practical and easy to understand.",
            req.current_calories, req.current_protein, req.current_carbs, req.current_fats
        )
    } else {
        format!(
            "I want to {goal}.\n\
             Current targets: {} cal, {}g protein, {}g carbs, {}g fats.\n\n\
             Provide optimal calorie and macro recommendations with brief reasoning \
             (2-3 sentences max).",
            req.current_calories, req.current_protein, req.current_carbs, req.current_fats
        )
    };

    (system.to_string(), user)
}

fn recipe_prompt(req: &SuggestRecipesRequest) -> String {
    let goal_desc = match req.goal_type.as_str() {
        "lose" => "weight loss (calorie deficit, high protein)",
        "maintain" => "weight maintenance (balanced macros)",
        "gain" => "muscle gain (calorie surplus, high protein)",
        _ => "balanced nutrition",
    };

    format!(
        "Suggest 3 recipes for someone with a {goal_desc} goal.\n\
         Their daily targets are: {} calories, {}g protein, {}g carbs, {}g fats.\n\n\
         Each recipe should help them meet their goals. Return a JSON array with this exact \
         structure:\n\
         [\n  {{\n    \"name\": \"Recipe Name\",\n    \"description\": \"Brief description of \
         the recipe\",\n    \"calories\": 500,\n    \"protein\": 40,\n    \"carbs\": 45,\n    \
         \"fats\": 15,\n    \"time\": \"25 min\",\n    \"difficulty\": \"Easy\"\n  }}\n]\n\n\
         Only return the JSON array, nothing else.",
        req.calories, req.protein, req.carbs, req.fats
    )
}

// ---- response reshaping ----

/// Models wrap JSON in markdown fences more often than not. Strip one outer
/// fence pair, nothing else.
fn strip_code_fences(content: &str) -> &str {
    let mut s = content.trim();
    if let Some(rest) = s.strip_prefix("```json") {
        s = rest;
    } else if let Some(rest) = s.strip_prefix("```") {
        s = rest;
    }
    if let Some(rest) = s.strip_suffix("```") {
        s = rest;
    }
    s.trim()
}

fn parse_json_payload(content: &str) -> Result<Value, AiError> {
    serde_json::from_str(strip_code_fences(content)).map_err(|e| AiError::Parse(e.to_string()))
}

#[cfg(test)]
mod fence_tests {
    use super::*;

    #[test]
    fn strips_json_fence() {
        let content = "```json\n{\"foodName\":\"Oatmeal\"}\n```";
        assert_eq!(strip_code_fences(content), "{\"foodName\":\"Oatmeal\"}");
    }

    #[test]
    fn strips_bare_fence() {
        let content = "```\n[1,2,3]\n```";
        assert_eq!(strip_code_fences(content), "[1,2,3]");
    }

    #[test]
    fn leaves_plain_json_alone() {
        assert_eq!(strip_code_fences("  {\"a\":1} "), "{\"a\":1}");
    }

    #[test]
    fn inner_fences_survive() {
        let content = "```json\n{\"text\":\"use ``` for code\"}\n```";
        assert_eq!(strip_code_fences(content), "{\"text\":\"use ``` for code\"}");
    }

    #[test]
    fn payload_parse_rejects_prose() {
        assert!(matches!(
            parse_json_payload("Sorry, I cannot help with that."),
            Err(AiError::Parse(_))
        ));
    }
}

#[cfg(test)]
mod prompt_tests {
    use super::*;

    #[test]
    fn goal_prompts_switch_on_detailed() {
        let mut req = GoalRecommendationRequest {
            goal_type: "lose".into(),
            current_calories: 1800,
            current_protein: 140,
            current_carbs: 180,
            current_fats: 60,
            detailed: false,
        };
        let (system, user) = goal_prompts(&req);
        assert!(system.contains("brief"));
        assert!(user.contains("lose weight"));
        assert!(user.contains("1800 cal"));

        req.detailed = true;
        let (system, user) = goal_prompts(&req);
        assert!(system.contains("detailed"));
        assert!(user.contains("Common pitfalls to avoid"));
        assert!(user.contains("1800 calories"));
    }

    #[test]
    fn unknown_goal_type_falls_back() {
        assert_eq!(goal_label("bulk-cut-whatever"), "maintain my weight");

        let req = SuggestRecipesRequest {
            goal_type: "something-else".into(),
            calories: 2000,
            protein: 150,
            carbs: 250,
            fats: 70,
        };
        assert!(recipe_prompt(&req).contains("balanced nutrition"));
    }

    #[test]
    fn recipe_prompt_carries_targets() {
        let req = SuggestRecipesRequest {
            goal_type: "gain".into(),
            calories: 3000,
            protein: 180,
            carbs: 350,
            fats: 90,
        };
        let prompt = recipe_prompt(&req);
        assert!(prompt.contains("muscle gain (calorie surplus, high protein)"));
        assert!(prompt.contains("3000 calories, 180g protein, 350g carbs, 90g fats"));
        assert!(prompt.contains("Only return the JSON array"));
    }
}

#[cfg(test)]
mod handler_tests {
    use super::*;
    use crate::ai::client::AiGateway;
    use crate::state::AppState;
    use axum::async_trait;
    use std::sync::Arc;
    use uuid::Uuid;

    struct Scripted(Result<&'static str, fn() -> AiError>);

    #[async_trait]
    impl AiGateway for Scripted {
        async fn chat(&self, _messages: Vec<ChatMessage>) -> Result<String, AiError> {
            match &self.0 {
                Ok(s) => Ok((*s).to_string()),
                Err(make) => Err(make()),
            }
        }
    }

    fn state_with(reply: Result<&'static str, fn() -> AiError>) -> AppState {
        let mut state = AppState::fake();
        state.ai = Arc::new(Scripted(reply));
        state
    }

    #[tokio::test]
    async fn analyze_meal_strips_fences_and_forwards_json() {
        let state = state_with(Ok(
            "```json\n{\"foodName\":\"Grilled Chicken Salad\",\"calories\":450,\
             \"protein\":35,\"carbs\":30,\"fats\":18}\n```",
        ));
        let Json(value) = analyze_meal(
            axum::extract::State(state),
            crate::auth::AuthUser(Uuid::new_v4()),
            Json(AnalyzeMealRequest {
                description: Some("grilled chicken salad".into()),
                image: None,
            }),
        )
        .await
        .unwrap();
        assert_eq!(value["foodName"], "Grilled Chicken Salad");
        assert_eq!(value["calories"], 450);
    }

    #[tokio::test]
    async fn analyze_meal_requires_some_input() {
        let state = state_with(Ok("{}"));
        let err = analyze_meal(
            axum::extract::State(state),
            crate::auth::AuthUser(Uuid::new_v4()),
            Json(AnalyzeMealRequest { description: None, image: None }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AiError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn gateway_rate_limit_passes_through() {
        let state = state_with(Err(|| AiError::RateLimited));
        let err = suggest_recipes(
            axum::extract::State(state),
            crate::auth::AuthUser(Uuid::new_v4()),
            Json(SuggestRecipesRequest {
                goal_type: "lose".into(),
                calories: 1800,
                protein: 140,
                carbs: 180,
                fats: 60,
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AiError::RateLimited));
    }

    #[tokio::test]
    async fn recommendations_return_raw_text() {
        let state = state_with(Ok("Eat more protein at breakfast."));
        let Json(res) = goal_recommendations(
            axum::extract::State(state),
            crate::auth::AuthUser(Uuid::new_v4()),
            Json(GoalRecommendationRequest {
                goal_type: "maintain".into(),
                current_calories: 2000,
                current_protein: 150,
                current_carbs: 250,
                current_fats: 70,
                detailed: false,
            }),
        )
        .await
        .unwrap();
        assert_eq!(res.recommendation, "Eat more protein at breakfast.");
    }

    #[tokio::test]
    async fn unparsable_recipes_are_a_500_class_error() {
        let state = state_with(Ok("here are three lovely recipes: ..."));
        let err = suggest_recipes(
            axum::extract::State(state),
            crate::auth::AuthUser(Uuid::new_v4()),
            Json(SuggestRecipesRequest {
                goal_type: "gain".into(),
                calories: 3000,
                protein: 180,
                carbs: 350,
                fats: 90,
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AiError::Parse(_)));
    }
}
