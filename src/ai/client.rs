//! Thin HTTP client for the chat-completions gateway. One request per call,
//! no retry, no streaming; the interesting part is the error mapping, which
//! keeps upstream 429/402 visible to the caller.

use std::time::Duration;

use axum::{
    async_trait,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::config::AiConfig;

const REQUEST_TIMEOUT_SECS: u64 = 120;
const CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error)]
pub enum AiError {
    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,
    #[error("Payment required. Please add credits to your workspace.")]
    PaymentRequired,
    #[error("AI gateway error: {status}")]
    Gateway { status: u16 },
    #[error("AI gateway request failed: {0}")]
    Request(String),
    #[error("Failed to parse AI response: {0}")]
    Parse(String),
    #[error("No content in AI response")]
    EmptyResponse,
    #[error("{0}")]
    InvalidRequest(String),
}

/// Upstream rate-limit and payment statuses pass through verbatim; every
/// other failure collapses to a 500 with a JSON error body.
impl IntoResponse for AiError {
    fn into_response(self) -> Response {
        let status = match &self {
            AiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AiError::PaymentRequired => StatusCode::PAYMENT_REQUIRED,
            AiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AiError::Gateway { .. }
            | AiError::Request(_)
            | AiError::Parse(_)
            | AiError::EmptyResponse => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!(error = %self, "ai proxy failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

// ---- wire types ----

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: MessageContent,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageUrl {
    pub url: String,
}

impl ChatMessage {
    pub fn system(text: impl Into<String>) -> Self {
        Self { role: "system", content: MessageContent::Text(text.into()) }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self { role: "user", content: MessageContent::Text(text.into()) }
    }

    pub fn user_parts(parts: Vec<ContentPart>) -> Self {
        Self { role: "user", content: MessageContent::Parts(parts) }
    }
}

#[async_trait]
pub trait AiGateway: Send + Sync {
    /// Send one chat request and return the assistant's text content.
    async fn chat(&self, messages: Vec<ChatMessage>) -> Result<String, AiError>;
}

pub struct GatewayClient {
    http: reqwest::Client,
    gateway_url: String,
    api_key: String,
    model: String,
}

impl GatewayClient {
    pub fn new(cfg: &AiConfig) -> Result<Self, AiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| AiError::Request(e.to_string()))?;
        Ok(Self {
            http,
            gateway_url: cfg.gateway_url.clone(),
            api_key: cfg.api_key.clone(),
            model: cfg.model.clone(),
        })
    }
}

#[async_trait]
impl AiGateway for GatewayClient {
    async fn chat(&self, messages: Vec<ChatMessage>) -> Result<String, AiError> {
        let body = json!({
            "model": self.model,
            "messages": messages,
        });

        let response = self
            .http
            .post(self.gateway_url.as_str())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AiError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        match status {
            429 => return Err(AiError::RateLimited),
            402 => return Err(AiError::PaymentRequired),
            200..=299 => {}
            other => return Err(AiError::Gateway { status: other }),
        }

        let text = response
            .text()
            .await
            .map_err(|e| AiError::Request(e.to_string()))?;
        parse_chat_content(&text)
    }
}

// ---- parsing ----

/// Pull `choices[0].message.content` out of a chat-completions response.
pub fn parse_chat_content(body: &str) -> Result<String, AiError> {
    #[derive(Deserialize)]
    struct ApiResponse {
        choices: Vec<Choice>,
    }
    #[derive(Deserialize)]
    struct Choice {
        message: ChoiceMessage,
    }
    #[derive(Deserialize)]
    struct ChoiceMessage {
        content: Option<String>,
    }

    let api: ApiResponse =
        serde_json::from_str(body).map_err(|e| AiError::Parse(e.to_string()))?;
    api.choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .filter(|c| !c.is_empty())
        .ok_or(AiError::EmptyResponse)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_first_choice_content() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"hello"}},
                       {"message":{"role":"assistant","content":"ignored"}}]}"#;
        assert_eq!(parse_chat_content(body).unwrap(), "hello");
    }

    #[test]
    fn missing_or_empty_content_is_an_error() {
        let empty = r#"{"choices":[]}"#;
        assert!(matches!(parse_chat_content(empty), Err(AiError::EmptyResponse)));

        let null = r#"{"choices":[{"message":{"content":null}}]}"#;
        assert!(matches!(parse_chat_content(null), Err(AiError::EmptyResponse)));

        let blank = r#"{"choices":[{"message":{"content":""}}]}"#;
        assert!(matches!(parse_chat_content(blank), Err(AiError::EmptyResponse)));
    }

    #[test]
    fn garbage_is_a_parse_error() {
        assert!(matches!(parse_chat_content("not json"), Err(AiError::Parse(_))));
    }

    #[test]
    fn message_with_image_serializes_as_parts() {
        let msg = ChatMessage::user_parts(vec![
            ContentPart::Text { text: "look at this".into() },
            ContentPart::ImageUrl { image_url: ImageUrl { url: "data:image/png;base64,xyz".into() } },
        ]);
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "user");
        assert_eq!(json["content"][0]["type"], "text");
        assert_eq!(json["content"][1]["type"], "image_url");
        assert_eq!(json["content"][1]["image_url"]["url"], "data:image/png;base64,xyz");
    }

    #[test]
    fn plain_text_message_serializes_as_string() {
        let msg = ChatMessage::system("be helpful");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["content"], "be helpful");
    }

    #[test]
    fn error_statuses() {
        use axum::response::IntoResponse;
        assert_eq!(AiError::RateLimited.into_response().status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(AiError::PaymentRequired.into_response().status(), StatusCode::PAYMENT_REQUIRED);
        assert_eq!(
            AiError::Gateway { status: 503 }.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AiError::InvalidRequest("x".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
    }
}
