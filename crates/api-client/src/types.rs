// In crates/api-client/src/types.rs

use serde::{Deserialize, Serialize};

/// A single-turn chat completion: one system message, one user message.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub system: String,
    pub user: String,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
}

// --- OpenAI wire types ---

#[derive(Debug, Serialize)]
pub(crate) struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatCompletionResponse {
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResponseMessage {
    pub content: Option<String>,
}

// --- Polygon wire types ---

#[derive(Debug, Deserialize)]
pub(crate) struct SmaResponse {
    #[serde(default)]
    pub results: Option<SmaResults>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SmaResults {
    #[serde(default)]
    pub values: Vec<SmaValue>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SmaValue {
    #[serde(default)]
    pub timestamp: Option<i64>,
    pub value: f64,
}

// --- Pricing service wire types ---

#[derive(Debug, Serialize)]
pub(crate) struct AuthRequest<'a> {
    pub strategy: &'static str,
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AuthResponse {
    pub access_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PreviousClose {
    pub close: Option<f64>,
}
