// In crates/api-client/src/openai.rs

use crate::error::error_message;
use crate::types::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage, CompletionRequest};
use crate::{CompletionProvider, Error, Result};
use app_config::OpenAiSettings;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// The client for the OpenAI chat completions API.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    /// The persistent HTTP client.
    http_client: Client,
    api_key: String,
    /// e.g. `https://api.openai.com/v1`
    base_url: String,
}

impl OpenAiClient {
    /// Constructs a new OpenAiClient from OpenAiSettings.
    pub fn new(settings: &OpenAiSettings) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| Error::ClientBuildError(e.to_string()))?;

        Ok(Self {
            http_client,
            api_key: settings.api_key.clone(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl CompletionProvider for OpenAiClient {
    /// Corresponds to `POST /chat/completions`.
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let body = ChatCompletionRequest {
            model: &request.model,
            messages: vec![
                ChatMessage { role: "system", content: &request.system },
                ChatMessage { role: "user", content: &request.user },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let url = format!("{}/chat/completions", self.base_url);
        tracing::debug!(model = %request.model, "Requesting chat completion.");

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(Error::ApiError {
                status: status.as_u16(),
                msg: error_message(&text),
            });
        }

        first_choice_content(&text)
    }
}

/// Pulls `choices[0].message.content` out of a completion response body.
pub(crate) fn first_choice_content(body: &str) -> Result<String> {
    let response: ChatCompletionResponse = serde_json::from_str(body)?;
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or(Error::MissingField("choices[0].message.content"))
}
