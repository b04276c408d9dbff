// In crates/api-client/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to build the API client: {0}")]
    ClientBuildError(String),
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(#[from] serde_json::Error),
    #[error("API error: status {status}, msg: {msg}")]
    ApiError { status: u16, msg: String },
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),
    #[error("Response is missing '{0}'")]
    MissingField(&'static str),
}

impl Error {
    /// Converts a client failure into the workspace-wide upstream error,
    /// tagged with the service that failed.
    pub fn into_upstream(self, service: &str) -> core_types::Error {
        core_types::Error::upstream(service, self.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Best-effort extraction of a human readable message from an error body.
///
/// Understands `{"error": {"message": ..}}` (OpenAI), `{"error": ".."}` and
/// `{"message": ".."}` (Polygon); otherwise falls back to the (truncated) raw body.
pub(crate) fn error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        let message = value
            .pointer("/error/message")
            .or_else(|| value.get("error"))
            .or_else(|| value.get("message"))
            .and_then(serde_json::Value::as_str);
        if let Some(message) = message {
            return message.to_string();
        }
    }
    body.chars().take(200).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_nested_and_flat_error_messages() {
        let openai = r#"{"error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}}"#;
        assert_eq!(error_message(openai), "Incorrect API key provided");
        assert_eq!(
            error_message(r#"{"status": "ERROR", "error": "Unknown API Key"}"#),
            "Unknown API Key"
        );
        assert_eq!(error_message(r#"{"message": "Not found"}"#), "Not found");
    }

    #[test]
    fn falls_back_to_truncated_body() {
        let body = "x".repeat(500);
        assert_eq!(error_message(&body).len(), 200);
        assert_eq!(error_message("Bad Gateway"), "Bad Gateway");
    }

    #[test]
    fn upstream_conversion_keeps_service_name() {
        let err = Error::ApiError { status: 503, msg: "down".into() }.into_upstream("polygon");
        assert_eq!(
            err,
            core_types::Error::UpstreamUnavailable {
                service: "polygon".into(),
                reason: "API error: status 503, msg: down".into(),
            }
        );
    }
}
