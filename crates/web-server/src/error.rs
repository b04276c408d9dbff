// In crates/web-server/src/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to bind the server address: {0}")]
    ServerBindError(#[source] std::io::Error),

    #[error("Server error: {0}")]
    ServeError(#[source] std::io::Error),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Domain(#[from] core_types::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn status(&self) -> StatusCode {
        match self {
            Error::BadRequest(_) => StatusCode::BAD_REQUEST,
            Error::Domain(err) => match err {
                core_types::Error::Validation(_) => StatusCode::BAD_REQUEST,
                core_types::Error::InsufficientData { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                core_types::Error::UpstreamUnavailable { .. } => StatusCode::BAD_GATEWAY,
            },
            Error::ServerBindError(_) | Error::ServeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn summary(&self) -> &'static str {
        match self {
            Error::BadRequest(_) | Error::Domain(core_types::Error::Validation(_)) => {
                "Invalid request"
            }
            Error::Domain(core_types::Error::InsufficientData { .. }) => "Not enough market data",
            Error::Domain(core_types::Error::UpstreamUnavailable { .. }) => {
                "Upstream service failed"
            }
            Error::ServerBindError(_) | Error::ServeError(_) => "Internal server error",
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed.");
        } else {
            tracing::warn!(error = %self, "Request rejected.");
        }

        let body = Json(json!({
            "error": self.summary(),
            "details": self.to_string(),
        }));
        (status, body).into_response()
    }
}
