// In crates/core-types/src/error.rs

use thiserror::Error;

/// The error kinds shared by every crate in the workspace.
///
/// `Validation` means the caller handed us unusable input, `InsufficientData`
/// and `UpstreamUnavailable` mean we could not compute an answer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Insufficient data: need at least {required} points, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("Upstream service '{service}' unavailable: {reason}")]
    UpstreamUnavailable { service: String, reason: String },
}

impl Error {
    pub fn validation(msg: impl Into<String>) -> Self {
        Error::Validation(msg.into())
    }

    pub fn upstream(service: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::UpstreamUnavailable {
            service: service.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
