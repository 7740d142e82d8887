//! Error kinds surfaced to tool callers.
//!
//! Only three kinds ever reach the caller: bad input, an unsupported digest
//! format, and an unknown delivery channel. Live-fetch and LLM failures are
//! absorbed by deterministic fallbacks inside the stages themselves.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Missing/malformed required field, or a reference to a nonexistent
    /// upstream id.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Unsupported digest format.
    #[error("invalid format: {0}")]
    InvalidFormat(String),

    /// Delivery channel outside the allow-list.
    #[error("unsupported channel: {0}")]
    UnsupportedChannel(String),
}

impl PipelineError {
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::InvalidInput(_) => "invalid_input",
            PipelineError::InvalidFormat(_) => "invalid_format",
            PipelineError::UnsupportedChannel(_) => "unsupported_channel",
        }
    }
}

impl IntoResponse for PipelineError {
    fn into_response(self) -> Response {
        let status = match &self {
            PipelineError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            PipelineError::InvalidFormat(_) | PipelineError::UnsupportedChannel(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
        };
        let body = Json(json!({
            "error": self.to_string(),
            "kind": self.kind(),
        }));
        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
