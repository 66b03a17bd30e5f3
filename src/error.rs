// src/error.rs
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::message::ChatResponse;
use crate::services::generator::GenerationError;

/// Every way a `/chat` request can fail. Each variant maps to one status code.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("No message provided")]
    Validation,

    #[error("Gemini API error: {0}")]
    Upstream(#[source] GenerationError),

    /// Rendered with the full context chain, e.g. `Failed to decode JSON body: EOF while parsing`.
    #[error("{0:#}")]
    Unexpected(anyhow::Error),
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::Validation => StatusCode::BAD_REQUEST,
            RelayError::Upstream(_) | RelayError::Unexpected(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let body = ChatResponse::Error(self.to_string());
        (self.status(), Json(body)).into_response()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is required but not set")]
    Missing(&'static str),

    #[error("invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}
