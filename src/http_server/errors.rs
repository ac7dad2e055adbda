//! # Gateway Errors
//!
//! Error types for the request gateway. Each maps to an HTTP status and is
//! rendered as a failure envelope carrying the raw message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use super::envelope::ExecutionResponse;
use crate::engine::EngineError;

/// Result type for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Gateway errors
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    /// Request body could not be read or decoded
    #[error("{0}")]
    Decode(String),

    /// The engine call failed
    #[error("{0}")]
    Engine(#[from] EngineError),
}

impl GatewayError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::Decode(_) => StatusCode::BAD_REQUEST,
            GatewayError::Engine(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(e: serde_json::Error) -> Self {
        GatewayError::Decode(e.to_string())
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        ExecutionResponse::failure(self.to_string()).into_response_with(status)
    }
}
