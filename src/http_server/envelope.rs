//! Request payload and response envelope
//!
//! Every `/exec` and `/query` response, success or failure, has the same
//! three fields and is rendered as indented JSON.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;

const JSON_CONTENT_TYPE: &str = "application/json";
const JSON_INDENT: &[u8] = b"    ";

/// Incoming statement payload
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StatementRequest {
    /// Raw statement text, passed to the engine untouched
    pub sql: String,
}

impl StatementRequest {
    /// Decode a request body
    pub fn decode(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }
}

/// Uniform response envelope
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResponse {
    pub rows_affected: i64,
    pub last_insert_id: i64,
    pub error: String,
}

impl ExecutionResponse {
    /// Successful mutation
    pub fn mutation(rows_affected: i64, last_insert_id: i64) -> Self {
        Self {
            rows_affected,
            last_insert_id,
            error: String::new(),
        }
    }

    /// Successful read; the row count travels in `rows_affected`
    pub fn rows(count: i64) -> Self {
        Self::mutation(count, 0)
    }

    /// Failure; numeric fields stay zero
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            ..Default::default()
        }
    }

    /// Render with 4-space indentation and a trailing newline
    pub fn to_pretty_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        let mut out = Vec::with_capacity(96);
        let mut ser =
            serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(JSON_INDENT));
        self.serialize(&mut ser)?;
        out.push(b'\n');
        Ok(out)
    }

    /// Build the HTTP response with the given status
    pub fn into_response_with(self, status: StatusCode) -> Response {
        match self.to_pretty_json() {
            Ok(body) => (
                status,
                [(header::CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE))],
                body,
            )
                .into_response(),
            Err(e) => {
                tracing::error!(error = %e, "failed to encode response envelope");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

impl IntoResponse for ExecutionResponse {
    fn into_response(self) -> Response {
        self.into_response_with(StatusCode::OK)
    }
}
