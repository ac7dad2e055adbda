//! # Engine Errors
//!
//! Error types surfaced by engine implementations.

use rusqlite::ErrorCode;
use thiserror::Error;

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Engine errors
///
/// Statement failures carry the engine's message verbatim so the gateway can
/// hand it to callers without further decoration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The engine rejected or failed to run the statement
    #[error("{0}")]
    Statement(String),

    /// The statement context was cancelled before or during execution
    #[error("statement cancelled")]
    Cancelled,

    /// The engine could not serve the call (connection or worker failure)
    #[error("engine unavailable: {0}")]
    Unavailable(String),

    /// An informational result value could not be produced
    #[error("result unavailable: {0}")]
    ResultUnavailable(String),
}

impl EngineError {
    /// Create a statement error
    pub fn statement(msg: impl Into<String>) -> Self {
        Self::Statement(msg.into())
    }

    /// Create an unavailable error
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Whether this error was caused by cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl From<rusqlite::Error> for EngineError {
    fn from(e: rusqlite::Error) -> Self {
        if e.sqlite_error_code() == Some(ErrorCode::OperationInterrupted) {
            return Self::Cancelled;
        }
        Self::Statement(e.to_string())
    }
}
