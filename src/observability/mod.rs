//! Observability subsystem for sqlgate
//!
//! This module provides:
//! - An injected metrics sink (`MetricsRegistry`) with per-procedure
//!   latency summaries and error counters
//! - The targeted-quantile `Summary` stream behind those summaries
//! - Logging bootstrap over `tracing-subscriber`
//!
//! # Usage
//!
//! ```ignore
//! use sqlgate::observability::{MetricsRegistry, Observation};
//!
//! let metrics = Arc::new(MetricsRegistry::new());
//! metrics.observe(Observation::new(Procedure::Exec, elapsed));
//! metrics.increment_errors(Procedure::Exec);
//! ```

mod logging;
mod metrics;
mod summary;

pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use metrics::{MetricsRegistry, MetricsSnapshot, Observation, SummaryView};
pub use summary::{Objective, Summary, SummarySnapshot, DEFAULT_OBJECTIVES};

use thiserror::Error;

/// Observability errors. Never fatal to request handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ObservabilityError {
    /// Unknown log format
    #[error("unknown log format: {0}")]
    InvalidFormat(String),

    /// Log filter directive did not parse
    #[error("invalid log filter '{filter}': {reason}")]
    InvalidFilter { filter: String, reason: String },

    /// A global subscriber was already installed
    #[error("logging already initialized: {0}")]
    AlreadyInitialized(String),
}

/// Result type for observability operations
pub type ObservabilityResult<T> = Result<T, ObservabilityError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observability_error_display() {
        let err = ObservabilityError::InvalidFormat("xml".to_string());
        assert_eq!(err.to_string(), "unknown log format: xml");

        let err = ObservabilityError::InvalidFilter {
            filter: "=".to_string(),
            reason: "bad".to_string(),
        };
        assert!(err.to_string().contains("invalid log filter"));
    }
}
