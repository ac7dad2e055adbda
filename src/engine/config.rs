//! Engine Configuration
//!
//! Data source and connection pool settings for the SQLite engine.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// SQLite path or URI (default: shared-cache in-memory database)
    #[serde(default = "default_data_source")]
    pub data_source: String,

    /// Maximum connections checked out at once (default: 4)
    #[serde(default = "default_max_open_connections")]
    pub max_open_connections: usize,

    /// Maximum idle connections kept for reuse (default: 2)
    #[serde(default = "default_max_idle_connections")]
    pub max_idle_connections: usize,

    /// Busy timeout applied to every connection (default: 100ms)
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

fn default_data_source() -> String {
    "file:sqlgate?mode=memory&cache=shared".to_string()
}

fn default_max_open_connections() -> usize {
    4
}

fn default_max_idle_connections() -> usize {
    2
}

fn default_busy_timeout_ms() -> u64 {
    100
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            data_source: default_data_source(),
            max_open_connections: default_max_open_connections(),
            max_idle_connections: default_max_idle_connections(),
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

impl EngineConfig {
    /// Create a config for the given data source with default pool settings
    pub fn with_data_source(data_source: impl Into<String>) -> Self {
        Self {
            data_source: data_source.into(),
            ..Default::default()
        }
    }

    /// Busy timeout as a duration
    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}
