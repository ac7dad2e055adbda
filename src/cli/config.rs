//! Configuration file
//!
//! One JSON document with three optional sections. Missing fields take their
//! defaults; the result is validated before anything starts.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::errors::{CliError, CliResult};
use crate::engine::EngineConfig;
use crate::http_server::HttpServerConfig;
use crate::observability::LoggingConfig;

/// Configuration file structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: HttpServerConfig,

    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            CliError::config_error(format!("Failed to read config {}: {}", path.display(), e))
        })?;

        Self::from_json(&content)
    }

    /// Parse and validate configuration JSON
    pub fn from_json(content: &str) -> CliResult<Self> {
        let config: Config = serde_json::from_str(content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Default configuration rendered as indented JSON
    pub fn default_json() -> CliResult<String> {
        Ok(serde_json::to_string_pretty(&Config::default())?)
    }

    /// Validate configuration
    pub fn validate(&self) -> CliResult<()> {
        if self.server.port == 0 {
            return Err(CliError::config_error("server.port must be > 0"));
        }

        if self.server.metrics_port == Some(self.server.port) {
            return Err(CliError::config_error(
                "server.metrics_port must differ from server.port",
            ));
        }

        if self.server.max_body_bytes == 0 {
            return Err(CliError::config_error("server.max_body_bytes must be > 0"));
        }

        if self.server.request_timeout_ms == Some(0) {
            return Err(CliError::config_error(
                "server.request_timeout_ms must be > 0 (use null to disable)",
            ));
        }

        if self.engine.data_source.trim().is_empty() {
            return Err(CliError::config_error("engine.data_source must not be empty"));
        }

        if self.engine.max_open_connections == 0 {
            return Err(CliError::config_error(
                "engine.max_open_connections must be >= 1",
            ));
        }

        if self.engine.max_idle_connections > self.engine.max_open_connections {
            return Err(CliError::config_error(format!(
                "engine.max_idle_connections ({}) exceeds engine.max_open_connections ({})",
                self.engine.max_idle_connections, self.engine.max_open_connections
            )));
        }

        Ok(())
    }
}
