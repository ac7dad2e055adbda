//! HTTP Server Configuration
//!
//! Listener addresses, request timeout and body limit.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpServerConfig {
    /// Host to bind to (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Gateway port (default: 3000)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Metrics listener port (default: 9100, null disables)
    #[serde(default = "default_metrics_port")]
    pub metrics_port: Option<u16>,

    /// Per-request timeout in milliseconds (default: 30000, null disables)
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: Option<u64>,

    /// Largest accepted request body (default: 2 MiB)
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_metrics_port() -> Option<u16> {
    Some(9100)
}

fn default_request_timeout_ms() -> Option<u64> {
    Some(30_000)
}

fn default_max_body_bytes() -> usize {
    2 * 1024 * 1024
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            metrics_port: default_metrics_port(),
            request_timeout_ms: default_request_timeout_ms(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl HttpServerConfig {
    /// Create a new config with specified port
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            ..Default::default()
        }
    }

    /// Get the gateway socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the metrics socket address string, if the listener is enabled
    pub fn metrics_socket_addr(&self) -> Option<String> {
        self.metrics_port.map(|port| format!("{}:{}", self.host, port))
    }

    /// Request timeout, if enabled
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }
}
