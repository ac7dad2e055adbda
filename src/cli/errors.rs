//! CLI-specific error types
//!
//! All CLI errors are fatal: the process prints them and exits non-zero.

use std::io;

use thiserror::Error;

/// CLI error
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration file error
    #[error("SQLGATE_CLI_CONFIG_ERROR: {0}")]
    Config(String),

    /// I/O error
    #[error("SQLGATE_CLI_IO_ERROR: {0}")]
    Io(String),

    /// Refusing to overwrite an existing file
    #[error("SQLGATE_CLI_ALREADY_EXISTS: {0} already exists")]
    AlreadyExists(String),

    /// Startup failed
    #[error("SQLGATE_CLI_BOOT_FAILED: {0}")]
    BootFailed(String),
}

impl CliError {
    /// Config error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Boot failed
    pub fn boot_failed(msg: impl Into<String>) -> Self {
        Self::BootFailed(msg.into())
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        match self {
            Self::Config(_) => "SQLGATE_CLI_CONFIG_ERROR",
            Self::Io(_) => "SQLGATE_CLI_IO_ERROR",
            Self::AlreadyExists(_) => "SQLGATE_CLI_ALREADY_EXISTS",
            Self::BootFailed(_) => "SQLGATE_CLI_BOOT_FAILED",
        }
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::Io(format!("JSON error: {}", e))
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
