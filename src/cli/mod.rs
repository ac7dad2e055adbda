//! CLI module for sqlgate
//!
//! Provides command-line interface for:
//! - init: Write a default configuration file
//! - start: Open the engine and serve the gateway

mod args;
mod commands;
mod config;
mod errors;

pub use args::{Cli, Command};
pub use commands::{init, resolve_config, run, run_command, start};
pub use config::Config;
pub use errors::{CliError, CliResult};
