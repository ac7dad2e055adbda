//! CLI argument definitions using clap
//!
//! Commands:
//! - sqlgate start [--config <path>] [--port <port>]
//! - sqlgate init [--config <path>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// sqlgate - run SQL statements against an embedded SQLite engine over HTTP
#[derive(Parser, Debug)]
#[command(name = "sqlgate")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write a default configuration file
    Init {
        /// Path to configuration file
        #[arg(long, default_value = "./sqlgate.json")]
        config: PathBuf,
    },

    /// Start the gateway
    Start {
        /// Path to configuration file (built-in defaults when omitted)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override the gateway port
        #[arg(long)]
        port: Option<u16>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
