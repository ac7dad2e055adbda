//! CLI command implementations
//!
//! `start` boots in a fixed order: config, logging, engine, server. Failing
//! to open the engine is fatal; nothing is served.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use super::args::Command;
use super::config::Config;
use super::errors::{CliError, CliResult};
use crate::core::EngineAdapter;
use crate::engine::SqliteEngine;
use crate::http_server::HttpServer;
use crate::observability::{init_logging, MetricsRegistry};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Init { config } => init(&config),
        Command::Start { config, port } => start(config.as_deref(), port),
    }
}

/// Write the default configuration to `config_path`
pub fn init(config_path: &Path) -> CliResult<()> {
    if config_path.exists() {
        return Err(CliError::AlreadyExists(config_path.display().to_string()));
    }

    let json = Config::default_json()?;
    fs::write(config_path, json + "\n")?;

    println!("Wrote default configuration to {}", config_path.display());
    Ok(())
}

/// Resolve configuration: file (or defaults), then command-line overrides
pub fn resolve_config(config_path: Option<&Path>, port: Option<u16>) -> CliResult<Config> {
    let mut config = match config_path {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    if let Some(port) = port {
        config.server.port = port;
        config.validate()?;
    }

    Ok(config)
}

/// Start the gateway and serve until Ctrl-C
pub fn start(config_path: Option<&Path>, port: Option<u16>) -> CliResult<()> {
    let config = resolve_config(config_path, port)?;

    init_logging(&config.logging).map_err(|e| CliError::boot_failed(e.to_string()))?;

    let engine = SqliteEngine::open(&config.engine).map_err(|e| {
        tracing::error!(error = %e, data_source = %config.engine.data_source, "failed to open engine");
        CliError::boot_failed(format!("Failed to open engine: {}", e))
    })?;

    let metrics = Arc::new(MetricsRegistry::new());
    let adapter = EngineAdapter::new(Arc::new(engine), metrics);
    let server = HttpServer::new(config.server.clone(), adapter);

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_writes_loadable_config() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("sqlgate.json");

        init(&path).unwrap();

        assert_eq!(Config::load(&path).unwrap(), Config::default());
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("sqlgate.json");
        fs::write(&path, "{}").unwrap();

        assert!(matches!(init(&path), Err(CliError::AlreadyExists(_))));
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
    }

    #[test]
    fn test_resolve_config_defaults_and_override() {
        let config = resolve_config(None, None).unwrap();
        assert_eq!(config, Config::default());

        let config = resolve_config(None, Some(8080)).unwrap();
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_resolve_config_rejects_clashing_override() {
        let err = resolve_config(None, Some(9100)).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn test_start_fails_on_unopenable_engine() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("sqlgate.json");
        fs::write(
            &path,
            r#"{"engine": {"data_source": "/nonexistent-dir/sub/gate.db"}, "server": {"port": 3999}}"#,
        )
        .unwrap();

        let err = start(Some(&path), None).unwrap_err();
        assert!(matches!(err, CliError::BootFailed(_)));
    }
}
