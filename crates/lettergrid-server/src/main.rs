// crates/lettergrid-server/src/main.rs
// ============================================================================
// Module: Lettergrid Server Entry Point
// Description: Command-line entry point for the activity provider.
// Purpose: Load configuration, build the server state, and serve HTTP.
// Dependencies: clap, lettergrid-server, thiserror, tokio
// ============================================================================

//! ## Overview
//! The binary loads the TOML configuration (with CLI overrides for the bind
//! address and the sqlite data path), builds the router over the configured
//! store, and serves until interrupted. Configuration failures reject at
//! startup; nothing starts on a partially valid configuration.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use clap::Subcommand;
use lettergrid_server::ProviderConfig;
use lettergrid_server::StderrAuditSink;
use lettergrid_server::build_router;
use lettergrid_server::build_server_state;
use lettergrid_server::config::StoreType;
use thiserror::Error;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "lettergrid-server", version, about = "Word-search activity provider")]
struct Cli {
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the activity provider HTTP server.
    Serve(ServeCommand),
}

/// Arguments for the `serve` subcommand.
#[derive(clap::Args, Debug)]
struct ServeCommand {
    /// Configuration file path (defaults to `lettergrid.toml` or
    /// `LETTERGRID_CONFIG`).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Bind address override in `host:port` form.
    #[arg(long, value_name = "ADDR")]
    bind: Option<String>,
    /// SQLite database path override (selects the sqlite store).
    #[arg(long, value_name = "PATH")]
    data_path: Option<PathBuf>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Fatal server startup or runtime errors.
#[derive(Debug, Error)]
enum ServerError {
    /// Configuration loading or validation failed.
    #[error(transparent)]
    Config(#[from] lettergrid_server::ConfigError),
    /// The listener could not be bound or the server failed.
    #[error("server io error: {0}")]
    Io(String),
}

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// Binary entry point returning an exit code.
#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(err) => {
            emit_error(&err.to_string());
            ExitCode::FAILURE
        }
    }
}

/// Writes a fatal error line to stderr.
fn emit_error(message: &str) {
    #[allow(clippy::print_stderr, reason = "Stderr is the fatal-error channel.")]
    {
        eprintln!("lettergrid-server: {message}");
    }
}

/// Executes the CLI command dispatcher.
async fn run() -> Result<ExitCode, ServerError> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Serve(command) => command_serve(command).await,
    }
}

// ============================================================================
// SECTION: Serve Command
// ============================================================================

/// Executes the `serve` command.
async fn command_serve(command: ServeCommand) -> Result<ExitCode, ServerError> {
    let mut config = match &command.config {
        Some(path) => ProviderConfig::load(path)?,
        None => ProviderConfig::load_default()?,
    };
    if let Some(bind) = command.bind {
        config.server.bind = bind;
    }
    if let Some(path) = command.data_path {
        config.store.store_type = StoreType::Sqlite;
        config.store.path = Some(path);
    }
    config.validate()?;

    let addr = config.bind_addr()?;
    let state = build_server_state(&config, Arc::new(StderrAuditSink))?;
    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|err| ServerError::Io(err.to_string()))?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| ServerError::Io(err.to_string()))?;
    Ok(ExitCode::SUCCESS)
}

/// Resolves when the process receives an interrupt.
async fn shutdown_signal() {
    // Serve runs until ctrl-c; a failed signal hook falls through and the
    // server simply runs without graceful shutdown.
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}
