// license-gate-cli/src/main.rs
// ============================================================================
// Module: License Gate CLI Entry Point
// Description: Process bootstrap for the admission gate.
// Purpose: Parse arguments, load configuration, and run the server.
// Dependencies: clap, license-gate-config, license-gate-server, tokio
// ============================================================================

//! ## Overview
//! The binary loads configuration, initializes tracing, and runs the
//! admission server until a shutdown signal arrives. Every startup defect is
//! fatal: the gate refuses to serve with a partially valid policy.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use license_gate_config::GateConfig;
use license_gate_server::App;
use tracing_subscriber::EnvFilter;

// ============================================================================
// SECTION: Arguments
// ============================================================================

/// License policy-enforcement gateway for a module proxy's admission hook.
#[derive(Debug, Parser)]
#[command(name = "license-gate", version)]
struct Cli {
    /// Path to the configuration file; defaults to the environment override
    /// or `license-gate.toml` in the working directory.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Lower the default log filter to debug level.
    #[arg(long)]
    debug: bool,
}

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let config = match GateConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            tracing::error!(error = %err, "configuration load failed");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!("configuration loaded");

    let app = match App::from_config(config).await {
        Ok(app) => app,
        Err(err) => {
            tracing::error!(error = %err, "startup failed");
            return ExitCode::FAILURE;
        }
    };
    match app.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "server failed");
            ExitCode::FAILURE
        }
    }
}

// ============================================================================
// SECTION: Tracing
// ============================================================================

/// Initializes the tracing subscriber with the environment filter.
fn init_tracing(debug: bool) {
    let default_filter = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
