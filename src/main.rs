//! Main entry point for the portsql command-line tool.
//!
//! Initializes tracing when debug mode is enabled, then delegates to
//! the CLI handler. Synchronous end to end; no async runtime is
//! needed anywhere in this tool.

use anyhow::Result;
use portsql::cli::Cli;
use std::env;

fn main() -> Result<()> {
    if env::var("PORTSQL_DEBUG").is_ok() || env::var("RUST_LOG").is_ok() {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "portsql=debug".into()))
            .init();
    }

    Cli::menu()
}
