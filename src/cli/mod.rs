//! CLI surface (spec §6): `compile` and `migrate new|up|reset`.
//!
//! Grounded on the teacher's `commands::{Cli, Commands}` shape, a
//! `clap::Parser` root plus one variant per subcommand, each delegating
//! to its own module's `cmd` function, trimmed to this tool's two
//! subcommands and run synchronously (no `#[tokio::main]`: nothing here
//! crosses an await point).

pub mod compile;
pub mod message;
pub mod migrate;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "portsql", about = "Schema-first, multi-dialect SQL toolkit")]
pub struct Cli {
    /// Path to the INI configuration file.
    #[arg(long, global = true, default_value = "portsql.ini")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generates typed CRUD and query runner source.
    Compile(compile::CompileArgs),
    /// Manages migration units against a configured database.
    Migrate(migrate::MigrateArgs),
}

impl Cli {
    pub fn menu() -> Result<()> {
        let cli = Cli::parse();
        match &cli.command {
            Commands::Compile(args) => compile::cmd(args, &cli.config),
            Commands::Migrate(args) => migrate::cmd(args, &cli.config),
        }
    }
}
