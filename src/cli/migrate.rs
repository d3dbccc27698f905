//! `migrate new|up|reset` subcommands (spec §6).
//!
//! Grounded on the teacher's `commands::migrations::cmd` shape (load
//! config, open a connection, delegate to the manager) but against
//! [`crate::migration`]'s dialect-abstract driver instead of a single
//! hardcoded SQLite path.

use crate::config::Config;
use crate::migration::{self, is_valid_snake_name, CancelToken, MigrationPlan, SqliteExecutor};
use crate::{msg_info, msg_success};
use anyhow::{anyhow, bail, Context, Result};
use chrono::Local;
use clap::{Args, Subcommand};
use std::fs;
use std::path::Path;

#[derive(Debug, Args)]
pub struct MigrateArgs {
    #[command(subcommand)]
    pub command: MigrateCommand,
}

#[derive(Debug, Subcommand)]
pub enum MigrateCommand {
    /// Scaffolds a new, empty migration file.
    New {
        /// Snake-case migration name, e.g. `add_users_table`.
        name: String,
    },
    /// Applies every unit in `schema.json` not yet recorded as applied.
    Up,
    /// Drops every table, then re-applies every unit from scratch.
    /// Refuses unless the configured host is loopback.
    Reset,
}

const STUB_TEMPLATE: &str = "// @version {version}\n// @name {name}\n\n// declare this migration's table/alter operations here,\n// e.g. plan.add_table(\"{version}\", \"{name}\", \"widgets\", |t| { ... })?;\n";

pub fn cmd(args: &MigrateArgs, config_path: &Path) -> Result<()> {
    let config = Config::load(config_path).context("loading configuration")?;
    match &args.command {
        MigrateCommand::New { name } => new(&config, name),
        MigrateCommand::Up => up(&config),
        MigrateCommand::Reset => reset(&config),
    }
}

fn new(config: &Config, name: &str) -> Result<()> {
    if !is_valid_snake_name(name) {
        bail!("migration name `{name}` must match ^[a-z][a-z0-9_]*$");
    }
    let version = Local::now().format("%Y%m%d%H%M%S").to_string();
    fs::create_dir_all(&config.migrations_path).context("creating migrations directory")?;
    let file_name = format!("{version}_{name}.rs");
    let path = config.migrations_path.join(&file_name);
    let body = STUB_TEMPLATE.replace("{version}", &version).replace("{name}", name);
    fs::write(&path, body).with_context(|| format!("writing `{}`", path.display()))?;
    msg_success!("created migration {}", path.display());
    Ok(())
}

fn load_plan(config: &Config) -> Result<MigrationPlan> {
    let schema_path = config.migrations_path.join("schema.json");
    let json = fs::read_to_string(&schema_path).with_context(|| format!("reading `{}`", schema_path.display()))?;
    MigrationPlan::from_json(&json).map_err(|e| anyhow!("parsing `{}`: {e}", schema_path.display()))
}

fn open_sqlite(database_url: &str) -> Result<SqliteExecutor> {
    let path = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))
        .ok_or_else(|| anyhow!("not a sqlite DSN: `{database_url}`"))?;
    let conn = if path.is_empty() || path == ":memory:" {
        rusqlite::Connection::open_in_memory()
    } else {
        rusqlite::Connection::open(path)
    }
    .with_context(|| format!("opening sqlite database `{path}`"))?;
    Ok(SqliteExecutor::open(conn))
}

fn up(config: &Config) -> Result<()> {
    let plan = load_plan(config)?;
    let dialect = config.dialect().map_err(|e| anyhow!(e))?;
    let database_url = config
        .database_url
        .as_deref()
        .ok_or_else(|| anyhow!("no database URL configured"))?;

    if dialect != crate::dialect::Dialect::Sqlite {
        bail!(
            "`migrate up` only drives a live connection for sqlite:// here; for {} the caller must supply its own Executor \
             and call portsql::migration::run directly",
            dialect.as_str()
        );
    }
    let mut executor = open_sqlite(database_url)?;
    let cancel = CancelToken::new();
    migration::run(&mut executor, &plan, dialect, &cancel).map_err(|e| anyhow!(e))?;
    msg_success!("applied {} migration unit(s)", plan.units().len());
    Ok(())
}

fn reset(config: &Config) -> Result<()> {
    let plan = load_plan(config)?;
    let dialect = config.dialect().map_err(|e| anyhow!(e))?;
    let database_url = config
        .database_url
        .as_deref()
        .ok_or_else(|| anyhow!("no database URL configured"))?;

    if dialect != crate::dialect::Dialect::Sqlite {
        bail!("`migrate reset` only drives a live connection for sqlite:// here");
    }
    let mut executor = open_sqlite(database_url)?;
    let cancel = CancelToken::new();
    msg_info!("dropping all tables and re-applying {} migration unit(s)", plan.units().len());
    migration::reset(&mut executor, &plan, dialect, database_url, &cancel).map_err(|e| anyhow!(e))?;
    msg_success!("reset complete");
    Ok(())
}
