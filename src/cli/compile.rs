//! `compile` subcommand (spec §6): load the schema, select CRUD-eligible
//! tables, optionally extract compiled queries from an auxiliary
//! extractor program, and write the generated runner.

use crate::analyzer::analyze;
use crate::codegen::{generate_runner, CompiledQuery};
use crate::config::Config;
use crate::crud::CrudOptions;
use crate::ddl::Table;
use crate::msg_success;
use crate::registry;
use anyhow::{anyhow, Context, Result};
use clap::Args;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct CompileArgs {
    /// Path to an extractor binary that prints registered queries as
    /// JSON on stdout (spec §4.7). Omit to generate CRUD only.
    #[arg(long)]
    pub queries_extractor: Option<PathBuf>,
}

pub fn cmd(args: &CompileArgs, config_path: &Path) -> Result<()> {
    let config = Config::load(config_path).context("loading configuration")?;

    let schema_path = config.migrations_path.join("schema.json");
    let json = fs::read_to_string(&schema_path).with_context(|| format!("reading `{}`", schema_path.display()))?;
    let plan = crate::migration::MigrationPlan::from_json(&json).map_err(|e| anyhow!("parsing `{}`: {e}", schema_path.display()))?;

    let eligible: Vec<Table> = plan
        .tables()
        .values()
        .filter(|table| analyze(table).is_crud_eligible())
        .cloned()
        .collect();

    let queries: Vec<CompiledQuery> = match &args.queries_extractor {
        Some(program) => registry::extract_via_subprocess(program, &[]).with_context(|| format!("running extractor `{}`", program.display()))?,
        None => Vec::new(),
    };

    let scope_for = |table: &str| CrudOptions {
        scope_column: config.scope_for_table(table),
    };
    let source = generate_runner(&queries, &eligible, scope_for).map_err(|e| anyhow!(e))?;

    fs::create_dir_all(&config.queries_out_path).context("creating queries output directory")?;
    let out_path = config.queries_out_path.join("runner.rs");
    fs::write(&out_path, source).with_context(|| format!("writing `{}`", out_path.display()))?;

    msg_success!(
        "generated {} ({} table(s), {} quer(y/ies))",
        out_path.display(),
        eligible.len(),
        queries.len()
    );
    Ok(())
}
