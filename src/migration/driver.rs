//! Migration driver: ensures the tracking table, reads the applied set,
//! orders units by version, executes the unapplied, records each.
//!
//! Grounded on `db/migrations.rs`'s `MigrationManager` (teacher): same
//! "create tracking table, diff against declared list, execute+record
//! each pending one" shape, generalized from one hardcoded SQLite
//! connection to an abstract [`Executor`] over three dialects.

use super::plan::{is_valid_version, MigrationPlan, MigrationUnit};
use crate::dialect::{quote_ident, table_suffix, Dialect};
use crate::error::PortsqlError;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// The tracking table's name (spec glossary).
pub const TRACKING_TABLE: &str = "_portsql_migrations";

/// Stands in for the "ambient context" of spec §5: callers pass one of
/// these so long-running migration runs can be aborted between units.
/// Already-executed and already-recorded units remain applied, matching
/// spec §5's cancellation semantics.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// The abstract database capability the driver is built on. Concrete
/// database drivers (the target-host database driver of spec §1) are
/// out of scope for this crate; [`SqliteExecutor`] and
/// [`RecordingExecutor`] exist only so the driver's own logic can be
/// exercised.
pub trait Executor: Send {
    /// Executes a statement group (possibly multiple `;\n`-joined
    /// statements) as one call, per spec §4.3.
    fn execute(&mut self, sql: &str) -> Result<(), PortsqlError>;

    /// Runs `sql` (the driver's own `SELECT name, version FROM ...`
    /// query) and returns `(name, version)` rows in the order the
    /// database returned them.
    fn query_applied(&mut self, sql: &str) -> Result<Vec<(String, String)>, PortsqlError>;

    /// Runs `sql` (the driver's own catalog query) and returns table
    /// names in the order the database returned them.
    fn query_table_names(&mut self, sql: &str) -> Result<Vec<String>, PortsqlError>;
}

fn tracking_table_ddl(dialect: Dialect) -> String {
    let t = quote_ident(dialect, TRACKING_TABLE);
    let name = quote_ident(dialect, "name");
    let version = quote_ident(dialect, "version");
    let applied_at = quote_ident(dialect, "applied_at");
    format!(
        "CREATE TABLE IF NOT EXISTS {t} (\n    {name} VARCHAR(255) PRIMARY KEY,\n    {version} VARCHAR(14) NOT NULL,\n    {applied_at} TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP\n){suffix}",
        suffix = table_suffix(dialect)
    )
}

fn select_applied_sql(dialect: Dialect) -> String {
    let t = quote_ident(dialect, TRACKING_TABLE);
    let name = quote_ident(dialect, "name");
    let version = quote_ident(dialect, "version");
    format!("SELECT {name}, {version} FROM {t} ORDER BY {version}, {name}")
}

fn insert_applied_sql(dialect: Dialect, version: &str, name: &str) -> Result<String, PortsqlError> {
    if !is_valid_version(version) {
        return Err(PortsqlError::Config(format!("invalid migration version `{version}`")));
    }
    let t = quote_ident(dialect, TRACKING_TABLE);
    let name_col = quote_ident(dialect, "name");
    let version_col = quote_ident(dialect, "version");
    let escaped_name = name.replace('\'', "''");
    Ok(format!(
        "INSERT INTO {t} ({name_col}, {version_col}) VALUES ('{escaped_name}', '{version}')"
    ))
}

/// Idempotently creates the tracking table.
pub fn ensure_tracking_table(executor: &mut dyn Executor, dialect: Dialect) -> Result<(), PortsqlError> {
    executor
        .execute(&tracking_table_ddl(dialect))
        .map_err(|e| PortsqlError::Database(format!("ensure tracking table: {e}")))
}

/// Returns applied migration names in ascending `(version, name)` order.
pub fn get_applied_migrations(executor: &mut dyn Executor, dialect: Dialect) -> Result<Vec<String>, PortsqlError> {
    let rows = executor
        .query_applied(&select_applied_sql(dialect))
        .map_err(|e| PortsqlError::Database(format!("read applied migrations: {e}")))?;
    Ok(rows.into_iter().map(|(name, _version)| name).collect())
}

/// Inserts one row recording that `name`/`version` has been applied.
pub fn record_migration(executor: &mut dyn Executor, dialect: Dialect, version: &str, name: &str) -> Result<(), PortsqlError> {
    let sql = insert_applied_sql(dialect, version, name)?;
    executor
        .execute(&sql)
        .map_err(|e| PortsqlError::Database(format!("record migration `{name}`: {e}")))
}

fn instructions_sql<'a>(unit: &'a MigrationUnit, dialect: Dialect) -> &'a str {
    match dialect {
        Dialect::Postgres => &unit.instructions.postgres,
        Dialect::MySql => &unit.instructions.mysql,
        Dialect::Sqlite => &unit.instructions.sqlite,
    }
}

/// Applies every unapplied unit in `plan`'s declared order. Does not
/// roll back prior units on failure; each is treated as already
/// committed, per spec §4.3's failure model.
pub fn run(executor: &mut dyn Executor, plan: &MigrationPlan, dialect: Dialect, cancel: &CancelToken) -> Result<(), PortsqlError> {
    run_units(executor, plan.units(), dialect, cancel)
}

/// As [`run`], but sorts by explicit version (then name) first. Used
/// when units were discovered from disk files rather than a plan built
/// in version order already.
pub fn run_with_versions(
    executor: &mut dyn Executor,
    units: &[MigrationUnit],
    dialect: Dialect,
    cancel: &CancelToken,
) -> Result<(), PortsqlError> {
    let mut sorted: Vec<&MigrationUnit> = units.iter().collect();
    sorted.sort_by(|a, b| (&a.version, &a.name).cmp(&(&b.version, &b.name)));
    let owned: Vec<MigrationUnit> = sorted.into_iter().cloned().collect();
    run_units(executor, &owned, dialect, cancel)
}

fn run_units(executor: &mut dyn Executor, units: &[MigrationUnit], dialect: Dialect, cancel: &CancelToken) -> Result<(), PortsqlError> {
    ensure_tracking_table(executor, dialect)?;
    let applied: HashSet<String> = get_applied_migrations(executor, dialect)?.into_iter().collect();

    for unit in units {
        if applied.contains(&unit.name) {
            continue;
        }
        if cancel.is_cancelled() {
            return Err(PortsqlError::Database(format!(
                "migration run cancelled before unit `{}`",
                unit.name
            )));
        }
        tracing::info!(unit = %unit.name, version = %unit.version, "applying migration");
        executor
            .execute(instructions_sql(unit, dialect))
            .map_err(|e| PortsqlError::Database(format!("migration `{}`: {e}", unit.name)))?;
        record_migration(executor, dialect, &unit.version, &unit.name)?;
    }
    Ok(())
}

/// Enumerates user tables via the dialect's catalog query and drops each
/// (Postgres adds `CASCADE`).
pub fn drop_all_tables(executor: &mut dyn Executor, dialect: Dialect) -> Result<(), PortsqlError> {
    let list_sql = crate::dialect::list_tables_sql(dialect);
    let tables = executor
        .query_table_names(list_sql)
        .map_err(|e| PortsqlError::Database(format!("list tables: {e}")))?;
    for table in tables {
        let sql = crate::dialect::drop_table_sql(dialect, &table);
        executor
            .execute(&sql)
            .map_err(|e| PortsqlError::Database(format!("drop table `{table}`: {e}")))?;
    }
    Ok(())
}

/// `true` iff `host` names the local machine (spec §4.3: `Reset` is
/// "permitted only when the connection URL's host resolves to
/// loopback").
pub fn is_loopback_host(host: &str) -> bool {
    matches!(host, "" | "localhost" | "127.0.0.1" | "::1")
}

/// Drops all tables (including the tracking table) then re-runs [`run`].
/// Refuses with [`PortsqlError::Config`] unless `database_url`'s host is
/// loopback.
pub fn reset(
    executor: &mut dyn Executor,
    plan: &MigrationPlan,
    dialect: Dialect,
    database_url: &str,
    cancel: &CancelToken,
) -> Result<(), PortsqlError> {
    let host = url_host(database_url).unwrap_or_default();
    if !is_loopback_host(&host) {
        return Err(PortsqlError::Config(format!(
            "refusing to reset: host `{host}` is not loopback"
        )));
    }
    drop_all_tables(executor, dialect)?;
    run(executor, plan, dialect, cancel)
}

/// Extracts the host portion of a `scheme://[user[:pass]@]host[:port]/...`
/// DSN. Returns `None` for schemes with no authority component (e.g.
/// `sqlite:path/to/file.db`), which [`reset`] treats as loopback (a
/// local file is always local).
fn url_host(url: &str) -> Option<String> {
    let after_scheme = url.split_once("://")?.1;
    let authority = after_scheme.split(['/', '?', '#']).next().unwrap_or("");
    let after_userinfo = authority.rsplit_once('@').map(|(_, h)| h).unwrap_or(authority);
    let host = after_userinfo.split(':').next().unwrap_or("").to_string();
    Some(host)
}

mod sqlite_executor;
mod recording_executor;

pub use recording_executor::RecordingExecutor;
pub use sqlite_executor::SqliteExecutor;
