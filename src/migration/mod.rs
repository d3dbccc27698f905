//! Schema snapshot, migration units, and the driver that applies them.

mod driver;
mod plan;

pub use driver::{
    drop_all_tables, ensure_tracking_table, get_applied_migrations, is_loopback_host, record_migration, reset, run,
    run_with_versions, CancelToken, Executor, RecordingExecutor, SqliteExecutor, TRACKING_TABLE,
};
pub use plan::{is_valid_snake_name, is_valid_version, DialectInstructions, MigrationPlan, MigrationUnit};
