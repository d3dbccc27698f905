//! Tests for the migration driver: ordering, idempotency, cancellation,
//! the loopback-host reset guard, and a real SQLite round-trip.

use portsql::dialect::Dialect;
use portsql::migration::{self, CancelToken, MigrationPlan, RecordingExecutor, SqliteExecutor};

#[cfg(test)]
mod tests {
    use super::*;

    fn plan_with_two_tables() -> MigrationPlan {
        let mut plan = MigrationPlan::new("test");
        plan.add_table("20240101000000", "create_accounts", "accounts", |t| {
            t.string("email");
        })
        .unwrap();
        plan.add_table("20240101000100", "create_widgets", "widgets", |t| {
            t.string("name");
        })
        .unwrap();
        plan
    }

    #[test]
    fn run_applies_units_in_version_order_and_records_each() {
        let plan = plan_with_two_tables();
        let mut executor = RecordingExecutor::new();
        let cancel = CancelToken::new();
        migration::run(&mut executor, &plan, Dialect::Sqlite, &cancel).unwrap();

        let applied: Vec<&str> = executor.applied().iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(applied, vec!["create_accounts", "create_widgets"]);
        assert!(executor.tables().contains(&"accounts".to_string()));
        assert!(executor.tables().contains(&"widgets".to_string()));
    }

    #[test]
    fn run_twice_is_idempotent() {
        let plan = plan_with_two_tables();
        let mut executor = RecordingExecutor::new();
        let cancel = CancelToken::new();
        migration::run(&mut executor, &plan, Dialect::Sqlite, &cancel).unwrap();
        migration::run(&mut executor, &plan, Dialect::Sqlite, &cancel).unwrap();
        assert_eq!(executor.applied().len(), 2);
    }

    #[test]
    fn run_with_versions_sorts_out_of_order_units() {
        let plan = plan_with_two_tables();
        let mut reversed = plan.units().to_vec();
        reversed.reverse();

        let mut executor = RecordingExecutor::new();
        let cancel = CancelToken::new();
        migration::run_with_versions(&mut executor, &reversed, Dialect::Sqlite, &cancel).unwrap();

        let applied: Vec<&str> = executor.applied().iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(applied, vec!["create_accounts", "create_widgets"]);
    }

    #[test]
    fn cancelled_run_stops_before_applying_further_units() {
        let plan = plan_with_two_tables();
        let mut executor = RecordingExecutor::new();
        let cancel = CancelToken::new();
        cancel.cancel();
        let err = migration::run(&mut executor, &plan, Dialect::Sqlite, &cancel).unwrap_err();
        assert!(err.to_string().contains("cancelled"));
        assert!(executor.applied().is_empty());
    }

    #[test]
    fn drop_all_tables_drops_every_enumerated_table() {
        let mut executor = RecordingExecutor::new();
        executor.seed_table("accounts");
        executor.seed_table("widgets");
        migration::drop_all_tables(&mut executor, Dialect::Sqlite).unwrap();
        assert!(!executor.tables().contains(&"accounts".to_string()));
        assert!(!executor.tables().contains(&"widgets".to_string()));
    }

    #[test]
    fn is_loopback_host_recognizes_local_forms_only() {
        assert!(migration::is_loopback_host(""));
        assert!(migration::is_loopback_host("localhost"));
        assert!(migration::is_loopback_host("127.0.0.1"));
        assert!(migration::is_loopback_host("::1"));
        assert!(!migration::is_loopback_host("db.example.com"));
    }

    #[test]
    fn reset_refuses_non_loopback_host() {
        let plan = plan_with_two_tables();
        let mut executor = RecordingExecutor::new();
        let cancel = CancelToken::new();
        let err = migration::reset(&mut executor, &plan, Dialect::Sqlite, "postgres://user@db.example.com/app", &cancel).unwrap_err();
        assert!(err.to_string().contains("not loopback"));
        assert!(executor.applied().is_empty());
    }

    #[test]
    fn reset_on_loopback_drops_and_reapplies() {
        let plan = plan_with_two_tables();
        let mut executor = RecordingExecutor::new();
        executor.seed_table("stale_table");
        let cancel = CancelToken::new();
        migration::reset(&mut executor, &plan, Dialect::Sqlite, "sqlite:local.db", &cancel).unwrap();
        assert!(!executor.tables().contains(&"stale_table".to_string()));
        assert_eq!(executor.applied().len(), 2);
    }

    #[test]
    fn sqlite_executor_runs_real_migrations_idempotently() {
        let plan = plan_with_two_tables();
        let mut executor = SqliteExecutor::open_in_memory().unwrap();
        let cancel = CancelToken::new();
        migration::run(&mut executor, &plan, Dialect::Sqlite, &cancel).unwrap();
        migration::run(&mut executor, &plan, Dialect::Sqlite, &cancel).unwrap();

        let applied = migration::get_applied_migrations(&mut executor, Dialect::Sqlite).unwrap();
        assert_eq!(applied, vec!["create_accounts", "create_widgets"]);

        let mut stmt = executor.connection().prepare("SELECT name FROM sqlite_master WHERE type = 'table'").unwrap();
        let names: Vec<String> = stmt.query_map([], |row| row.get(0)).unwrap().collect::<Result<_, _>>().unwrap();
        assert!(names.contains(&"accounts".to_string()));
        assert!(names.contains(&"widgets".to_string()));
    }

    #[test]
    fn emitted_ddl_enforces_unique_and_not_null_against_real_sqlite() {
        let mut plan = MigrationPlan::new("test");
        plan.add_empty_table("20240101000000", "create_accounts", "accounts", |t| {
            t.bigint("id").primary_key();
            t.string("email").unique();
        })
        .unwrap();

        let mut executor = SqliteExecutor::open_in_memory().unwrap();
        let cancel = CancelToken::new();
        migration::run(&mut executor, &plan, Dialect::Sqlite, &cancel).unwrap();

        let conn = executor.connection();
        conn.execute("INSERT INTO accounts (id, email) VALUES (1, 'a@example.com')", []).unwrap();
        let dup = conn.execute("INSERT INTO accounts (id, email) VALUES (2, 'a@example.com')", []);
        assert!(dup.is_err(), "duplicate unique email should be rejected");

        let missing_required = conn.execute("INSERT INTO accounts (id, email) VALUES (3, NULL)", []);
        assert!(missing_required.is_err(), "NOT NULL email should be rejected");
    }
}
