//! Tests for the INI configuration loader, `DATABASE_URL` env fallback,
//! and per-table CRUD scope resolution.

use portsql::config::Config;
use portsql::dialect::Dialect;
use std::io::Write;
use std::sync::{Mutex, OnceLock};

// `DATABASE_URL` is process-global; serialize tests that touch it so
// they don't race each other's env var state.
fn env_lock() -> &'static Mutex<()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_uses_conventional_paths() {
        let _guard = env_lock().lock().unwrap();
        std::env::remove_var("DATABASE_URL");
        let config = Config::default();
        assert_eq!(config.migrations_path, std::path::PathBuf::from("migrations"));
        assert_eq!(config.queries_out_path, std::path::PathBuf::from("queries"));
        assert!(config.database_url.is_none());
    }

    #[test]
    fn missing_file_falls_back_to_database_url_env() {
        let _guard = env_lock().lock().unwrap();
        std::env::set_var("DATABASE_URL", "postgres://localhost/app");
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("nonexistent.ini")).unwrap();
        assert_eq!(config.database_url.as_deref(), Some("postgres://localhost/app"));
        std::env::remove_var("DATABASE_URL");
    }

    #[test]
    fn file_value_takes_precedence_over_env() {
        let _guard = env_lock().lock().unwrap();
        std::env::set_var("DATABASE_URL", "postgres://localhost/from-env");
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("portsql.ini");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[Database]\nUrl = mysql://localhost/from-file\n").unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.database_url.as_deref(), Some("mysql://localhost/from-file"));
        std::env::remove_var("DATABASE_URL");
    }

    #[test]
    fn section_and_key_names_are_case_insensitive() {
        let _guard = env_lock().lock().unwrap();
        std::env::remove_var("DATABASE_URL");
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("portsql.ini");
        std::fs::write(&path, "[PATHS]\nMigrations = db/migrations\nQueries_Out = generated\n").unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.migrations_path, std::path::PathBuf::from("db/migrations"));
        assert_eq!(config.queries_out_path, std::path::PathBuf::from("generated"));
    }

    #[test]
    fn crud_scope_falls_back_from_per_table_to_default() {
        let _guard = env_lock().lock().unwrap();
        std::env::remove_var("DATABASE_URL");
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("portsql.ini");
        std::fs::write(&path, "[crud]\nscope = tenant_id\nwidgets.scope = \n").unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.scope_for_table("accounts"), Some("tenant_id".to_string()));
        assert_eq!(config.scope_for_table("widgets"), None);
    }

    #[test]
    fn dialect_is_parsed_from_the_database_url_scheme() {
        let _guard = env_lock().lock().unwrap();
        std::env::set_var("DATABASE_URL", "sqlite:local.db");
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("missing.ini")).unwrap();
        assert_eq!(config.dialect().unwrap(), Dialect::Sqlite);
        std::env::remove_var("DATABASE_URL");
    }

    #[test]
    fn unsupported_scheme_is_a_config_error() {
        let _guard = env_lock().lock().unwrap();
        std::env::set_var("DATABASE_URL", "mongodb://localhost/app");
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("missing.ini")).unwrap();
        assert!(config.dialect().is_err());
        std::env::remove_var("DATABASE_URL");
    }
}
