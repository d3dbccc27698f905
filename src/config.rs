//! INI-style configuration loader plus `DATABASE_URL` environment
//! fallback (spec §6).
//!
//! Grounded on the teacher's `libs/config.rs` `Config::read`/`save` shape
//! (load from a file, fall back to defaults when absent) but swaps JSON
//! for the `ini` crate, since this spec's configuration format is
//! INI-style rather than JSON, and drops the interactive `dialoguer`
//! setup wizard, since there is nothing here for a human to be walked
//! through, just a handful of paths and a DSN.

use crate::error::PortsqlError;
use ini::Ini;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Fully resolved configuration for one invocation of the tool.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: Option<String>,
    pub migrations_path: PathBuf,
    pub schematypes_path: PathBuf,
    pub queries_in_path: PathBuf,
    pub queries_out_path: PathBuf,
    default_scope: Option<String>,
    table_scope: HashMap<String, Option<String>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            migrations_path: PathBuf::from("migrations"),
            schematypes_path: PathBuf::from("schematypes"),
            queries_in_path: PathBuf::from("querydef"),
            queries_out_path: PathBuf::from("queries"),
            default_scope: None,
            table_scope: HashMap::new(),
        }
    }
}

impl Config {
    /// Loads `path` if it exists, applying the `DATABASE_URL` env
    /// fallback when `database.url` is absent from the file (or the file
    /// itself is absent). Section names and keys are matched
    /// case-insensitively; values are trimmed.
    pub fn load(path: &Path) -> Result<Config, PortsqlError> {
        let mut config = Config::default();

        if path.exists() {
            let ini = Ini::load_from_file(path)
                .map_err(|e| PortsqlError::Config(format!("parsing `{}`: {e}", path.display())))?;
            config.apply_ini(&ini);
        }

        if config.database_url.is_none() {
            config.database_url = std::env::var("DATABASE_URL").ok().filter(|s| !s.is_empty());
        }

        Ok(config)
    }

    fn apply_ini(&mut self, ini: &Ini) {
        for (section, props) in ini.iter() {
            let section = section.unwrap_or_default().to_lowercase();
            for (key, value) in props.iter() {
                let key = key.to_lowercase();
                let value = value.trim().to_string();
                match section.as_str() {
                    "database" if key == "url" => {
                        if !value.is_empty() {
                            self.database_url = Some(value);
                        }
                    }
                    "paths" => match key.as_str() {
                        "migrations" => self.migrations_path = PathBuf::from(value),
                        "schematypes" => self.schematypes_path = PathBuf::from(value),
                        "queries_in" => self.queries_in_path = PathBuf::from(value),
                        "queries_out" => self.queries_out_path = PathBuf::from(value),
                        _ => {}
                    },
                    "crud" => {
                        if key == "scope" {
                            self.default_scope = if value.is_empty() { None } else { Some(value) };
                        } else if let Some(table) = key.strip_suffix(".scope") {
                            self.table_scope.insert(table.to_string(), if value.is_empty() { None } else { Some(value) });
                        }
                    }
                    _ => {}
                }
            }
        }
    }

    /// The scope column to use for `table`: the per-table override if
    /// one was declared (even an explicit empty override, meaning "no
    /// scope for this table"), else the section-wide default.
    pub fn scope_for_table(&self, table: &str) -> Option<String> {
        match self.table_scope.get(table) {
            Some(scope) => scope.clone(),
            None => self.default_scope.clone(),
        }
    }

    pub fn dialect(&self) -> Result<crate::dialect::Dialect, PortsqlError> {
        let url = self
            .database_url
            .as_deref()
            .ok_or_else(|| PortsqlError::Config("no database URL configured (`database.url` or `DATABASE_URL`)".into()))?;
        let scheme = url
            .split_once(':')
            .map(|(scheme, _)| scheme)
            .ok_or_else(|| PortsqlError::Config(format!("malformed database URL `{url}`")))?;
        crate::dialect::Dialect::from_scheme(scheme).ok_or_else(|| PortsqlError::Config(format!("unsupported dialect scheme `{scheme}`")))
    }
}
