//! In-memory fake [`Executor`] for exercising driver logic (ordering,
//! idempotency, cancellation) without a real database connection.
//!
//! Grounded on the teacher's habit of keeping a plain in-memory `Vec` as
//! a stand-in collaborator in unit tests (see the migration manager's own
//! tests against a scratch SQLite file) generalized to not need SQLite at
//! all. It only understands the exact statement shapes this crate's own
//! driver emits (tracking-table DDL/inserts, `CREATE`/`DROP TABLE`).
//! It is not a SQL engine.

use super::Executor;
use crate::error::PortsqlError;

#[derive(Debug, Clone, Default)]
pub struct RecordingExecutor {
    /// Every statement group passed to `execute`, in call order.
    pub executed: Vec<String>,
    applied: Vec<(String, String)>,
    tables: Vec<String>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn applied(&self) -> &[(String, String)] {
        &self.applied
    }

    pub fn tables(&self) -> &[String] {
        &self.tables
    }

    /// Seeds a table as already present, for tests that start from a
    /// non-empty database.
    pub fn seed_table(&mut self, name: impl Into<String>) {
        self.tables.push(name.into());
    }
}

fn quoted_literals(sql: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut chars = sql.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\'' {
            let mut lit = String::new();
            for next in chars.by_ref() {
                if next == '\'' {
                    break;
                }
                lit.push(next);
            }
            out.push(lit);
        }
    }
    out
}

fn first_identifier(sql: &str, after: &str) -> Option<String> {
    let idx = sql.find(after)?;
    let rest = sql[idx + after.len()..].trim_start();
    let rest = rest.strip_prefix("IF NOT EXISTS").map(str::trim_start).unwrap_or(rest);
    let mut chars = rest.chars();
    let quote = chars.next()?;
    let close = match quote {
        '"' => '"',
        '`' => '`',
        _ => return None,
    };
    let end = rest[quote.len_utf8()..].find(close)?;
    Some(rest[quote.len_utf8()..quote.len_utf8() + end].to_string())
}

impl Executor for RecordingExecutor {
    fn execute(&mut self, sql: &str) -> Result<(), PortsqlError> {
        self.executed.push(sql.to_string());

        if sql.contains("INSERT INTO") && sql.contains(super::TRACKING_TABLE) {
            let literals = quoted_literals(sql);
            if let (Some(name), Some(version)) = (literals.first(), literals.get(1)) {
                self.applied.push((name.clone(), version.clone()));
            }
            return Ok(());
        }
        if let Some(name) = first_identifier(sql, "CREATE TABLE") {
            if !self.tables.contains(&name) {
                self.tables.push(name);
            }
            return Ok(());
        }
        if let Some(name) = first_identifier(sql, "DROP TABLE") {
            self.tables.retain(|t| t != &name);
            return Ok(());
        }
        Ok(())
    }

    fn query_applied(&mut self, _sql: &str) -> Result<Vec<(String, String)>, PortsqlError> {
        let mut rows = self.applied.clone();
        rows.sort_by(|a, b| (&a.1, &a.0).cmp(&(&b.1, &b.0)));
        Ok(rows)
    }

    fn query_table_names(&mut self, _sql: &str) -> Result<Vec<String>, PortsqlError> {
        Ok(self.tables.clone())
    }
}
