//! Dialect emitters: pure, total, deterministic functions from the DDL IR
//! to SQL text for PostgreSQL, MySQL, and SQLite.
//!
//! The three dialects differ only in a small table of primitives
//! (identifier quoting, parameter placeholders, type names, ...); that
//! table lives here as a set of functions keyed by [`Dialect`], and
//! [`postgres`], [`mysql`], and [`sqlite`] are thin, named entry points
//! over it, mirroring the way the teacher hand-writes one `const &str`
//! SQL statement per operation, just parameterized by dialect instead of
//! hardcoded to SQLite.

pub mod mysql;
pub mod postgres;
pub mod sqlite;

use crate::ddl::{AlterOp, Column, ColumnType, Index, Table};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// One of the three supported SQL dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    Postgres,
    MySql,
    Sqlite,
}

impl Dialect {
    /// Parses a dialect from a DSN scheme (spec §6: "parse the URL
    /// scheme; supported values are the three dialects; anything else is
    /// an error before connecting").
    pub fn from_scheme(scheme: &str) -> Option<Self> {
        match scheme {
            "postgres" | "postgresql" => Some(Dialect::Postgres),
            "mysql" => Some(Dialect::MySql),
            "sqlite" => Some(Dialect::Sqlite),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::Postgres => "postgres",
            Dialect::MySql => "mysql",
            Dialect::Sqlite => "sqlite",
        }
    }
}

/// Quotes an identifier per the dialect's quoting rule.
pub fn quote_ident(dialect: Dialect, ident: &str) -> String {
    match dialect {
        Dialect::Postgres | Dialect::Sqlite => format!("\"{ident}\""),
        Dialect::MySql => format!("`{ident}`"),
    }
}

/// The dialect's 1-based or positional parameter placeholder.
///
/// `n` is the 1-based ordinal of this parameter within the statement
/// being built; Postgres uses it, MySQL/SQLite ignore it.
pub fn placeholder(dialect: Dialect, n: usize) -> String {
    match dialect {
        Dialect::Postgres => format!("${n}"),
        Dialect::MySql | Dialect::Sqlite => "?".to_string(),
    }
}

/// The dialect's current-timestamp function call.
pub fn now_fn(dialect: Dialect) -> &'static str {
    match dialect {
        Dialect::Postgres | Dialect::MySql => "NOW()",
        Dialect::Sqlite => "datetime('now')",
    }
}

/// Maps a semantic [`ColumnType`] to its dialect type name.
pub fn type_sql(dialect: Dialect, col_type: &ColumnType) -> String {
    match (dialect, col_type) {
        (Dialect::Postgres, ColumnType::Integer) => "INTEGER".into(),
        (Dialect::MySql, ColumnType::Integer) => "INT".into(),
        (Dialect::Sqlite, ColumnType::Integer) => "INTEGER".into(),

        (_, ColumnType::Bigint) => "BIGINT".into(),

        (_, ColumnType::String { length }) => format!("VARCHAR({})", length.unwrap_or(255)),
        (_, ColumnType::Text) => "TEXT".into(),

        (Dialect::Postgres, ColumnType::Boolean) => "BOOLEAN".into(),
        (Dialect::MySql, ColumnType::Boolean) => "TINYINT(1)".into(),
        (Dialect::Sqlite, ColumnType::Boolean) => "BOOLEAN".into(),

        (_, ColumnType::Decimal { precision, scale }) => format!("DECIMAL({precision},{scale})"),

        (Dialect::Postgres, ColumnType::Float) => "DOUBLE PRECISION".into(),
        (Dialect::MySql, ColumnType::Float) => "DOUBLE".into(),
        (Dialect::Sqlite, ColumnType::Float) => "REAL".into(),

        (Dialect::Postgres, ColumnType::Datetime) | (Dialect::Postgres, ColumnType::Timestamp) => {
            "TIMESTAMP WITH TIME ZONE".into()
        }
        (Dialect::MySql, ColumnType::Datetime) | (Dialect::MySql, ColumnType::Timestamp) => "DATETIME".into(),
        (Dialect::Sqlite, ColumnType::Datetime) | (Dialect::Sqlite, ColumnType::Timestamp) => "TEXT".into(),

        (Dialect::Postgres, ColumnType::Binary) => "BYTEA".into(),
        (Dialect::MySql, ColumnType::Binary) => "BLOB".into(),
        (Dialect::Sqlite, ColumnType::Binary) => "BLOB".into(),

        (Dialect::Postgres, ColumnType::Json) => "JSONB".into(),
        (Dialect::MySql, ColumnType::Json) => "JSON".into(),
        (Dialect::Sqlite, ColumnType::Json) => "TEXT".into(),
    }
}

/// Formats a default value as a SQL literal.
///
/// Numeric types emit bare; booleans emit the dialect's boolean literal;
/// everything else is single-quoted with embedded quotes doubled.
fn format_default_literal(dialect: Dialect, col_type: &ColumnType, value: &str) -> String {
    match col_type {
        ColumnType::Integer | ColumnType::Bigint | ColumnType::Float | ColumnType::Decimal { .. } => value.to_string(),
        ColumnType::Boolean => {
            let truthy = matches!(value, "true" | "TRUE" | "1");
            match dialect {
                Dialect::Postgres => if truthy { "TRUE" } else { "FALSE" }.to_string(),
                Dialect::MySql => if truthy { "1" } else { "0" }.to_string(),
                Dialect::Sqlite => if truthy { "TRUE" } else { "FALSE" }.to_string(),
            }
        }
        _ => format!("'{}'", value.replace('\'', "''")),
    }
}

/// Renders one column definition: name, type, NOT NULL, PRIMARY KEY,
/// DEFAULT, in that order, per spec §4.2.
pub fn column_def_sql(dialect: Dialect, col: &Column) -> String {
    let mut out = String::new();
    let _ = write!(out, "{} {}", quote_ident(dialect, &col.name), type_sql(dialect, &col.col_type));
    if !col.is_effectively_nullable() {
        out.push_str(" NOT NULL");
    }
    if col.primary_key {
        out.push_str(" PRIMARY KEY");
    }
    if let Some(default) = &col.default {
        let _ = write!(out, " DEFAULT {}", format_default_literal(dialect, &col.col_type, default));
    }
    out
}

/// The dialect's table-suffix clause (MySQL's `ENGINE=...`); empty for
/// Postgres and SQLite.
pub fn table_suffix(dialect: Dialect) -> &'static str {
    match dialect {
        Dialect::MySql => " ENGINE=InnoDB DEFAULT CHARSET=utf8mb4",
        Dialect::Postgres | Dialect::Sqlite => "",
    }
}

/// Emits `CREATE TABLE` followed by its indexes' `CREATE [UNIQUE] INDEX`
/// statements, joined by `;\n`.
pub fn create_table_sql(dialect: Dialect, table: &Table) -> String {
    let mut body = String::new();
    let _ = write!(body, "CREATE TABLE {} (\n", quote_ident(dialect, &table.name));
    let cols: Vec<String> = table.columns.iter().map(|c| format!("    {}", column_def_sql(dialect, c))).collect();
    body.push_str(&cols.join(",\n"));
    body.push_str("\n)");
    body.push_str(table_suffix(dialect));

    let mut statements = vec![body];
    for index in &table.indexes {
        statements.push(create_index_sql(dialect, &table.name, index));
    }
    statements.join(";\n")
}

/// Emits one `CREATE [UNIQUE] INDEX` statement.
pub fn create_index_sql(dialect: Dialect, table_name: &str, index: &Index) -> String {
    let unique = if index.unique { "UNIQUE " } else { "" };
    let cols: Vec<String> = index.columns.iter().map(|c| quote_ident(dialect, c)).collect();
    format!(
        "CREATE {unique}INDEX {} ON {} ({})",
        quote_ident(dialect, &index.name),
        quote_ident(dialect, table_name),
        cols.join(", ")
    )
}

/// Emits a `DROP INDEX` statement in the dialect's own form (spec §4.2:
/// MySQL alone requires the owning table name).
pub fn drop_index_sql(dialect: Dialect, table_name: &str, index_name: &str) -> String {
    match dialect {
        Dialect::Postgres | Dialect::Sqlite => format!("DROP INDEX {}", quote_ident(dialect, index_name)),
        Dialect::MySql => format!(
            "DROP INDEX {} ON {}",
            quote_ident(dialect, index_name),
            quote_ident(dialect, table_name)
        ),
    }
}

/// Emits `DROP TABLE`, with `CASCADE` on Postgres.
pub fn drop_table_sql(dialect: Dialect, table_name: &str) -> String {
    match dialect {
        Dialect::Postgres => format!("DROP TABLE {} CASCADE", quote_ident(dialect, table_name)),
        Dialect::MySql | Dialect::Sqlite => format!("DROP TABLE {}", quote_ident(dialect, table_name)),
    }
}

/// Lowers a list of generic alter operations to one dialect's SQL,
/// joined by `;\n`. See spec §4.2 for the per-op mapping; SQLite does
/// not support `ChangeType`/`ChangeNullability` in the surface of ops
/// emitted here.
pub fn alter_table_sql(dialect: Dialect, table_name: &str, ops: &[AlterOp]) -> Result<String, crate::error::PortsqlError> {
    let qt = quote_ident(dialect, table_name);
    let mut statements = Vec::with_capacity(ops.len());
    for op in ops {
        let stmt = match op {
            AlterOp::AddColumn { column } => {
                format!("ALTER TABLE {qt} ADD COLUMN {}", column_def_sql(dialect, column))
            }
            AlterOp::DropColumn { name } => {
                format!("ALTER TABLE {qt} DROP COLUMN {}", quote_ident(dialect, name))
            }
            AlterOp::RenameColumn { from, to } => match dialect {
                Dialect::Postgres => format!(
                    "ALTER TABLE {qt} RENAME COLUMN {} TO {}",
                    quote_ident(dialect, from),
                    quote_ident(dialect, to)
                ),
                Dialect::MySql | Dialect::Sqlite => format!(
                    "ALTER TABLE {qt} RENAME COLUMN {} TO {}",
                    quote_ident(dialect, from),
                    quote_ident(dialect, to)
                ),
            },
            AlterOp::ChangeType { name, new_type } => match dialect {
                Dialect::Postgres => format!(
                    "ALTER TABLE {qt} ALTER COLUMN {} TYPE {}",
                    quote_ident(dialect, name),
                    type_sql(dialect, new_type)
                ),
                Dialect::MySql => format!(
                    "ALTER TABLE {qt} MODIFY COLUMN {} {}",
                    quote_ident(dialect, name),
                    type_sql(dialect, new_type)
                ),
                Dialect::Sqlite => {
                    return Err(crate::error::PortsqlError::Emit(
                        "SQLite does not support ALTER COLUMN TYPE in the op surface emitted here".into(),
                    ))
                }
            },
            AlterOp::ChangeNullability { name, nullable } => match dialect {
                Dialect::Postgres => {
                    let action = if *nullable { "DROP NOT NULL" } else { "SET NOT NULL" };
                    format!("ALTER TABLE {qt} ALTER COLUMN {} {action}", quote_ident(dialect, name))
                }
                // MySQL requires the column's current type to reissue a
                // MODIFY COLUMN clause, which the alter op doesn't carry.
                // This placeholder is almost certainly wrong in general;
                // see spec §9's open question.
                Dialect::MySql => {
                    let null_clause = if *nullable { "NULL" } else { "NOT NULL" };
                    format!("ALTER TABLE {qt} MODIFY COLUMN {} TEXT {null_clause}", quote_ident(dialect, name))
                }
                Dialect::Sqlite => {
                    return Err(crate::error::PortsqlError::Emit(
                        "SQLite does not support changing column nullability in the op surface emitted here".into(),
                    ))
                }
            },
            AlterOp::ChangeDefault { name, default } => {
                let col_ident = quote_ident(dialect, name);
                match default {
                    Some(value) => {
                        // The generic op doesn't carry the column's type, so the
                        // literal is quoted as a string unless it parses as a bare
                        // number; this covers the common numeric/string cases.
                        let literal = if value.parse::<f64>().is_ok() {
                            value.clone()
                        } else {
                            format!("'{}'", value.replace('\'', "''"))
                        };
                        match dialect {
                            Dialect::Postgres => format!("ALTER TABLE {qt} ALTER COLUMN {col_ident} SET DEFAULT {literal}"),
                            Dialect::MySql => format!("ALTER TABLE {qt} ALTER COLUMN {col_ident} SET DEFAULT {literal}"),
                            Dialect::Sqlite => {
                                return Err(crate::error::PortsqlError::Emit(
                                    "SQLite does not support ALTER ... SET DEFAULT in the op surface emitted here".into(),
                                ))
                            }
                        }
                    }
                    None => match dialect {
                        Dialect::Postgres | Dialect::MySql => format!("ALTER TABLE {qt} ALTER COLUMN {col_ident} DROP DEFAULT"),
                        Dialect::Sqlite => {
                            return Err(crate::error::PortsqlError::Emit(
                                "SQLite does not support ALTER ... DROP DEFAULT in the op surface emitted here".into(),
                            ))
                        }
                    },
                }
            }
            AlterOp::AddIndex { index } => create_index_sql(dialect, table_name, index),
            AlterOp::DropIndex { name } => drop_index_sql(dialect, table_name, name),
            AlterOp::RenameIndex { from, to } => match dialect {
                Dialect::Postgres => format!("ALTER INDEX {} RENAME TO {}", quote_ident(dialect, from), quote_ident(dialect, to)),
                Dialect::MySql => format!(
                    "ALTER TABLE {qt} RENAME INDEX {} TO {}",
                    quote_ident(dialect, from),
                    quote_ident(dialect, to)
                ),
                Dialect::Sqlite => {
                    return Err(crate::error::PortsqlError::Emit(
                        "SQLite does not support renaming indexes in the op surface emitted here".into(),
                    ))
                }
            },
        };
        statements.push(stmt);
    }
    Ok(statements.join(";\n"))
}

/// The dialect's catalog query for enumerating user tables (spec §4.3).
pub fn list_tables_sql(dialect: Dialect) -> &'static str {
    match dialect {
        Dialect::Postgres => "SELECT tablename FROM pg_tables WHERE schemaname = 'public'",
        Dialect::MySql => "SHOW TABLES",
        Dialect::Sqlite => "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%'",
    }
}
