//! Fluent table construction.
//!
//! Mirrors the teacher's migration-registration pattern in
//! `db/migrations.rs` (`MigrationManager::add_migration` pushes one
//! record into an ordered `Vec`, keyed by a unique identifier) but at
//! the column granularity: each `TableBuilder` method pushes one
//! [`Column`] and returns `&mut Self` so column-level modifiers
//! (`.nullable()`, `.unique()`, ...) can chain onto the column that was
//! just added.

use crate::ddl::{Column, ColumnType, ForeignKeyRef, Index, Table};
use crate::error::PortsqlError;

/// The fixed tuple of columns [`add_table`] prepends to every
/// user-declared table (spec glossary: "standard columns").
fn standard_columns() -> Vec<Column> {
    let mut id = Column::new("id", ColumnType::Bigint);
    id.primary_key = true;

    let mut public_id = Column::new("public_id", ColumnType::String { length: None });
    public_id.unique = true;

    let created_at = Column::new("created_at", ColumnType::Datetime);
    let updated_at = Column::new("updated_at", ColumnType::Datetime);

    let mut deleted_at = Column::new("deleted_at", ColumnType::Datetime);
    deleted_at.nullable = true;

    vec![id, public_id, created_at, updated_at, deleted_at]
}

/// Fluent builder for one [`Table`]. Obtained from [`add_table`] or
/// [`add_empty_table`]; never constructed directly by callers.
pub struct TableBuilder {
    table: Table,
    seen: std::collections::HashSet<String>,
    error: Option<PortsqlError>,
}

impl TableBuilder {
    fn new(name: impl Into<String>, seed: Vec<Column>) -> Self {
        let mut seen = std::collections::HashSet::new();
        for col in &seed {
            seen.insert(col.name.clone());
        }
        Self {
            table: Table {
                name: name.into(),
                columns: seed,
                indexes: Vec::new(),
            },
            seen,
            error: None,
        }
    }

    fn push(&mut self, name: &str, col_type: ColumnType) -> &mut Self {
        if !self.seen.insert(name.to_string()) && self.error.is_none() {
            self.error = Some(PortsqlError::Build(format!(
                "duplicate column `{}` on table `{}`",
                name, self.table.name
            )));
        }
        self.table.columns.push(Column::new(name, col_type));
        self
    }

    pub fn bigint(&mut self, name: &str) -> &mut Self {
        self.push(name, ColumnType::Bigint)
    }
    pub fn integer(&mut self, name: &str) -> &mut Self {
        self.push(name, ColumnType::Integer)
    }
    pub fn string(&mut self, name: &str) -> &mut Self {
        self.push(name, ColumnType::String { length: None })
    }
    pub fn string_with_length(&mut self, name: &str, length: u32) -> &mut Self {
        self.push(name, ColumnType::String { length: Some(length) })
    }
    pub fn text(&mut self, name: &str) -> &mut Self {
        self.push(name, ColumnType::Text)
    }
    pub fn boolean(&mut self, name: &str) -> &mut Self {
        self.push(name, ColumnType::Boolean)
    }
    pub fn float(&mut self, name: &str) -> &mut Self {
        self.push(name, ColumnType::Float)
    }
    pub fn decimal(&mut self, name: &str, precision: u32, scale: u32) -> &mut Self {
        self.push(name, ColumnType::Decimal { precision, scale })
    }
    pub fn datetime(&mut self, name: &str) -> &mut Self {
        self.push(name, ColumnType::Datetime)
    }
    pub fn binary(&mut self, name: &str) -> &mut Self {
        self.push(name, ColumnType::Binary)
    }
    pub fn json(&mut self, name: &str) -> &mut Self {
        self.push(name, ColumnType::Json)
    }

    /// Applies to the most recently added column.
    fn last_mut(&mut self) -> &mut Column {
        self.table.columns.last_mut().expect("a column modifier was called before any column was added")
    }

    pub fn nullable(&mut self) -> &mut Self {
        self.last_mut().nullable = true;
        self
    }

    pub fn default_value(&mut self, value: impl Into<String>) -> &mut Self {
        self.last_mut().default = Some(value.into());
        self
    }

    pub fn unique(&mut self) -> &mut Self {
        self.last_mut().unique = true;
        self
    }

    pub fn primary_key(&mut self) -> &mut Self {
        self.last_mut().primary_key = true;
        self
    }

    pub fn indexed(&mut self) -> &mut Self {
        self.last_mut().index = true;
        self
    }

    pub fn references(&mut self, table: impl Into<String>, column: impl Into<String>) -> &mut Self {
        self.last_mut().foreign_key = Some(ForeignKeyRef {
            table: table.into(),
            column: column.into(),
        });
        self
    }

    /// Adds an explicit multi-column index.
    pub fn index(&mut self, columns: &[&str], unique: bool) -> &mut Self {
        let table_name = self.table.name.clone();
        let cols: Vec<String> = columns.iter().map(|s| s.to_string()).collect();
        self.table.indexes.push(Index::new(&table_name, cols, unique));
        self
    }

    fn finish(mut self) -> Result<Table, PortsqlError> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        for col in &self.table.columns {
            if col.index {
                self.table
                    .indexes
                    .push(Index::new(&self.table.name, vec![col.name.clone()], col.unique));
            }
        }
        for index in &self.table.indexes {
            for col in &index.columns {
                if !self.table.columns.iter().any(|c| &c.name == col) {
                    return Err(PortsqlError::Build(format!(
                        "index `{}` references unknown column `{}` on table `{}`",
                        index.name, col, self.table.name
                    )));
                }
            }
        }
        Ok(self.table)
    }
}

/// Builds exactly what `body` declares, no standard columns.
pub fn add_empty_table(name: &str, body: impl FnOnce(&mut TableBuilder)) -> Result<Table, PortsqlError> {
    let mut builder = TableBuilder::new(name, Vec::new());
    body(&mut builder);
    builder.finish()
}

/// Prepends the standard columns (`id`, `public_id`, `created_at`,
/// `updated_at`, `deleted_at`) then appends `body`'s columns.
pub fn add_table(name: &str, body: impl FnOnce(&mut TableBuilder)) -> Result<Table, PortsqlError> {
    let mut builder = TableBuilder::new(name, standard_columns());
    body(&mut builder);
    builder.finish()
}
