//! Table analyzer: a pure function from [`Table`] to [`TableAnalysis`].
//!
//! Grounded on the teacher's habit of deriving a view struct from stored
//! data rather than caching a flag (see how `libs/productivity.rs`
//! recomputed its summary from raw events each call, never storing a
//! cached verdict), CRUD-eligibility here is likewise always computed,
//! never stored, per the standard-columns convention.

use crate::ddl::{Column, Table};

const STANDARD_NAMES: [&str; 5] = ["id", "public_id", "created_at", "updated_at", "deleted_at"];

/// The derived shape of a [`Table`] the CRUD builder and code generator
/// consume instead of re-deriving the convention themselves.
#[derive(Debug, Clone)]
pub struct TableAnalysis<'a> {
    pub table: &'a Table,
    pub has_public_id: bool,
    pub has_created_at: bool,
    pub has_updated_at: bool,
    pub has_deleted_at: bool,
    pub primary_key: Option<&'a Column>,
    /// Input columns for insert/update: all columns except the standard
    /// auto-filled five.
    pub user_columns: Vec<&'a Column>,
    /// Columns returned by selects: all columns except `id` and
    /// `deleted_at`.
    pub result_columns: Vec<&'a Column>,
}

impl<'a> TableAnalysis<'a> {
    /// A table is CRUD-eligible iff it has both `public_id` and
    /// `deleted_at`, exactly the `add_table` convention, never stored as
    /// its own flag.
    pub fn is_crud_eligible(&self) -> bool {
        self.has_public_id && self.has_deleted_at
    }

    /// The column CRUD operations address a row by: `public_id` when
    /// present, otherwise `id`.
    pub fn addressing_column(&self) -> Option<&'a Column> {
        if self.has_public_id {
            self.table.column("public_id")
        } else {
            self.primary_key
        }
    }
}

/// Analyzes `table`'s columns into the standard-columns convention.
pub fn analyze(table: &Table) -> TableAnalysis<'_> {
    let has = |name: &str| table.has_column(name);

    let user_columns = table
        .columns
        .iter()
        .filter(|c| !STANDARD_NAMES.contains(&c.name.as_str()))
        .collect();

    let result_columns = table
        .columns
        .iter()
        .filter(|c| c.name != "id" && c.name != "deleted_at")
        .collect();

    TableAnalysis {
        table,
        has_public_id: has("public_id"),
        has_created_at: has("created_at"),
        has_updated_at: has("updated_at"),
        has_deleted_at: has("deleted_at"),
        primary_key: table.primary_key_column(),
        user_columns,
        result_columns,
    }
}
