//! Index definitions.

use serde::{Deserialize, Serialize};

/// An index over one or more columns of a table.
///
/// Invariant (enforced by the [`builder`](crate::builder)): every
/// referenced column must exist on the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Index {
    pub name: String,
    pub columns: Vec<String>,
    pub unique: bool,
}

impl Index {
    /// Default index name: `idx_<table>_<col1>_<col2>...`.
    pub fn default_name(table: &str, columns: &[String]) -> String {
        let mut name = format!("idx_{table}");
        for col in columns {
            name.push('_');
            name.push_str(col);
        }
        name
    }

    pub fn new(table: &str, columns: Vec<String>, unique: bool) -> Self {
        let name = Self::default_name(table, &columns);
        Self { name, columns, unique }
    }
}
