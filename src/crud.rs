//! CRUD SQL builder: from a [`TableAnalysis`] + dialect + options, emits
//! the six canonical SQL strings of spec §4.5.
//!
//! Grounded on the teacher's per-entity SQL constants (each `db/*.rs`
//! module hand-wrote one `const &str` per CRUD statement against a fixed
//! SQLite schema); this generalizes that shape to a pure function of the
//! table's shape and the target dialect instead of one file per table.

use crate::analyzer::TableAnalysis;
use crate::dialect::{now_fn, placeholder, quote_ident, Dialect};
use crate::error::PortsqlError;

/// Per-table CRUD tuning (spec §6: `crud.scope` / `crud.<table>.scope`).
#[derive(Debug, Clone, Default)]
pub struct CrudOptions {
    /// Tenancy column added to every WHERE clause and, for Insert, to the
    /// inserted row. `None` means no scoping for this table.
    pub scope_column: Option<String>,
}

/// The six canonical statements for one table in one dialect.
#[derive(Debug, Clone)]
pub struct CrudSql {
    pub get: String,
    pub list: String,
    pub insert: String,
    pub update: String,
    pub delete: String,
    /// Present only when the table has `deleted_at` (spec §4.5).
    pub hard_delete: Option<String>,
}

/// Assigns 1-based placeholders left-to-right as each is requested.
struct Params {
    dialect: Dialect,
    next: usize,
}

impl Params {
    fn new(dialect: Dialect) -> Self {
        Self { dialect, next: 1 }
    }
    fn next(&mut self) -> String {
        let p = placeholder(self.dialect, self.next);
        self.next += 1;
        p
    }
}

fn addressing_column(analysis: &TableAnalysis) -> Result<&str, PortsqlError> {
    if analysis.has_public_id {
        return Ok("public_id");
    }
    analysis
        .primary_key
        .map(|c| c.name.as_str())
        .ok_or_else(|| PortsqlError::Build(format!("table `{}` has no public_id and no primary key", analysis.table.name)))
}

fn order_by_column(analysis: &TableAnalysis) -> &str {
    if analysis.has_created_at {
        "created_at"
    } else if analysis.has_public_id {
        "public_id"
    } else {
        "id"
    }
}

fn qi(dialect: Dialect, name: &str) -> String {
    quote_ident(dialect, name)
}

fn build_get(analysis: &TableAnalysis, dialect: Dialect, options: &CrudOptions, addr_col: &str) -> Result<String, PortsqlError> {
    let mut params = Params::new(dialect);
    let table = qi(dialect, &analysis.table.name);
    let cols: Vec<String> = analysis.result_columns.iter().map(|c| qi(dialect, &c.name)).collect();

    let mut sql = format!("SELECT {} FROM {table} WHERE {} = {}", cols.join(", "), qi(dialect, addr_col), params.next());
    if let Some(scope) = &options.scope_column {
        sql.push_str(&format!(" AND {} = {}", qi(dialect, scope), params.next()));
    }
    if analysis.has_deleted_at {
        sql.push_str(&format!(" AND {} IS NULL", qi(dialect, "deleted_at")));
    }
    Ok(sql)
}

fn build_list(analysis: &TableAnalysis, dialect: Dialect, options: &CrudOptions) -> Result<String, PortsqlError> {
    let mut params = Params::new(dialect);
    let table = qi(dialect, &analysis.table.name);
    let cols: Vec<String> = analysis
        .result_columns
        .iter()
        .filter(|c| c.name != "updated_at")
        .map(|c| qi(dialect, &c.name))
        .collect();

    let mut sql = format!("SELECT {} FROM {table} WHERE ", cols.join(", "));
    if let Some(scope) = &options.scope_column {
        sql.push_str(&format!("{} = {} AND ", qi(dialect, scope), params.next()));
    }
    if analysis.has_deleted_at {
        sql.push_str(&format!("{} IS NULL", qi(dialect, "deleted_at")));
    } else {
        sql.push_str("1 = 1");
    }
    sql.push_str(&format!(" ORDER BY {} DESC", qi(dialect, order_by_column(analysis))));
    sql.push_str(&format!(" LIMIT {} OFFSET {}", params.next(), params.next()));
    Ok(sql)
}

fn build_insert(analysis: &TableAnalysis, dialect: Dialect, options: &CrudOptions) -> Result<String, PortsqlError> {
    let mut params = Params::new(dialect);
    let table = qi(dialect, &analysis.table.name);

    let mut cols: Vec<String> = Vec::new();
    let mut vals: Vec<String> = Vec::new();

    if analysis.has_public_id {
        cols.push(qi(dialect, "public_id"));
        vals.push(params.next());
    }
    if let Some(scope) = &options.scope_column {
        cols.push(qi(dialect, scope));
        vals.push(params.next());
    }
    for col in &analysis.user_columns {
        if Some(&col.name) == options.scope_column.as_ref() {
            continue;
        }
        cols.push(qi(dialect, &col.name));
        vals.push(params.next());
    }
    if analysis.has_created_at {
        cols.push(qi(dialect, "created_at"));
        vals.push(now_fn(dialect).to_string());
    }
    if analysis.has_updated_at {
        cols.push(qi(dialect, "updated_at"));
        vals.push(now_fn(dialect).to_string());
    }

    let mut sql = format!("INSERT INTO {table} ({}) VALUES ({})", cols.join(", "), vals.join(", "));
    if analysis.has_public_id && !matches!(dialect, Dialect::MySql) {
        sql.push_str(&format!(" RETURNING {}", qi(dialect, "public_id")));
    }
    Ok(sql)
}

fn build_update(analysis: &TableAnalysis, dialect: Dialect, options: &CrudOptions, addr_col: &str) -> Result<String, PortsqlError> {
    let mut params = Params::new(dialect);
    let table = qi(dialect, &analysis.table.name);

    let mut sets: Vec<String> = Vec::new();
    for col in &analysis.user_columns {
        if Some(&col.name) == options.scope_column.as_ref() {
            continue;
        }
        sets.push(format!("{} = {}", qi(dialect, &col.name), params.next()));
    }
    if analysis.has_updated_at {
        sets.push(format!("{} = {}", qi(dialect, "updated_at"), now_fn(dialect)));
    }

    let mut sql = format!("UPDATE {table} SET {} WHERE {} = {}", sets.join(", "), qi(dialect, addr_col), params.next());
    if let Some(scope) = &options.scope_column {
        sql.push_str(&format!(" AND {} = {}", qi(dialect, scope), params.next()));
    }
    if analysis.has_deleted_at {
        sql.push_str(&format!(" AND {} IS NULL", qi(dialect, "deleted_at")));
    }
    Ok(sql)
}

fn build_delete(analysis: &TableAnalysis, dialect: Dialect, addr_col: &str) -> Result<String, PortsqlError> {
    let table = qi(dialect, &analysis.table.name);
    let mut params = Params::new(dialect);
    if analysis.has_deleted_at {
        Ok(format!(
            "UPDATE {table} SET {} = {} WHERE {} = {} AND {} IS NULL",
            qi(dialect, "deleted_at"),
            now_fn(dialect),
            qi(dialect, addr_col),
            params.next(),
            qi(dialect, "deleted_at")
        ))
    } else {
        Ok(format!("DELETE FROM {table} WHERE {} = {}", qi(dialect, addr_col), params.next()))
    }
}

fn build_hard_delete(analysis: &TableAnalysis, dialect: Dialect, addr_col: &str) -> Option<String> {
    if !analysis.has_deleted_at {
        return None;
    }
    let table = qi(dialect, &analysis.table.name);
    let mut params = Params::new(dialect);
    Some(format!("DELETE FROM {table} WHERE {} = {}", qi(dialect, addr_col), params.next()))
}

/// Emits the six canonical CRUD statements for `analysis` in `dialect`.
pub fn build(analysis: &TableAnalysis, dialect: Dialect, options: &CrudOptions) -> Result<CrudSql, PortsqlError> {
    let addr_col = addressing_column(analysis)?;
    Ok(CrudSql {
        get: build_get(analysis, dialect, options, addr_col)?,
        list: build_list(analysis, dialect, options)?,
        insert: build_insert(analysis, dialect, options)?,
        update: build_update(analysis, dialect, options, addr_col)?,
        delete: build_delete(analysis, dialect, addr_col)?,
        hard_delete: build_hard_delete(analysis, dialect, addr_col),
    })
}
