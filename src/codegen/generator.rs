//! Typed runner source generation (spec §4.6).
//!
//! Grounded on the teacher's per-entity `db/*.rs` modules, each of which
//! hand-wrote a struct, a `const &str` SQL statement, and a method that
//! binds parameters and scans a row. Generalized into one generator
//! that emits that same shape, mechanically, for every CRUD-eligible
//! table and every compiled query, across all three dialects at once.

use crate::analyzer::{analyze, TableAnalysis};
use crate::crud::{self, CrudOptions, CrudSql};
use crate::ddl::Table;
use crate::dialect::Dialect;
use crate::error::PortsqlError;
use std::fmt::Write as _;

use super::query::{pascal_case, singularize, CompiledQuery, HostType, ReturnShape};

/// Every emitted source file begins with this line (spec §6).
pub const GENERATED_SENTINEL: &str = "// @generated by portsql - do not edit";

/// One CRUD-eligible table's per-dialect SQL, bundled with its analysis.
struct TableCrud<'a> {
    table: &'a Table,
    analysis: TableAnalysis<'a>,
    scope_column: Option<String>,
    postgres: CrudSql,
    mysql: CrudSql,
    sqlite: CrudSql,
}

fn crud_for_all_dialects<'a>(table: &'a Table, options: &CrudOptions) -> Result<TableCrud<'a>, PortsqlError> {
    let analysis = analyze(table);
    let postgres = crud::build(&analysis, Dialect::Postgres, options)?;
    let mysql = crud::build(&analysis, Dialect::MySql, options)?;
    let sqlite = crud::build(&analysis, Dialect::Sqlite, options)?;
    Ok(TableCrud {
        table,
        analysis,
        scope_column: options.scope_column.clone(),
        postgres,
        mysql,
        sqlite,
    })
}

/// Generates the full runner module source for `queries` plus every
/// table in `tables`, using `scope_for` to resolve each table's CRUD
/// options.
pub fn generate_runner(queries: &[CompiledQuery], tables: &[Table], scope_for: impl Fn(&str) -> CrudOptions) -> Result<String, PortsqlError> {
    let mut crud_tables = Vec::with_capacity(tables.len());
    for table in tables {
        let options = scope_for(&table.name);
        crud_tables.push(crud_for_all_dialects(table, &options)?);
    }

    let mut out = String::new();
    writeln!(out, "{GENERATED_SENTINEL}").unwrap();
    out.push('\n');
    write_preamble(&mut out);
    write_runner_struct(&mut out, queries, &crud_tables);
    write_constructor(&mut out, queries, &crud_tables);
    write_with_tx(&mut out);
    for query in queries {
        write_query_types(&mut out, query);
        write_query_method(&mut out, query);
    }
    for table in &crud_tables {
        write_table_types(&mut out, table);
        write_table_methods(&mut out, table);
    }
    Ok(out)
}

fn write_preamble(out: &mut String) {
    out.push_str(
        r#"/// The three supported target dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Postgres,
    MySql,
    Sqlite,
}

/// Abstract database capability the runner is built on.
pub trait Executor {
    fn exec(&mut self, sql: &str, args: &[&(dyn std::fmt::Display)]) -> Result<u64, Box<dyn std::error::Error>>;
    fn query(&mut self, sql: &str, args: &[&(dyn std::fmt::Display)]) -> Result<Vec<Row>, Box<dyn std::error::Error>>;
    fn query_row(&mut self, sql: &str, args: &[&(dyn std::fmt::Display)]) -> Result<Option<Row>, Box<dyn std::error::Error>>;
}

/// Opaque row handle the executor hands back; bound by the host
/// driver's own row-scanning convention.
pub struct Row(pub Vec<String>);

"#,
    );
}

fn runner_fields(out: &mut String, queries: &[CompiledQuery], tables: &[TableCrud<'_>]) {
    for query in queries {
        let _ = writeln!(out, "    {}_sql: String,", query.name);
    }
    for table in tables {
        let s = singularize(&table.table.name);
        for op in ["get", "list", "insert", "update", "delete"] {
            let _ = writeln!(out, "    {}_{op}_sql: String,", s);
        }
        if table.analysis.has_deleted_at {
            let _ = writeln!(out, "    {}_hard_delete_sql: String,", s);
        }
    }
}

fn write_runner_struct(out: &mut String, queries: &[CompiledQuery], tables: &[TableCrud<'_>]) {
    out.push_str("/// Owns a dialect tag, an executor, and one precomputed SQL string per\n");
    out.push_str("/// (table, operation) and per compiled query.\n");
    out.push_str("pub struct Runner<E: Executor> {\n");
    out.push_str("    dialect: Dialect,\n");
    out.push_str("    executor: E,\n");
    runner_fields(out, queries, tables);
    out.push_str("}\n\n");
}

fn write_constructor(out: &mut String, queries: &[CompiledQuery], tables: &[TableCrud<'_>]) {
    out.push_str("impl<E: Executor> Runner<E> {\n");
    out.push_str("    pub fn new(executor: E, dialect: Dialect) -> Self {\n");
    out.push_str("        match dialect {\n");
    for d in [Dialect::Postgres, Dialect::MySql, Dialect::Sqlite] {
        let variant = match d {
            Dialect::Postgres => "Postgres",
            Dialect::MySql => "MySql",
            Dialect::Sqlite => "Sqlite",
        };
        let _ = writeln!(out, "            Dialect::{variant} => Self {{");
        out.push_str("                dialect,\n");
        out.push_str("                executor,\n");
        for query in queries {
            let sql = match d {
                Dialect::Postgres => &query.sql.postgres,
                Dialect::MySql => &query.sql.mysql,
                Dialect::Sqlite => &query.sql.sqlite,
            };
            let _ = writeln!(out, "                {}_sql: {:?}.to_string(),", query.name, sql);
        }
        for table in tables {
            let s = singularize(&table.table.name);
            let crud = match d {
                Dialect::Postgres => &table.postgres,
                Dialect::MySql => &table.mysql,
                Dialect::Sqlite => &table.sqlite,
            };
            let _ = writeln!(out, "                {s}_get_sql: {:?}.to_string(),", crud.get);
            let _ = writeln!(out, "                {s}_list_sql: {:?}.to_string(),", crud.list);
            let _ = writeln!(out, "                {s}_insert_sql: {:?}.to_string(),", crud.insert);
            let _ = writeln!(out, "                {s}_update_sql: {:?}.to_string(),", crud.update);
            let _ = writeln!(out, "                {s}_delete_sql: {:?}.to_string(),", crud.delete);
            if let Some(hard) = &crud.hard_delete {
                let _ = writeln!(out, "                {s}_hard_delete_sql: {:?}.to_string(),", hard);
            }
        }
        out.push_str("            },\n");
    }
    out.push_str("        }\n");
    out.push_str("    }\n");
    out.push_str("}\n\n");
}

fn write_with_tx(out: &mut String) {
    out.push_str(
        r#"impl<E: Executor> Runner<E> {
    /// Returns a new Runner with the same dialect and SQL fields but a
    /// different executor. The transaction-bound Runner must not outlive
    /// the transaction.
    pub fn with_tx<E2: Executor>(&self, tx_executor: E2) -> Runner<E2> {
        Runner::new(tx_executor, self.dialect)
    }
}

"#,
    );
}

fn rust_field(name: &str) -> String {
    let snake = name.replace(|c: char| !c.is_ascii_alphanumeric() && c != '_', "_");
    if matches!(snake.as_str(), "type" | "move" | "fn" | "match" | "ref") {
        format!("{snake}_")
    } else {
        snake
    }
}

fn write_struct(out: &mut String, name: &str, fields: &[(String, HostType)]) {
    let _ = writeln!(out, "#[derive(Debug, Clone)]");
    let _ = writeln!(out, "pub struct {name} {{");
    for (field, ty) in fields {
        let _ = writeln!(out, "    pub {}: {},", rust_field(field), ty.to_rust());
    }
    out.push_str("}\n\n");
}

fn write_query_types(out: &mut String, query: &CompiledQuery) {
    let base = pascal_case(&query.name);
    let params: Vec<(String, HostType)> = query.params.iter().map(|p| (p.name.clone(), p.host_type.clone())).collect();
    write_struct(out, &format!("{base}Params"), &params);

    for result in &query.results {
        if let Some(nested) = &result.nested {
            let item_name = format!("{base}{}Item", pascal_case(&result.name));
            let fields: Vec<(String, HostType)> = nested.iter().map(|f| (f.name.clone(), f.host_type.clone())).collect();
            write_struct(out, &item_name, &fields);
        }
    }
    if !matches!(query.shape, ReturnShape::Execute) {
        let results: Vec<(String, HostType)> = query.results.iter().map(|r| (r.name.clone(), r.host_type.clone())).collect();
        write_struct(out, &format!("{base}Result"), &results);
    }
}

/// Renders the Rust expression that reads result column `idx` out of a
/// `Row` and parses it into `ty`. `Row` is a plain `Vec<String>`
/// (spec §4.6.7: "scan the exact columns in ResultColumns order"), so
/// every host type is recovered by indexing and parsing in place.
fn scan_expr(idx: usize, ty: &HostType) -> String {
    match ty {
        HostType::I32 => format!("row.0[{idx}].parse::<i32>()?"),
        HostType::I64 => format!("row.0[{idx}].parse::<i64>()?"),
        HostType::F64 => format!("row.0[{idx}].parse::<f64>()?"),
        HostType::Bool => format!("row.0[{idx}].parse::<bool>()?"),
        HostType::String => format!("row.0[{idx}].clone()"),
        HostType::NaiveDateTime => format!("row.0[{idx}].parse::<chrono::NaiveDateTime>()?"),
        HostType::Bytes => format!("row.0[{idx}].clone().into_bytes()"),
        HostType::Json => format!("serde_json::from_str(&row.0[{idx}])?"),
        HostType::Option(inner) => {
            let some_expr = scan_expr(idx, inner);
            format!("if row.0[{idx}].is_empty() {{ None }} else {{ Some({some_expr}) }}")
        }
    }
}

/// Renders a `{struct_name} { field: expr, ... }` literal that scans
/// `fields` out of the in-scope `row`, in order.
fn scan_struct(struct_name: &str, fields: &[(String, HostType)]) -> String {
    let mut body = String::new();
    for (idx, (name, ty)) in fields.iter().enumerate() {
        let _ = writeln!(body, "            {}: {},", rust_field(name), scan_expr(idx, ty));
    }
    format!("{struct_name} {{\n{body}        }}")
}

fn write_query_method(out: &mut String, query: &CompiledQuery) {
    let base = pascal_case(&query.name);
    let method = &query.name;
    let args: Vec<String> = query.params.iter().map(|p| format!("&params.{} as &dyn std::fmt::Display", rust_field(&p.name))).collect();
    let args_slice = format!("&[{}]", args.join(", "));
    let fields: Vec<(String, HostType)> = query.results.iter().map(|r| (r.name.clone(), r.host_type.clone())).collect();

    match query.shape {
        ReturnShape::One => {
            let scan = scan_struct(&format!("{base}Result"), &fields);
            let _ = writeln!(
                out,
                "impl<E: Executor> Runner<E> {{\n    pub fn {method}(&mut self, params: {base}Params) -> Result<Option<{base}Result>, Box<dyn std::error::Error>> {{\n        let row = self.executor.query_row(&self.{method}_sql, {args_slice})?;\n        match row {{\n            Some(row) => Ok(Some({scan})),\n            None => Ok(None),\n        }}\n    }}\n}}\n\n"
            );
        }
        ReturnShape::Many => {
            let scan = scan_struct(&format!("{base}Result"), &fields);
            let _ = writeln!(
                out,
                "impl<E: Executor> Runner<E> {{\n    pub fn {method}(&mut self, params: {base}Params) -> Result<Vec<{base}Result>, Box<dyn std::error::Error>> {{\n        let rows = self.executor.query(&self.{method}_sql, {args_slice})?;\n        let mut out = Vec::with_capacity(rows.len());\n        for row in rows {{\n            out.push({scan});\n        }}\n        Ok(out)\n    }}\n}}\n\n"
            );
        }
        ReturnShape::Execute => {
            let _ = writeln!(
                out,
                "impl<E: Executor> Runner<E> {{\n    pub fn {method}(&mut self, params: {base}Params) -> Result<u64, Box<dyn std::error::Error>> {{\n        self.executor.exec(&self.{method}_sql, {args_slice})\n    }}\n}}\n\n"
            );
        }
    }
}

fn column_fields<'a>(analysis: &TableAnalysis<'a>, cols: impl Iterator<Item = &'a crate::ddl::Column>) -> Vec<(String, HostType)> {
    let _ = analysis;
    cols.map(|c| (c.name.clone(), super::query::column_host_type(&c.col_type, c.is_effectively_nullable())))
        .collect()
}

fn write_table_types(out: &mut String, table: &TableCrud<'_>) {
    let s = pascal_case(&singularize(&table.table.name));
    let t = pascal_case(&table.table.name);
    let analysis = &table.analysis;

    write_struct(out, &format!("Get{s}Params"), &[("id".to_string(), HostType::String)]);
    write_struct(out, &format!("Get{s}Result"), &column_fields(analysis, analysis.result_columns.iter().copied()));

    write_struct(
        out,
        &format!("List{t}Params"),
        &[("limit".to_string(), HostType::I64), ("offset".to_string(), HostType::I64)],
    );
    let list_fields: Vec<(String, HostType)> = column_fields(analysis, analysis.result_columns.iter().copied().filter(|c| c.name != "updated_at"));
    write_struct(out, &format!("List{t}Result"), &list_fields);

    write_struct(out, &format!("Insert{s}Params"), &column_fields(analysis, analysis.user_columns.iter().copied()));

    let mut update_fields = vec![("id".to_string(), HostType::String)];
    update_fields.extend(column_fields(analysis, analysis.user_columns.iter().copied()));
    write_struct(out, &format!("Update{s}Params"), &update_fields);

    write_struct(out, &format!("Delete{s}Params"), &[("id".to_string(), HostType::String)]);
    if analysis.has_deleted_at {
        write_struct(out, &format!("HardDelete{s}Params"), &[("id".to_string(), HostType::String)]);
    }
}

/// Binding order for `Insert<S>`: the generated `public_id` (if any),
/// then the scope column, then every remaining user column, matching
/// `crud::build_insert`'s column order exactly (spec §4.5/§4.6.8).
fn insert_args(analysis: &TableAnalysis, scope_column: &Option<String>, has_public_id: bool) -> Vec<String> {
    let mut args = Vec::new();
    if has_public_id {
        args.push("&public_id as &dyn std::fmt::Display".to_string());
    }
    if let Some(scope) = scope_column {
        if let Some(col) = analysis.user_columns.iter().find(|c| &c.name == scope) {
            args.push(format!("&params.{} as &dyn std::fmt::Display", rust_field(&col.name)));
        }
    }
    for col in &analysis.user_columns {
        if Some(&col.name) == scope_column.as_ref() {
            continue;
        }
        args.push(format!("&params.{} as &dyn std::fmt::Display", rust_field(&col.name)));
    }
    args
}

/// Binding order for `Update<S>`: every user column except scope (the
/// SET list), then the addressing id, then the scope (the WHERE
/// clause), matching `crud::build_update` exactly (spec §4.5/§4.6.7).
fn update_args(analysis: &TableAnalysis, scope_column: &Option<String>) -> Vec<String> {
    let mut args = Vec::new();
    for col in &analysis.user_columns {
        if Some(&col.name) == scope_column.as_ref() {
            continue;
        }
        args.push(format!("&params.{} as &dyn std::fmt::Display", rust_field(&col.name)));
    }
    args.push("&params.id as &dyn std::fmt::Display".to_string());
    if let Some(scope) = scope_column {
        if let Some(col) = analysis.user_columns.iter().find(|c| &c.name == scope) {
            args.push(format!("&params.{} as &dyn std::fmt::Display", rust_field(&col.name)));
        }
    }
    args
}

fn write_table_methods(out: &mut String, table: &TableCrud<'_>) {
    let s = pascal_case(&singularize(&table.table.name));
    let t = pascal_case(&table.table.name);
    let snake = singularize(&table.table.name);
    let analysis = &table.analysis;

    let get_fields = column_fields(analysis, analysis.result_columns.iter().copied());
    let get_scan = scan_struct(&format!("Get{s}Result"), &get_fields);
    let list_fields = column_fields(analysis, analysis.result_columns.iter().copied().filter(|c| c.name != "updated_at"));
    let list_scan = scan_struct(&format!("List{t}Result"), &list_fields);

    let _ = writeln!(
        out,
        "impl<E: Executor> Runner<E> {{\n    pub fn get_{snake}(&mut self, params: Get{s}Params) -> Result<Option<Get{s}Result>, Box<dyn std::error::Error>> {{\n        let row = self.executor.query_row(&self.{snake}_get_sql, &[&params.id as &dyn std::fmt::Display])?;\n        match row {{\n            Some(row) => Ok(Some({get_scan})),\n            None => Ok(None),\n        }}\n    }}\n\n    pub fn list_{}(&mut self, params: List{t}Params) -> Result<Vec<List{t}Result>, Box<dyn std::error::Error>> {{\n        let rows = self.executor.query(&self.{snake}_list_sql, &[&params.limit as &dyn std::fmt::Display, &params.offset as &dyn std::fmt::Display])?;\n        let mut out = Vec::with_capacity(rows.len());\n        for row in rows {{\n            out.push({list_scan});\n        }}\n        Ok(out)\n    }}\n",
        table.table.name
    );

    if analysis.has_public_id {
        let args = insert_args(analysis, &table.scope_column, true);
        let args_slice = format!("&[{}]", args.join(", "));
        let _ = writeln!(
            out,
            "\n    pub fn insert_{snake}(&mut self, params: Insert{s}Params) -> Result<String, Box<dyn std::error::Error>> {{\n        let public_id = uuid::Uuid::new_v4().to_string();\n        match self.dialect {{\n            Dialect::Postgres | Dialect::Sqlite => {{\n                let row = self.executor.query_row(&self.{snake}_insert_sql, {args_slice})?;\n                let row = row.ok_or_else(|| -> Box<dyn std::error::Error> {{ \"insert did not return a row\".into() }})?;\n                Ok(row.0[0].clone())\n            }}\n            Dialect::MySql => {{\n                self.executor.exec(&self.{snake}_insert_sql, {args_slice})?;\n                Ok(public_id)\n            }}\n        }}\n    }}\n"
        );
    } else {
        let args = insert_args(analysis, &table.scope_column, false);
        let args_slice = format!("&[{}]", args.join(", "));
        let _ = writeln!(
            out,
            "\n    pub fn insert_{snake}(&mut self, params: Insert{s}Params) -> Result<u64, Box<dyn std::error::Error>> {{\n        self.executor.exec(&self.{snake}_insert_sql, {args_slice})\n    }}\n"
        );
    }

    let update_args = update_args(analysis, &table.scope_column);
    let update_args_slice = format!("&[{}]", update_args.join(", "));
    let _ = writeln!(
        out,
        "\n    pub fn update_{snake}(&mut self, params: Update{s}Params) -> Result<u64, Box<dyn std::error::Error>> {{\n        self.executor.exec(&self.{snake}_update_sql, {update_args_slice})\n    }}\n\n    pub fn delete_{snake}(&mut self, params: Delete{s}Params) -> Result<u64, Box<dyn std::error::Error>> {{\n        self.executor.exec(&self.{snake}_delete_sql, &[&params.id as &dyn std::fmt::Display])\n    }}\n"
    );

    if analysis.has_deleted_at {
        let _ = writeln!(
            out,
            "\n    pub fn hard_delete_{snake}(&mut self, params: HardDelete{s}Params) -> Result<u64, Box<dyn std::error::Error>> {{\n        self.executor.exec(&self.{snake}_hard_delete_sql, &[&params.id as &dyn std::fmt::Display])\n    }}\n"
        );
    }
    out.push_str("}\n\n");
}
