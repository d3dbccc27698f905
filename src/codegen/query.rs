//! Compiled-query shape and the deterministic naming rules of spec
//! §4.6's "Naming rules" box.

use serde::{Deserialize, Serialize};

/// A host-language type a parameter or result column is rendered as.
/// `Option` wraps a nullable column's underlying type (spec §9: "pick
/// one representation per nullable flag").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HostType {
    I32,
    I64,
    F64,
    Bool,
    String,
    NaiveDateTime,
    Bytes,
    Json,
    Option(Box<HostType>),
}

impl HostType {
    /// Renders this type as Rust source text.
    pub fn to_rust(&self) -> String {
        match self {
            HostType::I32 => "i32".to_string(),
            HostType::I64 => "i64".to_string(),
            HostType::F64 => "f64".to_string(),
            HostType::Bool => "bool".to_string(),
            HostType::String => "String".to_string(),
            HostType::NaiveDateTime => "chrono::NaiveDateTime".to_string(),
            HostType::Bytes => "Vec<u8>".to_string(),
            HostType::Json => "serde_json::Value".to_string(),
            HostType::Option(inner) => format!("Option<{}>", inner.to_rust()),
        }
    }
}

/// Maps a semantic [`ColumnType`](crate::ddl::ColumnType) to its host
/// type, wrapping in `Option` when the source column is nullable (spec
/// SPEC_FULL.md §4.6 host-type table).
pub fn column_host_type(col_type: &crate::ddl::ColumnType, nullable: bool) -> HostType {
    use crate::ddl::ColumnType::*;
    let base = match col_type {
        Integer => HostType::I32,
        Bigint => HostType::I64,
        Decimal { .. } => HostType::String,
        Float => HostType::F64,
        Boolean => HostType::Bool,
        String { .. } | Text => HostType::String,
        Datetime | Timestamp => HostType::NaiveDateTime,
        Binary => HostType::Bytes,
        Json => HostType::Json,
    };
    if nullable {
        HostType::Option(Box::new(base))
    } else {
        base
    }
}

/// One named parameter of a compiled query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    pub host_type: HostType,
}

/// One result column. `nested` is set only for JSON-aggregated results,
/// whose item struct is named `<Query><Field>Item`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultColumn {
    pub name: String,
    pub host_type: HostType,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub nested: Option<Vec<ResultColumn>>,
}

/// The shape of a compiled query's return value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReturnShape {
    /// One row, or none (a null pointer/`None`, never an error).
    One,
    /// Zero or more rows.
    Many,
    /// No rows; only an execution result.
    Execute,
}

/// Precomputed SQL for one compiled query across all three dialects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuerySql {
    pub postgres: String,
    pub mysql: String,
    pub sqlite: String,
}

/// A fully compiled query, as produced upstream by the query DSL
/// compiler (spec §1 non-goal: out of scope here, consumed as input).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompiledQuery {
    pub name: String,
    pub sql: QuerySql,
    pub params: Vec<Param>,
    pub results: Vec<ResultColumn>,
    pub shape: ReturnShape,
}

/// PascalCase per spec §4.6: split on `_`, capitalize each part,
/// concatenate; digit-leading results get an `X` prefix; empty yields
/// `X`.
pub fn pascal_case(name: &str) -> String {
    let mut out = String::new();
    for part in name.split('_') {
        if part.is_empty() {
            continue;
        }
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.extend(chars);
        }
    }
    if out.is_empty() {
        return "X".to_string();
    }
    if out.chars().next().map(|c| c.is_ascii_digit()).unwrap_or(false) {
        out.insert(0, 'X');
    }
    out
}

/// Singularizes a snake_case table name per spec §4.6: `ies` → `y`,
/// `es` → stripped, `s` → stripped, else unchanged.
pub fn singularize(name: &str) -> String {
    if let Some(stem) = name.strip_suffix("ies") {
        format!("{stem}y")
    } else if let Some(stem) = name.strip_suffix("es") {
        stem.to_string()
    } else if let Some(stem) = name.strip_suffix('s') {
        stem.to_string()
    } else {
        name.to_string()
    }
}
