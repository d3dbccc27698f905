//! Column definitions and the closed set of semantic column types.

use serde::{Deserialize, Serialize};

/// The closed set of semantic column types a table may declare.
///
/// `length`/`precision`/`scale` live on the variants that accept them
/// (spec §3: "length/precision/scale apply only to the types that accept
/// them") rather than as loose fields on `Column`, so a `Bigint` column
/// can never carry a stray `length`. [`Column`]'s own (de)serialization
/// flattens these back onto the column's on-disk JSON (spec §6), since
/// `schema.json` wants `length`/`precision`/`scale` as optional sibling
/// fields of the column, not nested under `type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnType {
    Integer,
    Bigint,
    Decimal { precision: u32, scale: u32 },
    Float,
    Boolean,
    /// `None` length means "dialect default" (VARCHAR(255)).
    String { length: Option<u32> },
    Text,
    Datetime,
    Timestamp,
    Binary,
    Json,
}

impl ColumnType {
    fn tag(&self) -> &'static str {
        match self {
            ColumnType::Integer => "integer",
            ColumnType::Bigint => "bigint",
            ColumnType::Decimal { .. } => "decimal",
            ColumnType::Float => "float",
            ColumnType::Boolean => "boolean",
            ColumnType::String { .. } => "string",
            ColumnType::Text => "text",
            ColumnType::Datetime => "datetime",
            ColumnType::Timestamp => "timestamp",
            ColumnType::Binary => "binary",
            ColumnType::Json => "json",
        }
    }
}

/// A default value, modeling the three-state "unset / empty / literal"
/// distinction spec §9 requires: `None` means no default was declared;
/// `Some("")` means the default is the empty string; any other `Some(s)`
/// is the literal default.
pub type ColumnDefault = Option<String>;

/// One column in a [`Table`](super::table::Table).
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub col_type: ColumnType,
    pub nullable: bool,
    pub default: ColumnDefault,
    pub unique: bool,
    pub primary_key: bool,
    pub index: bool,
    pub foreign_key: Option<ForeignKeyRef>,
}

/// A foreign key reference: table + column it points at. Emission of
/// `REFERENCES` clauses is out of scope for the three dialect emitters
/// (spec names indexes and alters, not FK constraint DDL) but the flag is
/// tracked so the analyzer and future emitters can see it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyRef {
    pub table: String,
    pub column: String,
}

impl Column {
    pub fn new(name: impl Into<String>, col_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            col_type,
            nullable: false,
            default: None,
            unique: false,
            primary_key: false,
            index: false,
            foreign_key: None,
        }
    }

    /// A primary-key column is implicitly NOT NULL regardless of the
    /// `nullable` flag (spec §3 invariant).
    pub fn is_effectively_nullable(&self) -> bool {
        self.nullable && !self.primary_key
    }
}

/// On-disk shape of a column (spec §6): `name, type, length?, precision?,
/// scale?, nullable, default, unique, primary_key, index, foreign_key`.
#[derive(Serialize, Deserialize)]
struct ColumnJson {
    name: String,
    #[serde(rename = "type")]
    type_tag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    length: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    precision: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    scale: Option<u32>,
    nullable: bool,
    default: ColumnDefault,
    unique: bool,
    primary_key: bool,
    index: bool,
    foreign_key: Option<ForeignKeyRef>,
}

impl Serialize for Column {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let (length, precision, scale) = match &self.col_type {
            ColumnType::String { length } => (*length, None, None),
            ColumnType::Decimal { precision, scale } => (None, Some(*precision), Some(*scale)),
            _ => (None, None, None),
        };
        ColumnJson {
            name: self.name.clone(),
            type_tag: self.col_type.tag().to_string(),
            length,
            precision,
            scale,
            nullable: self.nullable,
            default: self.default.clone(),
            unique: self.unique,
            primary_key: self.primary_key,
            index: self.index,
            foreign_key: self.foreign_key.clone(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Column {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let json = ColumnJson::deserialize(deserializer)?;
        let col_type = match json.type_tag.as_str() {
            "integer" => ColumnType::Integer,
            "bigint" => ColumnType::Bigint,
            "decimal" => ColumnType::Decimal {
                precision: json.precision.unwrap_or(10),
                scale: json.scale.unwrap_or(0),
            },
            "float" => ColumnType::Float,
            "boolean" => ColumnType::Boolean,
            "string" => ColumnType::String { length: json.length },
            "text" => ColumnType::Text,
            "datetime" => ColumnType::Datetime,
            "timestamp" => ColumnType::Timestamp,
            "binary" => ColumnType::Binary,
            "json" => ColumnType::Json,
            other => return Err(serde::de::Error::custom(format!("unknown column type `{other}`"))),
        };
        Ok(Column {
            name: json.name,
            col_type,
            nullable: json.nullable,
            default: json.default,
            unique: json.unique,
            primary_key: json.primary_key,
            index: json.index,
            foreign_key: json.foreign_key,
        })
    }
}
