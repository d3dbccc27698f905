//! The in-memory schema snapshot plus the ordered list of migration
//! units produced so far.

use crate::builder::{self, TableBuilder};
use crate::ddl::Table;
use crate::dialect::{mysql, postgres, sqlite};
use crate::error::PortsqlError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Precomputed SQL for all three dialects, joined statement-by-statement
/// with `;\n` as spec §3 describes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialectInstructions {
    pub postgres: String,
    pub mysql: String,
    pub sqlite: String,
}

/// One named, versioned, immutable schema transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MigrationUnit {
    pub name: String,
    /// 14-character `YYYYMMDDHHMMSS` timestamp.
    pub version: String,
    pub instructions: DialectInstructions,
}

/// Regex-free validation of the 14-digit timestamp version format.
pub fn is_valid_version(version: &str) -> bool {
    version.len() == 14 && version.chars().all(|c| c.is_ascii_digit())
}

/// Validates a migration/table name: `^[a-z][a-z0-9_]*$`.
pub fn is_valid_snake_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

/// The on-disk `schema.json` shape (spec §6): `{"schema": {"name",
/// "tables"}, "migrations": [...]}`.
#[derive(Serialize, Deserialize)]
struct SchemaJson {
    schema: SchemaSection,
    migrations: Vec<MigrationUnit>,
}

#[derive(Serialize, Deserialize)]
struct SchemaSection {
    name: String,
    tables: BTreeMap<String, Table>,
}

/// The declared schema (by table name) plus the ordered migration units
/// that produced it. Exclusively owns all [`Table`]s (spec §3); every
/// other component holds a read-only view.
#[derive(Debug, Clone, Default)]
pub struct MigrationPlan {
    pub schema_name: String,
    tables: BTreeMap<String, Table>,
    units: Vec<MigrationUnit>,
}

impl MigrationPlan {
    pub fn new(schema_name: impl Into<String>) -> Self {
        Self {
            schema_name: schema_name.into(),
            tables: BTreeMap::new(),
            units: Vec::new(),
        }
    }

    pub fn tables(&self) -> &BTreeMap<String, Table> {
        &self.tables
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    pub fn units(&self) -> &[MigrationUnit] {
        &self.units
    }

    fn check_new_table(&self, name: &str) -> Result<(), PortsqlError> {
        if self.tables.contains_key(name) {
            return Err(PortsqlError::Build(format!("duplicate table `{name}`")));
        }
        Ok(())
    }

    fn check_new_unit(&self, version: &str, name: &str) -> Result<(), PortsqlError> {
        if !is_valid_version(version) {
            return Err(PortsqlError::Config(format!(
                "migration version `{version}` is not a 14-digit timestamp"
            )));
        }
        if self.units.iter().any(|u| u.name == name) {
            return Err(PortsqlError::Build(format!("duplicate migration name `{name}`")));
        }
        Ok(())
    }

    fn instructions_for(table: &Table) -> DialectInstructions {
        DialectInstructions {
            postgres: postgres::create_table(table),
            mysql: mysql::create_table(table),
            sqlite: sqlite::create_table(table),
        }
    }

    /// Builds a table with the standard columns prepended, registers it
    /// in the schema, and appends one migration unit whose SQL is the
    /// `CREATE TABLE` (+ indexes) in each dialect.
    pub fn add_table(
        &mut self,
        version: &str,
        migration_name: &str,
        table_name: &str,
        body: impl FnOnce(&mut TableBuilder),
    ) -> Result<(), PortsqlError> {
        self.check_new_table(table_name)?;
        self.check_new_unit(version, migration_name)?;
        let table = builder::add_table(table_name, body)?;
        let instructions = Self::instructions_for(&table);
        self.units.push(MigrationUnit {
            name: migration_name.to_string(),
            version: version.to_string(),
            instructions,
        });
        self.tables.insert(table.name.clone(), table);
        Ok(())
    }

    /// As [`Self::add_table`] but builds exactly what `body` declares,
    /// without the standard columns.
    pub fn add_empty_table(
        &mut self,
        version: &str,
        migration_name: &str,
        table_name: &str,
        body: impl FnOnce(&mut TableBuilder),
    ) -> Result<(), PortsqlError> {
        self.check_new_table(table_name)?;
        self.check_new_unit(version, migration_name)?;
        let table = builder::add_empty_table(table_name, body)?;
        let instructions = Self::instructions_for(&table);
        self.units.push(MigrationUnit {
            name: migration_name.to_string(),
            version: version.to_string(),
            instructions,
        });
        self.tables.insert(table.name.clone(), table);
        Ok(())
    }

    /// Appends a migration unit whose SQL was computed elsewhere (e.g. an
    /// `ALTER TABLE` lowered by the caller for all three dialects) and
    /// updates the in-memory schema to match, without going through the
    /// table builder.
    pub fn add_raw_unit(
        &mut self,
        version: &str,
        migration_name: &str,
        instructions: DialectInstructions,
        updated_table: Table,
    ) -> Result<(), PortsqlError> {
        self.check_new_unit(version, migration_name)?;
        self.units.push(MigrationUnit {
            name: migration_name.to_string(),
            version: version.to_string(),
            instructions,
        });
        self.tables.insert(updated_table.name.clone(), updated_table);
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, PortsqlError> {
        let doc = SchemaJson {
            schema: SchemaSection {
                name: self.schema_name.clone(),
                tables: self.tables.clone(),
            },
            migrations: self.units.clone(),
        };
        serde_json::to_string_pretty(&doc).map_err(|e| PortsqlError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))
    }

    pub fn from_json(json: &str) -> Result<Self, PortsqlError> {
        let doc: SchemaJson =
            serde_json::from_str(json).map_err(|e| PortsqlError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))?;
        Ok(Self {
            schema_name: doc.schema.name,
            tables: doc.schema.tables,
            units: doc.migrations,
        })
    }
}
