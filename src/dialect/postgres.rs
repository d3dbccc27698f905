//! PostgreSQL emitter: thin, named entry points over the primitive table
//! in [`super`], fixed to [`Dialect::Postgres`](super::Dialect).

use super::Dialect;
use crate::ddl::{AlterOp, Table};
use crate::error::PortsqlError;

pub fn create_table(table: &Table) -> String {
    super::create_table_sql(Dialect::Postgres, table)
}

pub fn alter_table(table_name: &str, ops: &[AlterOp]) -> Result<String, PortsqlError> {
    super::alter_table_sql(Dialect::Postgres, table_name, ops)
}

pub fn drop_table(table_name: &str) -> String {
    super::drop_table_sql(Dialect::Postgres, table_name)
}
