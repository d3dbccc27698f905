//! Alter operations: the tagged variants an emitter can lower to
//! `ALTER TABLE`/`ALTER INDEX` statements.

use super::column::{Column, ColumnDefault};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum AlterOp {
    AddColumn { column: Column },
    DropColumn { name: String },
    RenameColumn { from: String, to: String },
    ChangeType { name: String, new_type: super::column::ColumnType },
    ChangeNullability { name: String, nullable: bool },
    ChangeDefault { name: String, default: ColumnDefault },
    AddIndex { index: super::index::Index },
    DropIndex { name: String },
    RenameIndex { from: String, to: String },
}
