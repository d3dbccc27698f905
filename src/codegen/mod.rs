//! Query & CRUD code generator (spec §4.6).

pub mod generator;
pub mod query;

pub use generator::{generate_runner, GENERATED_SENTINEL};
pub use query::{pascal_case, singularize, CompiledQuery, HostType, Param, QuerySql, ResultColumn, ReturnShape};
