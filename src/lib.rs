//! # portsql: schema-first, multi-dialect SQL toolkit
//!
//! Declare tables once; emit dialect-aware DDL for PostgreSQL, MySQL,
//! and SQLite, track and apply migrations, and generate a typed CRUD
//! and query runner.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use portsql::cli::Cli;
//!
//! fn main() -> anyhow::Result<()> {
//!     Cli::menu()
//! }
//! ```

pub mod analyzer;
pub mod builder;
pub mod cli;
pub mod codegen;
pub mod config;
pub mod crud;
pub mod ddl;
pub mod dialect;
pub mod error;
pub mod migration;
pub mod public_id;
pub mod registry;
