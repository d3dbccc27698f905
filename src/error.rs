//! Core error taxonomy.
//!
//! Every failure surfaced by the library falls into one of the categories
//! below; see spec §7. The CLI boundary wraps these into `anyhow::Error`
//! the way the teacher's `commands::*::cmd` functions do.

use thiserror::Error;

/// The single error type returned by every `portsql` library function.
#[derive(Debug, Error)]
pub enum PortsqlError {
    /// Missing/invalid DSN, unsupported dialect scheme, invalid migration
    /// name, non-loopback host for `reset`.
    #[error("config error: {0}")]
    Config(String),

    /// Duplicate table, duplicate column, unknown column in index,
    /// invalid default shape. Raised by the builder.
    #[error("build error: {0}")]
    Build(String),

    /// Emitters are total; a failure here indicates a bug in the core.
    #[error("emit error (internal, this is a bug): {0}")]
    Emit(String),

    /// Filesystem or spawned-process failures.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wraps executor/driver errors. Carries the failing unit's name for
    /// migrations, or the failing query's name for generated code, baked
    /// into the message by the caller.
    #[error("database error: {0}")]
    Database(String),
}

pub type Result<T> = std::result::Result<T, PortsqlError>;
