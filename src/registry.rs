//! Query registry & AST shuttle (spec §4.7).
//!
//! A process-wide ordered mapping from query name to compiled query,
//! populated by side-effecting calls from the user's query-definition
//! module. Grounded on [`once_cell::sync::Lazy`] for the global, the
//! same pattern the pack's other repos reach for instead of
//! `lazy_static!` or raw `OnceLock` plumbing, guarded by a `Mutex`
//! since registration may run from multiple module-init call sites.

use crate::codegen::CompiledQuery;
use crate::error::PortsqlError;
use once_cell::sync::Lazy;
use std::path::Path;
use std::process::Command;
use std::sync::Mutex;

static REGISTRY: Lazy<Mutex<Vec<CompiledQuery>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Registers one compiled query. Registration order does not matter;
/// names must be unique (spec §9).
pub fn register(query: CompiledQuery) -> Result<(), PortsqlError> {
    let mut guard = REGISTRY.lock().expect("query registry lock poisoned");
    if guard.iter().any(|q| q.name == query.name) {
        return Err(PortsqlError::Build(format!("duplicate query name `{}`", query.name)));
    }
    guard.push(query);
    Ok(())
}

/// Returns every query registered so far, in registration order.
pub fn registered_queries() -> Vec<CompiledQuery> {
    REGISTRY.lock().expect("query registry lock poisoned").clone()
}

/// Serializes the registry as a JSON array, the payload the auxiliary
/// extractor program writes to its stdout for the generator to ingest.
pub fn dump_json() -> Result<String, PortsqlError> {
    let guard = REGISTRY.lock().expect("query registry lock poisoned");
    serde_json::to_string(&*guard).map_err(|e| PortsqlError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))
}

/// Spawns `program` (the user's own extractor binary, built to import
/// their query-definition module, call [`registered_queries`] equivalent
/// logic, and print [`dump_json`]'s output) and parses its stdout as the
/// registered query list.
///
/// This is the interop boundary spec §4.7 describes: registration
/// happens in the user's process; the generator stays in the tool's
/// process and only ever sees serialized JSON.
pub fn extract_via_subprocess(program: &Path, args: &[&str]) -> Result<Vec<CompiledQuery>, PortsqlError> {
    let output = Command::new(program).args(args).output().map_err(PortsqlError::Io)?;
    if !output.status.success() {
        return Err(PortsqlError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            format!("extractor `{}` exited with {}", program.display(), output.status),
        )));
    }
    serde_json::from_slice(&output.stdout).map_err(|e| PortsqlError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}
