//! Real [`Executor`] backed by `rusqlite`, used against a live SQLite
//! connection for both the `sqlite://` target dialect and the test
//! harness's in-memory database.

use super::Executor;
use crate::error::PortsqlError;
use rusqlite::Connection;

pub struct SqliteExecutor {
    conn: Connection,
}

impl SqliteExecutor {
    pub fn open(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn open_in_memory() -> Result<Self, PortsqlError> {
        let conn = Connection::open_in_memory().map_err(|e| PortsqlError::Database(e.to_string()))?;
        Ok(Self::open(conn))
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl Executor for SqliteExecutor {
    fn execute(&mut self, sql: &str) -> Result<(), PortsqlError> {
        self.conn.execute_batch(sql).map_err(|e| PortsqlError::Database(e.to_string()))
    }

    fn query_applied(&mut self, sql: &str) -> Result<Vec<(String, String)>, PortsqlError> {
        let mut stmt = self.conn.prepare(sql).map_err(|e| PortsqlError::Database(e.to_string()))?;
        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))
            .map_err(|e| PortsqlError::Database(e.to_string()))?;
        rows.collect::<Result<Vec<_>, _>>().map_err(|e| PortsqlError::Database(e.to_string()))
    }

    fn query_table_names(&mut self, sql: &str) -> Result<Vec<String>, PortsqlError> {
        let mut stmt = self.conn.prepare(sql).map_err(|e| PortsqlError::Database(e.to_string()))?;
        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(|e| PortsqlError::Database(e.to_string()))?;
        rows.collect::<Result<Vec<_>, _>>().map_err(|e| PortsqlError::Database(e.to_string()))
    }
}
