//! Synchronous embedded SQLite adapter.
//!
//! Wraps a single `rusqlite::Connection` behind a mutex. Every call runs
//! on the caller's thread and blocks until the driver returns, which is
//! the semantics being benchmarked for this variant. The driver serializes
//! writers through the single file handle.

use std::sync::Mutex;

use async_trait::async_trait;
use dbbench_core::{
    schema, Backend, BackendError, BatchInsert, Dialect, ExecResult, Record, Result, TableSchema,
    Value,
};

use super::sqlite_rows::{run_execute, run_query, to_sqlite};

fn query_err(e: rusqlite::Error) -> BackendError {
    BackendError::Query(e.to_string())
}

/// Blocking SQLite backend, mounted under `/sqlite`.
pub struct SyncSqliteBackend {
    conn: Mutex<rusqlite::Connection>,
    max_parameters: usize,
}

impl SyncSqliteBackend {
    /// Opens (or creates) the database file and switches it to WAL mode.
    pub fn open(path: &str, max_parameters: usize) -> Result<Self> {
        let conn = rusqlite::Connection::open(path)
            .map_err(|e| BackendError::Connection(e.to_string()))?;
        Self::from_connection(conn, max_parameters)
    }

    /// Opens an in-memory database. Useful for testing.
    pub fn open_in_memory(max_parameters: usize) -> Result<Self> {
        let conn = rusqlite::Connection::open_in_memory()
            .map_err(|e| BackendError::Connection(e.to_string()))?;
        Self::from_connection(conn, max_parameters)
    }

    fn from_connection(conn: rusqlite::Connection, max_parameters: usize) -> Result<Self> {
        // journal_mode returns the resulting mode as a row.
        conn.query_row("PRAGMA journal_mode = WAL", [], |_row| Ok(()))
            .map_err(|e| BackendError::Connection(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
            max_parameters,
        })
    }
}

#[async_trait]
impl Backend for SyncSqliteBackend {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    async fn reset_schema(&self) -> Result<()> {
        let conn = self.conn.lock().expect("sqlite connection lock poisoned");
        for table in schema::ALL {
            conn.execute_batch(&table.drop_sql()).map_err(query_err)?;
            conn.execute_batch(&table.create_sql(Dialect::Sqlite))
                .map_err(query_err)?;
            for stmt in table.index_sql() {
                conn.execute_batch(&stmt).map_err(query_err)?;
            }
        }
        Ok(())
    }

    async fn bulk_load(&self, table: &'static TableSchema, records: Vec<Record>) -> Result<usize> {
        let plan = BatchInsert::new(table, Dialect::Sqlite, self.max_parameters)?;
        let batches = plan.batches(records)?;

        let mut conn = self.conn.lock().expect("sqlite connection lock poisoned");
        let tx = conn.transaction().map_err(query_err)?;
        let mut loaded = 0;
        for batch in batches {
            // All full batches share one SQL shape, so the prepared
            // statement is reused from the cache.
            let mut stmt = tx.prepare_cached(&batch.sql).map_err(query_err)?;
            stmt.execute(rusqlite::params_from_iter(
                batch.params.into_iter().map(to_sqlite),
            ))
            .map_err(query_err)?;
            loaded += batch.rows;
        }
        tx.commit().map_err(query_err)?;
        Ok(loaded)
    }

    async fn query(&self, sql: &str, params: Vec<Value>) -> Result<Vec<serde_json::Value>> {
        let conn = self.conn.lock().expect("sqlite connection lock poisoned");
        run_query(&conn, sql, params).map_err(query_err)
    }

    async fn execute(&self, sql: &str, params: Vec<Value>) -> Result<ExecResult> {
        let conn = self.conn.lock().expect("sqlite connection lock poisoned");
        let last_insert_id = run_execute(&conn, sql, params).map_err(query_err)?;
        Ok(ExecResult {
            last_insert_id: Some(last_insert_id),
        })
    }
}
