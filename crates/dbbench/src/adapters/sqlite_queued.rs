//! Queued embedded SQLite adapter.
//!
//! Wraps `tokio_rusqlite::Connection`: each operation is queued onto the
//! driver's worker thread and returns a future that resolves when the
//! serialized command completes, keeping single-writer ordering without
//! blocking the request tasks.

use async_trait::async_trait;
use dbbench_core::{
    schema, Backend, BackendError, BatchInsert, Dialect, ExecResult, Record, Result, TableSchema,
    Value,
};
use tokio_rusqlite::Connection;

use super::sqlite_rows::{run_execute, run_query, to_sqlite};

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

fn map_call_err(e: tokio_rusqlite::Error) -> BackendError {
    match e {
        tokio_rusqlite::Error::Close(_) => {
            BackendError::Connection("connection closed unexpectedly".to_string())
        }
        other => BackendError::Query(other.to_string()),
    }
}

/// Queued SQLite backend, mounted under `/sqlite3`.
pub struct QueuedSqliteBackend {
    conn: Connection,
    max_parameters: usize,
}

impl QueuedSqliteBackend {
    /// Opens (or creates) the database file and switches it to WAL mode.
    pub async fn open(path: &str, max_parameters: usize) -> Result<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| BackendError::Connection(e.to_string()))?;
        Self::from_connection(conn, max_parameters).await
    }

    /// Opens an in-memory database. Useful for testing.
    pub async fn open_in_memory(max_parameters: usize) -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| BackendError::Connection(e.to_string()))?;
        Self::from_connection(conn, max_parameters).await
    }

    async fn from_connection(conn: Connection, max_parameters: usize) -> Result<Self> {
        conn.call(|conn| {
            conn.query_row("PRAGMA journal_mode = WAL", [], |_row| Ok(()))
                .map_err(wrap_err)
        })
        .await
        .map_err(|e| BackendError::Connection(e.to_string()))?;

        Ok(Self {
            conn,
            max_parameters,
        })
    }
}

#[async_trait]
impl Backend for QueuedSqliteBackend {
    fn name(&self) -> &'static str {
        "sqlite3"
    }

    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    async fn reset_schema(&self) -> Result<()> {
        self.conn
            .call(|conn| {
                for table in schema::ALL {
                    conn.execute_batch(&table.drop_sql()).map_err(wrap_err)?;
                    conn.execute_batch(&table.create_sql(Dialect::Sqlite))
                        .map_err(wrap_err)?;
                    for stmt in table.index_sql() {
                        conn.execute_batch(&stmt).map_err(wrap_err)?;
                    }
                }
                Ok(())
            })
            .await
            .map_err(map_call_err)
    }

    async fn bulk_load(&self, table: &'static TableSchema, records: Vec<Record>) -> Result<usize> {
        let plan = BatchInsert::new(table, Dialect::Sqlite, self.max_parameters)?;
        let batches = plan.batches(records)?;

        self.conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;
                let mut loaded = 0;
                for batch in batches {
                    let mut stmt = tx.prepare_cached(&batch.sql).map_err(wrap_err)?;
                    stmt.execute(rusqlite::params_from_iter(
                        batch.params.into_iter().map(to_sqlite),
                    ))
                    .map_err(wrap_err)?;
                    loaded += batch.rows;
                }
                tx.commit().map_err(wrap_err)?;
                Ok(loaded)
            })
            .await
            .map_err(map_call_err)
    }

    async fn query(&self, sql: &str, params: Vec<Value>) -> Result<Vec<serde_json::Value>> {
        let sql = sql.to_string();
        self.conn
            .call(move |conn| run_query(conn, &sql, params).map_err(wrap_err))
            .await
            .map_err(map_call_err)
    }

    async fn execute(&self, sql: &str, params: Vec<Value>) -> Result<ExecResult> {
        let sql = sql.to_string();
        let last_insert_id = self
            .conn
            .call(move |conn| run_execute(conn, &sql, params).map_err(wrap_err))
            .await
            .map_err(map_call_err)?;
        Ok(ExecResult {
            last_insert_id: Some(last_insert_id),
        })
    }
}
