//! Backend capability trait and error types.
//!
//! Each database backend implements the same small surface (schema reset,
//! bulk load, ad-hoc query, single write) so the generator, the batch
//! loader, and the HTTP layer are written once and parameterized over it.

use async_trait::async_trait;
use thiserror::Error;

use crate::batch::BatchError;
use crate::schema::{Dialect, TableSchema};
use crate::value::{Record, Value};

/// Errors surfaced by a backend adapter.
///
/// There is deliberately no retry, backoff, or circuit breaking: a failure
/// propagates as-is to the caller (the request handler or the startup
/// loader).
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("connection failed: {0}")]
    Connection(String),
    #[error("query failed: {0}")]
    Query(String),
    #[error(transparent)]
    Batch(#[from] BatchError),
}

/// Result type for backend operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Outcome of a single write statement.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExecResult {
    /// Last inserted row id, when the backend can report one.
    pub last_insert_id: Option<i64>,
}

/// Capability interface every benchmarked backend provides.
#[async_trait]
pub trait Backend: Send + Sync {
    /// URL prefix this backend is mounted under (e.g. `sqlite3`).
    fn name(&self) -> &'static str;

    /// SQL dialect for canned statements and placeholders.
    fn dialect(&self) -> Dialect;

    /// Drops and recreates all benchmark tables and their indexes.
    async fn reset_schema(&self) -> Result<()>;

    /// Loads a full record set into one table, batched to the backend's
    /// parameter ceiling. Returns the number of rows written.
    async fn bulk_load(&self, table: &'static TableSchema, records: Vec<Record>) -> Result<usize>;

    /// Executes a parameterized SELECT, returning each row as a JSON object
    /// keyed by column name.
    async fn query(&self, sql: &str, params: Vec<Value>) -> Result<Vec<serde_json::Value>>;

    /// Executes a single parameterized write statement.
    async fn execute(&self, sql: &str, params: Vec<Value>) -> Result<ExecResult>;
}
