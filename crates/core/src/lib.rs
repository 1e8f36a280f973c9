//! Core library for the dbbench benchmarking harness.
//!
//! Everything in this crate is backend-agnostic: the synthetic record
//! generator, the static table schemas, the batch-insert builder, and the
//! backend capability trait. Driver-specific code (rusqlite, tokio-rusqlite,
//! sqlx) lives in the `dbbench` binary crate.

pub mod backend;
pub mod batch;
pub mod record;
pub mod schema;
pub mod value;

pub use backend::{Backend, BackendError, ExecResult, Result};
pub use batch::{Batch, BatchError, BatchInsert};
pub use schema::{Dialect, TableSchema};
pub use value::{Record, Value};
