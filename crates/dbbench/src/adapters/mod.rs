//! Backend adapters.
//!
//! Three variants of the same capability trait, one per driver style being
//! benchmarked:
//!
//! - [`SyncSqliteBackend`]: synchronous embedded driver, calls block.
//! - [`QueuedSqliteBackend`]: embedded driver behind a serialized command
//!   queue; each operation returns a future.
//! - [`PostgresBackend`]: network server behind a fixed-size connection
//!   pool.

mod postgres;
mod sqlite_queued;
mod sqlite_rows;
mod sqlite_sync;

pub use postgres::PostgresBackend;
pub use sqlite_queued::QueuedSqliteBackend;
pub use sqlite_sync::SyncSqliteBackend;
