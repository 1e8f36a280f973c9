//! Startup dataset generation and per-backend loading.
//!
//! Load failures are logged and deliberately non-fatal: a backend that
//! fails to load still serves its routes (they return the driver error),
//! and the other backends are unaffected. The data is a disposable
//! benchmark fixture, so a partial load is acceptable.

use std::time::Instant;

use dbbench_core::{record, schema, Backend, Record};

/// Generates the full user dataset.
pub fn generate_users(count: usize) -> Vec<Record> {
    (0..count as u64).map(record::user).collect()
}

/// Generates the full order dataset.
pub fn generate_orders(count: usize) -> Vec<Record> {
    (0..count as u64).map(record::order).collect()
}

/// Resets one backend's schema and bulk-loads both tables into it.
pub async fn initialize(backend: &dyn Backend, users: Vec<Record>, orders: Vec<Record>) {
    let started = Instant::now();

    if let Err(e) = backend.reset_schema().await {
        tracing::error!(backend = backend.name(), error = %e, "schema reset failed");
        return;
    }

    match backend.bulk_load(&schema::USERS, users).await {
        Ok(rows) => tracing::info!(backend = backend.name(), rows, "loaded users"),
        Err(e) => tracing::error!(backend = backend.name(), error = %e, "user load failed"),
    }

    match backend.bulk_load(&schema::ORDERS, orders).await {
        Ok(rows) => tracing::info!(backend = backend.name(), rows, "loaded orders"),
        Err(e) => tracing::error!(backend = backend.name(), error = %e, "order load failed"),
    }

    tracing::info!(
        backend = backend.name(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "startup load finished"
    );
}
