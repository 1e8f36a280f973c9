//! Benchmark query endpoints.
//!
//! One handler per query shape; each executes a canned statement against
//! whichever backend the router nested it under and returns the raw rows
//! as JSON. Errors surface through [`AppError`] as 500s carrying the
//! driver message.

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use dbbench_core::{record, Value};
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};

use crate::handlers::{sql, AppError};
use crate::state::DynBackend;

/// Pagination query string. Values arrive as raw strings and fall back to
/// defaults when absent or unparseable; there is no upper bounds-check.
#[derive(Debug, Deserialize)]
pub struct PageParams {
    page: Option<String>,
    #[serde(rename = "pageSize")]
    page_size: Option<String>,
}

fn parse_or(raw: Option<String>, default: i64) -> i64 {
    raw.and_then(|s| s.parse::<i64>().ok())
        .filter(|v| *v >= 1)
        .unwrap_or(default)
}

/// Index for request-time inserts; the wall clock keeps successive writes
/// in distinct generator buckets, mirroring the startup load.
fn write_index() -> u64 {
    Utc::now().timestamp_millis() as u64
}

/// GET /{backend}/read/complicated
pub async fn read_complicated(
    State(backend): State<DynBackend>,
) -> Result<Json<Vec<JsonValue>>, AppError> {
    let rows = backend
        .query(sql::read_complicated(backend.dialect()), Vec::new())
        .await?;
    Ok(Json(rows))
}

/// GET /{backend}/read/indexed
pub async fn read_indexed(
    State(backend): State<DynBackend>,
) -> Result<Json<Vec<JsonValue>>, AppError> {
    let rows = backend
        .query(sql::read_indexed(backend.dialect()), Vec::new())
        .await?;
    Ok(Json(rows))
}

/// GET /{backend}/read/noindex
pub async fn read_noindex(
    State(backend): State<DynBackend>,
) -> Result<Json<Vec<JsonValue>>, AppError> {
    let rows = backend
        .query(sql::read_noindex(backend.dialect()), Vec::new())
        .await?;
    Ok(Json(rows))
}

/// GET /{backend}/read/pages?page=N&pageSize=M
///
/// An out-of-range page is legal and returns an empty array.
pub async fn read_pages(
    State(backend): State<DynBackend>,
    Query(params): Query<PageParams>,
) -> Result<Json<Vec<JsonValue>>, AppError> {
    let page = parse_or(params.page, 1);
    let page_size = parse_or(params.page_size, 10);
    // Saturate so an absurdly large page is just an empty window.
    let offset = page.saturating_sub(1).saturating_mul(page_size);

    let rows = backend
        .query(
            sql::read_pages(backend.dialect()),
            vec![Value::Int(page_size), Value::Int(offset)],
        )
        .await?;
    Ok(Json(rows))
}

/// GET /{backend}/read/exists/full
pub async fn read_exists_full(
    State(backend): State<DynBackend>,
) -> Result<Json<Vec<JsonValue>>, AppError> {
    let rows = backend
        .query(sql::read_exists_full(backend.dialect()), Vec::new())
        .await?;
    Ok(Json(rows))
}

/// GET /{backend}/read/join/full
pub async fn read_join_full(
    State(backend): State<DynBackend>,
) -> Result<Json<Vec<JsonValue>>, AppError> {
    let rows = backend
        .query(sql::read_join_full(backend.dialect()), Vec::new())
        .await?;
    Ok(Json(rows))
}

/// POST /{backend}/write - insert one generated user.
pub async fn write(State(backend): State<DynBackend>) -> Result<Json<JsonValue>, AppError> {
    let row = record::user(write_index());
    let statement = sql::insert_user(backend.dialect());
    let result = backend.execute(&statement, row).await?;
    Ok(Json(json!({
        "success": true,
        "lastID": result.last_insert_id,
    })))
}

/// POST /{backend}/rw - insert one generated user, then read it back by
/// username. Returns the single row object (or null if the read-back
/// found nothing).
pub async fn read_write(State(backend): State<DynBackend>) -> Result<Json<JsonValue>, AppError> {
    let row = record::user(write_index());
    let username = record::username(&row).to_string();

    let statement = sql::insert_user(backend.dialect());
    backend.execute(&statement, row).await?;

    let rows = backend
        .query(
            sql::select_by_username(backend.dialect()),
            vec![Value::Text(username)],
        )
        .await?;
    Ok(Json(rows.into_iter().next().unwrap_or(JsonValue::Null)))
}

/// POST /{backend}/count
pub async fn count(State(backend): State<DynBackend>) -> Result<Json<JsonValue>, AppError> {
    let rows = backend.query(sql::count_users(), Vec::new()).await?;
    let before = rows
        .first()
        .and_then(|row| row.get("c"))
        .cloned()
        .unwrap_or_else(|| json!(0));
    Ok(Json(json!({ "before": before })))
}
