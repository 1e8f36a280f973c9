//! Liveness endpoint listing the mounted backends.

use axum::{extract::State, Json};
use serde_json::{json, Value as JsonValue};

use crate::state::AppState;

/// GET /health - reports the backend prefixes this process serves.
pub async fn health(State(state): State<AppState>) -> Json<JsonValue> {
    let backends: Vec<&str> = state.backends.iter().map(|b| b.name()).collect();
    Json(json!({
        "status": "ok",
        "backends": backends,
    }))
}
