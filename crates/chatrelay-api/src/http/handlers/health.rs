//! Liveness check.

use axum::Json;
use serde_json::{Value, json};

/// GET /health. Does not touch the upstream.
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}
