use axum::Json;
use serde_json::{json, Value};

/// Liveness probe. Does not touch any backend service.
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
