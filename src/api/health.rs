use axum::Json;
use serde_json::{json, Value};

/// GET /health (no dependencies checked; the service degrades instead of failing)
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "zipmarket",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
