use axum::Json;
use serde_json::{json, Value};

/// GET /api/health
/// Returns a simple readiness payload.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "message": "DailyLife Health Coach backend ready"
    }))
}
