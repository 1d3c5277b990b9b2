//! Profile stub endpoints. Storage is intentionally not implemented;
//! the profile lives only inside a recommendation request.

use axum::Json;
use serde_json::{json, Value};

/// GET /api/profile
pub async fn handle_get_profile() -> Json<Value> {
    Json(json!({
        "profile": null,
        "message": "Profile storage not configured in demo mode.",
    }))
}

/// PUT /api/profile
/// Acknowledges and echoes the submitted profile without persisting it.
pub async fn handle_put_profile(Json(payload): Json<Value>) -> Json<Value> {
    Json(json!({ "saved": true, "profile": payload }))
}
