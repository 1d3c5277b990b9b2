//! Axum route handlers for the recommendations API.

use axum::{extract::State, Json};
use serde_json::Value;

use crate::errors::AppError;
use crate::profile::models::RecommendationResponse;
use crate::profile::validation::validate_request;
use crate::recommendations::service::generate_recommendations;
use crate::state::AppState;

/// POST /api/assistant/recommendations
///
/// Validates the raw payload against the profile schema, then runs the
/// pipeline. Validation failures carry the full issue list back as 400.
pub async fn handle_recommendations(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<Json<RecommendationResponse>, AppError> {
    let request = validate_request(&payload).map_err(AppError::Validation)?;
    let response = generate_recommendations(state.gateway.as_ref(), &request.profile).await?;
    Ok(Json(response))
}
