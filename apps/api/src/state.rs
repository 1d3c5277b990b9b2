use std::sync::Arc;

use crate::assistant::RecommendationGateway;
use crate::rate_limit::RateLimiter;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable assistant gateway. Production: `AssistantClient`;
    /// tests swap in canned-text stubs.
    pub gateway: Arc<dyn RecommendationGateway>,
    pub rate_limiter: Arc<RateLimiter>,
}
