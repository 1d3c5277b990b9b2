//! CORS configuration for the HTTP surface.
//!
//! The allow-list comes from `ALLOWED_ORIGINS` (comma-separated). An
//! empty list or `*` allows any origin.

use axum::http::{header, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

pub fn build_cors_layer(allowed_origins: &str) -> CorsLayer {
    let allow_origin = match parse_allowed_origins(allowed_origins) {
        Some(origins) => AllowOrigin::list(origins),
        None => AllowOrigin::any(),
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
}

/// Returns `None` when any origin is allowed (empty list or `*`), or the
/// parsed origin list otherwise. Unparseable entries are skipped; a list
/// with no valid entry falls back to allow-any.
fn parse_allowed_origins(raw: &str) -> Option<Vec<HeaderValue>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "*" {
        return None;
    }

    let origins: Vec<HeaderValue> = trimmed
        .split(',')
        .filter_map(|origin| {
            let origin = origin.trim();
            if origin.is_empty() || origin == "*" {
                None
            } else {
                HeaderValue::from_str(origin).ok()
            }
        })
        .collect();

    if origins.is_empty() {
        None
    } else {
        Some(origins)
    }
}
