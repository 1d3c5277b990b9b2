//! Fixed-window request rate limiting for the public API surface.
//!
//! 20 requests per rolling 60-second window per client IP, enforced as
//! middleware before any handler runs. State is a single in-process
//! counter map; there is no other shared mutable state in the service.

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use axum::extract::{ConnectInfo, Request, State};
use axum::http::{HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::state::AppState;

pub const MAX_REQUESTS_PER_WINDOW: u32 = 20;
pub const WINDOW: Duration = Duration::from_secs(60);

/// HTTP header names for rate limiting responses.
pub mod headers {
    pub const X_RATE_LIMIT_LIMIT: &str = "X-RateLimit-Limit";
    pub const X_RATE_LIMIT_REMAINING: &str = "X-RateLimit-Remaining";
    pub const RETRY_AFTER: &str = "Retry-After";
}

struct Window {
    started_at: Instant,
    count: u32,
}

/// In-memory fixed-window counter keyed by client IP.
#[derive(Default)]
pub struct RateLimiter {
    windows: Mutex<HashMap<IpAddr, Window>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub allowed: bool,
    pub remaining: u32,
    pub retry_after_secs: u64,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check(&self, client: IpAddr) -> Decision {
        self.check_at(client, Instant::now())
    }

    fn check_at(&self, client: IpAddr, now: Instant) -> Decision {
        let mut windows = self
            .windows
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let window = windows.entry(client).or_insert(Window {
            started_at: now,
            count: 0,
        });

        if now.duration_since(window.started_at) >= WINDOW {
            window.started_at = now;
            window.count = 0;
        }

        if window.count >= MAX_REQUESTS_PER_WINDOW {
            let elapsed = now.duration_since(window.started_at);
            return Decision {
                allowed: false,
                remaining: 0,
                retry_after_secs: WINDOW.saturating_sub(elapsed).as_secs().max(1),
            };
        }

        window.count += 1;
        Decision {
            allowed: true,
            remaining: MAX_REQUESTS_PER_WINDOW - window.count,
            retry_after_secs: 0,
        }
    }
}

/// Axum middleware: admit or reject before the pipeline runs.
/// Requests with no connect info (in-process tests) share one bucket.
pub async fn enforce_rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let client = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));

    let decision = state.rate_limiter.check(client);
    if !decision.allowed {
        return rate_limited_response(&decision);
    }

    let mut response = next.run(request).await;
    response.headers_mut().insert(
        headers::X_RATE_LIMIT_REMAINING,
        HeaderValue::from(decision.remaining),
    );
    response
}

fn rate_limited_response(decision: &Decision) -> Response {
    let mut response = (
        StatusCode::TOO_MANY_REQUESTS,
        Json(json!({ "message": "Too many requests, please try again shortly." })),
    )
        .into_response();
    let headers = response.headers_mut();
    headers.insert(
        headers::X_RATE_LIMIT_LIMIT,
        HeaderValue::from(MAX_REQUESTS_PER_WINDOW),
    );
    headers.insert(
        headers::X_RATE_LIMIT_REMAINING,
        HeaderValue::from(decision.remaining),
    );
    headers.insert(
        headers::RETRY_AFTER,
        HeaderValue::from(decision.retry_after_secs),
    );
    response
}
