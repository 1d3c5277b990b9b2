mod assistant;
mod config;
mod cors;
mod errors;
mod profile;
mod rate_limit;
mod recommendations;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::assistant::AssistantClient;
use crate::config::Config;
use crate::cors::build_cors_layer;
use crate::rate_limit::RateLimiter;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting DailyLife Health Coach API v{}",
        env!("CARGO_PKG_VERSION")
    );

    if config.api_key.is_none() || config.assistant_id.is_none() {
        warn!("API_KEY / API_ASSISTANT_ID not set — recommendation requests will fail until configured");
    }

    // Initialize the assistant client (shared read-only across requests)
    let assistant = AssistantClient::new(config.api_key.clone(), config.assistant_id.clone());
    info!("Assistant client initialized");

    // Build app state
    let state = AppState {
        gateway: Arc::new(assistant),
        rate_limiter: Arc::new(RateLimiter::new()),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(&config.allowed_origins));

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
