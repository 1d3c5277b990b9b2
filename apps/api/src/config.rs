use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
///
/// The assistant credential and agent id stay optional here: their
/// absence surfaces per request as a configuration error from the
/// gateway, not as a startup failure.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub allowed_origins: String,
    pub api_key: Option<String>,
    pub assistant_id: Option<String>,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "9500".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            allowed_origins: std::env::var("ALLOWED_ORIGINS").unwrap_or_default(),
            api_key: optional_env("API_KEY"),
            assistant_id: optional_env("API_ASSISTANT_ID"),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Treats unset or blank variables as absent.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
