use anyhow::Result;

use crate::client::DEFAULT_BASE_URL;

/// Application configuration loaded from environment variables. Everything
/// has a local-development default; nothing is required.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the inference service (`/api/...` is appended per call).
    pub api_base_url: String,
    /// Where the session state file lives.
    pub state_path: String,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let api_base_url =
            std::env::var("API_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        if api_base_url.is_empty() {
            anyhow::bail!("API_BASE_URL must not be empty");
        }

        Ok(Config {
            api_base_url,
            state_path: std::env::var("STATE_PATH")
                .unwrap_or_else(|_| "screening-state.json".to_string()),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}
