// SPDX-License-Identifier: GPL-3.0-only
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Remote collection service base URL (HTTP)
    pub backend_api_url: String,

    /// Remote collection service watch endpoint (WebSocket)
    pub backend_ws_url: String,

    /// Optional authentication token for the collection service
    #[serde(default)]
    pub backend_api_key: Option<String>,

    /// Name of the listing collection to mirror
    pub collection_name: String,

    /// Generation service base URL
    pub generation_api_url: String,

    /// Optional API key for the generation service
    #[serde(default)]
    pub generation_api_key: Option<String>,

    /// Generation model identifier
    pub generation_model: String,

    /// Local API bind address (e.g., "127.0.0.1:8080")
    pub local_api_bind: SocketAddr,

    /// First reconnect delay after the watch channel drops, in seconds
    pub reconnect_base_delay_secs: u64,

    /// Upper bound on the reconnect delay, in seconds
    pub reconnect_max_delay_secs: u64,

    /// Timeout for one-shot HTTP requests, in seconds
    pub request_timeout_secs: u64,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Emit JSON log lines instead of the human-readable format
    #[serde(default)]
    pub log_json: bool,
}

impl Config {
    /// Load configuration from TOML file with environment variable overrides
    pub fn load() -> anyhow::Result<Self> {
        let config_path =
            std::env::var("SALIMZ_CONFIG").unwrap_or_else(|_| "config.toml".to_string());

        let mut config: Config = if std::path::Path::new(&config_path).exists() {
            let contents = std::fs::read_to_string(&config_path)?;
            toml::from_str(&contents)?
        } else {
            Config::default()
        };

        if let Ok(val) = std::env::var("SALIMZ_BACKEND_API_URL") {
            config.backend_api_url = val;
        }
        if let Ok(val) = std::env::var("SALIMZ_BACKEND_WS_URL") {
            config.backend_ws_url = val;
        }
        if let Ok(val) = std::env::var("SALIMZ_BACKEND_API_KEY") {
            config.backend_api_key = Some(val);
        }
        if let Ok(val) = std::env::var("SALIMZ_COLLECTION_NAME") {
            config.collection_name = val;
        }
        if let Ok(val) = std::env::var("SALIMZ_GENERATION_API_URL") {
            config.generation_api_url = val;
        }
        if let Ok(val) = std::env::var("SALIMZ_GENERATION_API_KEY") {
            config.generation_api_key = Some(val);
        }
        if let Ok(val) = std::env::var("SALIMZ_GENERATION_MODEL") {
            config.generation_model = val;
        }
        if let Ok(val) = std::env::var("SALIMZ_LOCAL_API_BIND") {
            config.local_api_bind = SocketAddr::from_str(&val)?;
        }
        if let Ok(val) = std::env::var("SALIMZ_RECONNECT_BASE_DELAY_SECS") {
            config.reconnect_base_delay_secs = val.parse()?;
        }
        if let Ok(val) = std::env::var("SALIMZ_RECONNECT_MAX_DELAY_SECS") {
            config.reconnect_max_delay_secs = val.parse()?;
        }
        if let Ok(val) = std::env::var("SALIMZ_REQUEST_TIMEOUT_SECS") {
            config.request_timeout_secs = val.parse()?;
        }
        if let Ok(val) = std::env::var("SALIMZ_LOG_LEVEL") {
            config.log_level = val;
        }
        if let Ok(val) = std::env::var("SALIMZ_LOG_JSON") {
            config.log_json = val.parse()?;
        }

        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_api_url: String::from("http://localhost:3000"),
            backend_ws_url: String::from("ws://localhost:3000"),
            backend_api_key: None,
            collection_name: String::from("apps"),
            generation_api_url: String::from("https://generativelanguage.googleapis.com"),
            generation_api_key: None,
            generation_model: String::from("gemini-3-flash-preview"),
            local_api_bind: SocketAddr::from_str("127.0.0.1:8080").unwrap(),
            reconnect_base_delay_secs: 1,
            reconnect_max_delay_secs: 60,
            request_timeout_secs: 30,
            log_level: String::from("info"),
            log_json: false,
        }
    }
}
