//! Configuration module for ProbeScope.
//!
//! Loads configuration from environment variables with sensible defaults.

use std::env;

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP port for the web server (default: 8080)
    pub http_port: u16,
    /// Base URL of the ops API supplying probe samples
    pub api_url: String,
    /// Initial auto-refresh interval in seconds (default: 60)
    pub refresh_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: 8080,
            api_url: "http://localhost:3000".to_string(),
            refresh_secs: 60,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `PROBESCOPE_HTTP_PORT`: HTTP port (default: 8080)
    /// - `PROBESCOPE_API_URL`: ops API base URL (default: "http://localhost:3000")
    /// - `PROBESCOPE_REFRESH_SECS`: auto-refresh interval (default: 60)
    pub fn load() -> Self {
        let mut cfg = Self::default();

        if let Ok(port_str) = env::var("PROBESCOPE_HTTP_PORT") {
            if let Ok(port) = port_str.parse() {
                cfg.http_port = port;
            }
        }

        if let Ok(api_url) = env::var("PROBESCOPE_API_URL") {
            cfg.api_url = api_url;
        }

        if let Ok(secs_str) = env::var("PROBESCOPE_REFRESH_SECS") {
            if let Ok(secs) = secs_str.parse() {
                cfg.refresh_secs = secs;
            }
        }

        cfg
    }
}
