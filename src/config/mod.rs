//! Gateway configuration
//!
//! Configuration is environment-driven: `Config::from_env()` starts from
//! defaults and overlays any recognized variables. A local `.env` file is
//! honored when the binary loads it via `dotenvy` before calling in here.

use crate::utils::error::{GatewayError, Result};
use std::env;

/// Top-level gateway configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// HTTP server settings
    pub server: ServerConfig,
    /// Fastly upstream settings
    pub fastly: FastlyConfig,
    /// Bulk upload tunables
    pub upload: UploadConfig,
}

/// HTTP server settings
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind host
    pub host: String,
    /// Bind port
    pub port: u16,
    /// Allowed CORS origins; empty means any origin
    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            cors_allowed_origins: Vec::new(),
        }
    }
}

/// Fastly upstream settings
#[derive(Debug, Clone)]
pub struct FastlyConfig {
    /// Base URL of the Fastly API
    pub base_url: String,
    /// API token; `None` until configured, which fails any Fastly-touching
    /// request with a configuration error
    pub api_token: Option<String>,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for FastlyConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.fastly.com".to_string(),
            api_token: None,
            timeout_secs: 30,
        }
    }
}

/// Bulk upload tunables
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Entries submitted concurrently per batch; must be nonzero
    pub batch_size: usize,
    /// Delay between batches, in milliseconds
    pub batch_pause_ms: u64,
    /// Ceiling on candidate entries per upload (the remote ACL capacity)
    pub max_entries: usize,
}

/// Fastly ACLs hold at most 1,000 entries.
pub const DEFAULT_MAX_ENTRIES: usize = 1000;

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            batch_size: 50,
            batch_pause_ms: 1000,
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        // Server configuration
        if let Ok(host) = env::var("GATEWAY_HOST") {
            config.server.host = host;
        }
        if let Ok(port) = env::var("GATEWAY_PORT") {
            config.server.port = port
                .parse()
                .map_err(|e| GatewayError::Config(format!("Invalid port: {}", e)))?;
        }
        if let Ok(origins) = env::var("CORS_ALLOWED_ORIGINS") {
            config.server.cors_allowed_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_string)
                .collect();
        }

        // Fastly configuration
        if let Ok(base_url) = env::var("FASTLY_API_BASE_URL") {
            config.fastly.base_url = base_url;
        }
        if let Ok(token) = env::var("FASTLY_API_TOKEN") {
            if !token.is_empty() {
                config.fastly.api_token = Some(token);
            }
        }
        if let Ok(timeout) = env::var("FASTLY_TIMEOUT_SECS") {
            config.fastly.timeout_secs = timeout
                .parse()
                .map_err(|e| GatewayError::Config(format!("Invalid Fastly timeout: {}", e)))?;
        }

        // Upload tunables
        if let Ok(batch_size) = env::var("UPLOAD_BATCH_SIZE") {
            config.upload.batch_size = batch_size
                .parse()
                .map_err(|e| GatewayError::Config(format!("Invalid batch size: {}", e)))?;
        }
        if let Ok(pause) = env::var("UPLOAD_BATCH_PAUSE_MS") {
            config.upload.batch_pause_ms = pause
                .parse()
                .map_err(|e| GatewayError::Config(format!("Invalid batch pause: {}", e)))?;
        }
        if let Ok(max_entries) = env::var("UPLOAD_MAX_ENTRIES") {
            config.upload.max_entries = max_entries
                .parse()
                .map_err(|e| GatewayError::Config(format!("Invalid max entries: {}", e)))?;
        }

        if config.upload.batch_size == 0 {
            return Err(GatewayError::Config(
                "UPLOAD_BATCH_SIZE must be greater than zero".to_string(),
            ));
        }

        Ok(config)
    }
}
