//! Application state shared across HTTP handlers

use crate::config::Config;
use crate::core::fastly::FastlyClient;
use crate::utils::error::Result;
use std::sync::Arc;

/// HTTP server state shared across handlers
///
/// All fields are wrapped in `Arc` for cheap cloning into workers. There is
/// no mutable shared state; the client's connection pool is the only shared
/// resource.
#[derive(Clone)]
pub struct AppState {
    /// Gateway configuration (shared read-only)
    pub config: Arc<Config>,
    /// Upstream Fastly client
    pub fastly: Arc<FastlyClient>,
}

impl AppState {
    /// Create the shared state from configuration
    pub fn new(config: Config) -> Result<Self> {
        let fastly = Arc::new(FastlyClient::new(&config.fastly)?);
        Ok(Self {
            config: Arc::new(config),
            fastly,
        })
    }
}
