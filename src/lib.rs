//! # ACL Gateway
//!
//! A gateway service fronting the Fastly edge platform for an operator
//! dashboard: browse services, service versions, and ACLs, and bulk-upload
//! IP/CIDR entries from a text file into an ACL.
//!
//! The upload pipeline parses the uploaded file into one directive per
//! line, validates each as an IP or CIDR block (with optional `!`
//! negation), submits entries in paced, fixed-size batches to stay under
//! Fastly's rate limits, and reports a per-entry outcome for every
//! candidate.
//!
//! ```rust,no_run
//! use acl_gateway::{Config, Gateway};
//!
//! #[tokio::main]
//! async fn main() -> acl_gateway::Result<()> {
//!     let config = Config::from_env()?;
//!     Gateway::new(config)?.run().await
//! }
//! ```

pub mod config;
pub mod core;
pub mod server;
pub mod utils;

// Re-export main types
pub use config::Config;
pub use utils::error::{GatewayError, Result};

use tracing::info;

/// The gateway: configuration plus a ready-to-run HTTP server
pub struct Gateway {
    server: server::HttpServer,
}

impl Gateway {
    /// Create a new gateway instance
    pub fn new(config: Config) -> Result<Self> {
        info!("Creating new gateway instance");

        let server = server::HttpServer::new(&config)?;

        Ok(Self { server })
    }

    /// Run the gateway server until shutdown
    pub async fn run(self) -> Result<()> {
        info!("Starting ACL gateway");

        self.server.start().await
    }
}

/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
