//! Async client for the Fastly API
//!
//! Auth: `Fastly-Key` header, token held server-side only.
//! ACL entry writes are form-encoded; reads are plain JSON GETs.

use crate::config::FastlyConfig;
use crate::core::upload::validator::EntrySpec;
use crate::utils::error::{GatewayError, Result};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Header carrying the API token on every upstream call
const AUTH_HEADER: &str = "Fastly-Key";

/// A completed upstream exchange: status plus decoded JSON body.
///
/// Callers decide what a non-2xx status means; the client never treats an
/// upstream-reported failure as a transport error.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    /// HTTP status code returned by Fastly
    pub status: u16,
    /// Decoded response body
    pub body: serde_json::Value,
}

impl UpstreamResponse {
    /// Whether the upstream status indicates success
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Shared client for the Fastly API
///
/// Holds one pooled `reqwest::Client`; cheap to share via `Arc` across
/// concurrent entry submissions.
pub struct FastlyClient {
    http: Client,
    base_url: Url,
    token: Option<String>,
}

impl FastlyClient {
    /// Build a client from configuration.
    ///
    /// A missing token is not an error here: read-only startup is allowed,
    /// and each request fails individually until the token is configured.
    pub fn new(config: &FastlyConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| GatewayError::Config(format!("Invalid Fastly base URL: {}", e)))?;

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .tcp_keepalive(Duration::from_secs(60))
            .tcp_nodelay(true)
            .user_agent(concat!("acl-gateway/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GatewayError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url,
            token: config.api_token.clone(),
        })
    }

    /// The configured API token, or a configuration error when unset
    pub fn token(&self) -> Result<&str> {
        self.token
            .as_deref()
            .ok_or_else(|| GatewayError::Config("Fastly API token is not configured".to_string()))
    }

    fn url(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| GatewayError::Internal(format!("Invalid request path {}: {}", path, e)))
    }

    async fn get_json(&self, path: &str) -> Result<UpstreamResponse> {
        let url = self.url(path)?;
        debug!("GET {}", url);

        let response = self
            .http
            .get(url)
            .header(AUTH_HEADER, self.token()?)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.json().await?;
        Ok(UpstreamResponse { status, body })
    }

    /// List all services for the account
    pub async fn list_services(&self) -> Result<UpstreamResponse> {
        self.get_json("service").await
    }

    /// List versions of a service
    pub async fn list_versions(&self, service_id: &str) -> Result<UpstreamResponse> {
        self.get_json(&format!("service/{}/version", service_id))
            .await
    }

    /// List ACLs attached to a service version
    pub async fn list_acls(&self, service_id: &str, version_id: &str) -> Result<UpstreamResponse> {
        self.get_json(&format!(
            "service/{}/version/{}/acl",
            service_id, version_id
        ))
        .await
    }

    /// Create one ACL entry.
    ///
    /// The bare address travels in `ip`; a CIDR prefix length, when present,
    /// travels separately in `subnet`. Negation is the form flag `negated`.
    pub async fn create_acl_entry(
        &self,
        service_id: &str,
        acl_id: &str,
        entry: &EntrySpec,
        comment: &str,
    ) -> Result<UpstreamResponse> {
        let url = self.url(&format!("service/{}/acl/{}/entry", service_id, acl_id))?;
        debug!("POST {} ({})", url, entry.original);

        let mut form: Vec<(&str, String)> = vec![
            ("ip", entry.address.clone()),
            ("negated", if entry.negated { "1" } else { "0" }.to_string()),
            ("comment", comment.to_string()),
        ];
        if let Some(prefix) = entry.prefix {
            form.push(("subnet", prefix.to_string()));
        }

        let response = self
            .http
            .post(url)
            .header(AUTH_HEADER, self.token()?)
            .form(&form)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.json().await?;
        Ok(UpstreamResponse { status, body })
    }
}
