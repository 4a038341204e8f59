//! Error handling for the gateway
//!
//! Defines the `GatewayError` taxonomy, the crate-wide `Result<T>` alias, and
//! the actix-web `ResponseError` implementation that renders failures as the
//! `{ "error": <message>, "detail"?: <string> }` wire shape callers consume.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use thiserror::Error;

/// Crate-wide result type.
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Errors surfaced by the gateway. Per-entry upload failures are folded into
/// the upload report and never become `GatewayError`s.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// A request was malformed or missing required fields. Renders as 400.
    #[error("{0}")]
    Validation(String),

    /// A startup/credential configuration problem. Renders as 500.
    #[error("{0}")]
    Config(String),

    /// The candidate entry count exceeded the configured ceiling. Renders as
    /// 400 with a `detail` explaining the limit.
    #[error("Too many entries: {count} exceeds the limit of {limit}")]
    TooManyEntries { count: usize, limit: usize },

    /// An error talking to the upstream Fastly API. Renders as 502.
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// An unexpected internal error. Renders as 500.
    #[error("{0}")]
    Internal(String),
}

impl GatewayError {
    /// HTTP status this error maps to.
    fn status_code_for(&self) -> StatusCode {
        match self {
            GatewayError::Validation(_) => StatusCode::BAD_REQUEST,
            GatewayError::TooManyEntries { .. } => StatusCode::BAD_REQUEST,
            GatewayError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GatewayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GatewayError::HttpClient(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// The `(error, detail)` pair rendered in the response body.
    fn wire_parts(&self) -> (String, Option<String>) {
        match self {
            GatewayError::TooManyEntries { limit, .. } => (
                "Too many IPs".to_string(),
                Some(format!(
                    "Fastly ACLs have a maximum limit of {} entries per ACL.",
                    limit
                )),
            ),
            other => (other.to_string(), None),
        }
    }
}

/// JSON body returned for a failed request.
#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ResponseError for GatewayError {
    fn status_code(&self) -> StatusCode {
        self.status_code_for()
    }

    fn error_response(&self) -> HttpResponse {
        let (error, detail) = self.wire_parts();
        HttpResponse::build(self.status_code_for()).json(ErrorBody { error, detail })
    }
}
