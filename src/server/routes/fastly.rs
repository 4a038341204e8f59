//! Fastly browsing proxies
//!
//! Read-only GET proxies used by the dashboard: services, service versions,
//! and ACLs. These forward the upstream's own failure status and `msg`
//! field instead of flattening everything into a 502.

use crate::core::fastly::UpstreamResponse;
use crate::server::state::AppState;
use crate::utils::error::{ErrorBody, Result};
use actix_web::{HttpResponse, http::StatusCode, web};
use serde_json::json;
use tracing::{debug, warn};

/// List all services for the account
pub async fn list_services(state: web::Data<AppState>) -> Result<HttpResponse> {
    debug!("Listing Fastly services");

    let upstream = state.fastly.list_services().await?;
    if !upstream.is_success() {
        return Ok(proxy_failure(upstream, "Failed to fetch services"));
    }

    Ok(HttpResponse::Ok().json(json!({ "services": upstream.body })))
}

/// List versions of one service
pub async fn list_versions(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let service_id = path.into_inner();
    debug!("Listing versions for service {}", service_id);

    let upstream = state.fastly.list_versions(&service_id).await?;
    if !upstream.is_success() {
        return Ok(proxy_failure(upstream, "Failed to fetch versions"));
    }

    Ok(HttpResponse::Ok().json(json!({
        "service_id": service_id,
        "versions": upstream.body,
    })))
}

/// List ACLs attached to one service version
pub async fn list_acls(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse> {
    let (service_id, version_id) = path.into_inner();
    debug!(
        "Listing ACLs for service {} version {}",
        service_id, version_id
    );

    let upstream = state.fastly.list_acls(&service_id, &version_id).await?;
    if !upstream.is_success() {
        return Ok(proxy_failure(upstream, "Failed to fetch ACLs"));
    }

    Ok(HttpResponse::Ok().json(json!({
        "service_id": service_id,
        "version_id": version_id,
        "acls": upstream.body,
    })))
}

/// Forward an upstream failure: its status code, plus its `msg` field when
/// the body carries one.
fn proxy_failure(upstream: UpstreamResponse, fallback: &str) -> HttpResponse {
    warn!("Upstream returned status {}", upstream.status);

    let message = upstream
        .body
        .get("msg")
        .and_then(serde_json::Value::as_str)
        .unwrap_or(fallback)
        .to_string();
    let status =
        StatusCode::from_u16(upstream.status).unwrap_or(StatusCode::BAD_GATEWAY);

    HttpResponse::build(status).json(ErrorBody {
        error: message,
        detail: None,
    })
}
