//! Health check endpoint

use actix_web::{HttpResponse, web};
use std::borrow::Cow;
use tracing::debug;

/// Configure health check routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check));
}

/// Basic health check endpoint
///
/// Returns a simple status for load balancers and monitoring systems.
pub async fn health_check() -> HttpResponse {
    debug!("Health check requested");

    HttpResponse::Ok().json(HealthStatus {
        status: Cow::Borrowed("healthy"),
        version: Cow::Borrowed(env!("CARGO_PKG_VERSION")),
        timestamp: chrono::Utc::now(),
    })
}

/// Basic health status
#[derive(Debug, Clone, serde::Serialize)]
struct HealthStatus {
    status: Cow<'static, str>,
    version: Cow<'static, str>,
    timestamp: chrono::DateTime<chrono::Utc>,
}
