//! HTTP route modules
//!
//! Route handlers organized by functionality: the Fastly browsing proxies,
//! the bulk upload endpoint, and the health probe.

pub mod fastly;
pub mod health;
pub mod upload;

use actix_web::web;

/// Mount the Fastly-facing API under `/api/fastly`
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/fastly")
            .route("", web::get().to(fastly::list_services))
            .route("/upload", web::post().to(upload::bulk_upload))
            .route(
                "/service/{service_id}/version",
                web::get().to(fastly::list_versions),
            )
            .route(
                "/service/{service_id}/version/{version_id}/acl",
                web::get().to(fastly::list_acls),
            ),
    );
}
