//! HTTP server
//!
//! This module provides the actix-web server, shared state, and routes.

pub mod routes;
mod server;
mod state;

pub use server::HttpServer;
pub use state::AppState;
