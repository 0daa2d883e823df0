//! HTTP boundary for the voxrelay pipeline.
//!
//! Exposes a single ask endpoint plus a health check, with permissive CORS
//! for browser-originated calls. Transport concerns end here: the handler
//! decodes the base64 audio payload and hands decoded bytes to the
//! orchestrator.

pub mod api;
pub mod config;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Extension, Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::watch;
use tower_http::cors::{Any, CorsLayer};
use vox_pipeline::Orchestrator;

/// Maximum request body size (16 MiB). Sized for base64-inflated audio
/// payloads; protects against OOM from oversized requests.
const MAX_REQUEST_BODY_BYTES: usize = 16 * 1024 * 1024;

/// Application state shared across request handlers.
#[derive(Clone)]
pub struct AppState {
    /// The request orchestrator with its injected service clients.
    pub orchestrator: Arc<Orchestrator>,
    /// Flips to `true` when the server begins shutting down; in-flight
    /// polling loops observe it and stop promptly.
    pub cancel_rx: watch::Receiver<bool>,
}

/// Health check handler.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Builds the application router with all routes.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/ask", post(api::ask_handler))
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(Extension(Arc::new(state)))
}
