//! HTTP server exposing the contact endpoints.
//!
//! - `POST /qr`: multipart image upload → contact record (always 200)
//! - `GET /search-web`: contact details → research findings
//! - `GET /health`: liveness probe

pub mod handlers;

use crate::services::{ContactExtractionService, WebResearchService};
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Shared state for the handlers.
///
/// Every dependency is constructed once at startup and injected here.
#[derive(Clone)]
pub struct AppState {
    pub contacts: Arc<dyn ContactExtractionService>,
    pub research: Arc<dyn WebResearchService>,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(
        contacts: Arc<dyn ContactExtractionService>,
        research: Arc<dyn WebResearchService>,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            contacts,
            research,
            max_upload_bytes,
        }
    }
}

/// Create the router with all routes.
pub fn create_router(state: AppState) -> Router {
    let upload_limit = DefaultBodyLimit::max(state.max_upload_bytes);

    Router::new()
        .route("/qr", post(handlers::parse_qr).layer(upload_limit))
        .route("/search-web", get(handlers::search_web))
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `addr` and serve until Ctrl-C.
pub async fn serve(state: AppState, addr: SocketAddr) -> anyhow::Result<()> {
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
