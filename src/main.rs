//! QR Contact Server - Main entry point

use anyhow::Result;
use qr_contact_server::client::{AsyncMistralClient, AsyncMistralClientImpl};
use qr_contact_server::qr::{QrDetector, RqrrDetector};
use qr_contact_server::services::{
    ContactExtractionService, ContactExtractionServiceImpl, LlmContactParser, WebResearchService,
    WebResearchServiceImpl,
};
use qr_contact_server::{AppState, Config, Metrics, MistralClient};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first so LOG_LEVEL can seed the filter
    let config = Config::from_env();

    let default_level = config
        .as_ref()
        .map(|cfg| cfg.log_level.clone())
        .unwrap_or_else(|_| "info".to_string());
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match config {
        Ok(cfg) => {
            info!("Configuration loaded successfully");
            cfg
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    info!(
        "Starting QR contact server with API URL: {}",
        config.api_base_url
    );

    let metrics = Metrics::new();

    // Initialize the hosted API client
    let sync_client = MistralClient::new(&config, metrics.clone());
    let client = Arc::new(AsyncMistralClientImpl::new(sync_client)) as Arc<dyn AsyncMistralClient>;

    // Initialize the QR detector
    let detector = Arc::new(RqrrDetector::new()) as Arc<dyn QrDetector>;

    // Initialize services
    let contacts = Arc::new(ContactExtractionServiceImpl::new(
        detector,
        LlmContactParser::new(client.clone()),
        metrics.clone(),
    )) as Arc<dyn ContactExtractionService>;
    let research = Arc::new(WebResearchServiceImpl::new(client, metrics.clone()))
        as Arc<dyn WebResearchService>;

    let state = AppState::new(contacts, research, config.max_upload_bytes);
    qr_contact_server::server::serve(state, config.bind_address).await?;

    let summary = metrics.summary();
    info!(
        http_requests = summary.http_requests_total,
        http_errors = summary.http_errors_total,
        http_avg_ms = summary.http_duration_avg_ms,
        qr_payloads = summary.qr_payloads_decoded_total,
        vcard_parsed = summary.vcard_parsed_total,
        llm_fallbacks = summary.llm_fallbacks_total,
        extraction_failures = summary.extraction_failures_total,
        agent_runs = summary.agent_runs_total,
        "QR contact server shutdown complete"
    );
    Ok(())
}
