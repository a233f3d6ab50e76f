//! Basic metrics instrumentation for tracking performance.
//!
//! Provides counters for hosted API calls and for the outcome of each stage of
//! the contact extraction pipeline.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Metrics collector shared by the API client and the services.
#[derive(Debug, Clone)]
pub struct Metrics {
    /// Total number of hosted API requests made
    http_requests_total: Arc<AtomicU64>,

    /// Total number of hosted API errors
    http_errors_total: Arc<AtomicU64>,

    /// Total duration of all hosted API requests in milliseconds
    http_duration_total_ms: Arc<AtomicU64>,

    /// QR payloads decoded from uploaded images
    qr_payloads_decoded_total: Arc<AtomicU64>,

    /// Records produced by the structured vCard parser
    vcard_parsed_total: Arc<AtomicU64>,

    /// Requests that went to the LLM fallback
    llm_fallbacks_total: Arc<AtomicU64>,

    /// Requests that ended in the empty record
    extraction_failures_total: Arc<AtomicU64>,

    /// Research agent runs
    agent_runs_total: Arc<AtomicU64>,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    /// Create a new metrics collector.
    pub fn new() -> Self {
        Self {
            http_requests_total: Arc::new(AtomicU64::new(0)),
            http_errors_total: Arc::new(AtomicU64::new(0)),
            http_duration_total_ms: Arc::new(AtomicU64::new(0)),
            qr_payloads_decoded_total: Arc::new(AtomicU64::new(0)),
            vcard_parsed_total: Arc::new(AtomicU64::new(0)),
            llm_fallbacks_total: Arc::new(AtomicU64::new(0)),
            extraction_failures_total: Arc::new(AtomicU64::new(0)),
            agent_runs_total: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Record a hosted API request with duration.
    pub fn record_http_request(&self, duration: Duration) {
        self.http_requests_total.fetch_add(1, Ordering::Relaxed);
        self.http_duration_total_ms
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    /// Record a hosted API error.
    pub fn record_http_error(&self) {
        self.http_errors_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Record QR payloads found in one image.
    pub fn record_qr_payloads(&self, count: usize) {
        self.qr_payloads_decoded_total
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn record_vcard_parsed(&self) {
        self.vcard_parsed_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_llm_fallback(&self) {
        self.llm_fallbacks_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_extraction_failure(&self) {
        self.extraction_failures_total
            .fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_agent_run(&self) {
        self.agent_runs_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Get total hosted API requests.
    pub fn http_requests_total(&self) -> u64 {
        self.http_requests_total.load(Ordering::Relaxed)
    }

    /// Get total hosted API errors.
    pub fn http_errors_total(&self) -> u64 {
        self.http_errors_total.load(Ordering::Relaxed)
    }

    /// Get total hosted API duration in milliseconds.
    pub fn http_duration_total_ms(&self) -> u64 {
        self.http_duration_total_ms.load(Ordering::Relaxed)
    }

    /// Get average hosted API request duration in milliseconds.
    pub fn http_duration_avg_ms(&self) -> f64 {
        let total = self.http_duration_total_ms.load(Ordering::Relaxed);
        let count = self.http_requests_total.load(Ordering::Relaxed);
        if count == 0 {
            0.0
        } else {
            total as f64 / count as f64
        }
    }

    pub fn qr_payloads_decoded_total(&self) -> u64 {
        self.qr_payloads_decoded_total.load(Ordering::Relaxed)
    }

    pub fn vcard_parsed_total(&self) -> u64 {
        self.vcard_parsed_total.load(Ordering::Relaxed)
    }

    pub fn llm_fallbacks_total(&self) -> u64 {
        self.llm_fallbacks_total.load(Ordering::Relaxed)
    }

    pub fn extraction_failures_total(&self) -> u64 {
        self.extraction_failures_total.load(Ordering::Relaxed)
    }

    pub fn agent_runs_total(&self) -> u64 {
        self.agent_runs_total.load(Ordering::Relaxed)
    }

    /// Get a summary of all metrics.
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            http_requests_total: self.http_requests_total(),
            http_errors_total: self.http_errors_total(),
            http_duration_total_ms: self.http_duration_total_ms(),
            http_duration_avg_ms: self.http_duration_avg_ms(),
            qr_payloads_decoded_total: self.qr_payloads_decoded_total(),
            vcard_parsed_total: self.vcard_parsed_total(),
            llm_fallbacks_total: self.llm_fallbacks_total(),
            extraction_failures_total: self.extraction_failures_total(),
            agent_runs_total: self.agent_runs_total(),
        }
    }
}

/// A snapshot of metrics values.
#[derive(Debug, Clone)]
pub struct MetricsSummary {
    pub http_requests_total: u64,
    pub http_errors_total: u64,
    pub http_duration_total_ms: u64,
    pub http_duration_avg_ms: f64,
    pub qr_payloads_decoded_total: u64,
    pub vcard_parsed_total: u64,
    pub llm_fallbacks_total: u64,
    pub extraction_failures_total: u64,
    pub agent_runs_total: u64,
}
