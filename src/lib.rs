//! QR Contact Server - turns vCard QR codes into normalized contact records.
//!
//! An uploaded image is decoded, its QR codes are read, and the payload is parsed
//! as a vCard. When the card is incomplete the text is handed to a hosted language
//! model instead. A second endpoint runs a hosted web-search agent over a contact.
//!
//! # Architecture
//!
//! - **models**: the `ContactRecord` response shape and research request types
//! - **domain**: email and phone value objects with their normalization rules
//! - **error**: custom error types for precise error handling
//! - **config**: configuration management from environment variables
//! - **client**: HTTP client for the Mistral API (chat completions and agents)
//! - **qr**: image decoding and QR detection
//! - **vcard**: structured vCard parsing
//! - **services**: contact extraction pipeline and web research
//! - **server**: axum router and handlers
//! - **metrics**: lock-free counters

pub mod client;
pub mod config;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod models;
pub mod qr;
pub mod server;
pub mod services;
pub mod vcard;

pub use client::{AsyncMistralClient, AsyncMistralClientImpl, MistralClient};
pub use config::Config;
pub use error::{ConfigError, ExtractionError, MistralApiError, VcardError};
pub use metrics::{Metrics, MetricsSummary};
pub use models::{ContactRecord, ResearchResult, ResearchSubject};
pub use qr::{QrDetector, RqrrDetector};
pub use server::{create_router, AppState};
