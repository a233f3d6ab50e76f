//! Application service layer.
//!
//! Services contain the request logic and orchestrate the QR detector and the
//! hosted API client. They provide a clean boundary between the HTTP handlers
//! and the integrations underneath.

mod contact_extraction;
pub mod llm_parser;
pub mod web_research;

pub use contact_extraction::{
    ContactExtraction, ContactExtractionService, ContactExtractionServiceImpl, ExtractionSource,
    FallbackReason,
};
pub use llm_parser::LlmContactParser;
pub use web_research::{WebResearchService, WebResearchServiceImpl};
