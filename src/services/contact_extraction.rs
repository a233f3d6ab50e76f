//! Contact extraction service.
//!
//! Image → QR payloads → structured vCard parse → LLM fallback.

use crate::error::{ExtractionError, ExtractionResult, VcardError};
use crate::metrics::Metrics;
use crate::models::ContactRecord;
use crate::qr::{decode_image, QrDetector};
use crate::services::llm_parser::LlmContactParser;
use crate::vcard;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

/// Which stage produced the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionSource {
    Vcard,
    LlmFallback,
}

/// Why the structured parser was bypassed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    /// More than one QR code decoded; only a single payload is parsed structurally
    MultiplePayloads(usize),

    /// The single payload was not a complete vCard
    Vcard(VcardError),
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MultiplePayloads(count) => write!(f, "{} QR payloads decoded", count),
            Self::Vcard(err) => write!(f, "{}", err),
        }
    }
}

/// A successfully extracted contact and how it was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactExtraction {
    pub record: ContactRecord,
    pub source: ExtractionSource,
    pub fallback_reason: Option<FallbackReason>,
}

/// Contact extraction from uploaded images.
#[async_trait]
pub trait ContactExtractionService: Send + Sync {
    /// Decode `upload` as an image, find QR codes and extract a contact.
    async fn extract_from_image(&self, upload: Vec<u8>) -> ExtractionResult<ContactExtraction>;

    /// Extract a contact from already decoded QR payloads.
    async fn extract_from_payloads(
        &self,
        payloads: &[String],
    ) -> ExtractionResult<ContactExtraction>;
}

/// Default implementation of ContactExtractionService.
pub struct ContactExtractionServiceImpl {
    detector: Arc<dyn QrDetector>,
    llm_parser: LlmContactParser,
    metrics: Metrics,
}

impl ContactExtractionServiceImpl {
    pub fn new(detector: Arc<dyn QrDetector>, llm_parser: LlmContactParser, metrics: Metrics) -> Self {
        Self {
            detector,
            llm_parser,
            metrics,
        }
    }

    /// Image decoding and detection are CPU-bound, so they run off the runtime.
    async fn decode_payloads(&self, upload: Vec<u8>) -> ExtractionResult<Vec<String>> {
        let detector = self.detector.clone();

        let payloads = tokio::task::spawn_blocking(move || -> ExtractionResult<Vec<String>> {
            let image = decode_image(&upload)?;
            Ok(detector.detect_and_decode(&image))
        })
        .await
        .map_err(|e| ExtractionError::ImageDecode(format!("Task join error: {}", e)))??;

        tracing::debug!("Decoded {} QR payload(s)", payloads.len());
        self.metrics.record_qr_payloads(payloads.len());
        Ok(payloads)
    }

    async fn run(&self, payloads: &[String]) -> ExtractionResult<ContactExtraction> {
        let reason = match payloads {
            [] => return Err(ExtractionError::NoQrCode),
            [single] => match vcard::parse_contact(single) {
                Ok(record) => {
                    self.metrics.record_vcard_parsed();
                    return Ok(ContactExtraction {
                        record,
                        source: ExtractionSource::Vcard,
                        fallback_reason: None,
                    });
                }
                Err(e) => FallbackReason::Vcard(e),
            },
            many => FallbackReason::MultiplePayloads(many.len()),
        };

        tracing::info!("Falling back to LLM parser: {}", reason);
        self.metrics.record_llm_fallback();

        let record = self.llm_parser.parse(&payloads.join("\n\n")).await?;
        Ok(ContactExtraction {
            record,
            source: ExtractionSource::LlmFallback,
            fallback_reason: Some(reason),
        })
    }

    fn track<T>(&self, result: ExtractionResult<T>) -> ExtractionResult<T> {
        if result.is_err() {
            self.metrics.record_extraction_failure();
        }
        result
    }
}

#[async_trait]
impl ContactExtractionService for ContactExtractionServiceImpl {
    async fn extract_from_image(&self, upload: Vec<u8>) -> ExtractionResult<ContactExtraction> {
        let result = match self.decode_payloads(upload).await {
            Ok(payloads) => self.run(&payloads).await,
            Err(e) => Err(e),
        };
        self.track(result)
    }

    async fn extract_from_payloads(
        &self,
        payloads: &[String],
    ) -> ExtractionResult<ContactExtraction> {
        let result = self.run(payloads).await;
        self.track(result)
    }
}
