//! Error types for the QR contact server.
//!
//! This module defines custom error types using `thiserror` for precise error handling.

use thiserror::Error;

/// Errors that can occur when interacting with the Mistral API.
#[derive(Error, Debug)]
pub enum MistralApiError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// API returned an error status code
    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse JSON response
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Network timeout
    #[error("Request timeout")]
    Timeout,

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Authentication failed
    #[error("Authentication failed")]
    Unauthorized,

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// The response was well-formed JSON but lacked the expected content
    #[error("Unexpected response shape: {0}")]
    UnexpectedResponse(String),
}

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Required environment variable is missing
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),

    /// Environment variable has invalid value
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue { var: String, reason: String },
}

/// Reasons the structured vCard parser produced no record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VcardError {
    /// No `BEGIN:VCARD` line was found
    #[error("Not a vCard: missing BEGIN:VCARD")]
    MissingBegin,

    /// The card was opened but never closed
    #[error("Unterminated vCard: missing END:VCARD")]
    MissingEnd,

    /// A content line did not match `name[;params]:value`
    #[error("Malformed content line: {0}")]
    MalformedLine(String),

    /// A value uses a transfer encoding or charset that cannot be decoded
    #[error("Undecodable vCard value: {0}")]
    UndecodableValue(String),

    /// One of the four contact fields could not be determined
    #[error("vCard has no usable {0}")]
    MissingField(&'static str),
}

/// Why the contact pipeline could not produce a record.
///
/// The `/qr` handler collapses every variant into an empty record; the variants
/// exist so callers and tests can tell the failure classes apart.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The multipart upload was missing or unreadable
    #[error("Invalid upload: {0}")]
    Upload(String),

    /// The uploaded bytes are not a decodable image
    #[error("Image decode failed: {0}")]
    ImageDecode(String),

    /// The image contains no decodable QR code
    #[error("No QR code found in image")]
    NoQrCode,

    /// The hosted completion call failed
    #[error("LLM fallback failed: {0}")]
    Llm(#[from] MistralApiError),

    /// The model answered but no JSON object could be recovered
    #[error("Malformed LLM response: {0}")]
    MalformedResponse(String),
}

/// Convenience type alias for Results with MistralApiError
pub type MistralApiResult<T> = Result<T, MistralApiError>;

/// Convenience type alias for Results with ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Convenience type alias for Results with VcardError
pub type VcardResult<T> = Result<T, VcardError>;

/// Convenience type alias for Results with ExtractionError
pub type ExtractionResult<T> = Result<T, ExtractionError>;
