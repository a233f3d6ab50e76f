//! Configuration management for the QR contact server.
//!
//! This module handles loading and validating configuration from environment variables,
//! reading a `.env` file first when one is present.

use crate::error::{ConfigError, ConfigResult};
use std::env;
use std::net::SocketAddr;

/// Default Mistral API base URL.
pub const DEFAULT_API_BASE_URL: &str = "https://api.mistral.ai";

/// Default listen address.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8000";

/// Default maximum upload size for `/qr` (10 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Configuration for the QR contact server.
#[derive(Debug, Clone)]
pub struct Config {
    /// Mistral API base URL
    pub api_base_url: String,

    /// Mistral API key for authentication
    pub api_key: String,

    /// Socket address the HTTP server binds to
    pub bind_address: SocketAddr,

    /// Hosted API timeout in seconds; `None` waits indefinitely
    pub request_timeout: Option<u64>,

    /// Maximum accepted request body for uploads, in bytes
    pub max_upload_bytes: usize,

    /// Log level used when `RUST_LOG` is unset (default: "info")
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `MISTRAL_API_KEY`: API key for the hosted LLM
    ///
    /// Optional environment variables:
    /// - `MISTRAL_API_BASE_URL`: API base URL (default: https://api.mistral.ai)
    /// - `BIND_ADDRESS`: listen address (default: 0.0.0.0:8000)
    /// - `REQUEST_TIMEOUT`: hosted API timeout in seconds (default: none)
    /// - `MAX_UPLOAD_BYTES`: upload size limit (default: 10 MiB)
    /// - `LOG_LEVEL`: Logging level (default: "info")
    pub fn from_env() -> ConfigResult<Self> {
        // A missing .env file is not an error.
        let _ = dotenvy::dotenv();

        let api_key = env::var("MISTRAL_API_KEY")
            .map_err(|_| ConfigError::MissingVar("MISTRAL_API_KEY".to_string()))?;

        if api_key.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                var: "MISTRAL_API_KEY".to_string(),
                reason: "Cannot be empty".to_string(),
            });
        }

        let api_base_url = env::var("MISTRAL_API_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());

        if !api_base_url.starts_with("http://") && !api_base_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                var: "MISTRAL_API_BASE_URL".to_string(),
                reason: "Must start with http:// or https://".to_string(),
            });
        }

        let bind_address = env::var("BIND_ADDRESS")
            .unwrap_or_else(|_| DEFAULT_BIND_ADDRESS.to_string());
        let bind_address = bind_address
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidValue {
                var: "BIND_ADDRESS".to_string(),
                reason: format!("Must be a socket address like 0.0.0.0:8000, got: {}", bind_address),
            })?;

        let request_timeout = match env::var("REQUEST_TIMEOUT") {
            Ok(_) => Some(Self::parse_env_u64("REQUEST_TIMEOUT", 0)?),
            Err(_) => None,
        };
        if request_timeout == Some(0) {
            return Err(ConfigError::InvalidValue {
                var: "REQUEST_TIMEOUT".to_string(),
                reason: "Must be greater than zero; unset it to disable the timeout".to_string(),
            });
        }

        let max_upload_bytes = Self::parse_env_usize("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?;
        if max_upload_bytes == 0 {
            return Err(ConfigError::InvalidValue {
                var: "MAX_UPLOAD_BYTES".to_string(),
                reason: "Must be greater than zero".to_string(),
            });
        }

        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Config {
            api_base_url,
            api_key,
            bind_address,
            request_timeout,
            max_upload_bytes,
            log_level,
        })
    }

    /// Parse an environment variable as u64 with a default value.
    fn parse_env_u64(var_name: &str, default: u64) -> ConfigResult<u64> {
        match env::var(var_name) {
            Ok(val) => val.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: format!("Must be a positive number, got: {}", val),
            }),
            Err(_) => Ok(default),
        }
    }

    /// Parse an environment variable as usize with a default value.
    fn parse_env_usize(var_name: &str, default: usize) -> ConfigResult<usize> {
        match env::var(var_name) {
            Ok(val) => val.parse::<usize>().map_err(|_| ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: format!("Must be a positive number, got: {}", val),
            }),
            Err(_) => Ok(default),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_key: String::new(),
            bind_address: SocketAddr::from(([0, 0, 0, 0], 8000)),
            request_timeout: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            log_level: "info".to_string(),
        }
    }
}
