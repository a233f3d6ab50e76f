//! HTTP client for the Mistral API.
//!
//! This module provides a synchronous HTTP client that can be used from async contexts
//! via `tokio::task::spawn_blocking`. It covers the two hosted capabilities the
//! server needs: chat completions, and web-search agents run through the
//! conversations endpoint.

mod async_wrapper;
pub use async_wrapper::{AsyncMistralClient, AsyncMistralClientImpl};

use crate::config::Config;
use crate::error::{MistralApiError, MistralApiResult};
use crate::metrics::Metrics;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// One chat message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    /// A message with the `user` role.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Value,
}

/// A tool an agent may call.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AgentTool {
    #[serde(rename = "type")]
    pub kind: String,
}

impl AgentTool {
    pub fn web_search() -> Self {
        Self {
            kind: "web_search".to_string(),
        }
    }
}

/// Sampling parameters applied to every completion an agent makes.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct CompletionArgs {
    pub temperature: f32,
    pub top_p: f32,
}

/// Definition of a hosted agent, sent to `POST /v1/agents`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AgentRequest {
    pub model: String,
    pub name: String,
    pub instructions: String,
    pub tools: Vec<AgentTool>,
    pub completion_args: CompletionArgs,
}

#[derive(Debug, Deserialize)]
struct AgentResponse {
    id: String,
}

#[derive(Debug, Serialize)]
struct ConversationRequest<'a> {
    agent_id: &'a str,
    inputs: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ConversationResponse {
    #[serde(default)]
    outputs: Vec<ConversationEntry>,
}

#[derive(Debug, Deserialize)]
struct ConversationEntry {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    content: Value,
}

/// HTTP client for the Mistral API.
///
/// This client uses `ureq` for synchronous HTTP requests and can be called
/// from async contexts using `tokio::task::spawn_blocking`.
#[derive(Clone)]
pub struct MistralClient {
    /// Base URL for the Mistral API
    base_url: String,

    /// API key for bearer authentication
    api_key: String,

    /// HTTP client agent
    agent: Arc<ureq::Agent>,

    /// Metrics collector
    metrics: Metrics,
}

impl MistralClient {
    /// Create a new MistralClient from configuration.
    pub fn new(config: &Config, metrics: Metrics) -> Self {
        let mut builder = ureq::AgentBuilder::new();
        if let Some(secs) = config.request_timeout {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Self {
            base_url: config.api_base_url.clone(),
            api_key: config.api_key.clone(),
            agent: Arc::new(builder.build()),
            metrics,
        }
    }

    /// Create a MistralClient with a custom base URL (useful for testing).
    #[doc(hidden)]
    pub fn with_base_url(base_url: String, api_key: String) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(10))
            .build();

        Self {
            base_url,
            api_key,
            agent: Arc::new(agent),
            metrics: Metrics::new(),
        }
    }

    /// Get a reference to the metrics collector.
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Build a full URL from a path.
    fn build_url(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{}/{}", base, path)
    }

    /// Execute a POST request with authentication and JSON body, returning the body text.
    fn post<B: Serialize>(&self, path: &str, body: &B) -> MistralApiResult<String> {
        let start = Instant::now();
        let url = self.build_url(path);

        tracing::debug!("POST {}", url);

        let result = self
            .agent
            .post(&url)
            .set("Authorization", &format!("Bearer {}", self.api_key))
            .set("Content-Type", "application/json")
            .set("Accept", "application/json")
            .send_json(body)
            .map_err(|e| self.map_error(e));

        let duration = start.elapsed();
        self.metrics.record_http_request(duration);

        match result {
            Ok(response) => {
                tracing::debug!(
                    "POST {} - Success (status: {}, {} ms)",
                    url,
                    response.status(),
                    duration.as_millis()
                );
                response
                    .into_string()
                    .map_err(|e| MistralApiError::HttpError(e.to_string()))
            }
            Err(e) => {
                tracing::error!("POST {} - Error: {}", url, e);
                self.metrics.record_http_error();
                Err(e)
            }
        }
    }

    /// Map a ureq error to a MistralApiError.
    fn map_error(&self, error: ureq::Error) -> MistralApiError {
        match error {
            ureq::Error::Status(code, response) => {
                let message = response
                    .into_string()
                    .unwrap_or_else(|_| "Unknown error".to_string());

                match code {
                    401 => MistralApiError::Unauthorized,
                    404 => MistralApiError::NotFound(message),
                    429 => MistralApiError::RateLimitExceeded,
                    _ => MistralApiError::ApiError {
                        status: code,
                        message,
                    },
                }
            }
            ureq::Error::Transport(transport) => {
                if transport.kind() == ureq::ErrorKind::ConnectionFailed {
                    MistralApiError::HttpError("Connection failed".to_string())
                } else if transport.kind() == ureq::ErrorKind::Io {
                    MistralApiError::Timeout
                } else {
                    MistralApiError::HttpError(transport.to_string())
                }
            }
        }
    }

    // ========================= Chat Completions =========================

    /// Run a chat completion and return the text of the first choice.
    pub fn chat_complete(&self, model: &str, messages: &[ChatMessage]) -> MistralApiResult<String> {
        let request = ChatCompletionRequest { model, messages };
        let body = self.post("/v1/chat/completions", &request)?;

        let response: ChatCompletionResponse =
            serde_json::from_str(&body).map_err(MistralApiError::JsonError)?;

        let choice = response.choices.into_iter().next().ok_or_else(|| {
            MistralApiError::UnexpectedResponse("completion returned no choices".to_string())
        })?;

        content_text(&choice.message.content).ok_or_else(|| {
            MistralApiError::UnexpectedResponse("completion message has no text".to_string())
        })
    }

    // ========================= Agents =========================

    /// Create a hosted agent and return its id.
    pub fn create_agent(&self, request: &AgentRequest) -> MistralApiResult<String> {
        let body = self.post("/v1/agents", request)?;
        let agent: AgentResponse = serde_json::from_str(&body).map_err(MistralApiError::JsonError)?;
        tracing::debug!("Created agent {} ({})", agent.id, request.model);
        Ok(agent.id)
    }

    /// Start a non-streaming conversation with an agent and return its reply text.
    ///
    /// The reply is the text of the last `message.output` entry; tool execution
    /// entries are skipped.
    pub fn start_conversation(&self, agent_id: &str, inputs: &str) -> MistralApiResult<String> {
        let request = ConversationRequest {
            agent_id,
            inputs,
            stream: false,
        };
        let body = self.post("/v1/conversations", &request)?;

        let response: ConversationResponse =
            serde_json::from_str(&body).map_err(MistralApiError::JsonError)?;

        response
            .outputs
            .iter()
            .rev()
            .filter(|entry| entry.kind == "message.output")
            .find_map(|entry| content_text(&entry.content))
            .ok_or_else(|| {
                MistralApiError::UnexpectedResponse(
                    "conversation produced no message output".to_string(),
                )
            })
    }

    /// Create an agent and run it once on `prompt`.
    pub fn run_agent(&self, request: &AgentRequest, prompt: &str) -> MistralApiResult<String> {
        let agent_id = self.create_agent(request)?;
        self.start_conversation(&agent_id, prompt)
    }
}

/// Text of a message `content` field, which is either a string or a list of
/// typed chunks. Only `text` chunks contribute.
fn content_text(content: &Value) -> Option<String> {
    match content {
        Value::String(text) => Some(text.clone()),
        Value::Array(chunks) => {
            let text: String = chunks
                .iter()
                .filter(|chunk| chunk.get("type").and_then(Value::as_str) == Some("text"))
                .filter_map(|chunk| chunk.get("text").and_then(Value::as_str))
                .collect();
            if text.is_empty() {
                None
            } else {
                Some(text)
            }
        }
        _ => None,
    }
}
