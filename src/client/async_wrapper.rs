//! Async wrapper around synchronous MistralClient.
//!
//! This module provides an async interface to the synchronous MistralClient by using
//! `tokio::task::spawn_blocking` to run HTTP operations on a dedicated thread pool,
//! preventing blocking of the async runtime.

use crate::client::{AgentRequest, ChatMessage, MistralClient};
use crate::error::{MistralApiError, MistralApiResult};
use async_trait::async_trait;
use std::sync::Arc;

/// Async trait for the hosted model operations the services depend on.
///
/// Each call is a single awaited request with no retry.
#[async_trait]
pub trait AsyncMistralClient: Send + Sync {
    /// Run a chat completion and return the first choice's text.
    async fn chat_complete(&self, model: &str, messages: Vec<ChatMessage>)
        -> MistralApiResult<String>;

    /// Create an agent from `agent` and run it once on `prompt`.
    async fn run_agent(&self, agent: &AgentRequest, prompt: &str) -> MistralApiResult<String>;
}

/// Async wrapper around synchronous MistralClient.
#[derive(Clone)]
pub struct AsyncMistralClientImpl {
    client: Arc<MistralClient>,
}

impl AsyncMistralClientImpl {
    pub fn new(client: MistralClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }
}

#[async_trait]
impl AsyncMistralClient for AsyncMistralClientImpl {
    async fn chat_complete(
        &self,
        model: &str,
        messages: Vec<ChatMessage>,
    ) -> MistralApiResult<String> {
        let client = self.client.clone();
        let model = model.to_string();

        tokio::task::spawn_blocking(move || client.chat_complete(&model, &messages))
            .await
            .map_err(|e| MistralApiError::HttpError(format!("Task join error: {}", e)))?
    }

    async fn run_agent(&self, agent: &AgentRequest, prompt: &str) -> MistralApiResult<String> {
        let client = self.client.clone();
        let agent = agent.clone();
        let prompt = prompt.to_string();

        tokio::task::spawn_blocking(move || client.run_agent(&agent, &prompt))
            .await
            .map_err(|e| MistralApiError::HttpError(format!("Task join error: {}", e)))?
    }
}
