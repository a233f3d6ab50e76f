use async_trait::async_trait;
use qr_contact_server::client::{AgentRequest, AsyncMistralClient, ChatMessage};
use qr_contact_server::error::{MistralApiError, MistralApiResult};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Mock hosted API client for testing.
///
/// Replies are configured up front; a `None` reply makes the call fail with a
/// 503. Every call is counted and its prompt recorded for verification.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct MockMistralClient {
    chat_reply: Arc<Mutex<Option<String>>>,
    agent_reply: Arc<Mutex<Option<String>>>,
    call_counts: Arc<Mutex<HashMap<String, usize>>>,
    prompts: Arc<Mutex<Vec<String>>>,
    agents: Arc<Mutex<Vec<AgentRequest>>>,
    models: Arc<Mutex<Vec<String>>>,
}

#[allow(dead_code)]
impl MockMistralClient {
    /// Create a mock whose calls all fail.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer chat completions with `reply`.
    pub fn with_chat_reply(self, reply: &str) -> Self {
        *self.chat_reply.lock().unwrap() = Some(reply.to_string());
        self
    }

    /// Answer agent runs with `reply`.
    pub fn with_agent_reply(self, reply: &str) -> Self {
        *self.agent_reply.lock().unwrap() = Some(reply.to_string());
        self
    }

    /// Get the number of times a method was called.
    pub fn get_call_count(&self, method: &str) -> usize {
        let counts = self.call_counts.lock().unwrap();
        *counts.get(method).unwrap_or(&0)
    }

    /// The most recent prompt sent through either method.
    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }

    /// The most recent agent definition.
    pub fn last_agent(&self) -> Option<AgentRequest> {
        self.agents.lock().unwrap().last().cloned()
    }

    /// The most recent chat model.
    pub fn last_model(&self) -> Option<String> {
        self.models.lock().unwrap().last().cloned()
    }

    fn track_call(&self, method: &str, prompt: &str) {
        let mut counts = self.call_counts.lock().unwrap();
        *counts.entry(method.to_string()).or_insert(0) += 1;
        self.prompts.lock().unwrap().push(prompt.to_string());
    }

    fn unavailable() -> MistralApiError {
        MistralApiError::ApiError {
            status: 503,
            message: "mock unavailable".to_string(),
        }
    }
}

#[async_trait]
impl AsyncMistralClient for MockMistralClient {
    async fn chat_complete(
        &self,
        model: &str,
        messages: Vec<ChatMessage>,
    ) -> MistralApiResult<String> {
        let prompt = messages
            .iter()
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        self.track_call("chat_complete", &prompt);
        self.models.lock().unwrap().push(model.to_string());

        self.chat_reply
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(Self::unavailable)
    }

    async fn run_agent(&self, agent: &AgentRequest, prompt: &str) -> MistralApiResult<String> {
        self.track_call("run_agent", prompt);
        self.agents.lock().unwrap().push(agent.clone());

        self.agent_reply
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(Self::unavailable)
    }
}
