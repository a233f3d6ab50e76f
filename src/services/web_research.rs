//! Contact research through a hosted web-search agent.

use crate::client::{AgentRequest, AgentTool, AsyncMistralClient, CompletionArgs};
use crate::error::MistralApiResult;
use crate::metrics::Metrics;
use crate::models::{ResearchResult, ResearchSubject};
use async_trait::async_trait;
use std::sync::Arc;

/// Model the research agent runs on.
pub const RESEARCH_MODEL: &str = "mistral-medium-latest";
pub const RESEARCH_TEMPERATURE: f32 = 0.3;
pub const RESEARCH_TOP_P: f32 = 0.95;

/// Agent definition used for every research request.
pub fn research_agent() -> AgentRequest {
    AgentRequest {
        model: RESEARCH_MODEL.to_string(),
        name: "Contact researcher".to_string(),
        instructions: "You research people and companies on the web. Use the web search \
            tool, report only what your sources support and cite them."
            .to_string(),
        tools: vec![AgentTool::web_search()],
        completion_args: CompletionArgs {
            temperature: RESEARCH_TEMPERATURE,
            top_p: RESEARCH_TOP_P,
        },
    }
}

/// Build the research prompt. Optional details get a line only when present
/// and non-blank.
pub fn build_research_prompt(subject: &ResearchSubject) -> String {
    let mut lines = vec![
        "Research the following person and summarize what can be found about them online."
            .to_string(),
        String::new(),
        format!("Full name: {}", subject.full_name),
        format!("Email: {}", subject.email),
        format!("Company: {}", subject.company),
    ];

    let optional = [
        ("Website", &subject.website),
        ("Phone number", &subject.phone_number),
        ("Address", &subject.address),
    ];
    for (label, value) in optional {
        if let Some(value) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
            lines.push(format!("{}: {}", label, value));
        }
    }

    lines.push(String::new());
    lines.push(
        "Cover their current role, professional background, what the company does and any \
         recent news involving them or the company."
            .to_string(),
    );
    lines.join("\n")
}

/// Research service trait.
#[async_trait]
pub trait WebResearchService: Send + Sync {
    /// Run a fresh research agent for `subject` and return its findings verbatim.
    async fn research(&self, subject: &ResearchSubject) -> MistralApiResult<ResearchResult>;
}

/// Default implementation of WebResearchService.
pub struct WebResearchServiceImpl {
    client: Arc<dyn AsyncMistralClient>,
    metrics: Metrics,
}

impl WebResearchServiceImpl {
    pub fn new(client: Arc<dyn AsyncMistralClient>, metrics: Metrics) -> Self {
        Self { client, metrics }
    }
}

#[async_trait]
impl WebResearchService for WebResearchServiceImpl {
    async fn research(&self, subject: &ResearchSubject) -> MistralApiResult<ResearchResult> {
        let prompt = build_research_prompt(subject);
        tracing::info!("Researching contact at {}", subject.company);

        self.metrics.record_agent_run();
        let result = self.client.run_agent(&research_agent(), &prompt).await?;

        Ok(ResearchResult { result })
    }
}
