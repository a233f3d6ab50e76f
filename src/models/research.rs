//! Request and response types for contact research.

use serde::{Deserialize, Serialize};

/// The person to research, as supplied on the `/search-web` query string.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
pub struct ResearchSubject {
    pub full_name: String,
    pub email: String,
    pub company: String,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

/// Free-form findings returned by the research agent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResearchResult {
    pub result: String,
}
