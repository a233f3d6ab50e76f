//! LLM fallback for contact extraction.
//!
//! Used when the structured parser cannot fill every field. The model is asked
//! for a fenced JSON object; the reply is searched for the first well-formed
//! object rather than cut at fixed offsets.

use crate::client::{AsyncMistralClient, ChatMessage};
use crate::error::{ExtractionError, ExtractionResult};
use crate::models::ContactRecord;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Model used for contact extraction.
pub const CONTACT_MODEL: &str = "mistral-large-latest";

/// Build the extraction prompt for `source_text`.
pub fn build_parsing_prompt(source_text: &str) -> String {
    format!(
        r#"You are a data parser. Convert the following contact data (usually vCard text decoded from a QR code) into a JSON object with exactly these fields:

fullName: the contact's full name
email: the primary email address
phone: the primary telephone number
address: the full postal address formatted as a single string

Rules:
- If a field is not present in the source text, set its value to an empty string.
- Only use values that literally appear in the source text. Do not infer, guess or complete missing values.
- Write phone as +<countrycode><digits> with no spaces, dashes, dots or parentheses.
- Write email in lower case.
- Reply with only the JSON object inside a ```json fenced block and nothing else.

Source text:
{source_text}"#
    )
}

/// Locate the first well-formed JSON object in model output.
///
/// A ```` ```json ```` fenced block is preferred. Otherwise every `{` is tried
/// as the start of an object, so surrounding prose, other fence styles or a
/// missing fence do not matter.
pub fn extract_json_object(text: &str) -> Option<Map<String, Value>> {
    if let Some(object) = fenced_json(text) {
        return Some(object);
    }

    text.char_indices()
        .filter(|&(_, c)| c == '{')
        .find_map(|(idx, _)| first_value_at(&text[idx..]))
}

fn fenced_json(text: &str) -> Option<Map<String, Value>> {
    let start = text.find("```json")? + "```json".len();
    let rest = &text[start..];
    let end = rest.find("```")?;
    match serde_json::from_str::<Value>(rest[..end].trim()) {
        Ok(Value::Object(object)) => Some(object),
        _ => None,
    }
}

fn first_value_at(text: &str) -> Option<Map<String, Value>> {
    let mut stream = serde_json::Deserializer::from_str(text).into_iter::<Value>();
    match stream.next() {
        Some(Ok(Value::Object(object))) => Some(object),
        _ => None,
    }
}

/// Build a record from the model's object. Missing or null keys become empty
/// strings; numbers are accepted for phone-like values.
pub fn record_from_object(object: &Map<String, Value>) -> ExtractionResult<ContactRecord> {
    let field = |keys: &[&str]| -> ExtractionResult<String> {
        match keys.iter().find_map(|key| object.get(*key)) {
            None | Some(Value::Null) => Ok(String::new()),
            Some(Value::String(s)) => Ok(s.clone()),
            Some(Value::Number(n)) => Ok(n.to_string()),
            Some(other) => Err(ExtractionError::MalformedResponse(format!(
                "{} is not a string: {}",
                keys[0], other
            ))),
        }
    };

    let record = ContactRecord {
        full_name: field(&["fullName", "full_name"])?,
        email: field(&["email"])?,
        phone: field(&["phone"])?,
        address: field(&["address"])?,
    };
    Ok(record.normalized())
}

/// Contact extraction through a hosted chat completion.
#[derive(Clone)]
pub struct LlmContactParser {
    client: Arc<dyn AsyncMistralClient>,
}

impl LlmContactParser {
    pub fn new(client: Arc<dyn AsyncMistralClient>) -> Self {
        Self { client }
    }

    /// Ask the model to extract a contact from `source_text`.
    ///
    /// Every failure is returned to the caller; nothing is retried.
    pub async fn parse(&self, source_text: &str) -> ExtractionResult<ContactRecord> {
        let prompt = build_parsing_prompt(source_text);
        let reply = self
            .client
            .chat_complete(CONTACT_MODEL, vec![ChatMessage::user(prompt)])
            .await?;

        tracing::debug!("LLM reply ({} chars)", reply.len());

        let object = extract_json_object(&reply).ok_or_else(|| {
            ExtractionError::MalformedResponse("no JSON object in model reply".to_string())
        })?;

        record_from_object(&object)
    }
}
