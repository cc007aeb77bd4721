use std::time::Duration;

use schemars::schema_for;
use serde_json::{json, Value};
use tracing::warn;

use crate::error::Result;
use crate::services::{completion_text, ChatCompletionRequest, OpenAiClient};
use crate::types::Intent;

const SYSTEM_PROMPT: &str = "You are a date planning expert. Extract structured information from user requests.\nExtract: city, date/time (if mentioned), budget (in INR if mentioned), vibe (romantic/fun/adventure/cozy), and preferences.\nAlways infer a vibe even if not explicitly stated.";

const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);
const MAX_TOKENS: u32 = 300;

/// Extraction stage: one structured LLM call turning free text into an
/// [`Intent`]. Never fails the pipeline; any provider or parse failure
/// yields the fixed fallback intent.
#[derive(Debug)]
pub struct Extractor {
    client: OpenAiClient,
    model: String,
    timeout: Duration,
}

impl Extractor {
    pub fn new(client: OpenAiClient) -> Self {
        Self {
            client,
            model: DEFAULT_MODEL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Parse a natural-language request into a structured intent.
    pub async fn extract(&self, free_text: &str) -> Intent {
        match self.request_intent(free_text).await {
            Ok(intent) => intent,
            Err(err) => {
                warn!("Extraction error: {}", err);
                fallback_intent()
            }
        }
    }

    async fn request_intent(&self, free_text: &str) -> Result<Intent> {
        let messages = vec![
            json!({"role": "system", "content": SYSTEM_PROMPT}),
            json!({"role": "user", "content": free_text}),
        ];

        let body = ChatCompletionRequest::new(&self.model, messages)
            .with_max_tokens(Some(MAX_TOKENS))
            .with_response_format(intent_response_format())
            .into_value();

        let response = self.client.chat_completion(&body, self.timeout).await?;
        let content = completion_text(&response)?;

        parse_intent(&content)
    }
}

/// Fixed intent used whenever extraction cannot produce a real one.
pub fn fallback_intent() -> Intent {
    Intent {
        city: "Mumbai".to_string(),
        date_time: None,
        budget: None,
        vibe: "romantic".to_string(),
        preferences: Vec::new(),
    }
}

fn intent_response_format() -> Value {
    let schema =
        serde_json::to_value(schema_for!(Intent)).unwrap_or_else(|_| json!({"type": "object"}));
    json!({
        "type": "json_schema",
        "json_schema": {
            "name": "intent",
            "schema": schema
        }
    })
}

fn parse_intent(content: &str) -> Result<Intent> {
    let mut deserializer = serde_json::Deserializer::from_str(content);
    let intent = serde_path_to_error::deserialize(&mut deserializer).map_err(|err| {
        let path = err.path().to_string();
        let location = if path.is_empty() {
            "<root>".to_string()
        } else {
            path
        };
        crate::error::PlannerError::Provider(format!(
            "failed to deserialize intent at {}: {}",
            location, err
        ))
    })?;
    Ok(intent)
}
