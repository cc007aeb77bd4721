use std::time::Duration;

use serde_json::{json, Value};

use crate::error::{PlannerError, Result};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Thin chat-completions client shared by the extraction and synthesis
/// stages. One best-effort call per invocation, no retries.
#[derive(Clone, Debug)]
pub struct OpenAiClient {
    api_key: String,
    base_url: String,
}

impl OpenAiClient {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Build the client from the `OPENAI_API_KEY` environment variable,
    /// honoring `OPENAI_BASE_URL` when set.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            PlannerError::Config("OPENAI_API_KEY environment variable is required".to_string())
        })?;
        let mut client = Self::new(api_key);
        if let Ok(base_url) = std::env::var("OPENAI_BASE_URL") {
            client.set_base_url(base_url);
        }
        Ok(client)
    }

    pub fn set_base_url(&mut self, base_url: impl Into<String>) {
        self.base_url = base_url.into();
    }

    pub async fn chat_completion(&self, body: &Value, timeout: Duration) -> Result<Value> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| PlannerError::Provider(format!("Failed to build HTTP client: {err}")))?;

        let request_url = build_chat_url(&self.base_url);

        let response = client
            .post(&request_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|err| PlannerError::Provider(format!("HTTP request failed: {err}")))?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|err| PlannerError::Provider(format!("Failed to read response: {err}")))?;

        let response_json: Value = serde_json::from_str(&response_text)
            .map_err(|err| PlannerError::Provider(format!("Failed to parse JSON: {err}")))?;

        if !status.is_success() {
            let api_message = response_json
                .get("error")
                .and_then(|error| error.get("message"))
                .and_then(|value| value.as_str())
                .map(|s| s.to_string())
                .unwrap_or(response_text);

            return Err(PlannerError::Provider(format!(
                "HTTP {} error: {}",
                status, api_message
            )));
        }

        if let Some(error) = response_json.get("error") {
            let error_message = error
                .get("message")
                .and_then(|value| value.as_str())
                .map(|s| s.to_string())
                .unwrap_or_else(|| error.to_string());
            return Err(PlannerError::Provider(format!(
                "API error: {}",
                error_message
            )));
        }

        Ok(response_json)
    }
}

/// Extract the assistant message content from a chat-completion response.
pub fn completion_text(response: &Value) -> Result<String> {
    response
        .get("choices")
        .and_then(|choices| choices.get(0))
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(|content| content.as_str())
        .map(|content| content.trim().to_string())
        .ok_or_else(|| PlannerError::Provider("Response contained no message content".to_string()))
}

fn build_chat_url(base_url: &str) -> String {
    let trimmed = base_url.trim_end_matches('/');
    if trimmed.ends_with("/chat/completions") {
        trimmed.to_string()
    } else {
        format!("{}/chat/completions", trimmed)
    }
}

#[derive(Clone, Debug)]
pub struct ChatCompletionRequest {
    model: String,
    messages: Vec<Value>,
    max_tokens: Option<u32>,
    response_format: Option<Value>,
}

impl ChatCompletionRequest {
    pub fn new(model: impl Into<String>, messages: Vec<Value>) -> Self {
        Self {
            model: model.into(),
            messages,
            max_tokens: None,
            response_format: None,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_response_format(mut self, response_format: Value) -> Self {
        self.response_format = Some(response_format);
        self
    }

    pub fn into_value(self) -> Value {
        let mut body = json!({
            "model": self.model,
            "messages": self.messages,
        });

        if let Some(max_tokens) = self.max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }

        if let Some(response_format) = self.response_format {
            body["response_format"] = response_format;
        }

        body
    }
}
