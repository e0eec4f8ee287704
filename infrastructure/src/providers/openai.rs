//! OpenAI wire shapes and message translation (chat completions API)

use arena_application::CallParams;
use arena_domain::Message;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub fn endpoint(base_url: &str) -> String {
    format!("{base_url}/v1/chat/completions")
}

#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// Translate a generic message sequence into OpenAI's request shape.
/// Role names map 1:1 (`system`/`user`/`assistant`).
pub fn build_request(
    model: &str,
    messages: &[Message],
    params: &CallParams,
) -> ChatCompletionRequest {
    ChatCompletionRequest {
        model: model.to_string(),
        messages: messages
            .iter()
            .map(|m| ChatMessage {
                role: m.role.as_str().to_string(),
                content: m.content.clone(),
            })
            .collect(),
        temperature: params.temperature,
        max_tokens: params.max_tokens,
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

/// First choice's message content, `None` when missing or blank.
pub fn extract_text(response: &ChatCompletionResponse) -> Option<String> {
    let content = response.choices.first()?.message.content.as_ref()?;
    if content.trim().is_empty() {
        None
    } else {
        Some(content.clone())
    }
}

/// Parse a `Retry-After` header value given in whole seconds.
pub fn parse_retry_after(value: &str) -> Option<Duration> {
    value.trim().parse::<u64>().ok().map(Duration::from_secs)
}

/// OpenAI signals unknown models with a 404, or an error body carrying
/// `code: "model_not_found"`.
pub fn is_model_not_found(status: u16, body: &str) -> bool {
    if status == 404 {
        return true;
    }
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")?
                .get("code")
                .map(|c| c == "model_not_found")
        })
        .unwrap_or(false)
}
