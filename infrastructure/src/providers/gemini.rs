//! Gemini wire shapes and message translation (generateContent API)

use arena_application::CallParams;
use arena_domain::{Message, Role};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub fn endpoint(base_url: &str, model: &str) -> String {
    format!("{base_url}/v1beta/models/{model}:generateContent")
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Part {
    pub text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
}

/// Translate a generic message sequence into Gemini's request shape.
///
/// System messages are lifted into `systemInstruction`; assistant turns are
/// renamed to the `model` role on the wire.
pub fn build_request(messages: &[Message], params: &CallParams) -> GenerateContentRequest {
    let mut system_parts = Vec::new();
    let mut contents = Vec::new();

    for message in messages {
        match message.role {
            Role::System => system_parts.push(Part {
                text: message.content.clone(),
            }),
            Role::User => contents.push(Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: message.content.clone(),
                }],
            }),
            Role::Assistant => contents.push(Content {
                role: Some("model".to_string()),
                parts: vec![Part {
                    text: message.content.clone(),
                }],
            }),
        }
    }

    let generation_config = if params.temperature.is_none() && params.max_tokens.is_none() {
        None
    } else {
        Some(GenerationConfig {
            temperature: params.temperature,
            max_output_tokens: params.max_tokens,
        })
    };

    GenerateContentRequest {
        system_instruction: (!system_parts.is_empty()).then_some(Content {
            role: None,
            parts: system_parts,
        }),
        contents,
        generation_config,
    }
}

#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

/// First candidate's text, `None` when missing or blank.
pub fn extract_text(response: &GenerateContentResponse) -> Option<String> {
    let content = response.candidates.first()?.content.as_ref()?;
    let text: String = content
        .parts
        .iter()
        .map(|p| p.text.as_str())
        .collect::<Vec<_>>()
        .join("");
    if text.trim().is_empty() { None } else { Some(text) }
}

/// Pull the `RetryInfo.retryDelay` hint (e.g. `"7s"`) out of a 429 error body.
pub fn parse_retry_delay(body: &str) -> Option<Duration> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let details = value.get("error")?.get("details")?.as_array()?;
    for detail in details {
        if let Some(delay) = detail.get("retryDelay").and_then(|d| d.as_str())
            && let Some(seconds) = delay.strip_suffix('s')
            && let Ok(seconds) = seconds.parse::<f64>()
        {
            return Some(Duration::from_secs_f64(seconds));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_translation() {
        let messages = vec![
            Message::system("rules"),
            Message::user("hello"),
            Message::assistant("hi"),
            Message::user("again"),
        ];
        let request = build_request(&messages, &CallParams::default());

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["systemInstruction"]["parts"][0]["text"], "rules");
        assert_eq!(json["contents"][0]["role"], "user");
        // Assistant becomes "model" on the wire
        assert_eq!(json["contents"][1]["role"], "model");
        assert_eq!(json["contents"][1]["parts"][0]["text"], "hi");
        assert_eq!(json["contents"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_generation_config_serialization() {
        let request = build_request(&[Message::user("q")], &CallParams::new(0.7, 1024));
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 1024);

        let bare = build_request(&[Message::user("q")], &CallParams::default());
        let json = serde_json::to_value(&bare).unwrap();
        assert!(json.get("generationConfig").is_none());
        assert!(json.get("systemInstruction").is_none());
    }

    #[test]
    fn test_extract_first_candidate_text() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[
                {"content":{"role":"model","parts":[{"text":"first "},{"text":"answer"}]}},
                {"content":{"role":"model","parts":[{"text":"second"}]}}
            ]}"#,
        )
        .unwrap();
        assert_eq!(extract_text(&response).unwrap(), "first answer");
    }

    #[test]
    fn test_extract_rejects_empty_content() {
        let no_candidates: GenerateContentResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert!(extract_text(&no_candidates).is_none());

        let blank: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"  "}]}}]}"#,
        )
        .unwrap();
        assert!(extract_text(&blank).is_none());
    }

    #[test]
    fn test_parse_retry_delay_from_error_body() {
        let body = r#"{"error":{"code":429,"status":"RESOURCE_EXHAUSTED","details":[
            {"@type":"type.googleapis.com/google.rpc.RetryInfo","retryDelay":"7s"}
        ]}}"#;
        assert_eq!(parse_retry_delay(body), Some(Duration::from_secs(7)));

        assert_eq!(parse_retry_delay("not json"), None);
        assert_eq!(parse_retry_delay(r#"{"error":{"details":[]}}"#), None);
    }
}
