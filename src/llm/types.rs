//! Rust types for the OpenAI-compatible chat-completions API (OpenRouter).
//!
//! Serde-serializable to JSON for HTTP calls. Internal types stay Rust-native.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default model used for every stage.
pub const DEFAULT_MODEL: &str = "arcee-ai/trinity-large-preview:free";

/// Resolve model aliases to full OpenRouter model IDs.
pub fn resolve_model(alias: &str) -> &str {
    match alias {
        "trinity" => DEFAULT_MODEL,
        "trinity-mini" => "arcee-ai/trinity-mini:free",
        _ => alias, // pass through full model IDs
    }
}

/// Conversational role of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// Request body for `POST /chat/completions`.
#[derive(Debug, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub reasoning: ReasoningConfig,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Asks the backend for (or suppresses) auxiliary reasoning traces.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ReasoningConfig {
    pub enabled: bool,
}

/// A single outgoing message. Only role and content ever go over the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Response from the chat-completions endpoint.
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// The assistant message inside a choice.
#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    /// Some providers send `null` content when only reasoning was produced.
    #[serde(default)]
    pub content: Option<String>,
    /// Opaque reasoning trace; passed through, never interpreted.
    #[serde(default)]
    pub reasoning_details: Option<Value>,
}

impl ChatResponse {
    /// The first choice's message, if any.
    pub fn first_message(&self) -> Option<&ResponseMessage> {
        self.choices.first().map(|c| &c.message)
    }
}

/// Error envelope returned with non-success statuses.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_model_aliases() {
        assert_eq!(resolve_model("trinity"), DEFAULT_MODEL);
        assert_eq!(resolve_model("trinity-mini"), "arcee-ai/trinity-mini:free");
    }

    #[test]
    fn resolve_model_passthrough() {
        assert_eq!(resolve_model("openai/gpt-4o"), "openai/gpt-4o");
    }

    #[test]
    fn request_serializes_to_json() {
        let req = ChatRequest {
            model: DEFAULT_MODEL.into(),
            messages: vec![
                ChatMessage::new(Role::System, "You are helpful."),
                ChatMessage::new(Role::User, "Hello"),
            ],
            reasoning: ReasoningConfig { enabled: false },
            temperature: 0.7,
            max_tokens: 4000,
        };

        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["model"], DEFAULT_MODEL);
        assert_eq!(json["max_tokens"], 4000);
        assert_eq!(json["reasoning"]["enabled"], false);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "Hello");
        // f32 precision: 0.7f32 round-trips through JSON as ~0.699999988
        let temp = json["temperature"].as_f64().unwrap();
        assert!((temp - 0.7).abs() < 0.001);
    }

    #[test]
    fn response_deserializes_with_reasoning() {
        let json = r#"{
            "id": "gen-1",
            "model": "arcee-ai/trinity-large-preview:free",
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": "{\"layout\": {}}",
                    "reasoning_details": [{"type": "reasoning.text", "text": "thinking"}]
                },
                "finish_reason": "stop"
            }]
        }"#;

        let resp: ChatResponse = serde_json::from_str(json).unwrap();
        let msg = resp.first_message().unwrap();
        assert_eq!(msg.content.as_deref(), Some("{\"layout\": {}}"));
        let details = msg.reasoning_details.as_ref().unwrap();
        assert_eq!(details[0]["text"], "thinking");
        assert_eq!(resp.choices[0].finish_reason.as_deref(), Some("stop"));
    }

    #[test]
    fn response_without_reasoning() {
        let json = r#"{"choices": [{"message": {"content": "hi"}}]}"#;
        let resp: ChatResponse = serde_json::from_str(json).unwrap();
        assert!(resp.first_message().unwrap().reasoning_details.is_none());
    }

    #[test]
    fn empty_choices_has_no_message() {
        let resp: ChatResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(resp.first_message().is_none());
    }

    #[test]
    fn error_body_parses() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"error": {"message": "No auth", "code": 401}}"#).unwrap();
        assert_eq!(body.error.unwrap().message.as_deref(), Some("No auth"));
    }
}
