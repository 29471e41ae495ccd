//! LLM transport — one chat-completion round-trip per turn.
//!
//! `ChatTransport` is the seam the agent talks to. `ChatBackend` is the
//! production implementation: an OpenRouter client plus the configured model,
//! temperature and token limit.

pub mod client;
pub mod types;

use async_trait::async_trait;
use serde_json::Value;

use crate::config::LlmConfig;
use client::{LlmError, OpenRouterClient};
use types::{resolve_model, ChatMessage, ChatRequest, ReasoningConfig};

/// Environment variable holding the OpenRouter credential.
pub const API_KEY_ENV: &str = "OPENROUTER_API_KEY";

/// The model's reply to one request.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelTurn {
    pub content: String,
    /// Opaque reasoning trace, if the backend shipped one.
    pub reasoning: Option<Value>,
}

/// Sends a transcript slice and returns the model's single reply.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send(
        &self,
        messages: &[ChatMessage],
        enable_reasoning: bool,
    ) -> Result<ModelTurn, LlmError>;
}

/// Production transport: OpenRouter with fixed sampling settings.
#[derive(Debug)]
pub struct ChatBackend {
    client: OpenRouterClient,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl ChatBackend {
    /// Create a backend with an explicit API key.
    pub fn new(api_key: String, config: &LlmConfig) -> Self {
        let client = OpenRouterClient::with_base_url(api_key, config.base_url.clone())
            .with_attribution(config.referer.clone(), config.title.clone());
        Self {
            client,
            model: resolve_model(&config.model).to_string(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }

    /// Create a backend reading OPENROUTER_API_KEY from the environment.
    pub fn from_env(config: &LlmConfig) -> Result<Self, LlmError> {
        let api_key = std::env::var(API_KEY_ENV).map_err(|_| {
            LlmError::MissingApiKey(format!("{API_KEY_ENV} environment variable not set"))
        })?;
        Ok(Self::new(api_key, config))
    }

    /// Resolved model ID.
    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request(&self, messages: &[ChatMessage], enable_reasoning: bool) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: messages.to_vec(),
            reasoning: ReasoningConfig {
                enabled: enable_reasoning,
            },
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

#[async_trait]
impl ChatTransport for ChatBackend {
    async fn send(
        &self,
        messages: &[ChatMessage],
        enable_reasoning: bool,
    ) -> Result<ModelTurn, LlmError> {
        let request = self.build_request(messages, enable_reasoning);
        let response = self.client.chat_completions(&request).await?;

        let message = response
            .first_message()
            .ok_or_else(|| LlmError::InvalidResponse("response has no choices".into()))?;

        Ok(ModelTurn {
            content: message.content.clone().unwrap_or_default(),
            reasoning: message.reasoning_details.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::Role;

    #[test]
    fn backend_resolves_model_alias() {
        let config = LlmConfig {
            model: "trinity".into(),
            ..LlmConfig::default()
        };
        let backend = ChatBackend::new("test-key".into(), &config);
        assert_eq!(backend.model(), types::DEFAULT_MODEL);
    }

    #[test]
    fn backend_keeps_full_model_id() {
        let config = LlmConfig {
            model: "openai/gpt-4o-mini".into(),
            ..LlmConfig::default()
        };
        let backend = ChatBackend::new("k".into(), &config);
        assert_eq!(backend.model(), "openai/gpt-4o-mini");
    }

    #[test]
    fn request_carries_sampling_settings() {
        let config = LlmConfig {
            temperature: 0.2,
            max_tokens: 512,
            ..LlmConfig::default()
        };
        let backend = ChatBackend::new("k".into(), &config);
        let messages = vec![ChatMessage::new(Role::User, "Make a form")];

        let req = backend.build_request(&messages, false);
        assert!(!req.reasoning.enabled);
        assert_eq!(req.max_tokens, 512);
        assert!((req.temperature - 0.2).abs() < f32::EPSILON);
        assert_eq!(req.messages, messages);
    }

    #[test]
    fn from_env_missing_key() {
        std::env::remove_var(API_KEY_ENV);
        let err = ChatBackend::from_env(&LlmConfig::default()).unwrap_err();
        assert!(err.to_string().contains(API_KEY_ENV));
    }
}
