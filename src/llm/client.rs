//! Raw HTTP client for the OpenRouter chat-completions API.
//!
//! No pipeline awareness — just makes API calls via reqwest.

use reqwest::Client;
use tracing::debug;

use super::types::{ChatRequest, ChatResponse, ErrorBody};

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Errors from LLM operations.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success response. Displays only the upstream message so it can be
    /// shown to the user as-is.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("missing API key: {0}")]
    MissingApiKey(String),
}

impl LlmError {
    /// Upstream HTTP status, when the failure came from the endpoint.
    pub fn status(&self) -> Option<u16> {
        match self {
            LlmError::Api { status, .. } => Some(*status),
            LlmError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Raw HTTP client for the chat-completions endpoint.
#[derive(Debug)]
pub struct OpenRouterClient {
    http: Client,
    api_key: String,
    base_url: String,
    referer: Option<String>,
    title: Option<String>,
}

impl OpenRouterClient {
    /// Create a client with the default base URL.
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.into())
    }

    /// Create a client with a custom base URL (for proxies or mock servers).
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            http: Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            referer: None,
            title: None,
        }
    }

    /// Set the OpenRouter attribution headers (`HTTP-Referer`, `X-Title`).
    pub fn with_attribution(mut self, referer: Option<String>, title: Option<String>) -> Self {
        self.referer = referer;
        self.title = title;
        self
    }

    /// Send one chat-completions request. A single round-trip, never retried.
    pub async fn chat_completions(&self, request: &ChatRequest) -> Result<ChatResponse, LlmError> {
        let url = format!("{}/chat/completions", self.base_url);
        debug!(
            model = %request.model,
            messages = request.messages.len(),
            reasoning = request.reasoning.enabled,
            "sending chat completion"
        );

        let mut builder = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .header("content-type", "application/json");
        if let Some(ref referer) = self.referer {
            builder = builder.header("HTTP-Referer", referer);
        }
        if let Some(ref title) = self.title {
            builder = builder.header("X-Title", title);
        }

        let response = builder.json(request).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: api_error_message(status.as_u16(), &body),
            });
        }

        response
            .json::<ChatResponse>()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("failed to parse response: {e}")))
    }
}

/// Best-effort message from an error body.
///
/// `error.message` when present; `API Error: <status>` when the body is JSON
/// without one; `Unknown error` when the body is not JSON at all.
pub fn api_error_message(status: u16, body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed
            .error
            .and_then(|e| e.message)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("API Error: {status}")),
        Err(_) => "Unknown error".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_creation() {
        let client = OpenRouterClient::new("test-key".into());
        assert_eq!(client.base_url, "https://openrouter.ai/api/v1");
        assert!(client.referer.is_none());
    }

    #[test]
    fn client_custom_base_url_strips_slash() {
        let client =
            OpenRouterClient::with_base_url("test-key".into(), "http://localhost:8080/".into());
        assert_eq!(client.base_url, "http://localhost:8080");
    }

    #[test]
    fn client_attribution() {
        let client = OpenRouterClient::new("k".into())
            .with_attribution(Some("http://localhost".into()), Some("AI UI Builder".into()));
        assert_eq!(client.referer.as_deref(), Some("http://localhost"));
        assert_eq!(client.title.as_deref(), Some("AI UI Builder"));
    }

    #[test]
    fn error_message_from_body() {
        let body = r#"{"error": {"message": "User not found.", "code": 401}}"#;
        assert_eq!(api_error_message(401, body), "User not found.");
    }

    #[test]
    fn error_message_json_without_message() {
        assert_eq!(api_error_message(502, r#"{"detail": "bad gateway"}"#), "API Error: 502");
        assert_eq!(api_error_message(500, r#"{"error": {}}"#), "API Error: 500");
    }

    #[test]
    fn error_message_unparseable_body() {
        assert_eq!(api_error_message(503, "<html>down</html>"), "Unknown error");
        assert_eq!(api_error_message(503, ""), "Unknown error");
    }

    #[test]
    fn error_display() {
        let err = LlmError::Api {
            status: 401,
            message: "invalid api key".into(),
        };
        assert_eq!(err.to_string(), "invalid api key");
        assert_eq!(err.status(), Some(401));

        let err = LlmError::MissingApiKey("OPENROUTER_API_KEY not set".into());
        assert!(err.to_string().contains("missing API key"));
        assert_eq!(err.status(), None);
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_http_error() {
        use crate::llm::types::{ChatMessage, ReasoningConfig, Role};

        let client = OpenRouterClient::with_base_url("k".into(), "http://127.0.0.1:1".into());
        let req = ChatRequest {
            model: "m".into(),
            messages: vec![ChatMessage::new(Role::User, "hi")],
            reasoning: ReasoningConfig { enabled: true },
            temperature: 0.7,
            max_tokens: 16,
        };
        let err = client.chat_completions(&req).await.unwrap_err();
        assert!(matches!(err, LlmError::Http(_)));
    }
}
