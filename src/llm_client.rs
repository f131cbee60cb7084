//! Chat-completion client used by the summarizer.
//!
//! Provider selection is a closed variant type with a lookup table instead of
//! stringly-typed branching; the wire contract is the OpenAI-compatible
//! `/chat/completions` endpoint both supported providers expose.

use crate::EnrichError;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;
use tracing::debug;

/// Supported LLM providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProviderKind {
    OpenRouter,
    Chutes,
}

/// Static per-provider settings.
pub struct ProviderSettings {
    pub base_url: &'static str,
    pub default_model: &'static str,
}

impl LlmProviderKind {
    pub fn settings(&self) -> ProviderSettings {
        match self {
            LlmProviderKind::OpenRouter => ProviderSettings {
                base_url: "https://openrouter.ai/api/v1",
                default_model: "x-ai/grok-3-mini-beta",
            },
            LlmProviderKind::Chutes => ProviderSettings {
                base_url: "https://llm.chutes.ai/v1",
                default_model: "deepseek-ai/DeepSeek-V3",
            },
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "openrouter" => Some(LlmProviderKind::OpenRouter),
            "chutes" => Some(LlmProviderKind::Chutes),
            _ => None,
        }
    }
}

/// Uniform chat-completion interface: send a system+user message pair, get a
/// single text completion back, or fail.
///
/// Network-level failures surface as `Err`; the summarizer maps them to its
/// "no summary" outcome.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    async fn complete(&self, system: &str, user: &str) -> Result<String, EnrichError>;
}

/// HTTP chat-completion client for the supported providers.
pub struct HttpChatClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl HttpChatClient {
    pub fn new(
        provider: LlmProviderKind,
        api_key: impl Into<String>,
    ) -> Result<Self, EnrichError> {
        let settings = provider.settings();
        Self::with_base_url(settings.base_url, api_key, settings.default_model)
    }

    pub fn with_base_url(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self, EnrichError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .user_agent("url-enrich/0.1.0")
            .build()
            .map_err(|e| EnrichError::FetchError(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
        })
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

#[async_trait]
impl ChatCompletion for HttpChatClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String, EnrichError> {
        let request_body = serde_json::json!({
            "model": self.model,
            "max_tokens": 6000,
            "temperature": 0.3,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": user }
            ]
        });

        debug!(model = %self.model, "Sending chat completion request");

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    EnrichError::TimeoutError(e.to_string())
                } else {
                    EnrichError::FetchError(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(EnrichError::ExternalServiceError {
                service: "LLM".to_string(),
                message: format!("API returned {status}: {body}"),
            });
        }

        let response_json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| EnrichError::ParseError(e.to_string()))?;

        response_json["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| EnrichError::ExternalServiceError {
                service: "LLM".to_string(),
                message: "No content in response".to_string(),
            })
    }
}

/// Scripted chat client for tests.
///
/// Responses are returned in the order queued; an exhausted or
/// `failing()` client returns an error, which callers treat as a network
/// failure.
pub struct MockChatClient {
    responses: Mutex<VecDeque<String>>,
    fail: bool,
}

impl Default for MockChatClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockChatClient {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            fail: false,
        }
    }

    /// A client whose every call fails, simulating a network error.
    pub fn failing() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            fail: true,
        }
    }

    pub fn with_response(self, response: impl Into<String>) -> Self {
        self.responses.lock().unwrap().push_back(response.into());
        self
    }
}

#[async_trait]
impl ChatCompletion for MockChatClient {
    async fn complete(&self, _system: &str, _user: &str) -> Result<String, EnrichError> {
        if self.fail {
            return Err(EnrichError::TimeoutError("mock network failure".into()));
        }
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| EnrichError::ExternalServiceError {
                service: "mock".to_string(),
                message: "No scripted response left".to_string(),
            })
    }
}
