//! Environment-driven configuration.

use crate::llm_client::LlmProviderKind;
use crate::EnrichError;

/// Settings for the chat-completion client.
#[derive(Debug, Clone)]
pub struct LlmSettings {
    pub provider: LlmProviderKind,
    pub api_key: String,
    pub model: String,
}

/// Configuration for the enrichment pipeline.
#[derive(Debug, Clone)]
pub struct EnrichConfig {
    /// API key for the generic web scrape service (required).
    pub firecrawl_api_key: String,
    /// Token for the Twitter/X scraping service. Optional: when absent,
    /// Twitter URLs are processed by the generic backend instead.
    pub apify_api_token: Option<String>,
    pub llm: LlmSettings,
}

impl EnrichConfig {
    /// Reads configuration from environment variables.
    ///
    /// Required: `FIRECRAWL_API_KEY`, `LLM_API_KEY`.
    /// Optional: `APIFY_API_TOKEN`, `LLM_PROVIDER` (`openrouter` or
    /// `chutes`, default `openrouter`), `LLM_MODEL` (defaults per provider).
    pub fn from_env() -> Result<Self, EnrichError> {
        let firecrawl_api_key = required_var("FIRECRAWL_API_KEY")?;
        let llm_api_key = required_var("LLM_API_KEY")?;

        let apify_api_token = std::env::var("APIFY_API_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty());

        let provider = match std::env::var("LLM_PROVIDER") {
            Ok(name) => LlmProviderKind::from_name(&name).ok_or_else(|| {
                EnrichError::InvalidConfiguration(format!(
                    "Unknown LLM provider: {name}. Supported: openrouter, chutes"
                ))
            })?,
            Err(_) => LlmProviderKind::OpenRouter,
        };

        let model = std::env::var("LLM_MODEL")
            .ok()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| provider.settings().default_model.to_string());

        Ok(Self {
            firecrawl_api_key,
            apify_api_token,
            llm: LlmSettings {
                provider,
                api_key: llm_api_key,
                model,
            },
        })
    }
}

fn required_var(name: &str) -> Result<String, EnrichError> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| {
            EnrichError::InvalidConfiguration(format!("{name} environment variable is required"))
        })
}
