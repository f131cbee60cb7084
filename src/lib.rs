use async_trait::async_trait;

mod classify;
mod config;
mod error;
mod extract;
mod llm_client;
mod logging;
mod router;
mod store;
mod summarizer;
mod twitter;
mod utils;
mod web_crawler;
mod youtube;

pub use classify::{
    classify, extract_tweet_id, is_discord_emoji_url, is_discord_message_link, is_gif_url,
    is_twitter_url, is_youtube_url, UrlKind,
};
pub use config::{EnrichConfig, LlmSettings};
pub use error::EnrichError;
pub use extract::{extract_urls, sanitize_url};
pub use llm_client::{ChatCompletion, HttpChatClient, LlmProviderKind, MockChatClient};
pub use logging::{log_enrichment_card, log_error_card, setup_logging, LogConfig};
pub use router::UrlRouter;
pub use store::{ContentStore, MemoryStore, StoredMessageEnrichment};
pub use summarizer::Summarizer;
pub use twitter::TwitterBackend;
pub use web_crawler::{CrawlerConfig, WebCrawlBackend};
pub use youtube::YoutubeBackend;

/// Raw textual content produced by a scraper backend for a single URL.
///
/// Ephemeral: only the derived [`ContentSummary`] is ever persisted.
#[derive(Debug, Clone)]
pub struct ScrapedContent {
    pub markdown: String,
}

impl ScrapedContent {
    pub fn new(markdown: impl Into<String>) -> Self {
        Self {
            markdown: markdown.into(),
        }
    }
}

/// Summary plus key points produced by the [`Summarizer`].
///
/// Key points target 3-5 entries but the bound is not enforced.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ContentSummary {
    pub summary: String,
    pub key_points: Vec<String>,
}

/// A swappable strategy that fetches raw content for a classified URL.
///
/// Every implementation either returns usable content or `None`; internal
/// errors are logged at the backend and never propagate to the router.
#[async_trait]
pub trait ScrapeBackend: Send + Sync {
    fn name(&self) -> &str;

    async fn fetch(&self, url: &str) -> Option<ScrapedContent>;
}
