//! URL routing orchestration.
//!
//! Given a `(message_id, url)` pair: classify, pick a backend with its
//! fallback chain, summarize, persist. Each invocation is strictly
//! sequential; invocations for distinct pairs are independent. The public
//! result is a bare success flag; detail lives in the logs.

use crate::classify::{classify, extract_tweet_id, UrlKind};
use crate::config::EnrichConfig;
use crate::llm_client::HttpChatClient;
use crate::store::ContentStore;
use crate::summarizer::Summarizer;
use crate::twitter::{self, TwitterBackend};
use crate::web_crawler::{CrawlerConfig, WebCrawlBackend};
use crate::youtube::YoutubeBackend;
use crate::{ContentSummary, EnrichError, ScrapeBackend, ScrapedContent};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct UrlRouter {
    /// Present only when an access token is configured; the router never
    /// calls a backend that is not there.
    twitter: Option<Arc<dyn ScrapeBackend>>,
    youtube: Arc<dyn ScrapeBackend>,
    web: Arc<dyn ScrapeBackend>,
    summarizer: Summarizer,
    store: Arc<dyn ContentStore>,
}

impl UrlRouter {
    pub fn new(
        twitter: Option<Arc<dyn ScrapeBackend>>,
        youtube: Arc<dyn ScrapeBackend>,
        web: Arc<dyn ScrapeBackend>,
        summarizer: Summarizer,
        store: Arc<dyn ContentStore>,
    ) -> Self {
        Self {
            twitter,
            youtube,
            web,
            summarizer,
            store,
        }
    }

    /// Builds a router with the real backends from configuration. Fails only
    /// if an HTTP client cannot be constructed.
    pub fn from_config(
        config: &EnrichConfig,
        store: Arc<dyn ContentStore>,
    ) -> Result<Self, EnrichError> {
        let twitter: Option<Arc<dyn ScrapeBackend>> = match &config.apify_api_token {
            Some(token) => Some(Arc::new(TwitterBackend::new(token.clone())?)),
            None => {
                warn!("Twitter access token not configured, Twitter URLs will use the web backend");
                None
            }
        };

        let chat = HttpChatClient::new(config.llm.provider, config.llm.api_key.clone())?
            .with_model(config.llm.model.clone());

        Ok(Self::new(
            twitter,
            Arc::new(YoutubeBackend::new()?),
            Arc::new(WebCrawlBackend::new(CrawlerConfig::new(
                config.firecrawl_api_key.clone(),
            ))),
            Summarizer::new(Arc::new(chat)),
            store,
        ))
    }

    /// Processes a URL found in a message: scrape, summarize, persist.
    ///
    /// Returns true only when all three steps succeeded. No retries are
    /// scheduled on failure.
    pub async fn process_url(&self, message_id: &str, url: &str) -> bool {
        info!(message_id = %message_id, url = %url, "Processing URL");

        let Some(content) = self.scrape(url).await else {
            warn!(url = %url, "Failed to scrape content");
            return false;
        };

        let Some(summary) = self.summarizer.summarize(&content.markdown, url).await else {
            warn!(url = %url, "Failed to summarize scraped content");
            return false;
        };

        let key_points_json =
            serde_json::to_string(&summary.key_points).unwrap_or_else(|_| "[]".to_string());

        let stored = self
            .store
            .update_message_with_scraped_data(message_id, url, &summary.summary, &key_points_json)
            .await;

        if stored {
            info!(message_id = %message_id, url = %url, "Successfully processed URL");
        } else {
            warn!(message_id = %message_id, url = %url, "Failed to store enrichment");
        }
        stored
    }

    /// Returns the enrichment for a URL, scraping on demand if needed.
    ///
    /// The store is consulted first; a cache hit short-circuits every
    /// backend. A miss runs the scrape+summarize pipeline synchronously
    /// without persisting the result.
    pub async fn enrich_on_demand(&self, url: &str) -> Option<ContentSummary> {
        if let Some(stored) = self.store.get_scraped_content_by_url(url).await {
            debug!(url = %url, "Found cached enrichment");
            return Some(ContentSummary {
                summary: stored.summary,
                key_points: stored.key_points,
            });
        }

        debug!(url = %url, "No cached enrichment, scraping on demand");
        let content = self.scrape(url).await?;
        self.summarizer.summarize(&content.markdown, url).await
    }

    /// Classifies the URL and runs the matching backend with its fallback
    /// chain. `None` means ScrapeFailed (or Aborted for excluded
    /// categories).
    async fn scrape(&self, url: &str) -> Option<ScrapedContent> {
        match classify(url) {
            UrlKind::DiscordLink | UrlKind::GifOrImage | UrlKind::DiscordEmoji => {
                debug!(url = %url, "URL category is excluded from enrichment");
                None
            }
            UrlKind::Youtube => match self.youtube.fetch(url).await {
                Some(content) => Some(content),
                None => {
                    warn!(url = %url, "YouTube scrape failed, falling back to web backend");
                    self.web.fetch(url).await
                }
            },
            UrlKind::Twitter => self.scrape_twitter(url).await,
            UrlKind::Generic => self.web.fetch(url).await,
        }
    }

    async fn scrape_twitter(&self, url: &str) -> Option<ScrapedContent> {
        if extract_tweet_id(url).is_none() {
            // No tweet to scrape: bare root URLs get synthesized content,
            // anything else goes through the web backend.
            if let Some(placeholder) = twitter::base_url_placeholder(url) {
                return Some(placeholder);
            }
            warn!(url = %url, "Twitter URL without a tweet ID, using web backend");
            return self.web.fetch(url).await;
        }

        let Some(twitter) = &self.twitter else {
            warn!(url = %url, "Twitter backend unavailable, using web backend");
            return self.web.fetch(url).await;
        };

        match twitter.fetch(url).await {
            Some(content) => Some(content),
            None => {
                warn!(url = %url, "Twitter scrape failed, falling back to web backend");
                self.web.fetch(url).await
            }
        }
    }
}
