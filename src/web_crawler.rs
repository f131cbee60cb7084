//! Generic web scraper backend.
//!
//! Talks to a Firecrawl-style scrape API through a single long-lived crawl
//! session. The session is lazily created under a mutex so concurrent
//! callers reuse one underlying client; the lock is scoped to get-or-create,
//! not to the fetch itself.

use crate::{EnrichError, ScrapeBackend, ScrapedContent};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Hard per-URL fetch deadline; on expiry the fetch is abandoned and
/// reported as "no content".
const FETCH_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
pub struct CrawlerConfig {
    pub base_url: String,
    pub api_key: String,
    pub fetch_timeout: Duration,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.firecrawl.dev".to_string(),
            api_key: String::new(),
            fetch_timeout: FETCH_TIMEOUT,
        }
    }
}

impl CrawlerConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }
}

struct CrawlSession {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl CrawlSession {
    fn new(config: &CrawlerConfig) -> Result<Self, EnrichError> {
        let client = reqwest::Client::builder()
            .user_agent("url-enrich/0.1.0")
            .pool_max_idle_per_host(10)
            .build()
            .map_err(|e| EnrichError::FetchError(e.to_string()))?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    async fn scrape(&self, url: &str) -> Result<Option<String>, EnrichError> {
        let request_body = serde_json::json!({
            "url": url,
            "formats": ["markdown"],
            "onlyMainContent": true,
        });

        let response = self
            .client
            .post(format!("{}/v1/scrape", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request_body)
            .send()
            .await
            .map_err(|e| EnrichError::FetchError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(EnrichError::ExternalServiceError {
                service: "crawler".to_string(),
                message: format!("scrape API returned {}", response.status()),
            });
        }

        let result: serde_json::Value = response
            .json()
            .await
            .map_err(|e| EnrichError::ParseError(e.to_string()))?;

        Ok(extract_content(&result))
    }
}

/// Extraction preference from a raw scrape result: structured markdown,
/// then cleaned HTML, then raw HTML; first non-empty wins.
fn extract_content(result: &serde_json::Value) -> Option<String> {
    const FIELDS: [&str; 3] = ["markdown", "html", "rawHtml"];

    for field in FIELDS {
        for candidate in [&result["data"][field], &result[field]] {
            if let Some(text) = candidate.as_str() {
                if !text.trim().is_empty() {
                    return Some(text.to_string());
                }
            }
        }
    }
    None
}

/// Generic web backend with one shared, lazily-initialized crawl session.
pub struct WebCrawlBackend {
    config: CrawlerConfig,
    session: Mutex<Option<Arc<CrawlSession>>>,
}

impl WebCrawlBackend {
    pub fn new(config: CrawlerConfig) -> Self {
        Self {
            config,
            session: Mutex::new(None),
        }
    }

    /// Returns the shared session, creating it on first use. The lock covers
    /// only get-or-create, so concurrent fetches do not serialize.
    async fn session(&self) -> Result<Arc<CrawlSession>, EnrichError> {
        let mut guard = self.session.lock().await;
        if let Some(session) = guard.as_ref() {
            return Ok(Arc::clone(session));
        }
        debug!("Initializing shared crawl session");
        let session = Arc::new(CrawlSession::new(&self.config)?);
        *guard = Some(Arc::clone(&session));
        Ok(session)
    }

    /// Releases the shared session. Idempotent and safe to call even if the
    /// session was never created.
    pub async fn close(&self) {
        let mut guard = self.session.lock().await;
        if guard.take().is_some() {
            info!("Crawl session released");
        }
    }
}

#[async_trait]
impl ScrapeBackend for WebCrawlBackend {
    fn name(&self) -> &str {
        "web"
    }

    async fn fetch(&self, url: &str) -> Option<ScrapedContent> {
        debug!(url = %url, "Scraping URL with web crawler");

        let fetch = async {
            let session = self.session().await?;
            session.scrape(url).await
        };

        match timeout(self.config.fetch_timeout, fetch).await {
            Ok(Ok(Some(content))) => {
                info!(url = %url, content_length = content.len(), "Successfully scraped URL");
                Some(ScrapedContent::new(content))
            }
            Ok(Ok(None)) => {
                warn!(url = %url, "Scrape returned no usable content");
                None
            }
            Ok(Err(e)) => {
                e.log();
                None
            }
            Err(_) => {
                warn!(url = %url, timeout = ?self.config.fetch_timeout, "Scrape timed out");
                None
            }
        }
    }
}
