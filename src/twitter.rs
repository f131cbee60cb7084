//! Twitter/X scraper backend.
//!
//! Talks to an Apify-style tweet scraping service. The backend is only
//! constructed when an access token is configured; the router skips it
//! entirely otherwise.

use crate::classify::extract_tweet_id;
use crate::{EnrichError, ScrapeBackend, ScrapedContent};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info, warn};

const BASE_URL: &str = "https://api.apify.com";
const ACTOR_PATH: &str = "/v2/acts/apidojo~tweet-scraper/run-sync-get-dataset-items";

pub struct TwitterBackend {
    client: reqwest::Client,
    token: String,
}

impl TwitterBackend {
    pub fn new(token: impl Into<String>) -> Result<Self, EnrichError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
                AppleWebKit/537.36 (KHTML, like Gecko) \
                Chrome/119.0.0.0 Safari/537.36",
            )
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| EnrichError::FetchError(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            token: token.into(),
        })
    }

    fn render_markdown(item: &serde_json::Value, url: &str) -> Option<String> {
        let text = item["text"].as_str().filter(|t| !t.trim().is_empty())?;
        let author = item["author"]["userName"]
            .as_str()
            .or_else(|| item["author"]["name"].as_str())
            .unwrap_or("unknown");
        let created_at = item["createdAt"].as_str().unwrap_or("");

        let mut markdown = format!("# Tweet by @{author}\n\n{text}\n");
        if !created_at.is_empty() {
            markdown.push_str(&format!("\nPosted: {created_at}\n"));
        }
        markdown.push_str(&format!("\nSource: {url}\n"));
        Some(markdown)
    }
}

/// Synthesized content for bare `twitter.com`/`x.com` root URLs, which carry
/// no tweet to scrape.
pub(crate) fn base_url_placeholder(url: &str) -> Option<ScrapedContent> {
    let lowered = url.trim().to_lowercase();
    let is_base = matches!(
        lowered.as_str(),
        "https://x.com" | "https://twitter.com" | "http://x.com" | "http://twitter.com"
    );
    if is_base {
        info!(url = %url, "Handling base Twitter/X.com URL with synthesized content");
        Some(ScrapedContent::new(format!(
            "# Twitter/X.com\n\nThis is the main page of Twitter/X.com: {url}"
        )))
    } else {
        None
    }
}

#[async_trait]
impl ScrapeBackend for TwitterBackend {
    fn name(&self) -> &str {
        "twitter"
    }

    async fn fetch(&self, url: &str) -> Option<ScrapedContent> {
        let tweet_id = extract_tweet_id(url)?;
        debug!(url = %url, tweet_id = %tweet_id, "Scraping tweet");

        let request_body = serde_json::json!({
            "startUrls": [url],
            "maxItems": 1,
        });

        let response = self
            .client
            .post(format!("{BASE_URL}{ACTOR_PATH}?token={}", self.token))
            .json(&request_body)
            .send()
            .await;

        let response = match response {
            Ok(r) if r.status().is_success() => r,
            Ok(r) => {
                warn!(url = %url, status = %r.status(), "Tweet scraping service returned error status");
                return None;
            }
            Err(e) => {
                warn!(url = %url, error = %e, "Tweet scraping request failed");
                return None;
            }
        };

        let items: serde_json::Value = match response.json().await {
            Ok(v) => v,
            Err(e) => {
                warn!(url = %url, error = %e, "Failed to parse tweet scraping response");
                return None;
            }
        };

        let markdown = items
            .as_array()
            .and_then(|arr| arr.first())
            .and_then(|item| Self::render_markdown(item, url));

        match markdown {
            Some(md) => {
                info!(url = %url, "Successfully scraped tweet");
                Some(ScrapedContent::new(md))
            }
            None => {
                warn!(url = %url, "Tweet scraping returned no usable content");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_placeholder() {
        for url in [
            "https://x.com",
            "https://twitter.com",
            "http://x.com",
            "HTTPS://X.COM",
        ] {
            let content = base_url_placeholder(url).unwrap();
            assert!(content.markdown.starts_with("# Twitter/X.com"));
        }
    }

    #[test]
    fn test_non_base_urls_get_no_placeholder() {
        assert!(base_url_placeholder("https://x.com/some_user").is_none());
        assert!(base_url_placeholder("https://x.com/user/status/123").is_none());
        assert!(base_url_placeholder("https://example.com").is_none());
    }

    #[test]
    fn test_render_markdown() {
        let item = serde_json::json!({
            "text": "hello world",
            "author": { "userName": "someone" },
            "createdAt": "2025-01-01T00:00:00Z",
        });
        let md = TwitterBackend::render_markdown(&item, "https://x.com/someone/status/1").unwrap();
        assert!(md.contains("# Tweet by @someone"));
        assert!(md.contains("hello world"));
        assert!(md.contains("Posted: 2025-01-01T00:00:00Z"));
    }

    #[test]
    fn test_render_markdown_requires_text() {
        let item = serde_json::json!({ "author": { "userName": "someone" } });
        assert!(TwitterBackend::render_markdown(&item, "https://x.com/u/status/1").is_none());
        let item = serde_json::json!({ "text": "   " });
        assert!(TwitterBackend::render_markdown(&item, "https://x.com/u/status/1").is_none());
    }
}
