//! YouTube scraper backend.
//!
//! Fetches video metadata through the public oEmbed endpoint and renders it
//! as markdown. Failures never propagate; the router treats `None` as "no
//! content".

use crate::{EnrichError, ScrapeBackend, ScrapedContent};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};

const OEMBED_ENDPOINT: &str = "https://www.youtube.com/oembed";

#[derive(Debug, Clone, Deserialize)]
struct YoutubeOEmbed {
    title: String,
    #[serde(default)]
    author_name: String,
    #[serde(default)]
    author_url: String,
    #[serde(default)]
    provider_name: String,
}

pub struct YoutubeBackend {
    client: reqwest::Client,
}

impl YoutubeBackend {
    pub fn new() -> Result<Self, EnrichError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .user_agent("url-enrich/0.1.0")
            .build()
            .map_err(|e| EnrichError::FetchError(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    fn render_markdown(oembed: &YoutubeOEmbed, url: &str) -> String {
        let mut markdown = format!("# {}\n", oembed.title);
        if !oembed.author_name.is_empty() {
            if oembed.author_url.is_empty() {
                markdown.push_str(&format!("\nBy {}\n", oembed.author_name));
            } else {
                markdown.push_str(&format!(
                    "\nBy [{}]({})\n",
                    oembed.author_name, oembed.author_url
                ));
            }
        }
        if !oembed.provider_name.is_empty() {
            markdown.push_str(&format!("\nProvider: {}\n", oembed.provider_name));
        }
        markdown.push_str(&format!("\nVideo: {url}\n"));
        markdown
    }
}

#[async_trait]
impl ScrapeBackend for YoutubeBackend {
    fn name(&self) -> &str {
        "youtube"
    }

    async fn fetch(&self, url: &str) -> Option<ScrapedContent> {
        debug!(url = %url, "Fetching YouTube oEmbed data");

        let response = self
            .client
            .get(OEMBED_ENDPOINT)
            .query(&[("url", url), ("format", "json")])
            .send()
            .await;

        let response = match response {
            Ok(r) if r.status().is_success() => r,
            Ok(r) => {
                warn!(url = %url, status = %r.status(), "YouTube oEmbed returned error status");
                return None;
            }
            Err(e) => {
                warn!(url = %url, error = %e, "YouTube oEmbed request failed");
                return None;
            }
        };

        match response.json::<YoutubeOEmbed>().await {
            Ok(oembed) => {
                info!(url = %url, title = %oembed.title, "Successfully fetched YouTube metadata");
                Some(ScrapedContent::new(Self::render_markdown(&oembed, url)))
            }
            Err(e) => {
                warn!(url = %url, error = %e, "Failed to parse YouTube oEmbed response");
                None
            }
        }
    }
}
