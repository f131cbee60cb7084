//! End-to-end routing tests with scripted backends.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use url_enrich::{
    ContentStore, CrawlerConfig, EnrichConfig, LlmProviderKind, LlmSettings, MemoryStore,
    MockChatClient, ScrapeBackend, ScrapedContent, Summarizer, UrlRouter, WebCrawlBackend,
};

const VALID_RESPONSE: &str =
    "```json\n{\"summary\": \"A summary.\", \"key_points\": [\"one\", \"two\"]}\n```";

/// Backend that serves a fixed outcome and counts invocations.
struct RecordingBackend {
    name: &'static str,
    content: Option<String>,
    calls: AtomicUsize,
}

impl RecordingBackend {
    fn succeeding(name: &'static str, markdown: &str) -> Arc<Self> {
        Arc::new(Self {
            name,
            content: Some(markdown.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    fn failing(name: &'static str) -> Arc<Self> {
        Arc::new(Self {
            name,
            content: None,
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ScrapeBackend for RecordingBackend {
    fn name(&self) -> &str {
        self.name
    }

    async fn fetch(&self, _url: &str) -> Option<ScrapedContent> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.content.clone().map(ScrapedContent::new)
    }
}

fn summarizer_with(responses: &[&str]) -> Summarizer {
    let mut chat = MockChatClient::new();
    for response in responses {
        chat = chat.with_response(*response);
    }
    Summarizer::new(Arc::new(chat))
}

#[test]
fn router_builds_from_config() {
    let config = EnrichConfig {
        firecrawl_api_key: "fc-key".to_string(),
        apify_api_token: Some("apify-token".to_string()),
        llm: LlmSettings {
            provider: LlmProviderKind::OpenRouter,
            api_key: "llm-key".to_string(),
            model: "some/model".to_string(),
        },
    };
    assert!(UrlRouter::from_config(&config, Arc::new(MemoryStore::new())).is_ok());
}

#[tokio::test]
async fn generic_url_is_scraped_summarized_and_stored() {
    let twitter = RecordingBackend::succeeding("twitter", "# tweet");
    let youtube = RecordingBackend::succeeding("youtube", "# video");
    let web = RecordingBackend::succeeding("web", "# Article\n\nbody");
    let store = MemoryStore::new();

    let router = UrlRouter::new(
        Some(twitter.clone() as Arc<dyn ScrapeBackend>),
        youtube.clone(),
        web.clone(),
        summarizer_with(&[VALID_RESPONSE]),
        Arc::new(store.clone()),
    );

    let ok = router
        .process_url("msg-1", "https://example.com/article")
        .await;
    assert!(ok);
    assert_eq!(store.len(), 1);

    let stored = store
        .get_scraped_content_by_url("https://example.com/article")
        .await
        .expect("enrichment should be stored");
    assert_eq!(stored.summary, "A summary.");
    assert_eq!(stored.key_points, vec!["one", "two"]);

    // Only the web backend was touched
    assert_eq!(web.calls(), 1);
    assert_eq!(twitter.calls(), 0);
    assert_eq!(youtube.calls(), 0);
}

#[tokio::test]
async fn scrape_failure_returns_false_and_stores_nothing() {
    let web = RecordingBackend::failing("web");
    let store = MemoryStore::new();

    let router = UrlRouter::new(
        None,
        RecordingBackend::failing("youtube"),
        web.clone(),
        summarizer_with(&[VALID_RESPONSE]),
        Arc::new(store.clone()),
    );

    let ok = router
        .process_url("msg-1", "https://example.com/broken")
        .await;
    assert!(!ok);
    assert!(store.is_empty());
    assert_eq!(web.calls(), 1);
}

#[tokio::test]
async fn fetch_timeout_returns_false_with_zero_writes() {
    // Real web backend pointed at a non-routable address (TEST-NET-1) with
    // a short deadline; the fetch times out instead of returning content.
    let config = CrawlerConfig {
        base_url: "http://192.0.2.1".to_string(),
        api_key: "key".to_string(),
        fetch_timeout: Duration::from_millis(100),
    };
    let web = Arc::new(WebCrawlBackend::new(config));
    let store = MemoryStore::new();

    let router = UrlRouter::new(
        None,
        RecordingBackend::failing("youtube"),
        web,
        summarizer_with(&[VALID_RESPONSE]),
        Arc::new(store.clone()),
    );

    let ok = router
        .process_url("msg-1", "https://example.com/slow")
        .await;
    assert!(!ok);
    assert!(store.is_empty());
}

#[tokio::test]
async fn twitter_failure_falls_back_to_web() {
    let twitter = RecordingBackend::failing("twitter");
    let web = RecordingBackend::succeeding("web", "# fallback page");
    let store = MemoryStore::new();

    let router = UrlRouter::new(
        Some(twitter.clone() as Arc<dyn ScrapeBackend>),
        RecordingBackend::failing("youtube"),
        web.clone(),
        summarizer_with(&[VALID_RESPONSE]),
        Arc::new(store.clone()),
    );

    let ok = router
        .process_url("msg-1", "https://x.com/someone/status/12345")
        .await;
    assert!(ok);
    assert_eq!(twitter.calls(), 1);
    assert_eq!(web.calls(), 1);
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn twitter_url_without_backend_uses_web() {
    let web = RecordingBackend::succeeding("web", "# page");
    let store = MemoryStore::new();

    let router = UrlRouter::new(
        None,
        RecordingBackend::failing("youtube"),
        web.clone(),
        summarizer_with(&[VALID_RESPONSE]),
        Arc::new(store.clone()),
    );

    let ok = router
        .process_url("msg-1", "https://twitter.com/someone/status/12345")
        .await;
    assert!(ok);
    assert_eq!(web.calls(), 1);
}

#[tokio::test]
async fn bare_twitter_root_url_gets_synthesized_content() {
    // Every backend fails; the synthesized root-page content still flows
    // through summarization and storage.
    let web = RecordingBackend::failing("web");
    let store = MemoryStore::new();

    let router = UrlRouter::new(
        None,
        RecordingBackend::failing("youtube"),
        web.clone(),
        summarizer_with(&[VALID_RESPONSE]),
        Arc::new(store.clone()),
    );

    let ok = router.process_url("msg-1", "https://x.com").await;
    assert!(ok);
    assert_eq!(web.calls(), 0);
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn youtube_failure_falls_back_to_web() {
    let youtube = RecordingBackend::failing("youtube");
    let web = RecordingBackend::succeeding("web", "# video page");
    let store = MemoryStore::new();

    let router = UrlRouter::new(
        None,
        youtube.clone(),
        web.clone(),
        summarizer_with(&[VALID_RESPONSE]),
        Arc::new(store.clone()),
    );

    let ok = router
        .process_url("msg-1", "https://youtu.be/dQw4w9WgXcQ")
        .await;
    assert!(ok);
    assert_eq!(youtube.calls(), 1);
    assert_eq!(web.calls(), 1);
}

#[tokio::test]
async fn excluded_categories_are_never_scraped() {
    let twitter = RecordingBackend::succeeding("twitter", "# tweet");
    let youtube = RecordingBackend::succeeding("youtube", "# video");
    let web = RecordingBackend::succeeding("web", "# page");
    let store = MemoryStore::new();

    let router = UrlRouter::new(
        Some(twitter.clone() as Arc<dyn ScrapeBackend>),
        youtube.clone(),
        web.clone(),
        summarizer_with(&[VALID_RESPONSE, VALID_RESPONSE, VALID_RESPONSE]),
        Arc::new(store.clone()),
    );

    for url in [
        "https://discord.com/channels/123/456/789",
        "https://tenor.com/view/funny-cat",
        "https://cdn.discordapp.com/emojis/1234.webp",
    ] {
        assert!(!router.process_url("msg-1", url).await, "url: {url}");
    }

    assert!(store.is_empty());
    assert_eq!(twitter.calls(), 0);
    assert_eq!(youtube.calls(), 0);
    assert_eq!(web.calls(), 0);
}

#[tokio::test]
async fn enrich_on_demand_prefers_the_store() {
    let web = RecordingBackend::succeeding("web", "# page");
    let store = MemoryStore::new();
    store
        .update_message_with_scraped_data(
            "msg-1",
            "https://example.com/cached",
            "Cached summary",
            r#"["cached point"]"#,
        )
        .await;

    let router = UrlRouter::new(
        None,
        RecordingBackend::failing("youtube"),
        web.clone(),
        summarizer_with(&[]),
        Arc::new(store.clone()),
    );

    let summary = router
        .enrich_on_demand("https://example.com/cached")
        .await
        .expect("cached enrichment should be returned");
    assert_eq!(summary.summary, "Cached summary");
    assert_eq!(summary.key_points, vec!["cached point"]);
    assert_eq!(web.calls(), 0);
}

#[tokio::test]
async fn enrich_on_demand_miss_scrapes_without_persisting() {
    let web = RecordingBackend::succeeding("web", "# page");
    let store = MemoryStore::new();

    let router = UrlRouter::new(
        None,
        RecordingBackend::failing("youtube"),
        web.clone(),
        summarizer_with(&[VALID_RESPONSE]),
        Arc::new(store.clone()),
    );

    let summary = router
        .enrich_on_demand("https://example.com/fresh")
        .await
        .expect("on-demand enrichment should succeed");
    assert_eq!(summary.summary, "A summary.");
    assert_eq!(web.calls(), 1);
    // The on-demand path reads the store but never writes it
    assert!(store.is_empty());
}

#[tokio::test]
async fn summarizer_network_failure_returns_false() {
    let web = RecordingBackend::succeeding("web", "# page");
    let store = MemoryStore::new();

    let router = UrlRouter::new(
        None,
        RecordingBackend::failing("youtube"),
        web.clone(),
        Summarizer::new(Arc::new(MockChatClient::failing())),
        Arc::new(store.clone()),
    );

    let ok = router.process_url("msg-1", "https://example.com/a").await;
    assert!(!ok);
    assert!(store.is_empty());
}

#[tokio::test]
async fn unparseable_model_response_still_stores_fallback() {
    let web = RecordingBackend::succeeding("web", "# page");
    let store = MemoryStore::new();

    let router = UrlRouter::new(
        None,
        RecordingBackend::failing("youtube"),
        web.clone(),
        summarizer_with(&["no json here, sorry"]),
        Arc::new(store.clone()),
    );

    let ok = router.process_url("msg-1", "https://example.com/a").await;
    assert!(ok);

    let stored = store
        .get_scraped_content_by_url("https://example.com/a")
        .await
        .expect("fallback enrichment should be stored");
    assert_eq!(
        stored.summary,
        "Failed to generate a proper summary from the content."
    );
}
