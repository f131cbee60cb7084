//! Content store contract and the in-memory implementation.
//!
//! The production store is the chat database itself; this module defines the
//! boundary the router writes through plus a DashMap-backed store used by
//! tests and single-process deployments.

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// The persisted enrichment attached to a message for a given URL.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredMessageEnrichment {
    pub scraped_url: String,
    pub summary: String,
    pub key_points: Vec<String>,
}

/// Storage boundary for message enrichments.
///
/// Implementations never raise past this boundary: lookups return `None`,
/// writes return a success flag. At most one enrichment is stored per
/// message; a later write for the same message replaces it.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Looks up an enrichment by exact URL string. Malformed key-points JSON
    /// is treated as "no key points", not an error.
    async fn get_scraped_content_by_url(&self, url: &str) -> Option<StoredMessageEnrichment>;

    /// Upserts the enrichment fields on the message's row.
    /// `key_points_json` is a JSON-serialized array of strings.
    async fn update_message_with_scraped_data(
        &self,
        message_id: &str,
        url: &str,
        summary: &str,
        key_points_json: &str,
    ) -> bool;
}

#[derive(Debug, Clone)]
struct EnrichmentRow {
    scraped_url: String,
    summary: String,
    key_points_json: String,
}

/// In-memory store keyed by message ID. No eviction; reads are stable once
/// written.
#[derive(Clone, Default)]
pub struct MemoryStore {
    rows: Arc<DashMap<String, EnrichmentRow>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of messages currently holding an enrichment.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn get_scraped_content_by_url(&self, url: &str) -> Option<StoredMessageEnrichment> {
        let row = self
            .rows
            .iter()
            .find(|entry| entry.value().scraped_url == url)
            .map(|entry| entry.value().clone())?;

        let key_points = match serde_json::from_str::<Vec<String>>(&row.key_points_json) {
            Ok(points) => points,
            Err(e) => {
                warn!(url = %url, error = %e, "Failed to parse key points JSON");
                Vec::new()
            }
        };

        Some(StoredMessageEnrichment {
            scraped_url: row.scraped_url,
            summary: row.summary,
            key_points,
        })
    }

    async fn update_message_with_scraped_data(
        &self,
        message_id: &str,
        url: &str,
        summary: &str,
        key_points_json: &str,
    ) -> bool {
        debug!(message_id = %message_id, url = %url, "Storing message enrichment");
        self.rows.insert(
            message_id.to_string(),
            EnrichmentRow {
                scraped_url: url.to_string(),
                summary: summary.to_string(),
                key_points_json: key_points_json.to_string(),
            },
        );
        true
    }
}
