//! LLM-backed summarization of scraped content.
//!
//! The model is instructed to answer with a fenced JSON block; the parser is
//! deliberately permissive because models routinely vary the fencing. Parse
//! failures degrade to a placeholder summary, only network failures yield
//! `None`.

use crate::llm_client::ChatCompletion;
use crate::ContentSummary;
use std::sync::Arc;
use tracing::{debug, warn};

const SYSTEM_PROMPT: &str = "You are an expert assistant that summarizes web content and \
     extracts key points. You always respond in the exact JSON format requested.";

const TRUNCATION_MARKER: &str = "\n\n[Content truncated due to length...]";

const MISSING_SUMMARY: &str = "Summary could not be extracted from the content.";
const MISSING_KEY_POINTS: &str = "Key points could not be extracted from the content.";

pub struct Summarizer {
    chat: Arc<dyn ChatCompletion>,
    max_content_length: usize,
}

impl Summarizer {
    pub fn new(chat: Arc<dyn ChatCompletion>) -> Self {
        Self {
            chat,
            // Keeps the prompt comfortably inside the model context window.
            max_content_length: 15_000,
        }
    }

    pub fn with_max_content_length(mut self, max_content_length: usize) -> Self {
        self.max_content_length = max_content_length;
        self
    }

    /// Summarizes raw markdown content from `url`.
    ///
    /// Returns `None` only on network-level failure of the underlying chat
    /// call. An unparseable model response still produces a fallback
    /// [`ContentSummary`].
    pub async fn summarize(&self, content: &str, url: &str) -> Option<ContentSummary> {
        let truncated = self.truncate_content(content);
        debug!(url = %url, content_length = truncated.len(), "Summarizing scraped content");

        let prompt = format!(
            "Please analyze the following content from the URL: {url}\n\n\
             {truncated}\n\n\
             Provide:\n\
             1. A concise summary (2-3 paragraphs) of the main content.\n\
             2. 3-5 key bullet points highlighting the most important information.\n\n\
             Format your response exactly as follows:\n\
             ```json\n\
             {{\n\
               \"summary\": \"Your summary text here...\",\n\
               \"key_points\": [\n\
                 \"First key point\",\n\
                 \"Second key point\",\n\
                 \"Third key point\"\n\
               ]\n\
             }}\n\
             ```"
        );

        match self.chat.complete(SYSTEM_PROMPT, &prompt).await {
            Ok(response) => Some(parse_summary_response(&response)),
            Err(e) => {
                e.log();
                None
            }
        }
    }

    fn truncate_content(&self, content: &str) -> String {
        if content.chars().count() <= self.max_content_length {
            return content.to_string();
        }
        let mut truncated: String = content.chars().take(self.max_content_length).collect();
        truncated.push_str(TRUNCATION_MARKER);
        truncated
    }
}

/// Parses the model response into a [`ContentSummary`].
///
/// Extraction strategies, in order: tagged ```json fence, generic ``` fence,
/// bare body. Missing fields in a valid parse are filled with placeholder
/// text; an entirely unparseable response yields a fixed fallback.
pub(crate) fn parse_summary_response(response: &str) -> ContentSummary {
    let body = extract_json_block(response);

    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => {
            let summary = value["summary"]
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| {
                    warn!("LLM response missing summary field");
                    MISSING_SUMMARY.to_string()
                });
            let key_points = match value["key_points"].as_array() {
                Some(points) => points
                    .iter()
                    .filter_map(|p| p.as_str().map(str::to_string))
                    .collect(),
                None => {
                    warn!("LLM response missing key_points field");
                    vec![MISSING_KEY_POINTS.to_string()]
                }
            };
            ContentSummary {
                summary,
                key_points,
            }
        }
        Err(e) => {
            warn!(error = %e, "Failed to parse JSON from LLM response");
            ContentSummary {
                summary: "Failed to generate a proper summary from the content.".to_string(),
                key_points: vec![
                    "The content could not be properly summarized due to a processing error."
                        .to_string(),
                ],
            }
        }
    }
}

fn extract_json_block(response: &str) -> &str {
    // Tagged fence
    if let Some(after) = response.split_once("```json").map(|(_, rest)| rest) {
        if let Some((block, _)) = after.split_once("```") {
            return block.trim();
        }
    }
    // Generic fence
    if let Some(after) = response.split_once("```").map(|(_, rest)| rest) {
        if let Some((block, _)) = after.split_once("```") {
            return block.trim();
        }
    }
    // Bare body
    response.trim()
}
