//! URL extraction from free text.

use once_cell::sync::Lazy;
use regex::Regex;

/// Permissive `scheme://host[...]` pattern. Stops at whitespace and at
/// enclosing punctuation (brackets, quotes); trailing sentence punctuation
/// is deliberately kept and handled by [`sanitize_url`].
static URL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"https?://[^\s<>()\[\]{}"'`]+"#).unwrap());

/// Extracts URL substrings from arbitrary text.
///
/// Returns matches in order of first appearance; duplicates are kept. The
/// extractor performs no normalization.
pub fn extract_urls(text: &str) -> Vec<String> {
    URL_PATTERN
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Strips trailing sentence punctuation, quotes and redundant trailing
/// slashes from an extracted URL.
///
/// Applied before a URL is used as a cache/lookup key, so that
/// `https://example.com/a.` and `https://example.com/a` resolve to the same
/// stored enrichment.
pub fn sanitize_url(url: &str) -> String {
    let mut url = url.trim();
    while let Some(last) = url.chars().last() {
        if matches!(last, '.' | ',' | ';' | ':' | '!' | '?' | '"' | '\'' | '/') {
            url = &url[..url.len() - last.len_utf8()];
        } else {
            break;
        }
    }
    url.to_string()
}
