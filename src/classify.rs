//! Pure URL classification.
//!
//! Every function here is a pure function of the URL string; no network
//! access is performed. Anything that does not match a specific category
//! falls through to [`UrlKind::Generic`].

use once_cell::sync::Lazy;
use percent_encoding::percent_decode_str;
use regex::Regex;
use url::Url;

/// Classification tag for a scrape target, derived from the URL alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlKind {
    /// Internal Discord message permalink, never scraped.
    DiscordLink,
    /// GIF/image asset, never scraped.
    GifOrImage,
    /// Discord CDN emoji asset, never scraped.
    DiscordEmoji,
    Twitter,
    Youtube,
    Generic,
}

static GIF_URL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)https?://\S+\.gif(\?\S*)?").unwrap());
static GIFV_URL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)https?://\S+\.gifv(\?\S*)?").unwrap());

/// Provider brands detected regardless of TLD/subdomain (tenor.com, tenor.co, ...).
const GIF_PROVIDER_BRANDS: [&str; 4] = ["tenor", "giphy", "gfycat", "redgifs"];

const DISCORD_CDN_HOSTS: [&str; 2] = ["cdn.discordapp.com", "media.discordapp.net"];

const EMOJI_EXTENSIONS: [&str; 5] = [".webp", ".png", ".jpg", ".jpeg", ".gif"];

/// Returns true if the URL is a Discord message permalink.
///
/// Used to avoid treating internal Discord links as external web pages for
/// auto link summaries or scraping. Expects exactly
/// `/channels/{guild_id|@me}/{channel_id}/{message_id}` with numeric IDs and
/// no trailing slash.
pub fn is_discord_message_link(url: &str) -> bool {
    let url = url.trim();
    if url.is_empty() || url.ends_with('/') {
        return false;
    }

    let parsed = match Url::parse(url) {
        Ok(u) => u,
        Err(_) => return false,
    };

    let host = parsed.host_str().unwrap_or("").to_lowercase();
    if host != "discord.com" && host != "discordapp.com" {
        return false;
    }

    let path_parts: Vec<&str> = parsed.path().trim_matches('/').split('/').collect();
    if path_parts.len() != 4 || path_parts[0] != "channels" {
        return false;
    }

    let (guild_id, channel_id, message_id) = (path_parts[1], path_parts[2], path_parts[3]);
    if guild_id != "@me" && !is_all_digits(guild_id) {
        return false;
    }
    is_all_digits(channel_id) && is_all_digits(message_id)
}

/// Returns true if the URL appears to point to a GIF.
///
/// Detection is based on direct `.gif`/`.gifv` extensions and well-known GIF
/// provider hostnames. The URL is percent-decoded first so encoded hostnames
/// (e.g. `t%65nor.com`) are still caught.
pub fn is_gif_url(url: &str) -> bool {
    if url.is_empty() {
        return false;
    }

    let decoded = match percent_decode_str(url).decode_utf8() {
        Ok(d) => d.to_lowercase(),
        Err(_) => {
            // Undecodable input: substring search over the raw URL.
            let raw = url.to_lowercase();
            return GIF_PROVIDER_BRANDS.iter().any(|brand| raw.contains(brand));
        }
    };

    if GIF_URL_PATTERN.is_match(&decoded) || GIFV_URL_PATTERN.is_match(&decoded) {
        return true;
    }

    match Url::parse(&decoded) {
        Ok(parsed) => {
            let hostname = parsed.host_str().unwrap_or("");
            GIF_PROVIDER_BRANDS
                .iter()
                .any(|brand| hostname.contains(brand))
        }
        Err(_) => GIF_PROVIDER_BRANDS
            .iter()
            .any(|brand| decoded.contains(brand)),
    }
}

/// Returns true only for Discord CDN emoji assets (`/emojis/...` with an
/// image extension).
pub fn is_discord_emoji_url(url: &str) -> bool {
    let parsed = match Url::parse(url.trim()) {
        Ok(u) => u,
        Err(_) => return false,
    };

    let host = parsed.host_str().unwrap_or("").to_lowercase();
    if !DISCORD_CDN_HOSTS.contains(&host.as_str()) {
        return false;
    }

    let path = parsed.path().to_lowercase();
    path.starts_with("/emojis/") && EMOJI_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

/// Returns true if the URL's host is `twitter.com` or `x.com` (with or
/// without `www.`), case-insensitive.
///
/// The check is on the parsed host, so look-alike domains (`x.co`,
/// `x-com.example.com`) and path substrings (`example.com/x.com/...`) are
/// rejected.
pub fn is_twitter_url(url: &str) -> bool {
    let parsed = match Url::parse(url.trim()) {
        Ok(u) => u,
        Err(_) => return false,
    };

    let host = parsed.host_str().unwrap_or("").to_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host);
    host == "twitter.com" || host == "x.com"
}

/// Extracts the numeric tweet ID from a `/<user>/status/<id>` URL.
///
/// Returns `None` for non-Twitter hosts, URLs without a status segment, or a
/// non-numeric ID. Trailing query strings and fragments are ignored.
pub fn extract_tweet_id(url: &str) -> Option<String> {
    if !is_twitter_url(url) {
        return None;
    }

    let parsed = Url::parse(url.trim()).ok()?;
    let segments: Vec<&str> = parsed.path_segments()?.collect();
    if segments.len() < 3 || segments[1] != "status" {
        return None;
    }

    let id: String = segments[2]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if id.is_empty() {
        None
    } else {
        Some(id)
    }
}

/// Returns true for YouTube video URLs (youtube.com, youtu.be and
/// subdomains such as m.youtube.com or music.youtube.com).
pub fn is_youtube_url(url: &str) -> bool {
    let parsed = match Url::parse(url.trim()) {
        Ok(u) => u,
        Err(_) => return false,
    };

    let host = parsed.host_str().unwrap_or("").to_lowercase();
    host == "youtu.be" || host == "youtube.com" || host.ends_with(".youtube.com")
}

/// Classifies a URL into the category that decides its scrape backend.
///
/// Pure and infallible: anything that does not match a specific category is
/// [`UrlKind::Generic`].
pub fn classify(url: &str) -> UrlKind {
    if is_discord_message_link(url) {
        UrlKind::DiscordLink
    } else if is_discord_emoji_url(url) {
        UrlKind::DiscordEmoji
    } else if is_gif_url(url) {
        UrlKind::GifOrImage
    } else if is_twitter_url(url) {
        UrlKind::Twitter
    } else if is_youtube_url(url) {
        UrlKind::Youtube
    } else {
        UrlKind::Generic
    }
}

fn is_all_digits(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}
