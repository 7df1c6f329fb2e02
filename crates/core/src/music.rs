//! Background-music source parsing.
//!
//! The client may supply a full YouTube URL in any of the common shapes
//! or just the bare 11-character video id.

use std::sync::LazyLock;

use regex::Regex;

static VIDEO_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]{11}$").expect("valid regex"));
static WATCH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"youtube\.com/watch\?(?:[^#]*&)?v=([a-zA-Z0-9_-]{11})").expect("valid regex")
});
static SHORT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"youtu\.be/([a-zA-Z0-9_-]{11})").expect("valid regex"));
static EMBED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"youtube\.com/embed/([a-zA-Z0-9_-]{11})").expect("valid regex"));

/// Extract a YouTube video id from a URL or bare id.
///
/// Recognizes `youtube.com/watch?v=`, `youtu.be/`, `youtube.com/embed/`
/// URLs, and plain 11-character ids. Returns `None` when nothing
/// id-shaped can be found.
pub fn extract_youtube_id(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if VIDEO_ID_RE.is_match(trimmed) {
        return Some(trimmed.to_string());
    }
    for re in [&*WATCH_RE, &*SHORT_RE, &*EMBED_RE] {
        if let Some(caps) = re.captures(trimmed) {
            return Some(caps[1].to_string());
        }
    }
    None
}

/// Normalize any accepted music source into a canonical watch URL.
pub fn canonical_watch_url(input: &str) -> Option<String> {
    extract_youtube_id(input).map(|id| format!("https://www.youtube.com/watch?v={id}"))
}
