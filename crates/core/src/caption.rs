//! Caption cleanup and voice-setting heuristics for narration synthesis.

use std::sync::LazyLock;

use regex::Regex;

static HASHTAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#\w+").expect("valid regex"));
static SPECIAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[*_~`#\[\]<>]").expect("valid regex"));
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Remove characters from a caption that trip up the speech API.
///
/// Strips hashtags (`#word`), markdown-ish punctuation, and collapses
/// runs of whitespace into single spaces.
pub fn clean_caption(text: &str) -> String {
    let without_tags = HASHTAG_RE.replace_all(text, "");
    let without_special = SPECIAL_RE.replace_all(&without_tags, "");
    WHITESPACE_RE
        .replace_all(&without_special, " ")
        .trim()
        .to_string()
}

/// Speech-synthesis tuning parameters derived from the speaker hint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoiceSettings {
    pub stability: f64,
    pub similarity_boost: f64,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            stability: 0.5,
            similarity_boost: 0.5,
        }
    }
}

/// Derive voice settings from a free-text speaker description.
///
/// Formal/authoritative speakers get a steadier read; excited or
/// humorous ones a livelier one. Unknown descriptions fall back to the
/// default midpoint.
pub fn voice_settings_for_speaker(speaker: &str) -> VoiceSettings {
    let lower = speaker.to_lowercase();
    let mut settings = VoiceSettings::default();

    if ["formal", "authoritative", "narrator"]
        .iter()
        .any(|w| lower.contains(w))
    {
        settings.stability = 0.7;
        settings.similarity_boost = 0.3;
    }
    if ["excited", "cheerful", "humorous"]
        .iter()
        .any(|w| lower.contains(w))
    {
        settings.stability = 0.3;
        settings.similarity_boost = 0.7;
    }

    settings
}
