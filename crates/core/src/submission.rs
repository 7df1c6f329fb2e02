//! Story submission parameters and synchronous validation.
//!
//! Validation runs before a job is created; an invalid submission is
//! rejected at the API boundary and never allocates a job id.

use serde::Deserialize;

use crate::error::CoreError;
use crate::music;
use crate::video_model::VideoModel;

/// Minimum number of story frames per job.
pub const MIN_FRAME_COUNT: u32 = 1;
/// Maximum number of story frames per job.
pub const MAX_FRAME_COUNT: u32 = 10;
/// Default number of story frames.
pub const DEFAULT_FRAME_COUNT: u32 = 5;

/// Default ElevenLabs voice preset ("Adam").
pub const DEFAULT_VOICE_ID: &str = "pNInz6obpgDQGcFmaJgB";

/// Default background-music volume.
pub const DEFAULT_MUSIC_VOLUME: f64 = 0.5;

/// Parameters for one stage-1 pipeline run.
#[derive(Debug, Clone, Deserialize)]
pub struct StorySubmission {
    /// Story description, e.g. "a TV ad for a mushroom supplement company".
    pub prompt: String,
    /// Number of frames to generate (1 ..= 10).
    #[serde(default = "default_frame_count")]
    pub frame_count: u32,
    /// ElevenLabs voice id (preset or custom).
    #[serde(default = "default_voice_id")]
    pub voice_id: String,
    /// Optional seed-image upload reference; the image anchors the visual
    /// style of the generated frames.
    #[serde(default)]
    pub upload_id: Option<String>,
    /// Optional YouTube URL or video id for background music.
    #[serde(default)]
    pub music_url: Option<String>,
    /// Background-music volume (0.0 ..= 1.0).
    #[serde(default = "default_music_volume")]
    pub music_volume: f64,
    /// Animation provider used if stage 2 is later triggered with no
    /// explicit override.
    #[serde(default)]
    pub video_model: VideoModel,
}

fn default_frame_count() -> u32 {
    DEFAULT_FRAME_COUNT
}

fn default_voice_id() -> String {
    DEFAULT_VOICE_ID.to_string()
}

fn default_music_volume() -> f64 {
    DEFAULT_MUSIC_VOLUME
}

impl StorySubmission {
    /// Validate all submission fields.
    ///
    /// - prompt must be non-empty after trimming
    /// - frame count must be within [`MIN_FRAME_COUNT`] ..= [`MAX_FRAME_COUNT`]
    /// - voice id must be non-empty
    /// - music volume must be finite and within 0.0 ..= 1.0
    /// - music URL, if given, must contain an extractable YouTube video id
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.prompt.trim().is_empty() {
            return Err(CoreError::Validation(
                "Prompt must not be empty".to_string(),
            ));
        }
        if !(MIN_FRAME_COUNT..=MAX_FRAME_COUNT).contains(&self.frame_count) {
            return Err(CoreError::Validation(format!(
                "Frame count must be between {MIN_FRAME_COUNT} and {MAX_FRAME_COUNT}, got {}",
                self.frame_count
            )));
        }
        if self.voice_id.trim().is_empty() {
            return Err(CoreError::Validation(
                "Voice id must not be empty".to_string(),
            ));
        }
        if !self.music_volume.is_finite() || !(0.0..=1.0).contains(&self.music_volume) {
            return Err(CoreError::Validation(format!(
                "Music volume must be between 0.0 and 1.0, got {}",
                self.music_volume
            )));
        }
        if let Some(url) = &self.music_url {
            music::extract_youtube_id(url).ok_or_else(|| {
                CoreError::Validation(format!("Not a recognizable YouTube URL or video id: '{url}'"))
            })?;
        }
        Ok(())
    }
}
