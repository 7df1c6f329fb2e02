//! Deterministic artifact naming.
//!
//! The polling client builds URLs straight from the paths in job
//! snapshots, so every name here is part of the external contract.

use crate::types::JobId;

/// Stage-1 slideshow video, at the root of the job directory.
pub const SLIDESHOW_FILENAME: &str = "slideshow.mp4";
/// Stage-2 composited video, at the root of the job directory.
pub const FINAL_VIDEO_FILENAME: &str = "final_video.mp4";
/// Per-job scene manifest (captions, speakers, artifact paths).
pub const SCENES_MANIFEST_FILENAME: &str = "scenes.json";
/// The full storyboard prompt, saved for reference.
pub const PROMPT_FILENAME: &str = "prompt.txt";
/// Resolved background-music track inside [`MUSIC_SUBDIR`].
pub const MUSIC_FILENAME: &str = "background.mp3";
/// Copy of the submitted seed image, kept next to the frames it anchored.
pub const SEED_IMAGE_FILENAME: &str = "seed.png";

/// Generated frame images.
pub const IMAGES_SUBDIR: &str = "images";
/// Per-frame narration audio.
pub const AUDIO_SUBDIR: &str = "audio";
/// Per-frame animated clips (stage 2).
pub const VIDEOS_SUBDIR: &str = "videos";
/// Downloaded/processed music.
pub const MUSIC_SUBDIR: &str = "music";
/// Intermediate per-frame clips used during assembly.
pub const CLIPS_SUBDIR: &str = "clips";

/// Job directory name under the output root, e.g. `job_000042`.
pub fn job_dir_name(id: JobId) -> String {
    format!("job_{id:06}")
}

/// Frame image filename, e.g. `frame_003.png`.
pub fn frame_image_filename(index: usize) -> String {
    format!("frame_{index:03}.png")
}

/// Narration audio filename, e.g. `frame_003_audio.mp3`.
pub fn narration_filename(index: usize) -> String {
    format!("frame_{index:03}_audio.mp3")
}

/// Animated clip filename, e.g. `frame_003_animated.mp4`.
pub fn animated_clip_filename(index: usize) -> String {
    format!("frame_{index:03}_animated.mp4")
}

/// Intermediate still clip (image + narration) used during assembly.
pub fn still_clip_filename(index: usize) -> String {
    format!("frame_{index:03}_still.mp4")
}

/// Intermediate animated clip fitted to its narration duration.
pub fn fitted_clip_filename(index: usize) -> String {
    format!("frame_{index:03}_fitted.mp4")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_dir_zero_padded() {
        assert_eq!(job_dir_name(42), "job_000042");
        assert_eq!(job_dir_name(1_000_000), "job_1000000");
    }

    #[test]
    fn frame_artifacts_zero_padded() {
        assert_eq!(frame_image_filename(0), "frame_000.png");
        assert_eq!(narration_filename(7), "frame_007_audio.mp3");
        assert_eq!(animated_clip_filename(12), "frame_012_animated.mp4");
        assert_eq!(still_clip_filename(3), "frame_003_still.mp4");
        assert_eq!(fitted_clip_filename(3), "frame_003_fitted.mp4");
    }
}
