//! Media assembly seam.
//!
//! The stage runners talk to a [`Compositor`] trait instead of calling
//! ffmpeg directly, so the full pipeline runs in tests without the
//! binaries installed. [`FfmpegCompositor`] is the production
//! implementation and delegates to the command wrappers in
//! `storyreel_core::ffmpeg`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use storyreel_core::ffmpeg::{self, FfmpegError};

/// Media assembly operations needed by the stage runners.
#[async_trait]
pub trait Compositor: Send + Sync {
    /// Render a still image + narration into a clip lasting exactly as
    /// long as the narration.
    async fn still_clip(
        &self,
        image: &Path,
        narration: &Path,
        out: &Path,
    ) -> Result<(), FfmpegError>;

    /// Speed-fit an animated clip onto its narration track.
    async fn fit_clip(
        &self,
        video: &Path,
        narration: &Path,
        out: &Path,
    ) -> Result<(), FfmpegError>;

    /// Concatenate clips, in order, into one video.
    async fn concat(&self, clips: &[PathBuf], out: &Path) -> Result<(), FfmpegError>;

    /// Mix a music track under a video's audio at the given volume.
    async fn mix_music(
        &self,
        video: &Path,
        music: &Path,
        volume: f64,
        out: &Path,
    ) -> Result<(), FfmpegError>;
}

/// Production [`Compositor`] shelling out to ffmpeg/ffprobe.
#[derive(Clone, Default)]
pub struct FfmpegCompositor;

#[async_trait]
impl Compositor for FfmpegCompositor {
    async fn still_clip(
        &self,
        image: &Path,
        narration: &Path,
        out: &Path,
    ) -> Result<(), FfmpegError> {
        ffmpeg::still_clip(image, narration, out).await
    }

    async fn fit_clip(
        &self,
        video: &Path,
        narration: &Path,
        out: &Path,
    ) -> Result<(), FfmpegError> {
        ffmpeg::fit_clip_to_narration(video, narration, out).await
    }

    async fn concat(&self, clips: &[PathBuf], out: &Path) -> Result<(), FfmpegError> {
        ffmpeg::concat_clips(clips, out).await
    }

    async fn mix_music(
        &self,
        video: &Path,
        music: &Path,
        volume: f64,
        out: &Path,
    ) -> Result<(), FfmpegError> {
        ffmpeg::mix_music(video, music, volume, out).await
    }
}
