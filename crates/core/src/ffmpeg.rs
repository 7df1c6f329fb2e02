//! FFmpeg/FFprobe command wrappers for slideshow and composite assembly.
//!
//! Every operation shells out to the system `ffmpeg`/`ffprobe` binaries
//! via [`tokio::process`]. The pure decision helpers (duration parsing,
//! speed-factor fitting, concat-list escaping) are split out so they can
//! be unit tested without the binaries installed.

use std::path::Path;

use serde::Deserialize;

/// Animated clips are speed-fitted to their narration only when the
/// duration mismatch exceeds this threshold (seconds).
pub const FIT_TOLERANCE_SECS: f64 = 0.1;

/// Output frame rate for assembled videos.
pub const OUTPUT_FPS: u32 = 24;

/// Error type for FFmpeg/FFprobe operations.
#[derive(Debug, thiserror::Error)]
pub enum FfmpegError {
    #[error("ffprobe/ffmpeg binary not found: {0}")]
    NotFound(std::io::Error),

    #[error("ffprobe/ffmpeg execution failed (exit code {exit_code:?}): {stderr}")]
    ExecutionFailed {
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("failed to parse ffprobe output: {0}")]
    ParseError(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("media file not found: {0}")]
    MediaNotFound(String),
}

// ---------------------------------------------------------------------------
// ffprobe JSON output structures
// ---------------------------------------------------------------------------

/// Top-level ffprobe JSON output (`-print_format json -show_format -show_streams`).
#[derive(Debug, Deserialize)]
pub struct FfprobeOutput {
    #[serde(default)]
    pub streams: Vec<FfprobeStream>,
    pub format: FfprobeFormat,
}

/// A single stream from ffprobe output.
#[derive(Debug, Default, Deserialize)]
pub struct FfprobeStream {
    pub codec_type: Option<String>,
    pub duration: Option<String>,
}

/// Format-level metadata from ffprobe.
#[derive(Debug, Deserialize)]
pub struct FfprobeFormat {
    pub duration: Option<String>,
}

/// Extract a duration in seconds from probe output.
///
/// Prefers the format-level duration; falls back to the first stream
/// that carries one. Returns 0.0 when nothing parseable is present.
pub fn parse_duration(probe: &FfprobeOutput) -> f64 {
    if let Some(d) = probe.format.duration.as_deref().and_then(|d| d.parse().ok()) {
        return d;
    }
    probe
        .streams
        .iter()
        .find_map(|s| s.duration.as_deref().and_then(|d| d.parse().ok()))
        .unwrap_or(0.0)
}

/// Compute the `setpts` factor needed to stretch/compress a clip of
/// `video_secs` onto a narration track of `audio_secs`.
///
/// Returns `None` when the mismatch is within [`FIT_TOLERANCE_SECS`]
/// (no adjustment needed) or when either duration is non-positive.
pub fn fit_factor(video_secs: f64, audio_secs: f64) -> Option<f64> {
    if video_secs <= 0.0 || audio_secs <= 0.0 {
        return None;
    }
    if (video_secs - audio_secs).abs() <= FIT_TOLERANCE_SECS {
        return None;
    }
    Some(audio_secs / video_secs)
}

/// Escape one path for an ffmpeg concat-demuxer list file.
///
/// The concat format wraps paths in single quotes; embedded single
/// quotes are closed, escaped, and reopened.
pub fn concat_list_entry(path: &Path) -> String {
    let escaped = path.to_string_lossy().replace('\'', r"'\''");
    format!("file '{escaped}'")
}

// ---------------------------------------------------------------------------
// Probing
// ---------------------------------------------------------------------------

/// Run `ffprobe` on a media file and return the parsed JSON output.
pub async fn probe_media(path: &Path) -> Result<FfprobeOutput, FfmpegError> {
    if !path.exists() {
        return Err(FfmpegError::MediaNotFound(
            path.to_string_lossy().to_string(),
        ));
    }

    let output = tokio::process::Command::new("ffprobe")
        .args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
        ])
        .arg(path)
        .output()
        .await
        .map_err(FfmpegError::NotFound)?;

    if !output.status.success() {
        return Err(FfmpegError::ExecutionFailed {
            exit_code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str::<FfprobeOutput>(&stdout)
        .map_err(|e| FfmpegError::ParseError(format!("{e}: {stdout}")))
}

/// Duration of a media file in seconds.
pub async fn media_duration_secs(path: &Path) -> Result<f64, FfmpegError> {
    let probe = probe_media(path).await?;
    Ok(parse_duration(&probe))
}

// ---------------------------------------------------------------------------
// Assembly commands
// ---------------------------------------------------------------------------

/// Render a still image into a video clip that lasts exactly as long as
/// its narration track, with the narration as the audio stream.
pub async fn still_clip(
    image: &Path,
    narration: &Path,
    out: &Path,
) -> Result<(), FfmpegError> {
    for p in [image, narration] {
        if !p.exists() {
            return Err(FfmpegError::MediaNotFound(p.to_string_lossy().to_string()));
        }
    }

    let mut cmd = tokio::process::Command::new("ffmpeg");
    cmd.args(["-y", "-loop", "1", "-i"])
        .arg(image)
        .arg("-i")
        .arg(narration)
        .args([
            "-c:v",
            "libx264",
            "-tune",
            "stillimage",
            "-pix_fmt",
            "yuv420p",
            "-r",
            &OUTPUT_FPS.to_string(),
            "-c:a",
            "aac",
            "-shortest",
        ])
        .arg(out);
    run_ffmpeg(cmd).await
}

/// Fit an animated clip onto its narration track.
///
/// Speed-adjusts the video (via `setpts`) so its duration matches the
/// narration when the mismatch exceeds [`FIT_TOLERANCE_SECS`], then
/// replaces the clip's audio with the narration.
pub async fn fit_clip_to_narration(
    video: &Path,
    narration: &Path,
    out: &Path,
) -> Result<(), FfmpegError> {
    for p in [video, narration] {
        if !p.exists() {
            return Err(FfmpegError::MediaNotFound(p.to_string_lossy().to_string()));
        }
    }

    let video_secs = media_duration_secs(video).await?;
    let audio_secs = media_duration_secs(narration).await?;

    let mut cmd = tokio::process::Command::new("ffmpeg");
    cmd.arg("-y").arg("-i").arg(video).arg("-i").arg(narration);

    if let Some(factor) = fit_factor(video_secs, audio_secs) {
        cmd.args([
            "-filter_complex",
            &format!("[0:v]setpts={factor:.6}*PTS[v]"),
            "-map",
            "[v]",
        ]);
    } else {
        cmd.args(["-map", "0:v"]);
    }

    cmd.args([
        "-map", "1:a", "-c:v", "libx264", "-pix_fmt", "yuv420p", "-r",
    ])
    .arg(OUTPUT_FPS.to_string())
    .args(["-c:a", "aac", "-shortest"])
    .arg(out);
    run_ffmpeg(cmd).await
}

/// Concatenate clips in the given order into one video.
///
/// Uses the concat demuxer with a generated list file next to the
/// output; clips are re-encoded so still and animated segments can mix.
pub async fn concat_clips(clips: &[impl AsRef<Path>], out: &Path) -> Result<(), FfmpegError> {
    if clips.is_empty() {
        return Err(FfmpegError::ParseError(
            "cannot concatenate zero clips".to_string(),
        ));
    }
    for clip in clips {
        if !clip.as_ref().exists() {
            return Err(FfmpegError::MediaNotFound(
                clip.as_ref().to_string_lossy().to_string(),
            ));
        }
    }

    let list_path = out.with_extension("concat.txt");
    let list: String = clips
        .iter()
        .map(|c| concat_list_entry(c.as_ref()))
        .collect::<Vec<_>>()
        .join("\n");
    tokio::fs::write(&list_path, list).await?;

    let mut cmd = tokio::process::Command::new("ffmpeg");
    cmd.args(["-y", "-f", "concat", "-safe", "0", "-i"])
        .arg(&list_path)
        .args(["-c:v", "libx264", "-pix_fmt", "yuv420p", "-c:a", "aac"])
        .arg(out);
    let result = run_ffmpeg(cmd).await;

    // Best-effort cleanup; the list file is an implementation detail.
    let _ = tokio::fs::remove_file(&list_path).await;
    result
}

/// Mix a music track under a video's existing audio at the given volume.
///
/// The music is looped to cover the full video and the mix ends with the
/// video (`duration=first`), which also trims over-long tracks.
pub async fn mix_music(
    video: &Path,
    music: &Path,
    volume: f64,
    out: &Path,
) -> Result<(), FfmpegError> {
    for p in [video, music] {
        if !p.exists() {
            return Err(FfmpegError::MediaNotFound(p.to_string_lossy().to_string()));
        }
    }

    let filter = format!(
        "[1:a]volume={volume:.3}[bg];[0:a][bg]amix=inputs=2:duration=first:dropout_transition=2[a]"
    );

    let mut cmd = tokio::process::Command::new("ffmpeg");
    cmd.arg("-y")
        .arg("-i")
        .arg(video)
        .args(["-stream_loop", "-1", "-i"])
        .arg(music)
        .args(["-filter_complex", &filter, "-map", "0:v", "-map", "[a]"])
        .args(["-c:v", "copy", "-c:a", "aac", "-shortest"])
        .arg(out);
    run_ffmpeg(cmd).await
}

/// Run a prepared ffmpeg command and map failures to [`FfmpegError`].
async fn run_ffmpeg(mut cmd: tokio::process::Command) -> Result<(), FfmpegError> {
    let output = cmd.output().await.map_err(FfmpegError::NotFound)?;
    if !output.status.success() {
        return Err(FfmpegError::ExecutionFailed {
            exit_code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
