//! Background-music download via yt-dlp.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;

use storyreel_core::music;

use crate::error::ProviderError;

const TOOL: &str = "yt-dlp";

/// Background-music download collaborator.
#[async_trait]
pub trait MusicResolver: Send + Sync {
    /// Download the audio track for `url` as mp3, writing it to
    /// `out_path`. Returns the path actually written.
    async fn fetch(&self, url: &str, out_path: &Path) -> Result<PathBuf, ProviderError>;
}

/// Production [`MusicResolver`] shelling out to the yt-dlp binary.
pub struct YtDlpResolver {
    binary: String,
}

impl YtDlpResolver {
    pub fn new() -> Self {
        Self::with_binary("yt-dlp".to_string())
    }

    /// Use a specific binary path (tests, containers).
    pub fn with_binary(binary: String) -> Self {
        Self { binary }
    }
}

impl Default for YtDlpResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MusicResolver for YtDlpResolver {
    async fn fetch(&self, url: &str, out_path: &Path) -> Result<PathBuf, ProviderError> {
        // Normalize share/embed links so yt-dlp always sees a watch URL.
        let watch_url =
            music::canonical_watch_url(url).ok_or_else(|| ProviderError::Tool {
                tool: TOOL,
                detail: format!("not a recognizable YouTube URL: {url}"),
            })?;

        if let Some(parent) = out_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tracing::info!(url = %watch_url, "Downloading background music");
        let output = Command::new(&self.binary)
            .arg("-x")
            .arg("--audio-format")
            .arg("mp3")
            .arg("--audio-quality")
            .arg("0")
            .arg("-o")
            .arg(out_path)
            .arg(&watch_url)
            .output()
            .await
            .map_err(|e| ProviderError::Tool {
                tool: TOOL,
                detail: format!("failed to spawn: {e}"),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ProviderError::Tool {
                tool: TOOL,
                detail: format!(
                    "exit code {:?}: {}",
                    output.status.code(),
                    stderr.trim()
                ),
            });
        }

        // yt-dlp keeps the requested name when it already ends in .mp3.
        if !tokio::fs::try_exists(out_path).await? {
            return Err(ProviderError::Tool {
                tool: TOOL,
                detail: format!("reported success but {} was not written", out_path.display()),
            });
        }
        Ok(out_path.to_path_buf())
    }
}
