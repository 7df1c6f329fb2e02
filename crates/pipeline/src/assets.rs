//! Seed-image uploads and per-job output directories.
//!
//! Uploads are written under a flat uploads directory with a generated
//! UUID name; the returned upload id is exactly that filename, so
//! resolution is a lookup, never a client-controlled path.

use std::path::{Path, PathBuf};

use image::ImageFormat;
use uuid::Uuid;

use storyreel_core::naming;
use storyreel_core::types::JobId;

/// Errors from upload and output-directory management.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("uploaded file is not a supported image: {0}")]
    UnsupportedImage(String),

    #[error("upload not found: {0}")]
    UploadNotFound(String),

    #[error("invalid upload id: {0}")]
    InvalidUploadId(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Filesystem layout manager for uploads and job outputs.
#[derive(Clone)]
pub struct AssetManager {
    uploads_dir: PathBuf,
    outputs_dir: PathBuf,
}

impl AssetManager {
    pub fn new(uploads_dir: PathBuf, outputs_dir: PathBuf) -> Self {
        Self {
            uploads_dir,
            outputs_dir,
        }
    }

    /// Root directory that assembled videos are served from.
    pub fn outputs_dir(&self) -> &Path {
        &self.outputs_dir
    }

    /// Persist an uploaded seed image and return its upload id.
    ///
    /// The image format is sniffed from the file header; anything that
    /// is not a decodable image format is rejected before touching disk.
    pub async fn save_upload(&self, bytes: &[u8]) -> Result<String, AssetError> {
        let format = image::guess_format(bytes)
            .map_err(|e| AssetError::UnsupportedImage(e.to_string()))?;
        let ext = extension_for(format);

        tokio::fs::create_dir_all(&self.uploads_dir).await?;
        let upload_id = format!("{}.{ext}", Uuid::new_v4());
        let path = self.uploads_dir.join(&upload_id);
        tokio::fs::write(&path, bytes).await?;

        tracing::info!(upload_id, size = bytes.len(), "Saved seed image upload");
        Ok(upload_id)
    }

    /// Read back a previously saved upload.
    pub async fn read_upload(&self, upload_id: &str) -> Result<Vec<u8>, AssetError> {
        let path = self.upload_path(upload_id)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AssetError::UploadNotFound(upload_id.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Delete an upload. Deleting an unknown id is a no-op, so clients
    /// can retry deletes safely.
    pub async fn clear_upload(&self, upload_id: &str) -> Result<(), AssetError> {
        let path = self.upload_path(upload_id)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Create (if needed) and return the working directory for a job.
    pub async fn ensure_output_dir(&self, id: JobId) -> Result<PathBuf, AssetError> {
        let dir = self.outputs_dir.join(naming::job_dir_name(id));
        tokio::fs::create_dir_all(&dir).await?;
        Ok(dir)
    }

    /// Validate an upload id and map it to its on-disk path.
    ///
    /// Ids are single filenames we generated ourselves; anything with a
    /// path separator or parent reference is rejected outright.
    fn upload_path(&self, upload_id: &str) -> Result<PathBuf, AssetError> {
        if upload_id.is_empty()
            || upload_id.contains('/')
            || upload_id.contains('\\')
            || upload_id.contains("..")
        {
            return Err(AssetError::InvalidUploadId(upload_id.to_string()));
        }
        Ok(self.uploads_dir.join(upload_id))
    }
}

fn extension_for(format: ImageFormat) -> &'static str {
    match format {
        ImageFormat::Jpeg => "jpg",
        ImageFormat::WebP => "webp",
        ImageFormat::Gif => "gif",
        _ => "png",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
