//! Pipeline orchestration: job store, asset management, media assembly,
//! and the two background stage runners.
//!
//! [`PipelineService`] is the single entry point used by the HTTP layer:
//! it validates submissions, allocates jobs, and spawns the stage runners
//! onto a tracked task set. Everything in this crate is driven through
//! the provider traits, so tests run the full pipeline against mocks.

pub mod assemble;
pub mod assets;
pub mod service;
pub mod stage1;
pub mod stage2;
pub mod store;

pub use assemble::{Compositor, FfmpegCompositor};
pub use assets::{AssetError, AssetManager};
pub use service::{PipelineService, ProviderSet};
pub use store::JobStore;

use storyreel_core::error::CoreError;
use storyreel_core::ffmpeg::FfmpegError;
use storyreel_providers::ProviderError;

/// Errors from the pipeline stage runners.
///
/// Stage failures are recorded on the job record verbatim, so every
/// variant renders as a complete sentence naming the failing step.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Ffmpeg(#[from] FfmpegError),

    #[error(transparent)]
    Asset(#[from] AssetError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to write scene manifest: {0}")]
    Manifest(#[from] serde_json::Error),
}
