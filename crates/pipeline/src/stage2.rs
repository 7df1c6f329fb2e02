//! Stage 2: per-frame animation -> final composited video.
//!
//! Runs as a spawned background task after an explicit trigger; the
//! store's claim already moved the job to `ProcessingStatus::Running`
//! before this runner starts. Frames are animated a couple at a time,
//! and a frame whose animation fails falls back to its still clip so one
//! bad frame never sinks an otherwise healthy run.

use std::path::PathBuf;
use std::sync::Arc;

use futures::stream::{self, StreamExt};

use storyreel_core::job::Frame;
use storyreel_core::naming;
use storyreel_core::story;
use storyreel_core::types::JobId;
use storyreel_core::video_model::VideoModel;

use crate::service::ProviderSet;
use crate::store::JobStore;
use crate::PipelineError;

/// Frames animated concurrently. Animation is the expensive step; two in
/// flight keeps the provider busy without tripping its rate limits.
const ANIMATION_CONCURRENCY: usize = 2;

/// Concat input used when a music mix still follows.
const PREMIX_FINAL_FILENAME: &str = "final_premix.mp4";

/// Run stage 2 to completion, recording the outcome on the job.
pub async fn run_stage2(
    store: JobStore,
    providers: Arc<ProviderSet>,
    job_id: JobId,
    model: VideoModel,
) {
    match execute(&store, &providers, job_id, model).await {
        Ok(final_path) => {
            tracing::info!(job_id, video = %final_path.display(), "Stage 2 completed");
            let _ = store
                .update(job_id, |job| job.complete_processing(final_path))
                .await;
        }
        Err(e) => {
            tracing::error!(job_id, error = %e, "Stage 2 failed");
            let _ = store
                .update(job_id, |job| job.fail_processing(e.to_string()))
                .await;
        }
    }
}

async fn execute(
    store: &JobStore,
    providers: &ProviderSet,
    job_id: JobId,
    model: VideoModel,
) -> Result<PathBuf, PipelineError> {
    let job = store.get(job_id).await?;
    let output_dir = job.output_dir.clone();

    let videos_dir = output_dir.join(naming::VIDEOS_SUBDIR);
    let clips_dir = output_dir.join(naming::CLIPS_SUBDIR);
    tokio::fs::create_dir_all(&videos_dir).await?;
    tokio::fs::create_dir_all(&clips_dir).await?;

    // Animate frames a few at a time; `buffered` preserves frame order.
    let animations: Vec<(usize, Option<PathBuf>)> = stream::iter(job.frames.clone())
        .map(|frame| {
            let videos_dir = videos_dir.clone();
            async move { animate_frame(providers, &videos_dir, &frame, model).await }
        })
        .buffered(ANIMATION_CONCURRENCY)
        .collect()
        .await;

    for (index, animated) in &animations {
        if let Some(path) = animated {
            let index = *index;
            let path = path.clone();
            store
                .update(job_id, |job| {
                    if let Some(f) = job.frames.iter_mut().find(|f| f.index == index) {
                        f.animated_path = Some(path.clone());
                    }
                })
                .await?;
        }
    }

    // Build the final clip sequence: fitted animations where available,
    // still clips where animation fell through.
    let frames = store.get(job_id).await?.frames;
    let mut clips = Vec::with_capacity(frames.len());
    for frame in &frames {
        let narration = frame.narration_path.as_deref().ok_or_else(|| {
            storyreel_core::error::CoreError::Internal(format!(
                "frame {} has no narration track",
                frame.index
            ))
        })?;

        let clip = match &frame.animated_path {
            Some(animated) => {
                let fitted = clips_dir.join(naming::fitted_clip_filename(frame.index));
                providers
                    .compositor
                    .fit_clip(animated, narration, &fitted)
                    .await?;
                fitted
            }
            None => {
                let still = clips_dir.join(naming::still_clip_filename(frame.index));
                providers
                    .compositor
                    .still_clip(&frame.image_path, narration, &still)
                    .await?;
                still
            }
        };
        clips.push(clip);
    }

    crate::stage1::write_scene_manifest(&output_dir, &store.get(job_id).await?).await?;

    let final_path = output_dir.join(naming::FINAL_VIDEO_FILENAME);
    match &job.music_path {
        Some(music) => {
            let premix = clips_dir.join(PREMIX_FINAL_FILENAME);
            providers.compositor.concat(&clips, &premix).await?;
            providers
                .compositor
                .mix_music(&premix, music, job.music_volume, &final_path)
                .await?;
        }
        None => {
            providers.compositor.concat(&clips, &final_path).await?;
        }
    }

    Ok(final_path)
}

/// Animate one frame, writing the clip under the videos directory.
///
/// A provider failure is logged and reported as `None`; the caller
/// substitutes the frame's still clip.
async fn animate_frame(
    providers: &ProviderSet,
    videos_dir: &std::path::Path,
    frame: &Frame,
    model: VideoModel,
) -> (usize, Option<PathBuf>) {
    let result = async {
        let image = tokio::fs::read(&frame.image_path).await?;
        let prompt = story::motion_prompt(&frame.visual_description, &frame.caption);
        let video = providers
            .animator
            .animate(&image, "image/png", &prompt, model)
            .await?;
        let path = videos_dir.join(naming::animated_clip_filename(frame.index));
        tokio::fs::write(&path, &video).await?;
        Ok::<PathBuf, PipelineError>(path)
    }
    .await;

    match result {
        Ok(path) => (frame.index, Some(path)),
        Err(e) => {
            tracing::warn!(
                frame = frame.index,
                error = %e,
                "Frame animation failed; substituting still clip"
            );
            (frame.index, None)
        }
    }
}
