//! Stage 1: prompt -> storyboard -> narration -> slideshow video.
//!
//! Runs as a spawned background task. Every step that produces a frame
//! artifact writes the updated frame back to the store immediately, so a
//! polling client watches the job fill in scene by scene. Any failure
//! marks the job `Error` with the step's message and stops the run.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use storyreel_core::caption;
use storyreel_core::job::{Frame, Job};
use storyreel_core::naming;
use storyreel_core::submission::StorySubmission;
use storyreel_core::types::JobId;

use crate::service::ProviderSet;
use crate::store::JobStore;
use crate::PipelineError;

/// Concat input used when a music mix still follows.
const PREMIX_SLIDESHOW_FILENAME: &str = "slideshow_premix.mp4";

/// Run stage 1 to completion, recording the outcome on the job.
pub async fn run_stage1(
    store: JobStore,
    providers: Arc<ProviderSet>,
    job_id: JobId,
    submission: StorySubmission,
    seed_image: Option<Vec<u8>>,
) {
    match execute(&store, &providers, job_id, &submission, seed_image).await {
        Ok(video_path) => {
            tracing::info!(job_id, video = %video_path.display(), "Stage 1 completed");
            let _ = store.update(job_id, |job| job.complete(video_path)).await;
        }
        Err(e) => {
            tracing::error!(job_id, error = %e, "Stage 1 failed");
            let _ = store.update(job_id, |job| job.fail(e.to_string())).await;
        }
    }
}

async fn execute(
    store: &JobStore,
    providers: &ProviderSet,
    job_id: JobId,
    submission: &StorySubmission,
    seed_image: Option<Vec<u8>>,
) -> Result<PathBuf, PipelineError> {
    let job = store.get(job_id).await?;
    let output_dir = job.output_dir.clone();

    tokio::fs::write(output_dir.join(naming::PROMPT_FILENAME), &submission.prompt).await?;
    if let Some(image) = &seed_image {
        tokio::fs::write(output_dir.join(naming::SEED_IMAGE_FILENAME), image).await?;
    }

    // Storyboard: script text + one image per frame, atomically.
    let scenes = providers
        .story
        .generate(
            &submission.prompt,
            submission.frame_count,
            seed_image.as_deref(),
        )
        .await?;

    let images_dir = output_dir.join(naming::IMAGES_SUBDIR);
    let audio_dir = output_dir.join(naming::AUDIO_SUBDIR);
    tokio::fs::create_dir_all(&images_dir).await?;
    tokio::fs::create_dir_all(&audio_dir).await?;

    for (index, scene) in scenes.iter().enumerate() {
        let image_path = images_dir.join(naming::frame_image_filename(index));
        tokio::fs::write(&image_path, &scene.image).await?;

        let frame = Frame {
            index,
            caption: scene.caption.clone(),
            visual_description: scene.visual_description.clone(),
            speaker: scene.speaker.clone(),
            image_path,
            narration_path: None,
            animated_path: None,
        };
        store.update(job_id, |job| job.frames.push(frame)).await?;
    }

    // Narration, one frame at a time; the first synthesis failure fails
    // the whole job.
    let frames = store.get(job_id).await?.frames;
    for frame in &frames {
        let text = narration_text(&frame.caption, &frame.visual_description)?;
        let settings = caption::voice_settings_for_speaker(&frame.speaker);
        let audio = providers
            .speech
            .synthesize(&text, &submission.voice_id, &settings)
            .await?;

        let narration_path = audio_dir.join(naming::narration_filename(frame.index));
        tokio::fs::write(&narration_path, &audio).await?;

        let index = frame.index;
        store
            .update(job_id, |job| {
                if let Some(f) = job.frames.iter_mut().find(|f| f.index == index) {
                    f.narration_path = Some(narration_path.clone());
                }
            })
            .await?;
    }

    // Background music, if requested.
    let music_path = match &submission.music_url {
        Some(url) => {
            let target = output_dir
                .join(naming::MUSIC_SUBDIR)
                .join(naming::MUSIC_FILENAME);
            let path = providers.music.fetch(url, &target).await?;
            store
                .update(job_id, |job| job.music_path = Some(path.clone()))
                .await?;
            Some(path)
        }
        None => None,
    };

    // Per-frame still clips, each lasting exactly its narration.
    let clips_dir = output_dir.join(naming::CLIPS_SUBDIR);
    tokio::fs::create_dir_all(&clips_dir).await?;

    let frames = store.get(job_id).await?.frames;
    let mut clips = Vec::with_capacity(frames.len());
    for frame in &frames {
        let narration = frame.narration_path.as_deref().ok_or_else(|| {
            storyreel_core::error::CoreError::Internal(format!(
                "frame {} has no narration after synthesis",
                frame.index
            ))
        })?;
        let clip = clips_dir.join(naming::still_clip_filename(frame.index));
        providers
            .compositor
            .still_clip(&frame.image_path, narration, &clip)
            .await?;
        clips.push(clip);
    }

    let slideshow_path = output_dir.join(naming::SLIDESHOW_FILENAME);
    match &music_path {
        Some(music) => {
            let premix = clips_dir.join(PREMIX_SLIDESHOW_FILENAME);
            providers.compositor.concat(&clips, &premix).await?;
            providers
                .compositor
                .mix_music(&premix, music, submission.music_volume, &slideshow_path)
                .await?;
        }
        None => {
            providers.compositor.concat(&clips, &slideshow_path).await?;
        }
    }

    write_scene_manifest(&output_dir, &store.get(job_id).await?).await?;
    Ok(slideshow_path)
}

/// Narration text for a frame: the cleaned caption, falling back to the
/// cleaned visual description when the generator left the caption empty.
fn narration_text(caption_text: &str, visual_description: &str) -> Result<String, PipelineError> {
    let cleaned = caption::clean_caption(caption_text);
    if !cleaned.is_empty() {
        return Ok(cleaned);
    }
    let fallback = caption::clean_caption(visual_description);
    if !fallback.is_empty() {
        return Ok(fallback);
    }
    Err(PipelineError::Core(
        storyreel_core::error::CoreError::Internal(
            "storyboard produced a frame with no usable narration text".to_string(),
        ),
    ))
}

/// Persist the scene records next to the artifacts they describe.
/// Rewritten by the stage-2 runner once frames gain animated clips.
pub(crate) async fn write_scene_manifest(output_dir: &Path, job: &Job) -> Result<(), PipelineError> {
    let manifest = serde_json::json!({
        "job_id": job.id,
        "frames": job.frames,
    });
    tokio::fs::write(
        output_dir.join(naming::SCENES_MANIFEST_FILENAME),
        serde_json::to_vec_pretty(&manifest)?,
    )
    .await?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn narration_prefers_cleaned_caption() {
        let text = narration_text("Buy **now**! #ad", "a mushroom field").unwrap();
        assert_eq!(text, "Buy now!");
    }

    #[test]
    fn narration_falls_back_to_visual_description() {
        let text = narration_text("#only #tags", "a mushroom field").unwrap();
        assert_eq!(text, "a mushroom field");
    }

    #[test]
    fn narration_with_no_text_at_all_is_an_error() {
        assert!(narration_text("", "  ").is_err());
    }
}
