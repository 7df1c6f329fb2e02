//! Pipeline service: the single entry point used by the HTTP layer.

use std::sync::Arc;

use tokio_util::task::TaskTracker;

use storyreel_core::error::CoreError;
use storyreel_core::job::Job;
use storyreel_core::submission::StorySubmission;
use storyreel_core::types::JobId;
use storyreel_core::video_model::VideoModel;

use storyreel_providers::{FrameAnimator, MusicResolver, SpeechSynthesizer, StoryGenerator};

use crate::assemble::Compositor;
use crate::assets::{AssetError, AssetManager};
use crate::store::JobStore;
use crate::{stage1, stage2, PipelineError};

/// The external collaborators a pipeline run needs, behind trait objects
/// so tests can swap in mocks.
#[derive(Clone)]
pub struct ProviderSet {
    pub story: Arc<dyn StoryGenerator>,
    pub speech: Arc<dyn SpeechSynthesizer>,
    pub animator: Arc<dyn FrameAnimator>,
    pub music: Arc<dyn MusicResolver>,
    pub compositor: Arc<dyn Compositor>,
}

/// Orchestrates job submission, polling, and stage triggering.
///
/// Stage runners execute on a [`TaskTracker`] so shutdown can wait for
/// in-flight jobs instead of dropping them mid-render.
#[derive(Clone)]
pub struct PipelineService {
    store: JobStore,
    assets: AssetManager,
    providers: Arc<ProviderSet>,
    tasks: TaskTracker,
}

impl PipelineService {
    pub fn new(assets: AssetManager, providers: ProviderSet) -> Self {
        Self {
            store: JobStore::new(),
            assets,
            providers: Arc::new(providers),
            tasks: TaskTracker::new(),
        }
    }

    /// The asset manager, for serving-path configuration.
    pub fn assets(&self) -> &AssetManager {
        &self.assets
    }

    /// Validate a submission, create its job, and start stage 1 in the
    /// background. Returns the freshly created job snapshot.
    pub async fn submit(&self, submission: StorySubmission) -> Result<Job, PipelineError> {
        submission.validate()?;

        // Resolve the seed image before the job exists, so a dangling
        // upload id is a rejection, not a failed job.
        let seed_image = match &submission.upload_id {
            Some(upload_id) => Some(self.assets.read_upload(upload_id).await?),
            None => None,
        };

        let job = self
            .store
            .create(submission.music_volume, submission.video_model)
            .await;
        let output_dir = self.assets.ensure_output_dir(job.id).await?;
        let job = self
            .store
            .update(job.id, |j| j.output_dir = output_dir.clone())
            .await?;

        tracing::info!(job_id = job.id, frames = submission.frame_count, "Job submitted");
        self.tasks.spawn(stage1::run_stage1(
            self.store.clone(),
            self.providers.clone(),
            job.id,
            submission,
            seed_image,
        ));
        Ok(job)
    }

    /// Snapshot of one job.
    pub async fn get(&self, id: JobId) -> Result<Job, CoreError> {
        self.store.get(id).await
    }

    /// Snapshots of all jobs in ascending id order.
    pub async fn list(&self) -> Vec<Job> {
        self.store.list().await
    }

    /// Claim a completed job for stage-2 processing and start the run.
    ///
    /// Without an explicit `model` override, the run uses the animation
    /// model chosen at submission. Fails with a conflict when stage 1
    /// has not completed or a stage-2 run is already in flight or
    /// finished.
    pub async fn trigger_stage2(
        &self,
        id: JobId,
        model: Option<VideoModel>,
    ) -> Result<Job, CoreError> {
        let job = self.store.try_begin_processing(id).await?;
        let model = model.unwrap_or(job.video_model);
        tracing::info!(job_id = id, model = model.as_str(), "Stage 2 triggered");
        self.tasks.spawn(stage2::run_stage2(
            self.store.clone(),
            self.providers.clone(),
            id,
            model,
        ));
        Ok(job)
    }

    /// Persist an uploaded seed image; returns its upload id.
    pub async fn save_upload(&self, bytes: &[u8]) -> Result<String, AssetError> {
        self.assets.save_upload(bytes).await
    }

    /// Delete an uploaded seed image. Unknown ids are a no-op.
    pub async fn clear_upload(&self, upload_id: &str) -> Result<(), AssetError> {
        self.assets.clear_upload(upload_id).await
    }

    /// Stop accepting new stage runs and wait for in-flight ones.
    pub async fn shutdown(&self) {
        self.tasks.close();
        self.tasks.wait().await;
    }
}
