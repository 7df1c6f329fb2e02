//! In-memory job store.
//!
//! Jobs live for the lifetime of the process; the polling API reads
//! cloned snapshots so a runner mid-update never leaks a partial record.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use storyreel_core::error::CoreError;
use storyreel_core::job::{Job, JobStatus, ProcessingStatus};
use storyreel_core::types::JobId;
use storyreel_core::video_model::VideoModel;

/// Shared, process-local job registry.
///
/// Ids are allocated strictly increasing from 1. All mutation goes
/// through [`JobStore::update`], which holds the write lock for the
/// duration of the closure so concurrent runners never interleave
/// within one job update.
#[derive(Clone, Default)]
pub struct JobStore {
    inner: Arc<RwLock<StoreInner>>,
}

#[derive(Default)]
struct StoreInner {
    next_id: JobId,
    jobs: BTreeMap<JobId, Job>,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an id and insert a new `Running` job.
    pub async fn create(&self, music_volume: f64, video_model: VideoModel) -> Job {
        let mut inner = self.inner.write().await;
        inner.next_id += 1;
        let job = Job::new(inner.next_id, music_volume, video_model);
        inner.jobs.insert(job.id, job.clone());
        job
    }

    /// Snapshot of one job.
    pub async fn get(&self, id: JobId) -> Result<Job, CoreError> {
        let inner = self.inner.read().await;
        inner
            .jobs
            .get(&id)
            .cloned()
            .ok_or(CoreError::NotFound { entity: "job", id })
    }

    /// Snapshots of all jobs in ascending id order.
    pub async fn list(&self) -> Vec<Job> {
        let inner = self.inner.read().await;
        inner.jobs.values().cloned().collect()
    }

    /// Apply a mutation to one job under the write lock.
    pub async fn update<F>(&self, id: JobId, mutate: F) -> Result<Job, CoreError>
    where
        F: FnOnce(&mut Job),
    {
        let mut inner = self.inner.write().await;
        let job = inner
            .jobs
            .get_mut(&id)
            .ok_or(CoreError::NotFound { entity: "job", id })?;
        mutate(job);
        Ok(job.clone())
    }

    /// Atomically claim a job for stage-2 processing.
    ///
    /// Succeeds only when stage 1 has completed and no stage-2 run is in
    /// flight or already finished; on success the job is moved to
    /// `ProcessingStatus::Running` before the lock is released, so two
    /// concurrent triggers can never both win.
    pub async fn try_begin_processing(&self, id: JobId) -> Result<Job, CoreError> {
        let mut inner = self.inner.write().await;
        let job = inner
            .jobs
            .get_mut(&id)
            .ok_or(CoreError::NotFound { entity: "job", id })?;

        if job.status != JobStatus::Completed {
            return Err(CoreError::Conflict(format!(
                "Job {id} is not ready for processing (status: {:?})",
                job.status
            )));
        }
        if !job.processing_status.can_start() {
            return Err(CoreError::Conflict(format!(
                "Job {id} processing already {:?}",
                job.processing_status
            )));
        }

        job.processing_status = ProcessingStatus::Running;
        job.processing_error = None;
        Ok(job.clone())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
