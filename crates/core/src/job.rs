//! Job and frame data model.
//!
//! A [`Job`] is one end-to-end request to produce a story video from a
//! prompt. Stage 1 (script -> images -> narration -> slideshow) is tracked
//! by [`JobStatus`]; the deferred stage 2 (per-frame animation + final
//! composite) is tracked independently by [`ProcessingStatus`].

use std::path::PathBuf;

use serde::Serialize;

use crate::types::{JobId, Timestamp};
use crate::video_model::VideoModel;

// ---------------------------------------------------------------------------
// Status enums
// ---------------------------------------------------------------------------

/// Stage-1 lifecycle state of a job.
///
/// Transitions exactly once out of `Running`, to either `Completed` or
/// `Error`. Never reverts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// The stage-1 pipeline is executing.
    Running,
    /// The slideshow video was assembled; `video_path` is set.
    Completed,
    /// A stage-1 step failed; `error` carries the message.
    Error,
}

impl JobStatus {
    /// Whether this status is terminal (no further transitions allowed).
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Error)
    }
}

/// Stage-2 lifecycle state, independent of [`JobStatus`].
///
/// Starts at `None`. May re-enter `Running` from `Error` (an explicit
/// re-trigger), but never from `Running` or `Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingStatus {
    /// Stage 2 has not been triggered.
    None,
    /// A stage-2 run is in flight.
    Running,
    /// The final composited video was written; `final_video_path` is set.
    Completed,
    /// The stage-2 run failed; `processing_error` carries the message.
    Error,
}

impl ProcessingStatus {
    /// Whether a new stage-2 run may start from this state.
    pub fn can_start(self) -> bool {
        matches!(self, ProcessingStatus::None | ProcessingStatus::Error)
    }
}

// ---------------------------------------------------------------------------
// Frame
// ---------------------------------------------------------------------------

/// One scene in a job's story sequence.
///
/// Frames are owned exclusively by their job and ordered by `index`;
/// the concatenation order of the slideshow and the final video follows
/// ascending index.
#[derive(Debug, Clone, Serialize)]
pub struct Frame {
    /// 0-based position in the story sequence.
    pub index: usize,
    /// Narration text spoken over this frame.
    pub caption: String,
    /// Scene description produced by the storyboard generator.
    pub visual_description: String,
    /// Speaker hint used to derive voice settings, e.g. `"Narrator (calm)"`.
    pub speaker: String,
    /// Generated still image.
    pub image_path: PathBuf,
    /// Synthesized narration audio; set during stage 1.
    pub narration_path: Option<PathBuf>,
    /// Animated clip; set only after stage-2 processing of this frame.
    pub animated_path: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Job
// ---------------------------------------------------------------------------

/// One generation job, as stored in the job store and exposed to the
/// polling client.
///
/// Mutated only by the pipeline runner that owns it; the store hands out
/// cloned snapshots so pollers never observe a partial update.
#[derive(Debug, Clone, Serialize)]
pub struct Job {
    /// Strictly increasing, process-local identifier.
    pub id: JobId,
    /// Stage-1 status.
    pub status: JobStatus,
    /// Human-readable failure message, present iff `status == Error`.
    pub error: Option<String>,
    /// Job-private working directory under the output root.
    pub output_dir: PathBuf,
    /// Stage-1 slideshow video, present iff `status == Completed`.
    pub video_path: Option<PathBuf>,
    /// Stage-2 status.
    pub processing_status: ProcessingStatus,
    /// Human-readable stage-2 failure, present iff `processing_status == Error`.
    pub processing_error: Option<String>,
    /// Stage-2 composited video, present iff `processing_status == Completed`.
    pub final_video_path: Option<PathBuf>,
    /// Submission time.
    pub created_at: Timestamp,
    /// Story frames in ascending index order.
    pub frames: Vec<Frame>,
    /// Resolved background-music track, retained for the stage-2 re-mix.
    pub music_path: Option<PathBuf>,
    /// Background-music volume from the submission (0.0 ..= 1.0).
    pub music_volume: f64,
    /// Animation provider from the submission; used when stage 2 is
    /// triggered without an explicit override.
    pub video_model: VideoModel,
}

impl Job {
    /// Build a freshly submitted job in the `Running` state.
    pub fn new(id: JobId, music_volume: f64, video_model: VideoModel) -> Self {
        Self {
            id,
            status: JobStatus::Running,
            error: None,
            output_dir: PathBuf::new(),
            video_path: None,
            processing_status: ProcessingStatus::None,
            processing_error: None,
            final_video_path: None,
            created_at: chrono::Utc::now(),
            frames: Vec::new(),
            music_path: None,
            music_volume,
            video_model,
        }
    }

    /// Record stage-1 success.
    pub fn complete(&mut self, video_path: PathBuf) {
        self.status = JobStatus::Completed;
        self.video_path = Some(video_path);
    }

    /// Record stage-1 failure.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.status = JobStatus::Error;
        self.error = Some(message.into());
    }

    /// Record stage-2 success.
    pub fn complete_processing(&mut self, final_video_path: PathBuf) {
        self.processing_status = ProcessingStatus::Completed;
        self.processing_error = None;
        self.final_video_path = Some(final_video_path);
    }

    /// Record stage-2 failure. Stage-1 artifacts remain untouched.
    pub fn fail_processing(&mut self, message: impl Into<String>) {
        self.processing_status = ProcessingStatus::Error;
        self.processing_error = Some(message.into());
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_job_starts_running_with_no_processing() {
        let job = Job::new(1, 0.5, VideoModel::default());
        assert_eq!(job.status, JobStatus::Running);
        assert_eq!(job.processing_status, ProcessingStatus::None);
        assert!(job.error.is_none());
        assert!(job.video_path.is_none());
        assert!(job.final_video_path.is_none());
    }

    #[test]
    fn complete_sets_terminal_status_and_video_path() {
        let mut job = Job::new(1, 0.5, VideoModel::default());
        job.complete(PathBuf::from("outputs/job_000001/slideshow.mp4"));
        assert_eq!(job.status, JobStatus::Completed);
        assert!(job.status.is_terminal());
        assert!(job.video_path.is_some());
    }

    #[test]
    fn fail_records_message() {
        let mut job = Job::new(1, 0.5, VideoModel::default());
        job.fail("speech synthesis failed");
        assert_eq!(job.status, JobStatus::Error);
        assert_eq!(job.error.as_deref(), Some("speech synthesis failed"));
    }

    #[test]
    fn processing_can_start_from_none_and_error_only() {
        assert!(ProcessingStatus::None.can_start());
        assert!(ProcessingStatus::Error.can_start());
        assert!(!ProcessingStatus::Running.can_start());
        assert!(!ProcessingStatus::Completed.can_start());
    }

    #[test]
    fn fail_processing_leaves_stage1_untouched() {
        let mut job = Job::new(1, 0.5, VideoModel::default());
        job.complete(PathBuf::from("slideshow.mp4"));
        job.fail_processing("animation timed out");
        assert_eq!(job.status, JobStatus::Completed);
        assert!(job.video_path.is_some());
        assert_eq!(job.processing_status, ProcessingStatus::Error);
        assert_eq!(job.processing_error.as_deref(), Some("animation timed out"));
    }

    #[test]
    fn status_serializes_lowercase_for_polling_clients() {
        let running = serde_json::to_value(JobStatus::Running).unwrap();
        assert_eq!(running, "running");
        let none = serde_json::to_value(ProcessingStatus::None).unwrap();
        assert_eq!(none, "none");
    }
}
