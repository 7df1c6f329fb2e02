//! Domain model and media utilities for the storyreel pipeline.
//!
//! This crate is free of network I/O: it holds the job/frame data model,
//! submission validation, prompt construction, artifact naming, and the
//! ffmpeg/ffprobe command wrappers shared by the pipeline runners.

pub mod caption;
pub mod error;
pub mod ffmpeg;
pub mod job;
pub mod music;
pub mod naming;
pub mod story;
pub mod submission;
pub mod types;
pub mod video_model;
