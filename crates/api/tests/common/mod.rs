//! Shared test harness: a full application router wired to mock
//! providers and a mock compositor, plus small request helpers.

// Each test binary uses a different subset of these helpers.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use storyreel_api::config::ServerConfig;
use storyreel_api::router::build_app_router;
use storyreel_api::state::AppState;
use storyreel_core::caption::VoiceSettings;
use storyreel_core::ffmpeg::FfmpegError;
use storyreel_core::video_model::VideoModel;
use storyreel_pipeline::{AssetManager, Compositor, PipelineService, ProviderSet};
use storyreel_providers::{
    FrameAnimator, GeneratedScene, MusicResolver, ProviderError, SpeechSynthesizer, StoryGenerator,
};

/// Valid PNG signature, enough for header-based format sniffing.
pub const PNG_MAGIC: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D,
];

// ---------------------------------------------------------------------------
// Mock providers
// ---------------------------------------------------------------------------

struct MockStory;

#[async_trait]
impl StoryGenerator for MockStory {
    async fn generate(
        &self,
        _description: &str,
        frame_count: u32,
        _seed_image: Option<&[u8]>,
    ) -> Result<Vec<GeneratedScene>, ProviderError> {
        Ok((0..frame_count)
            .map(|i| GeneratedScene {
                caption: format!("Caption {i}"),
                visual_description: format!("Scene {i}"),
                speaker: "Narrator".to_string(),
                image: PNG_MAGIC.to_vec(),
            })
            .collect())
    }
}

struct MockSpeech;

#[async_trait]
impl SpeechSynthesizer for MockSpeech {
    async fn synthesize(
        &self,
        _text: &str,
        _voice_id: &str,
        _settings: &VoiceSettings,
    ) -> Result<Vec<u8>, ProviderError> {
        Ok(b"mp3".to_vec())
    }
}

struct MockAnimator;

#[async_trait]
impl FrameAnimator for MockAnimator {
    async fn animate(
        &self,
        _image: &[u8],
        _image_mime: &str,
        _prompt: &str,
        _model: VideoModel,
    ) -> Result<Vec<u8>, ProviderError> {
        Ok(b"mp4".to_vec())
    }
}

struct MockMusic;

#[async_trait]
impl MusicResolver for MockMusic {
    async fn fetch(&self, _url: &str, out_path: &Path) -> Result<PathBuf, ProviderError> {
        if let Some(parent) = out_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(out_path, b"music").await?;
        Ok(out_path.to_path_buf())
    }
}

struct MockCompositor;

#[async_trait]
impl Compositor for MockCompositor {
    async fn still_clip(
        &self,
        _image: &Path,
        _narration: &Path,
        out: &Path,
    ) -> Result<(), FfmpegError> {
        tokio::fs::write(out, b"clip").await?;
        Ok(())
    }

    async fn fit_clip(
        &self,
        _video: &Path,
        _narration: &Path,
        out: &Path,
    ) -> Result<(), FfmpegError> {
        tokio::fs::write(out, b"clip").await?;
        Ok(())
    }

    async fn concat(&self, _clips: &[PathBuf], out: &Path) -> Result<(), FfmpegError> {
        tokio::fs::write(out, b"video").await?;
        Ok(())
    }

    async fn mix_music(
        &self,
        _video: &Path,
        _music: &Path,
        _volume: f64,
        out: &Path,
    ) -> Result<(), FfmpegError> {
        tokio::fs::write(out, b"video").await?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

/// A full application router plus the temp directory backing its
/// uploads and outputs. Keep the struct alive for the test's duration.
pub struct TestApp {
    pub app: Router,
    _tmp: tempfile::TempDir,
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config(root: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        output_dir: root.join("outputs"),
        upload_dir: root.join("uploads"),
    }
}

/// Build the full application router with all middleware layers, wired
/// to instant mock providers.
///
/// This mirrors the router construction in `main.rs` so integration
/// tests exercise the same middleware stack (CORS, request ID, timeout,
/// tracing, panic recovery) that production uses.
pub fn build_test_app() -> TestApp {
    let tmp = tempfile::tempdir().unwrap();
    let config = test_config(tmp.path());

    let providers = ProviderSet {
        story: Arc::new(MockStory),
        speech: Arc::new(MockSpeech),
        animator: Arc::new(MockAnimator),
        music: Arc::new(MockMusic),
        compositor: Arc::new(MockCompositor),
    };
    let assets = AssetManager::new(config.upload_dir.clone(), config.output_dir.clone());
    let service = Arc::new(PipelineService::new(assets, providers));

    let state = AppState {
        service,
        config: Arc::new(config.clone()),
    };

    TestApp {
        app: build_app_router(state, &config),
        _tmp: tmp,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Send a GET request.
pub async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Send a POST request with a JSON body.
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Send a POST request with no body.
pub async fn post_empty(app: Router, uri: &str) -> Response {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Send a DELETE request.
pub async fn delete(app: Router, uri: &str) -> Response {
    app.oneshot(
        Request::builder()
            .method("DELETE")
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Send a multipart POST with one `file` field.
pub async fn post_file(app: Router, uri: &str, filename: &str, bytes: &[u8]) -> Response {
    let boundary = "storyreel-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; \
             filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                "content-type",
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Poll `GET /api/v1/stories/{id}` until `pred` holds on the job data,
/// or panic after 5 seconds.
pub async fn wait_for_job<F>(app: &Router, id: i64, pred: F) -> serde_json::Value
where
    F: Fn(&serde_json::Value) -> bool,
{
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    loop {
        let response = get(app.clone(), &format!("/api/v1/stories/{id}")).await;
        assert_eq!(response.status(), StatusCode::OK);
        let job = body_json(response).await["data"].clone();
        if pred(&job) {
            return job;
        }
        if tokio::time::Instant::now() > deadline {
            panic!("timed out waiting for job {id}: {job}");
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
