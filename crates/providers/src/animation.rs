//! Image-to-video animation via the fal.ai queue API.
//!
//! Animation is long-running (tens of seconds to minutes per frame), so
//! the client submits to the queue endpoint, polls the status URL until
//! the request completes, then downloads the produced clip.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;

use storyreel_core::video_model::VideoModel;

use crate::error::ProviderError;

const PROVIDER: &str = "fal.ai";

/// Delay between queue status polls.
const POLL_INTERVAL: Duration = Duration::from_secs(2);
/// Give up on a single animation after this long.
const POLL_TIMEOUT_SECS: u64 = 600;

/// Requested clip shape; narration fitting happens later in assembly.
const ASPECT_RATIO: &str = "16:9";
const CLIP_DURATION: &str = "5s";

/// Image-to-video animation collaborator.
#[async_trait]
pub trait FrameAnimator: Send + Sync {
    /// Animate a still image into a short clip, returning encoded video
    /// bytes (mp4). `prompt` is the motion/style directive.
    async fn animate(
        &self,
        image: &[u8],
        image_mime: &str,
        prompt: &str,
        model: VideoModel,
    ) -> Result<Vec<u8>, ProviderError>;
}

/// Production [`FrameAnimator`] backed by the fal.ai queue API.
pub struct FalAnimator {
    client: reqwest::Client,
    api_key: String,
    queue_url: String,
}

impl FalAnimator {
    /// Create a client against the public fal.ai queue endpoint.
    pub fn new(api_key: String) -> Self {
        Self::with_queue_url(api_key, "https://queue.fal.run".to_string())
    }

    /// Create a client against a custom queue URL (tests, proxies).
    pub fn with_queue_url(api_key: String, queue_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            queue_url,
        }
    }

    async fn get_json(&self, url: &str) -> Result<serde_json::Value, ProviderError> {
        let response = self
            .client
            .get(url)
            .header("Authorization", format!("Key {}", self.api_key))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                provider: PROVIDER,
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl FrameAnimator for FalAnimator {
    async fn animate(
        &self,
        image: &[u8],
        image_mime: &str,
        prompt: &str,
        model: VideoModel,
    ) -> Result<Vec<u8>, ProviderError> {
        let submit_url = format!("{}/{}", self.queue_url, model.endpoint());
        let body = serde_json::json!({
            "prompt": prompt,
            "image_url": data_uri(image_mime, image),
            "aspect_ratio": ASPECT_RATIO,
            "duration": CLIP_DURATION,
        });

        tracing::info!(model = model.as_str(), "Submitting frame for animation");
        let response = self
            .client
            .post(&submit_url)
            .header("Authorization", format!("Key {}", self.api_key))
            .json(&body)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                provider: PROVIDER,
                status: status.as_u16(),
                body,
            });
        }
        let queued: serde_json::Value = response.json().await?;
        let (status_url, response_url) = queue_urls(&queued)?;

        // Poll until the queue reports completion.
        let mut waited_secs = 0u64;
        loop {
            let state = self.get_json(&status_url).await?;
            match queue_state(&state)? {
                QueueState::Completed => break,
                QueueState::Failed(detail) => {
                    return Err(ProviderError::Malformed {
                        provider: PROVIDER,
                        detail,
                    });
                }
                QueueState::Pending => {
                    if waited_secs >= POLL_TIMEOUT_SECS {
                        return Err(ProviderError::Timeout {
                            provider: PROVIDER,
                            waited_secs,
                        });
                    }
                    tokio::time::sleep(POLL_INTERVAL).await;
                    waited_secs += POLL_INTERVAL.as_secs();
                }
            }
        }

        let result = self.get_json(&response_url).await?;
        let video_url = extract_video_url(&result)?;

        tracing::info!(model = model.as_str(), "Downloading animated clip");
        let video = self.client.get(&video_url).send().await?;
        let status = video.status();
        if !status.is_success() {
            return Err(ProviderError::Api {
                provider: PROVIDER,
                status: status.as_u16(),
                body: format!("clip download failed: {video_url}"),
            });
        }
        Ok(video.bytes().await?.to_vec())
    }
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

/// State of a queued fal.ai request.
#[derive(Debug, PartialEq, Eq)]
pub enum QueueState {
    Pending,
    Completed,
    Failed(String),
}

/// Build a base64 data URI for inline image transfer.
pub fn data_uri(mime: &str, bytes: &[u8]) -> String {
    format!(
        "data:{mime};base64,{}",
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}

/// Extract the status and response URLs from a queue submission reply.
pub fn queue_urls(queued: &serde_json::Value) -> Result<(String, String), ProviderError> {
    let status_url = queued["status_url"].as_str();
    let response_url = queued["response_url"].as_str();
    match (status_url, response_url) {
        (Some(s), Some(r)) => Ok((s.to_string(), r.to_string())),
        _ => Err(ProviderError::Malformed {
            provider: PROVIDER,
            detail: "queue reply missing status_url/response_url".to_string(),
        }),
    }
}

/// Interpret a queue status payload.
pub fn queue_state(state: &serde_json::Value) -> Result<QueueState, ProviderError> {
    match state["status"].as_str() {
        Some("COMPLETED") => Ok(QueueState::Completed),
        Some("IN_QUEUE") | Some("IN_PROGRESS") => Ok(QueueState::Pending),
        Some("ERROR") | Some("FAILED") => Ok(QueueState::Failed(
            state["error"]
                .as_str()
                .unwrap_or("animation failed")
                .to_string(),
        )),
        other => Err(ProviderError::Malformed {
            provider: PROVIDER,
            detail: format!("unknown queue status: {other:?}"),
        }),
    }
}

/// Pull the produced clip URL out of the final queue response.
pub fn extract_video_url(result: &serde_json::Value) -> Result<String, ProviderError> {
    result["video"]["url"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| ProviderError::Malformed {
            provider: PROVIDER,
            detail: "response has no video.url".to_string(),
        })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
