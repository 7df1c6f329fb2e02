//! Storyboard generation via the Gemini REST API.
//!
//! One `generateContent` call with image+text response modalities yields
//! interleaved text and inline image parts; a second call to a
//! text-focused model extracts the interleaved text into structured
//! scene records. The whole exchange is atomic from the pipeline's point
//! of view: fewer frames than requested is a provider error, never a
//! partial result.

use async_trait::async_trait;
use base64::Engine;
use serde::Deserialize;

use storyreel_core::story;

use crate::error::ProviderError;

/// Image-capable generation model.
const IMAGE_MODEL: &str = "gemini-2.0-flash-exp";
/// Text-focused model used for scene extraction.
const TEXT_MODEL: &str = "gemini-1.5-pro";

const PROVIDER: &str = "Gemini";

/// One generated scene: structured caption data plus the frame image.
#[derive(Debug, Clone)]
pub struct GeneratedScene {
    pub caption: String,
    pub visual_description: String,
    pub speaker: String,
    /// Raw image bytes (PNG unless the provider says otherwise).
    pub image: Vec<u8>,
}

/// Script + image generation collaborator.
#[async_trait]
pub trait StoryGenerator: Send + Sync {
    /// Generate `frame_count` scenes consistent with `description`.
    ///
    /// `seed_image`, when given, anchors the visual style of the
    /// sequence. The call is atomic: implementations must return exactly
    /// `frame_count` scenes or an error.
    async fn generate(
        &self,
        description: &str,
        frame_count: u32,
        seed_image: Option<&[u8]>,
    ) -> Result<Vec<GeneratedScene>, ProviderError>;
}

/// Production [`StoryGenerator`] backed by the Gemini REST API.
pub struct GeminiStoryboard {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GeminiStoryboard {
    /// Create a client against the public Gemini endpoint.
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, "https://generativelanguage.googleapis.com".to_string())
    }

    /// Create a client against a custom base URL (tests, proxies).
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url,
        }
    }

    /// POST a `generateContent` request and return the parsed JSON body.
    async fn generate_content(
        &self,
        model: &str,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, ProviderError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, model, self.api_key
        );

        let response = self.client.post(url).json(body).send().await?;
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
impl StoryGenerator for GeminiStoryboard {
    async fn generate(
        &self,
        description: &str,
        frame_count: u32,
        seed_image: Option<&[u8]>,
    ) -> Result<Vec<GeneratedScene>, ProviderError> {
        let prompt = match seed_image {
            Some(_) => story::storyboard_prompt_with_seed(description, frame_count),
            None => story::storyboard_prompt(description, frame_count),
        };

        let mut parts = Vec::new();
        if let Some(image) = seed_image {
            parts.push(serde_json::json!({
                "inline_data": {
                    "mime_type": "image/png",
                    "data": base64::engine::general_purpose::STANDARD.encode(image),
                }
            }));
        }
        parts.push(serde_json::json!({ "text": prompt }));

        let body = serde_json::json!({
            "contents": [{ "parts": parts }],
            "generationConfig": { "responseModalities": ["TEXT", "IMAGE"] },
        });

        tracing::info!(frame_count, "Requesting storyboard from Gemini");
        let response = self.generate_content(IMAGE_MODEL, &body).await?;
        let (texts, images) = split_response_parts(&response)?;

        if (images.len() as u32) < frame_count {
            return Err(ProviderError::Malformed {
                provider: PROVIDER,
                detail: format!(
                    "requested {frame_count} frames but received {}",
                    images.len()
                ),
            });
        }

        // Second pass: structured scene extraction from the interleaved text.
        let combined = texts.join("\n\n");
        let extraction_body = serde_json::json!({
            "contents": [{ "parts": [{ "text": story::scene_extraction_prompt(&combined) }] }],
        });
        let extraction = self.generate_content(TEXT_MODEL, &extraction_body).await?;
        let raw = first_text_part(&extraction).ok_or_else(|| ProviderError::Malformed {
            provider: PROVIDER,
            detail: "scene extraction returned no text".to_string(),
        })?;
        let scenes = parse_scene_json(&raw)?;

        let mut result = Vec::with_capacity(frame_count as usize);
        for (i, image) in images.into_iter().take(frame_count as usize).enumerate() {
            let info = scenes.get(i);
            result.push(GeneratedScene {
                caption: info.map(|s| s.caption.clone()).unwrap_or_default(),
                visual_description: info
                    .map(|s| s.visual_description.clone())
                    .unwrap_or_default(),
                speaker: info
                    .map(|s| s.speaker.clone())
                    .unwrap_or_else(|| "Narrator".to_string()),
                image,
            });
        }

        tracing::info!(scenes = result.len(), "Storyboard generated");
        Ok(result)
    }
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

/// Structured scene record extracted by the text model.
#[derive(Debug, Deserialize)]
pub struct SceneInfo {
    #[allow(dead_code)]
    pub scene_number: i64,
    #[serde(default)]
    pub visual_description: String,
    #[serde(default)]
    pub caption: String,
    #[serde(default = "default_speaker")]
    pub speaker: String,
}

fn default_speaker() -> String {
    "Narrator".to_string()
}

/// Split a `generateContent` response into its text parts and decoded
/// inline images, in response order.
pub fn split_response_parts(
    response: &serde_json::Value,
) -> Result<(Vec<String>, Vec<Vec<u8>>), ProviderError> {
    let parts = response["candidates"][0]["content"]["parts"]
        .as_array()
        .ok_or_else(|| ProviderError::Malformed {
            provider: PROVIDER,
            detail: "response has no candidates[0].content.parts".to_string(),
        })?;

    let mut texts = Vec::new();
    let mut images = Vec::new();
    for part in parts {
        if let Some(text) = part["text"].as_str() {
            texts.push(text.to_string());
        } else if let Some(data) = part["inline_data"]["data"]
            .as_str()
            .or_else(|| part["inlineData"]["data"].as_str())
        {
            let bytes = base64::engine::general_purpose::STANDARD
                .decode(data)
                .map_err(|e| ProviderError::Malformed {
                    provider: PROVIDER,
                    detail: format!("undecodable inline image: {e}"),
                })?;
            images.push(bytes);
        }
    }
    Ok((texts, images))
}

/// Pull the first text part out of a `generateContent` response.
pub fn first_text_part(response: &serde_json::Value) -> Option<String> {
    response["candidates"][0]["content"]["parts"]
        .as_array()?
        .iter()
        .find_map(|p| p["text"].as_str())
        .map(str::to_string)
}

/// Parse the extraction model's output into scene records.
///
/// Tolerates a Markdown code fence around the JSON array, which the
/// model emits despite being asked not to.
pub fn parse_scene_json(raw: &str) -> Result<Vec<SceneInfo>, ProviderError> {
    let stripped = strip_code_fences(raw);
    serde_json::from_str(stripped).map_err(|e| ProviderError::Malformed {
        provider: PROVIDER,
        detail: format!("scene JSON did not parse: {e}"),
    })
}

/// Strip a surrounding ```json ... ``` fence, if present.
pub fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let without_open = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    without_open
        .strip_suffix("```")
        .unwrap_or(without_open)
        .trim()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
