//! Narration synthesis via the ElevenLabs text-to-speech API.

use async_trait::async_trait;

use storyreel_core::caption::VoiceSettings;

use crate::error::ProviderError;

const PROVIDER: &str = "ElevenLabs";

/// Speech model used for narration.
const SPEECH_MODEL: &str = "eleven_monolingual_v1";

/// Text-to-speech collaborator.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize `text` with the given voice, returning encoded audio
    /// bytes (mp3).
    async fn synthesize(
        &self,
        text: &str,
        voice_id: &str,
        settings: &VoiceSettings,
    ) -> Result<Vec<u8>, ProviderError>;
}

/// Production [`SpeechSynthesizer`] backed by the ElevenLabs REST API.
pub struct ElevenLabsSpeech {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl ElevenLabsSpeech {
    /// Create a client against the public ElevenLabs endpoint.
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, "https://api.elevenlabs.io".to_string())
    }

    /// Create a client against a custom base URL (tests, proxies).
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url,
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for ElevenLabsSpeech {
    async fn synthesize(
        &self,
        text: &str,
        voice_id: &str,
        settings: &VoiceSettings,
    ) -> Result<Vec<u8>, ProviderError> {
        let url = format!("{}/v1/text-to-speech/{voice_id}", self.base_url);
        let body = serde_json::json!({
            "text": text,
            "model_id": SPEECH_MODEL,
            "voice_settings": {
                "stability": settings.stability,
                "similarity_boost": settings.similarity_boost,
                "style": 0.0,
                "use_speaker_boost": true,
            },
        });

        tracing::debug!(voice_id, chars = text.len(), "Synthesizing narration");
        let response = self
            .client
            .post(url)
            .header("xi-api-key", &self.api_key)
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

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(ProviderError::Malformed {
                provider: PROVIDER,
                detail: "empty audio response".to_string(),
            });
        }
        Ok(bytes.to_vec())
    }
}
