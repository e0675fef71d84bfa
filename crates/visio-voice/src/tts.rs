use crate::config::ProviderConfig;
use crate::error::VoiceError;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::Serialize;

/// Maximum text input size for TTS (64 KiB). Prevents resource exhaustion from
/// oversized synthesis requests.
const MAX_TTS_INPUT_BYTES: usize = 64 * 1024;

/// MIME type of every payload returned by the provider.
pub const AUDIO_MPEG: &str = "audio/mpeg";

/// Converts text to encoded speech.
///
/// `voice` is a voice label (`female`, `male`, ...), not a provider ID.
/// Implementations fall back to their default voice when the label is
/// missing or unknown.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str, voice: Option<&str>) -> Result<Vec<u8>, VoiceError>;
}

#[derive(Debug, Serialize)]
struct VoiceSettings {
    stability: f32,
    similarity_boost: f32,
    style: f32,
    use_speaker_boost: bool,
}

const VOICE_SETTINGS: VoiceSettings = VoiceSettings {
    stability: 0.5,
    similarity_boost: 0.75,
    style: 0.5,
    use_speaker_boost: true,
};

#[derive(Debug, Serialize)]
struct SpeechBody<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: &'a VoiceSettings,
}

/// HTTP client for the ElevenLabs text-to-speech API.
#[derive(Debug, Clone)]
pub struct ElevenLabsClient {
    config: ProviderConfig,
    http: reqwest::Client,
}

impl ElevenLabsClient {
    /// Builds a client from validated provider settings.
    ///
    /// # Errors
    ///
    /// Returns `VoiceError::Config` if the settings are inconsistent or the
    /// HTTP client cannot be built.
    pub fn new(config: ProviderConfig) -> Result<Self, VoiceError> {
        config.validate()?;
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| VoiceError::Config(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { config, http })
    }

    fn endpoint(&self, voice_id: &str) -> String {
        format!(
            "{}/text-to-speech/{}",
            self.config.base_url.trim_end_matches('/'),
            voice_id
        )
    }
}

#[async_trait]
impl SpeechSynthesizer for ElevenLabsClient {
    async fn synthesize(&self, text: &str, voice: Option<&str>) -> Result<Vec<u8>, VoiceError> {
        if text.len() > MAX_TTS_INPUT_BYTES {
            return Err(VoiceError::InvalidInput(format!(
                "text exceeds maximum size: {} bytes (limit: {} bytes)",
                text.len(),
                MAX_TTS_INPUT_BYTES
            )));
        }

        let voice_id = self.config.resolve_voice(voice);
        let body = SpeechBody {
            text,
            model_id: &self.config.model_id,
            voice_settings: &VOICE_SETTINGS,
        };

        let timeout = self.config.timeout();
        let response = self
            .http
            .post(self.endpoint(voice_id))
            .header(ACCEPT, AUDIO_MPEG)
            .header(CONTENT_TYPE, "application/json")
            .header("xi-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    VoiceError::Timeout(timeout)
                } else {
                    VoiceError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            let detail = response.text().await.unwrap_or_default();
            let message = if detail.trim().is_empty() {
                "ElevenLabs API error".to_string()
            } else {
                detail
            };
            tracing::warn!(status = status.as_u16(), voice_id, "text-to-speech provider rejected request");
            return Err(VoiceError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        let audio = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                VoiceError::Timeout(timeout)
            } else {
                VoiceError::Transport(e.to_string())
            }
        })?;

        tracing::debug!(voice_id, bytes = audio.len(), "synthesized speech");
        Ok(audio.to_vec())
    }
}
