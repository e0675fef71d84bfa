use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use crate::error::VoiceError;
use visio_types::DEFAULT_VOICE_LABEL;

pub const DEFAULT_ELEVENLABS_URL: &str = "https://api.elevenlabs.io/v1";
pub const DEFAULT_MODEL_ID: &str = "eleven_monolingual_v1";

/// ElevenLabs "Bella".
pub const DEFAULT_FEMALE_VOICE_ID: &str = "EXAVITQu4vr4xnSDxMaL";
/// ElevenLabs "Josh".
pub const DEFAULT_MALE_VOICE_ID: &str = "VR6AewLTigWG4xSOukaG";

fn default_base_url() -> String {
    DEFAULT_ELEVENLABS_URL.to_string()
}

fn default_model_id() -> String {
    DEFAULT_MODEL_ID.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_voice() -> String {
    DEFAULT_VOICE_LABEL.to_string()
}

fn default_voices() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("female".to_string(), DEFAULT_FEMALE_VOICE_ID.to_string()),
        ("male".to_string(), DEFAULT_MALE_VOICE_ID.to_string()),
    ])
}

fn default_true() -> bool {
    true
}

/// Text-to-speech provider settings, loaded once at startup.
#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default, skip_serializing)]
    pub api_key: String,
    /// Provider API root; requests go to `{base_url}/text-to-speech/{voice_id}`.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model_id")]
    pub model_id: String,
    /// Per-call timeout in seconds. Default: 30.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Voice label used for eager fulfillment and unrecognized requests.
    #[serde(default = "default_voice")]
    pub default_voice: String,
    /// Voice label -> provider voice ID.
    #[serde(default = "default_voices")]
    pub voices: BTreeMap<String, String>,
    /// When `false`, a lazy fetch on a transcript that already has audio
    /// answers "audio not available" instead of synthesizing again.
    #[serde(default = "default_true")]
    pub reserve_fulfilled_audio: bool,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            model_id: default_model_id(),
            timeout_secs: default_timeout_secs(),
            default_voice: default_voice(),
            voices: default_voices(),
            reserve_fulfilled_audio: true,
        }
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("model_id", &self.model_id)
            .field("timeout_secs", &self.timeout_secs)
            .field("default_voice", &self.default_voice)
            .field("voices", &self.voices)
            .field("reserve_fulfilled_audio", &self.reserve_fulfilled_audio)
            .finish()
    }
}

impl ProviderConfig {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Checks that the default voice label is mapped and the timeout is usable.
    pub fn validate(&self) -> Result<(), VoiceError> {
        if self.timeout_secs == 0 {
            return Err(VoiceError::Config(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }
        if !self.voices.contains_key(&self.default_voice) {
            return Err(VoiceError::Config(format!(
                "default voice '{}' is not in the voice map",
                self.default_voice
            )));
        }
        Ok(())
    }

    /// Maps a voice label to its provider voice ID.
    ///
    /// Missing or unrecognized labels fall back to the default voice.
    pub fn resolve_voice(&self, label: Option<&str>) -> &str {
        label
            .and_then(|l| self.voices.get(l))
            .or_else(|| self.voices.get(&self.default_voice))
            .map(String::as_str)
            .unwrap_or(DEFAULT_FEMALE_VOICE_ID)
    }
}
