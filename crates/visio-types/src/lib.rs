//! Shared wire types for the Visio voice backend.
//!
//! Every crate in the workspace that exchanges transcripts, voice requests or
//! status checks goes through the definitions here, so the JSON shapes served
//! by `visio-server` stay in one place.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Voice label used when a request names no voice, or one that is not configured.
pub const DEFAULT_VOICE_LABEL: &str = "female";

/// Route prefix under which transcript audio is served.
pub const TRANSCRIPT_AUDIO_PREFIX: &str = "/api/voice/transcript";

/// Returns the fetch location for a transcript's audio.
pub fn transcript_audio_path(id: u64) -> String {
    format!("{}/{}", TRANSCRIPT_AUDIO_PREFIX, id)
}

/// A single recorded utterance, from the user or from the assistant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    /// Store-assigned identifier. Starts at 1 and increases by one per append.
    pub id: u64,
    /// The spoken or written content.
    pub text: String,
    /// `true` for user utterances, `false` for assistant responses.
    pub is_user: bool,
    /// Creation time.
    pub timestamp: DateTime<Utc>,
    /// Whether audio synthesis has succeeded for this transcript.
    pub has_audio: bool,
    /// Where the audio can be fetched, when advertised.
    pub audio_url: Option<String>,
}

/// Request body for `POST /api/transcripts`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptCreate {
    pub text: String,
    pub is_user: bool,
}

/// Response body for `GET /api/transcripts`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptList {
    pub transcripts: Vec<Transcript>,
}

/// Request body for `POST /api/voice/generate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceRequest {
    pub text: String,
    /// Voice label such as `female` or `male`.
    #[serde(default)]
    pub voice_type: Option<String>,
}

/// Response body for `POST /api/demo/conversation`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationReply {
    pub message: String,
    pub assistant_response: String,
}

/// A recorded client health ping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCheck {
    /// UUID v4 string.
    pub id: String,
    pub client_name: String,
    pub timestamp: DateTime<Utc>,
}

/// Request body for `POST /api/status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusCheckCreate {
    pub client_name: String,
}
