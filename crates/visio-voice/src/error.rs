use std::time::Duration;

use thiserror::Error;
use visio_transcripts::TranscriptError;

#[derive(Error, Debug)]
pub enum VoiceError {
    #[error("transcript not found: {0}")]
    NotFound(u64),

    /// The provider answered with a non-200 status.
    #[error("text-to-speech provider error ({status}): {message}")]
    Provider { status: u16, message: String },

    #[error("text-to-speech provider timed out after {} seconds", .0.as_secs())]
    Timeout(Duration),

    #[error("text-to-speech provider unreachable: {0}")]
    Transport(String),

    #[error("invalid synthesis input: {0}")]
    InvalidInput(String),

    /// Legacy answer for a lazy fetch on a transcript whose audio was already generated.
    #[error("audio not available for transcript {0}")]
    AudioUnavailable(u64),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl From<TranscriptError> for VoiceError {
    fn from(err: TranscriptError) -> Self {
        match err {
            TranscriptError::NotFound(id) => Self::NotFound(id),
        }
    }
}
