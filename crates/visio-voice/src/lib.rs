//! Voice infrastructure for the Visio backend.
//!
//! Wraps the ElevenLabs text-to-speech API behind the [`SpeechSynthesizer`]
//! trait and runs the audio fulfillment workflow for stored transcripts:
//! eager background synthesis for assistant messages and lazy synthesis when
//! a client asks for a transcript's audio.

pub mod config;
pub mod error;
pub mod fulfillment;
pub mod tts;

pub use config::{
    ProviderConfig, DEFAULT_ELEVENLABS_URL, DEFAULT_FEMALE_VOICE_ID, DEFAULT_MALE_VOICE_ID,
    DEFAULT_MODEL_ID,
};
pub use error::VoiceError;
pub use fulfillment::{AudioFulfillment, FulfillmentJob, FulfillmentSettings, FulfillmentWorker};
pub use tts::{ElevenLabsClient, SpeechSynthesizer, AUDIO_MPEG};
