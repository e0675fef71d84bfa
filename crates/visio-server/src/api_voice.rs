//! Text-to-speech endpoints.

use crate::api::{audio_response, ApiError};
use crate::AppState;
use axum::{
    extract::{Extension, Json, Path, Query},
    response::Response,
};
use serde::Deserialize;
use std::sync::Arc;
use visio_types::VoiceRequest;

/// Query parameters for `GET /api/voice/transcript/{id}`.
#[derive(Debug, Default, Deserialize)]
pub struct TranscriptAudioParams {
    #[serde(default)]
    pub voice_type: Option<String>,
}

/// Handler for `POST /api/voice/generate`.
///
/// Direct passthrough to the provider; nothing is stored.
pub async fn generate_voice_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<VoiceRequest>,
) -> Result<Response, ApiError> {
    let audio = state
        .fulfillment
        .generate(&payload.text, payload.voice_type.as_deref())
        .await
        .inspect_err(|e| tracing::error!("voice generation error: {}", e))?;
    Ok(audio_response(audio))
}

/// Handler for `GET /api/voice/transcript/{id}`.
///
/// Lazy fulfillment: synthesizes the transcript's text on demand and marks
/// its audio available.
pub async fn transcript_audio_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(transcript_id): Path<u64>,
    Query(params): Query<TranscriptAudioParams>,
) -> Result<Response, ApiError> {
    let audio = state
        .fulfillment
        .fetch_audio(transcript_id, params.voice_type.as_deref())
        .await
        .inspect_err(|e| tracing::warn!(transcript_id, "transcript audio unavailable: {}", e))?;
    Ok(audio_response(audio))
}
