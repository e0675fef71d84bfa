//! Transcript endpoints.

use crate::api::ApiError;
use crate::AppState;
use axum::extract::{Extension, Json, Query};
use serde::Deserialize;
use std::sync::Arc;
use visio_types::{Transcript, TranscriptCreate, TranscriptList};

/// Query parameters for `GET /api/transcripts`.
#[derive(Debug, Default, Deserialize)]
pub struct ListTranscriptsParams {
    /// Only transcripts with a larger ID are returned. Defaults to 0.
    #[serde(default)]
    pub after: i64,
}

/// Handler for `GET /api/transcripts?after={id}`.
pub async fn list_transcripts_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(params): Query<ListTranscriptsParams>,
) -> Json<TranscriptList> {
    // IDs start at 1, so any negative cursor means "everything".
    let cursor = u64::try_from(params.after).unwrap_or(0);
    Json(TranscriptList {
        transcripts: state.transcripts.list_after(cursor),
    })
}

/// Handler for `POST /api/transcripts`.
///
/// Assistant transcripts get eager audio fulfillment queued; the response
/// never waits for it.
pub async fn create_transcript_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<TranscriptCreate>,
) -> Result<Json<Transcript>, ApiError> {
    let transcript = state.transcripts.append(payload.text, payload.is_user);
    if state.fulfillment.on_transcript_created(&transcript) {
        tracing::debug!(transcript_id = transcript.id, "queued eager audio fulfillment");
    }
    Ok(Json(transcript))
}
