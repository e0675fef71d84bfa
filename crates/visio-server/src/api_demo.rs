//! Demo conversation endpoint.

use crate::AppState;
use axum::extract::{Extension, Json, Query};
use serde::Deserialize;
use std::sync::Arc;
use visio_types::ConversationReply;

#[derive(Debug, Default, Deserialize)]
pub struct ConversationParams {
    #[serde(default)]
    pub message: Option<String>,
}

/// Canned assistant answer echoing the user's message.
pub fn assistant_reply(message: &str) -> String {
    format!(
        "I heard you say: {}. How can I help you with navigation today?",
        message
    )
}

/// Handler for `POST /api/demo/conversation?message=`.
///
/// Appends the user's message and a canned assistant reply. The reply
/// advertises its audio route but keeps `has_audio` false until eager
/// fulfillment actually succeeds.
pub async fn demo_conversation_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(params): Query<ConversationParams>,
) -> Json<ConversationReply> {
    let message = params.message.unwrap_or_else(|| "Hello".to_string());

    state.transcripts.append(message.as_str(), true);

    let response = assistant_reply(&message);
    let assistant = state.transcripts.append_linked(response.as_str(), false);
    state.fulfillment.on_transcript_created(&assistant);

    Json(ConversationReply {
        message: "Conversation added".to_string(),
        assistant_response: response,
    })
}
