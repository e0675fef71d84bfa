//! Shared API plumbing: the error type every handler returns and the
//! service-info routes.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;
use visio_db::StatusError;
use visio_voice::{VoiceError, AUDIO_MPEG};

/// API error type mapping to HTTP status codes.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid input: {0}")]
    BadRequest(String),
    #[error("not found: {0}")]
    NotFound(String),
    /// Non-200 answer from the text-to-speech provider. 4xx and 5xx statuses
    /// are relayed; anything else becomes 502.
    #[error("upstream error ({status}): {message}")]
    Upstream { status: u16, message: String },
    #[error("bad gateway: {0}")]
    BadGateway(String),
    #[error("gateway timeout: {0}")]
    GatewayTimeout(String),
    #[error("internal server error: {0}")]
    InternalServerError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Upstream { status, message } => (upstream_status(status), message),
            ApiError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg),
            ApiError::GatewayTimeout(msg) => (StatusCode::GATEWAY_TIMEOUT, msg),
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

impl From<VoiceError> for ApiError {
    fn from(err: VoiceError) -> Self {
        match err {
            VoiceError::NotFound(_) => ApiError::NotFound("Transcript not found".to_string()),
            VoiceError::AudioUnavailable(_) => ApiError::NotFound("Audio not available".to_string()),
            VoiceError::Provider { status, message } => ApiError::Upstream { status, message },
            VoiceError::Timeout(_) => ApiError::GatewayTimeout(err.to_string()),
            VoiceError::Transport(_) => ApiError::BadGateway(err.to_string()),
            VoiceError::InvalidInput(msg) => ApiError::BadRequest(msg),
            VoiceError::Config(_) => ApiError::InternalServerError(err.to_string()),
        }
    }
}

impl From<StatusError> for ApiError {
    fn from(err: StatusError) -> Self {
        match err {
            StatusError::EmptyClientName => ApiError::BadRequest(err.to_string()),
            _ => ApiError::InternalServerError(err.to_string()),
        }
    }
}

fn upstream_status(status: u16) -> StatusCode {
    match StatusCode::from_u16(status) {
        Ok(code) if code.is_client_error() || code.is_server_error() => code,
        _ => StatusCode::BAD_GATEWAY,
    }
}

/// Wraps synthesized speech in an `audio/mpeg` download response.
pub fn audio_response(audio: Vec<u8>) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, AUDIO_MPEG),
            (header::CONTENT_DISPOSITION, "attachment; filename=speech.mp3"),
        ],
        audio,
    )
        .into_response()
}

/// Handler for `GET /health`.
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Handler for `GET /api/`.
pub async fn root_handler() -> Json<Value> {
    Json(json!({ "message": "Vision Assistant API" }))
}
