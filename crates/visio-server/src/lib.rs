//! Visio server library logic.

pub mod api;
pub mod api_demo;
pub mod api_status;
pub mod api_transcripts;
pub mod api_voice;
pub mod background;
pub mod config;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Extension, Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use visio_db::DbPool;
use visio_transcripts::TranscriptStore;
use visio_voice::{AudioFulfillment, FulfillmentSettings, FulfillmentWorker, SpeechSynthesizer};

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Status-check database pool.
    pub pool: DbPool,
    /// Process-lifetime transcript sequence.
    pub transcripts: TranscriptStore,
    /// Eager and lazy audio fulfillment over `transcripts`.
    pub fulfillment: Arc<AudioFulfillment>,
}

impl AppState {
    /// Wires a fresh transcript store to the given synthesizer.
    ///
    /// The returned worker must be spawned (see
    /// [`background::spawn_fulfillment_worker`]) for eager fulfillment to run.
    pub fn new(
        pool: DbPool,
        synthesizer: Arc<dyn SpeechSynthesizer>,
        settings: FulfillmentSettings,
    ) -> (Self, FulfillmentWorker) {
        let transcripts = TranscriptStore::new();
        let (fulfillment, worker) =
            AudioFulfillment::new(transcripts.clone(), synthesizer, settings);
        let state = Self {
            pool,
            transcripts,
            fulfillment: Arc::new(fulfillment),
        };
        (state, worker)
    }
}

/// Maximum request body size (1 MiB).
const MAX_REQUEST_BODY_BYTES: usize = 1024 * 1024;

/// Builds the application router with all routes.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/api", get(api::root_handler))
        .route("/api/", get(api::root_handler))
        .route(
            "/api/status",
            post(api_status::create_status_check_handler)
                .get(api_status::list_status_checks_handler),
        )
        .route(
            "/api/transcripts",
            get(api_transcripts::list_transcripts_handler)
                .post(api_transcripts::create_transcript_handler),
        )
        .route(
            "/api/voice/generate",
            post(api_voice::generate_voice_handler),
        )
        .route(
            "/api/voice/transcript/{transcriptId}",
            get(api_voice::transcript_audio_handler),
        )
        .route(
            "/api/demo/conversation",
            post(api_demo::demo_conversation_handler),
        )
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(Extension(Arc::new(state)))
}
