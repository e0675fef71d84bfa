//! Shared fixtures for the server integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{body::Body, http::Request, Router};
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tower::ServiceExt;
use visio_db::{create_pool, run_migrations, DbRuntimeSettings};
use visio_server::{app, background, AppState};
use visio_voice::{FulfillmentSettings, SpeechSynthesizer, VoiceError};

/// Synthesizer double: returns `mp3:<text>` or a scripted provider error,
/// optionally after a delay.
pub struct FakeSynth {
    pub fail_with: Option<u16>,
    pub delay: Duration,
    pub calls: AtomicUsize,
    pub voices: Mutex<Vec<Option<String>>>,
}

impl FakeSynth {
    pub fn ok() -> Arc<Self> {
        Arc::new(Self {
            fail_with: None,
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
            voices: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(status: u16) -> Arc<Self> {
        Arc::new(Self {
            fail_with: Some(status),
            ..Self::plain()
        })
    }

    pub fn slow(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            delay,
            ..Self::plain()
        })
    }

    fn plain() -> Self {
        Self {
            fail_with: None,
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
            voices: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SpeechSynthesizer for FakeSynth {
    async fn synthesize(&self, text: &str, voice: Option<&str>) -> Result<Vec<u8>, VoiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.voices.lock().unwrap().push(voice.map(str::to_string));
        tokio::time::sleep(self.delay).await;
        match self.fail_with {
            Some(status) => Err(VoiceError::Provider {
                status,
                message: "ElevenLabs API error".to_string(),
            }),
            None => Ok(format!("mp3:{}", text).into_bytes()),
        }
    }
}

pub fn setup_state(synth: Arc<FakeSynth>, settings: FulfillmentSettings) -> AppState {
    // One connection so every request sees the same in-memory database.
    let settings_db = DbRuntimeSettings {
        pool_max_size: 1,
        ..DbRuntimeSettings::default()
    };
    let pool = create_pool(visio_db::IN_MEMORY, settings_db).unwrap();
    {
        let conn = pool.get().unwrap();
        run_migrations(&conn).unwrap();
    }

    let (state, worker) = AppState::new(pool, synth, settings);
    background::spawn_fulfillment_worker(worker);
    state
}

pub fn setup_app(synth: Arc<FakeSynth>) -> (Router, AppState) {
    let state = setup_state(synth, FulfillmentSettings::default());
    (app(state.clone()), state)
}

pub async fn send(app: &Router, request: Request<Body>) -> (axum::http::StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, headers, body.to_vec())
}

pub async fn get_json(app: &Router, uri: &str) -> (axum::http::StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let (status, _, body) = send(app, request).await;
    (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> (axum::http::StatusCode, Value) {
    let request = Request::builder()
        .uri(uri)
        .method("POST")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let (status, _, body) = send(app, request).await;
    (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
}

/// Polls until the transcript reports audio or two seconds pass.
pub async fn wait_for_audio(state: &AppState, id: u64) -> bool {
    let deadline = Instant::now() + Duration::from_secs(2);
    while Instant::now() < deadline {
        if state.transcripts.get(id).map(|t| t.has_audio).unwrap_or(false) {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}
