use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use visio_voice::{
    ElevenLabsClient, ProviderConfig, SpeechSynthesizer, VoiceError, DEFAULT_FEMALE_VOICE_ID,
    DEFAULT_MALE_VOICE_ID,
};

#[derive(Debug, Clone)]
struct Captured {
    voice_id: String,
    api_key: Option<String>,
    accept: Option<String>,
    body: Value,
}

#[derive(Clone)]
struct FakeProvider {
    status: StatusCode,
    reply: &'static str,
    delay: Duration,
    seen: Arc<Mutex<Vec<Captured>>>,
}

async fn speech_handler(
    State(fake): State<FakeProvider>,
    Path(voice_id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Vec<u8>) {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    fake.seen.lock().unwrap().push(Captured {
        voice_id,
        api_key: header("xi-api-key"),
        accept: header("accept"),
        body,
    });
    tokio::time::sleep(fake.delay).await;
    (fake.status, fake.reply.as_bytes().to_vec())
}

/// Starts a fake provider on a random port and returns its base URL.
async fn spawn_provider(fake: FakeProvider) -> String {
    let app = Router::new()
        .route("/v1/text-to-speech/{voice_id}", post(speech_handler))
        .with_state(fake);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/v1", addr)
}

fn fake(status: StatusCode, reply: &'static str) -> FakeProvider {
    FakeProvider {
        status,
        reply,
        delay: Duration::ZERO,
        seen: Arc::new(Mutex::new(Vec::new())),
    }
}

#[tokio::test]
async fn test_synthesize_returns_audio_bytes_verbatim() {
    let provider = fake(StatusCode::OK, "ID3-fake-mpeg");
    let seen = provider.seen.clone();
    let base_url = spawn_provider(provider).await;

    let client = ElevenLabsClient::new(ProviderConfig::new("test-key", base_url)).unwrap();
    let audio = client.synthesize("Hello there", Some("male")).await.unwrap();
    assert_eq!(audio, b"ID3-fake-mpeg");

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    let call = &seen[0];
    assert_eq!(call.voice_id, DEFAULT_MALE_VOICE_ID);
    assert_eq!(call.api_key.as_deref(), Some("test-key"));
    assert_eq!(call.accept.as_deref(), Some("audio/mpeg"));
    assert_eq!(call.body["text"], "Hello there");
    assert_eq!(call.body["model_id"], "eleven_monolingual_v1");
    assert_eq!(call.body["voice_settings"]["stability"], 0.5);
    assert_eq!(call.body["voice_settings"]["similarity_boost"], 0.75);
    assert_eq!(call.body["voice_settings"]["style"], 0.5);
    assert_eq!(call.body["voice_settings"]["use_speaker_boost"], true);
}

#[tokio::test]
async fn test_unknown_voice_uses_female() {
    let provider = fake(StatusCode::OK, "audio");
    let seen = provider.seen.clone();
    let base_url = spawn_provider(provider).await;

    let client = ElevenLabsClient::new(ProviderConfig::new("k", base_url)).unwrap();
    client.synthesize("a", Some("robot")).await.unwrap();
    client.synthesize("b", None).await.unwrap();

    let seen = seen.lock().unwrap();
    assert!(seen.iter().all(|c| c.voice_id == DEFAULT_FEMALE_VOICE_ID));
}

#[tokio::test]
async fn test_non_200_is_provider_error() {
    let base_url = spawn_provider(fake(StatusCode::UNAUTHORIZED, "invalid api key")).await;
    let client = ElevenLabsClient::new(ProviderConfig::new("bad", base_url)).unwrap();

    match client.synthesize("Hello", None).await {
        Err(VoiceError::Provider { status, message }) => {
            assert_eq!(status, 401);
            assert_eq!(message, "invalid api key");
        }
        other => panic!("Expected Provider error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_other_success_codes_are_still_errors() {
    let base_url = spawn_provider(fake(StatusCode::ACCEPTED, "")).await;
    let client = ElevenLabsClient::new(ProviderConfig::new("k", base_url)).unwrap();

    match client.synthesize("Hello", None).await {
        Err(VoiceError::Provider { status, message }) => {
            assert_eq!(status, 202);
            assert_eq!(message, "ElevenLabs API error");
        }
        other => panic!("Expected Provider error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_slow_provider_times_out() {
    let mut provider = fake(StatusCode::OK, "late");
    provider.delay = Duration::from_secs(3);
    let base_url = spawn_provider(provider).await;

    let config = ProviderConfig {
        timeout_secs: 1,
        ..ProviderConfig::new("k", base_url)
    };
    let client = ElevenLabsClient::new(config).unwrap();

    let result = client.synthesize("Hello", None).await;
    assert!(
        matches!(result, Err(VoiceError::Timeout(d)) if d == Duration::from_secs(1)),
        "got {:?}",
        result
    );
}

#[tokio::test]
async fn test_unreachable_provider_is_transport_error() {
    // Bind then drop to get a port nothing listens on.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client =
        ElevenLabsClient::new(ProviderConfig::new("k", format!("http://{}/v1", addr))).unwrap();
    let result = client.synthesize("Hello", None).await;
    assert!(matches!(result, Err(VoiceError::Transport(_))), "got {:?}", result);
}

#[tokio::test]
async fn test_oversized_text_rejected_before_network() {
    let provider = fake(StatusCode::OK, "audio");
    let seen = provider.seen.clone();
    let base_url = spawn_provider(provider).await;
    let client = ElevenLabsClient::new(ProviderConfig::new("k", base_url)).unwrap();

    let text = "a".repeat(64 * 1024 + 1);
    let result = client.synthesize(&text, None).await;
    assert!(matches!(result, Err(VoiceError::InvalidInput(_))));
    assert!(seen.lock().unwrap().is_empty());
}

#[test]
fn test_client_rejects_invalid_config() {
    let config = ProviderConfig {
        default_voice: "narrator".to_string(),
        ..ProviderConfig::default()
    };
    assert!(matches!(
        ElevenLabsClient::new(config),
        Err(VoiceError::Config(_))
    ));
}
