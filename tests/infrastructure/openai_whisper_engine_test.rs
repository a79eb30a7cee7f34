use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::{Multipart, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;

use voxrelay::application::ports::{TranscriptionEngine, TranscriptionError};
use voxrelay::domain::LanguageHint;
use voxrelay::infrastructure::audio::OpenAiWhisperEngine;

#[derive(Clone, Default)]
struct Captured {
    authorization: Arc<Mutex<Option<String>>>,
    fields: Arc<Mutex<HashMap<String, String>>>,
    file: Arc<Mutex<Option<(String, String, Vec<u8>)>>>,
}

async fn start_mock_server(status: StatusCode, response: &'static str) -> (String, Captured) {
    let captured = Captured::default();

    let app = Router::new()
        .route(
            "/audio/transcriptions",
            post(
                move |State(captured): State<Captured>,
                      headers: HeaderMap,
                      mut multipart: Multipart| async move {
                    *captured.authorization.lock().unwrap() = headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        .map(String::from);

                    while let Some(field) = multipart.next_field().await.unwrap() {
                        let name = field.name().unwrap_or_default().to_string();
                        if name == "file" {
                            let file_name = field.file_name().unwrap_or_default().to_string();
                            let content_type = field.content_type().unwrap_or_default().to_string();
                            let data = field.bytes().await.unwrap().to_vec();
                            *captured.file.lock().unwrap() = Some((file_name, content_type, data));
                        } else {
                            let value = field.text().await.unwrap();
                            captured.fields.lock().unwrap().insert(name, value);
                        }
                    }

                    (status, response)
                },
            ),
        )
        .with_state(captured.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), captured)
}

fn write_audio(dir: &tempfile::TempDir, name: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, b"fake audio bytes").unwrap();
    path
}

#[tokio::test]
async fn given_audio_without_hint_when_transcribing_then_posts_file_and_omits_language() {
    let (base_url, captured) = start_mock_server(StatusCode::OK, "  Hello there.\n").await;
    let dir = tempfile::TempDir::new().unwrap();
    let audio = write_audio(&dir, "note.wav");
    let engine = OpenAiWhisperEngine::new("test-key".to_string(), Some(base_url), None);

    let transcript = engine.transcribe(&audio, None).await.unwrap();

    assert_eq!(transcript, "Hello there.");
    assert_eq!(
        captured.authorization.lock().unwrap().as_deref(),
        Some("Bearer test-key")
    );
    let fields = captured.fields.lock().unwrap().clone();
    assert_eq!(fields.get("model").map(String::as_str), Some("whisper-1"));
    assert_eq!(fields.get("response_format").map(String::as_str), Some("text"));
    assert!(!fields.contains_key("language"));

    let (file_name, content_type, data) = captured.file.lock().unwrap().clone().unwrap();
    assert_eq!(file_name, "note.wav");
    assert_eq!(content_type, "audio/wav");
    assert_eq!(data, b"fake audio bytes");
}

#[tokio::test]
async fn given_language_hint_when_transcribing_then_language_field_is_sent() {
    let (base_url, captured) = start_mock_server(StatusCode::OK, "Hola").await;
    let dir = tempfile::TempDir::new().unwrap();
    let audio = write_audio(&dir, "nota.mp3");
    let engine = OpenAiWhisperEngine::new(
        "test-key".to_string(),
        Some(base_url),
        Some("whisper-large-v3".to_string()),
    );
    let hint = LanguageHint::parse("es").unwrap();

    let transcript = engine.transcribe(&audio, Some(&hint)).await.unwrap();

    assert_eq!(transcript, "Hola");
    let fields = captured.fields.lock().unwrap().clone();
    assert_eq!(fields.get("language").map(String::as_str), Some("es"));
    assert_eq!(fields.get("model").map(String::as_str), Some("whisper-large-v3"));
    let (_, content_type, _) = captured.file.lock().unwrap().clone().unwrap();
    assert_eq!(content_type, "audio/mpeg");
}

#[tokio::test]
async fn given_error_status_when_transcribing_then_returns_api_request_failed() {
    let (base_url, _captured) =
        start_mock_server(StatusCode::BAD_REQUEST, "invalid file format").await;
    let dir = tempfile::TempDir::new().unwrap();
    let audio = write_audio(&dir, "note.wav");
    let engine = OpenAiWhisperEngine::new("test-key".to_string(), Some(base_url), None);

    let err = engine.transcribe(&audio, None).await.unwrap_err();

    match err {
        TranscriptionError::ApiRequestFailed(msg) => {
            assert!(msg.contains("400"));
            assert!(msg.contains("invalid file format"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn given_missing_file_when_transcribing_then_returns_decoding_failed() {
    let engine = OpenAiWhisperEngine::new(
        "test-key".to_string(),
        Some("http://127.0.0.1:9".to_string()),
        None,
    );

    let err = engine
        .transcribe(std::path::Path::new("/nonexistent/clip.wav"), None)
        .await
        .unwrap_err();

    assert!(matches!(err, TranscriptionError::DecodingFailed(_)));
}
