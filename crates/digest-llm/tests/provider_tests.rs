//! Wire-level tests for the OpenAI-compatible provider.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use digest_core::{tr, MsgKey, Turn, UiLanguage};
use digest_llm::{
    Completer, CompletionProvider, CompletionRequest, ContentCache, OpenAiCompatProvider,
    TranscriptionProvider, TranscriptionRequest,
};

fn request() -> CompletionRequest {
    CompletionRequest {
        model: "llama-3.3-70b-versatile".to_string(),
        system: "You summarize.".to_string(),
        messages: vec![Turn::user("Text to summarize:\nhello world")],
        temperature: 0.5,
        max_tokens: 2048,
    }
}

fn cache() -> Arc<ContentCache> {
    Arc::new(ContentCache::new(Duration::from_secs(3600), 64))
}

#[tokio::test]
async fn complete_sends_bearer_auth_and_parses_first_choice() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("Authorization", "Bearer test-key"))
        .and(body_partial_json(json!({
            "model": "llama-3.3-70b-versatile",
            "temperature": 0.5,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [
                { "message": { "role": "assistant", "content": "• a summary" } }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = OpenAiCompatProvider::new("test-key", server.uri());
    let text = provider.complete(&request()).await.expect("completion");
    assert_eq!(text, "• a summary");
}

#[tokio::test]
async fn non_2xx_is_an_error_and_completer_maps_it_to_fallback() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .mount(&server)
        .await;

    let provider = Arc::new(OpenAiCompatProvider::new("test-key", server.uri()));

    let direct = provider.complete(&request()).await;
    assert!(direct.is_err());

    let completer = Completer::new(provider, cache());
    let text = completer
        .complete_or_fallback(&request(), UiLanguage::En)
        .await;
    assert_eq!(text, tr(UiLanguage::En, MsgKey::ErrorApi));
}

#[tokio::test]
async fn timeout_surfaces_as_fallback_not_panic() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_secs(5))
                .set_body_json(json!({
                    "choices": [ { "message": { "content": "too late" } } ]
                })),
        )
        .mount(&server)
        .await;

    let provider = Arc::new(OpenAiCompatProvider::with_timeout(
        "test-key",
        server.uri(),
        Duration::from_millis(100),
    ));
    let completer = Completer::new(provider, cache());

    let text = completer
        .complete_or_fallback(&request(), UiLanguage::En)
        .await;
    assert_eq!(text, tr(UiLanguage::En, MsgKey::ErrorApi));
}

#[tokio::test]
async fn empty_choices_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let provider = OpenAiCompatProvider::new("test-key", server.uri());
    assert!(provider.complete(&request()).await.is_err());
}

#[tokio::test]
async fn transcription_posts_multipart_and_parses_the_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/audio/transcriptions"))
        .and(header("Authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "text": "remember to buy milk"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = OpenAiCompatProvider::new("test-key", server.uri());
    let text = provider
        .transcribe(&TranscriptionRequest {
            model: "whisper-large-v3".to_string(),
            file_name: "voice.ogg".to_string(),
            bytes: b"not really ogg".to_vec(),
        })
        .await
        .expect("transcription");
    assert_eq!(text, "remember to buy milk");
}

#[tokio::test]
async fn blank_transcription_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/audio/transcriptions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "text": "  " })))
        .mount(&server)
        .await;

    let provider = OpenAiCompatProvider::new("test-key", server.uri());
    let result = provider
        .transcribe(&TranscriptionRequest {
            model: "whisper-large-v3".to_string(),
            file_name: "voice.ogg".to_string(),
            bytes: b"silence".to_vec(),
        })
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn list_models_parses_the_data_array() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/models"))
        .and(header("Authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                { "id": "llama-3.3-70b-versatile" },
                { "id": "whisper-large-v3" }
            ]
        })))
        .mount(&server)
        .await;

    let provider = OpenAiCompatProvider::new("test-key", server.uri());
    let models = provider.list_models().await.expect("model list");
    assert_eq!(
        models,
        vec!["llama-3.3-70b-versatile", "whisper-large-v3"]
    );
}
