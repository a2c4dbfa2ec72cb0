//! Integration tests for `POST /api/generate`.
//!
//! Requests go through the router directly via `tower::ServiceExt`, without
//! binding a socket.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use futures::StreamExt;
use futures::stream;
use infinipedia_core::{
    ContentProvider, ImageData, ImageOptions, OutputSchema, Prompt, ProviderError,
    ProviderErrorKind, TextStream,
};
use infinipedia_fetch::RetryPolicy;
use infinipedia_proxy::{ProxyState, build_router};
use serde_json::{Value, json};
use tower::ServiceExt;

/// Answers every topic except `Forbidden` (safety block) and `Busy`
/// (overloaded).
struct FakeProvider;

fn failure_for(prompt: &Prompt) -> Option<ProviderError> {
    match prompt.topic.as_str() {
        "Forbidden" => Some(ProviderError::new(ProviderErrorKind::SafetyBlocked, "SAFETY")),
        "Busy" => Some(ProviderError::new(ProviderErrorKind::Overloaded, "model is overloaded")),
        _ => None,
    }
}

#[async_trait]
impl ContentProvider for FakeProvider {
    fn id(&self) -> &str {
        "fake"
    }

    async fn stream_text(&self, prompt: &Prompt) -> Result<TextStream, ProviderError> {
        if let Some(error) = failure_for(prompt) {
            return Err(error);
        }
        let chunks = vec![Ok(format!("{} ", prompt.topic)), Ok("is a topic.".to_string())];
        Ok(stream::iter(chunks).boxed())
    }

    async fn generate_structured(
        &self,
        prompt: &Prompt,
        _schema: &OutputSchema,
    ) -> Result<Value, ProviderError> {
        match failure_for(prompt) {
            Some(error) => Err(error),
            None => Ok(json!({ "art": format!("<{}>", prompt.topic) })),
        }
    }

    async fn generate_image(
        &self,
        _prompt: &Prompt,
        _options: &ImageOptions,
    ) -> Result<Option<ImageData>, ProviderError> {
        Ok(None)
    }
}

fn state() -> ProxyState {
    ProxyState::new(Arc::new(FakeProvider)).with_retry(
        RetryPolicy::new(1)
            .with_base_delay(Duration::from_millis(1))
            .with_jitter(Duration::ZERO),
    )
}

fn generate(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/generate")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(state: ProxyState, body: &str) -> (StatusCode, Option<String>, String) {
    let response = build_router(state).oneshot(generate(body)).await.unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, content_type, String::from_utf8(bytes.to_vec()).unwrap())
}

fn error_message(body: &str) -> String {
    let json: Value = serde_json::from_str(body).unwrap();
    json["error"].as_str().unwrap().to_string()
}

// ============================================================================
// Success
// ============================================================================

#[tokio::test]
async fn test_definition_streams_plain_text() {
    let (status, content_type, body) =
        send(state(), r#"{"type": "definition", "topic": "Gravity"}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert!(content_type.unwrap().starts_with("text/plain"));
    assert_eq!(body, "Gravity is a topic.");
}

#[tokio::test]
async fn test_art_returns_json() {
    let (status, content_type, body) = send(state(), r#"{"type": "art", "topic": "Cat"}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert!(content_type.unwrap().starts_with("application/json"));
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json, json!({ "art": "<Cat>" }));
}

// ============================================================================
// 400
// ============================================================================

#[tokio::test]
async fn test_invalid_json_is_bad_request() {
    let (status, _, body) = send(state(), "{ not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error_message(&body).starts_with("Invalid JSON body"));
}

#[tokio::test]
async fn test_missing_or_blank_topic_is_bad_request() {
    for body in [r#"{"type": "art"}"#, r#"{"type": "art", "topic": "  "}"#] {
        let (status, _, reply) = send(state(), body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error_message(&reply), "Missing or invalid topic");
    }
}

#[tokio::test]
async fn test_unknown_type_is_bad_request() {
    let (status, _, body) = send(state(), r#"{"type": "poem", "topic": "Cat"}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "Unknown generation type: poem");
}

// ============================================================================
// 500
// ============================================================================

#[tokio::test]
async fn test_missing_credential_is_server_error() {
    let (status, _, body) =
        send(ProxyState::unconfigured(), r#"{"type": "definition", "topic": "Cat"}"#).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(error_message(&body), "Server is missing its API key");
}

#[tokio::test]
async fn test_bad_request_wins_over_missing_credential() {
    let (status, _, _) = send(ProxyState::unconfigured(), r#"{"type": "definition"}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_provider_failure_is_server_error() {
    let (status, _, body) = send(state(), r#"{"type": "art", "topic": "Forbidden"}"#).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(error_message(&body).contains("safety blocked"));

    let (status, _, body) = send(state(), r#"{"type": "definition", "topic": "Busy"}"#).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let message = error_message(&body);
    assert!(message.contains("overloaded"));
    assert!(message.contains("retries exhausted after 2 attempts"));
}
