use gemini_chat_relay::message::ChatResponse;
use gemini_chat_relay::routes::create_router;
use gemini_chat_relay::services::generator::{GenerationError, TextGenerator};
use gemini_chat_relay::state::AppState;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{HeaderValue, Request, StatusCode, header};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tower::util::ServiceExt;

const ALLOWED_ORIGIN: &str = "http://localhost:3000";

enum Reply {
    Text(&'static str),
    Fail(&'static str),
}

struct MockGenerator {
    reply: Reply,
    calls: AtomicUsize,
}

impl MockGenerator {
    fn new(reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.reply {
            Reply::Text(text) => Ok(text.to_string()),
            Reply::Fail(message) => Err(GenerationError::Network(message.to_string())),
        }
    }
}

fn app(generator: Arc<MockGenerator>) -> Router {
    let state = Arc::new(AppState::new(
        generator,
        vec![HeaderValue::from_static(ALLOWED_ORIGIN)],
    ));
    create_router(state)
}

fn chat_request(body: &'static str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/chat")
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

async fn send(app: Router, req: Request<Body>) -> (StatusCode, ChatResponse) {
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: ChatResponse = serde_json::from_slice(&body_bytes).unwrap();
    (status, body)
}

#[tokio::test]
async fn test_chat_returns_generated_text() {
    let generator = MockGenerator::new(Reply::Text("Hi there!"));

    let (status, body) = send(app(generator.clone()), chat_request(r#"{"message": "Hello"}"#)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, ChatResponse::Response("Hi there!".to_string()));
    assert_eq!(generator.calls(), 1);
}

#[tokio::test]
async fn test_missing_message_is_rejected() {
    for payload in [r#"{}"#, r#"{"message": null}"#, r#"{"message": ""}"#] {
        let generator = MockGenerator::new(Reply::Text("unused"));

        let (status, body) = send(app(generator.clone()), chat_request(payload)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "payload: {payload}");
        assert_eq!(body, ChatResponse::Error("No message provided".to_string()));
        assert_eq!(generator.calls(), 0);
    }
}

#[tokio::test]
async fn test_upstream_failure_is_prefixed() {
    let generator = MockGenerator::new(Reply::Fail("quota exceeded"));

    let (status, body) = send(app(generator.clone()), chat_request(r#"{"message": "Hello"}"#)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        ChatResponse::Error("Gemini API error: quota exceeded".to_string())
    );
    assert_eq!(generator.calls(), 1);
}

#[tokio::test]
async fn test_invalid_json_is_server_error() {
    let generator = MockGenerator::new(Reply::Text("unused"));

    let (status, body) = send(app(generator.clone()), chat_request("not json")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    match body {
        ChatResponse::Error(message) => assert!(!message.is_empty()),
        other => panic!("expected an error body, got {other:?}"),
    }
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn test_non_string_message_is_server_error() {
    let generator = MockGenerator::new(Reply::Text("unused"));

    let (status, body) = send(app(generator.clone()), chat_request(r#"{"message": 42}"#)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        ChatResponse::Error("message must be a string, got number".to_string())
    );
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn test_oversized_body_gets_json_error() {
    let generator = MockGenerator::new(Reply::Text("unused"));
    let body = format!(r#"{{"message": "{}"}}"#, "a".repeat(3 * 1024 * 1024));
    let req = Request::builder()
        .method("POST")
        .uri("/chat")
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();

    let (status, body) = send(app(generator.clone()), req).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    match body {
        ChatResponse::Error(message) => {
            assert!(message.contains("length limit exceeded"), "{message}")
        }
        other => panic!("expected an error body, got {other:?}"),
    }
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn test_disallowed_origin_never_reaches_handler() {
    let generator = MockGenerator::new(Reply::Text("unused"));
    let req = Request::builder()
        .method("POST")
        .uri("/chat")
        .header("content-type", "application/json")
        .header(header::ORIGIN, "https://evil.example")
        .body(Body::from(r#"{"message": "Hello"}"#))
        .unwrap();

    let (status, body) = send(app(generator.clone()), req).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, ChatResponse::Error("Origin not allowed".to_string()));
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn test_allowed_origin_gets_cors_headers() {
    let generator = MockGenerator::new(Reply::Text("Hi there!"));
    let req = Request::builder()
        .method("POST")
        .uri("/chat")
        .header("content-type", "application/json")
        .header(header::ORIGIN, ALLOWED_ORIGIN)
        .body(Body::from(r#"{"message": "Hello"}"#))
        .unwrap();

    let response = app(generator).oneshot(req).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN),
        Some(&HeaderValue::from_static(ALLOWED_ORIGIN))
    );
}

#[tokio::test]
async fn test_preflight_from_allowed_origin() {
    let generator = MockGenerator::new(Reply::Text("unused"));
    let req = Request::builder()
        .method("OPTIONS")
        .uri("/chat")
        .header(header::ORIGIN, ALLOWED_ORIGIN)
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap();

    let response = app(generator.clone()).oneshot(req).await.unwrap();

    assert!(response.status().is_success());
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN),
        Some(&HeaderValue::from_static(ALLOWED_ORIGIN))
    );
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn test_health_endpoint() {
    let generator = MockGenerator::new(Reply::Text("unused"));
    let req = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = app(generator).oneshot(req).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body_bytes[..], b"OK");
}
