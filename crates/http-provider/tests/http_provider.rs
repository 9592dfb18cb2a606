use std::time::Duration;

use serde_json::json;
use support_chat_http_provider::{HttpConfigBuilder, HttpProvider};
use support_chat_model::{
    ErrorKind, HistoryEntry, ReplyProvider, ReplyProviderError, ReplyRequest,
    Role,
};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn provider_for(server: &MockServer, timeout: Duration) -> HttpProvider {
    let config = HttpConfigBuilder::with_endpoint(format!("{}/chat", server.uri()))
        .with_request_timeout(timeout)
        .build();
    HttpProvider::new(config).unwrap()
}

fn request() -> ReplyRequest {
    ReplyRequest {
        message: "How do I export my drafts?".to_owned(),
        history: vec![HistoryEntry::new(
            Role::Responder,
            "Hi! How can I help you today?",
        )],
    }
}

#[tokio::test]
async fn test_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "message": "How do I export my drafts?",
            "history": [
                { "role": "responder", "text": "Hi! How can I help you today?" }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "reply": "Open the drafts list and pick Export." }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider_for(&server, Duration::from_secs(5));
    let reply = provider.send_request(&request()).await.unwrap();
    assert_eq!(reply.text, "Open the drafts list and pick Export.");
    assert_eq!(provider.service_timeout(), Some(Duration::from_secs(5)));
}

#[tokio::test]
async fn test_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "success": false
        })))
        .mount(&server)
        .await;

    let provider = provider_for(&server, Duration::from_secs(5));
    let err = provider.send_request(&request()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Status);
}

#[tokio::test]
async fn test_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "error": "generation backend unavailable"
        })))
        .mount(&server)
        .await;

    let provider = provider_for(&server, Duration::from_secs(5));
    let err = provider.send_request(&request()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Rejected);
}

#[tokio::test]
async fn test_missing_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {}
        })))
        .mount(&server)
        .await;

    let provider = provider_for(&server, Duration::from_secs(5));
    let err = provider.send_request(&request()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Malformed);
}

#[tokio::test]
async fn test_not_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("<html>hello</html>"),
        )
        .mount(&server)
        .await;

    let provider = provider_for(&server, Duration::from_secs(5));
    let err = provider.send_request(&request()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Malformed);
}

#[tokio::test]
async fn test_request_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({
                    "success": true,
                    "data": { "reply": "too late" }
                }))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let provider = provider_for(&server, Duration::from_millis(200));
    let err = provider.send_request(&request()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Network);
}

#[tokio::test]
async fn test_unreachable() {
    // Nothing listens on the discard port.
    let config = HttpConfigBuilder::with_endpoint("http://127.0.0.1:9/chat")
        .with_request_timeout(Duration::from_secs(2))
        .build();
    let provider = HttpProvider::new(config).unwrap();
    let err = provider.send_request(&request()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Network);
}
