//! Pass-through behaviour against a mock backend.

use std::time::Duration;

use futures_util::StreamExt;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;

fn client_for(server: &MockServer, api_key: Option<&str>) -> RagClient {
    let base = format!("{}/api", server.uri());
    RagClient::new(&base, api_key.map(str::to_string), Duration::from_secs(5))
        .expect("client builds")
}

#[tokio::test]
async fn list_conversations_passes_status_and_body_through() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/conversations"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(r#"[{"id":"c-1"}]"#, "application/json"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let response = client_for(&server, None)
        .list_conversations()
        .await
        .expect("transport ok");

    assert_eq!(response.status, 200);
    assert_eq!(response.text(), r#"[{"id":"c-1"}]"#);
    assert_eq!(response.content_type.as_deref(), Some("application/json"));
    assert_eq!(response.json().expect("json")[0]["id"], "c-1");
}

#[tokio::test]
async fn create_conversation_forwards_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/conversations"))
        .and(body_json(json!({ "title": "Indigo range" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "c-9" })))
        .expect(1)
        .mount(&server)
        .await;

    let response = client_for(&server, None)
        .create_conversation(&json!({ "title": "Indigo range" }))
        .await
        .expect("transport ok");

    assert_eq!(response.status, 201);
    assert!(response.is_success());
}

#[tokio::test]
async fn backend_errors_are_responses_not_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/conversations/c-404"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such conversation"))
        .mount(&server)
        .await;

    let response = client_for(&server, None)
        .get_conversation("c-404")
        .await
        .expect("transport ok");

    assert_eq!(response.status, 404);
    assert!(!response.is_success());
    assert_eq!(response.text(), "no such conversation");
}

#[tokio::test]
async fn empty_conversation_id_is_rejected_locally() {
    let server = MockServer::start().await;
    let err = client_for(&server, None)
        .get_conversation("  ")
        .await
        .expect_err("empty id");
    assert!(matches!(err, RagError::EmptyConversationId));
}

#[tokio::test]
async fn chat_extracts_reply_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_json(json!({ "message": "pH window?", "conversation_id": "c-1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sources": ["manual.pdf"],
            "answer": "Keep the bath between 10.8 and 11.5."
        })))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = client_for(&server, None)
        .chat(&ChatRequest::new("pH window?").in_conversation("c-1"))
        .await
        .expect("transport ok");

    let ChatOutcome::Reply(reply) = outcome else {
        panic!("expected a reply");
    };
    assert_eq!(reply.text(), "Keep the bath between 10.8 and 11.5.");
}

#[tokio::test]
async fn chat_reply_streams_as_single_chunk() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_json(json!({ "message": "hello" })))
        .respond_with(ResponseTemplate::new(200).set_body_string("plain answer"))
        .mount(&server)
        .await;

    let outcome = client_for(&server, None)
        .chat(&ChatRequest::new("hello"))
        .await
        .expect("transport ok");
    let ChatOutcome::Reply(reply) = outcome else {
        panic!("expected a reply");
    };

    let chunks: Vec<_> = reply.into_stream().collect().await;
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].as_deref().ok(), Some(&b"plain answer"[..]));
}

#[tokio::test]
async fn chat_failure_passes_backend_status_through() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(502).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let outcome = client_for(&server, None)
        .chat(&ChatRequest::new("hello"))
        .await
        .expect("transport ok");

    let ChatOutcome::Failed(response) = outcome else {
        panic!("expected pass-through failure");
    };
    assert_eq!(response.status, 502);
    assert_eq!(response.text(), "upstream down");
}

#[tokio::test]
async fn bearer_header_sent_when_configured() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/conversations"))
        .and(header("authorization", "Bearer rk-test"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .expect(1)
        .mount(&server)
        .await;

    let response = client_for(&server, Some("rk-test"))
        .list_conversations()
        .await
        .expect("transport ok");
    assert_eq!(response.status, 200);
}

#[tokio::test]
async fn no_bearer_header_without_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/conversations"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .mount(&server)
        .await;

    client_for(&server, Some("   "))
        .list_conversations()
        .await
        .expect("transport ok");

    let requests = server.received_requests().await.expect("recording enabled");
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].headers.contains_key("authorization"));
}

#[tokio::test]
async fn connection_failure_is_transport_error() {
    let client = RagClient::new("http://127.0.0.1:1/api", None, Duration::from_secs(2))
        .expect("client builds");
    let err = client.list_conversations().await.expect_err("nothing listening");
    assert!(matches!(err, RagError::Transport { .. }));
}

#[test]
fn extract_reply_prefers_known_keys_in_order() {
    assert_eq!(
        extract_reply(br#"{"content":"c","reply":"r"}"#),
        "r".to_string()
    );
    assert_eq!(extract_reply(br#"{"message":"m"}"#), "m".to_string());
    assert_eq!(
        extract_reply(br#"{"answer":42,"response":"text"}"#),
        "text".to_string()
    );
    assert_eq!(extract_reply(br#"{"other":"x"}"#), r#"{"other":"x"}"#);
    assert_eq!(extract_reply(b"not json"), "not json");
}

#[test]
fn into_response_is_plain_text() {
    let reply = ChatReply {
        text: "hi".to_string(),
    };
    let response = reply.into_response();
    assert_eq!(response.status, 200);
    assert_eq!(response.content_type.as_deref(), Some(TEXT_PLAIN_UTF8));
    assert_eq!(response.body, b"hi");
}

#[test]
fn base_url_must_be_absolute() {
    assert!(matches!(
        RagClient::new("not a url", None, Duration::from_secs(1)),
        Err(RagError::InvalidBaseUrl(_))
    ));
    assert!(matches!(
        RagClient::from_config(&RagConfig::default()),
        Err(RagError::MissingBaseUrl)
    ));
}

#[test]
fn debug_redacts_api_key() {
    let client = RagClient::new(
        "https://rag.example.com",
        Some("rk-secret".into()),
        Duration::from_secs(1),
    )
    .expect("client builds");
    let debug = format!("{client:?}");
    assert!(!debug.contains("rk-secret"));
    assert!(debug.contains("[REDACTED]"));
}
