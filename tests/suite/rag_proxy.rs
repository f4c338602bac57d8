//! RAG proxy client wired from configuration.

use denim_config::RagConfig;
use denim_rag::{ChatOutcome, ChatRequest, RagClient, RagError};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{mount_chat_reply, rag_config};

#[tokio::test]
async fn chat_through_configured_client() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_json(json!({
            "message": "What pH for the indigo bath?",
            "conversation_id": "c-42"
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "answer": "Between 10.8 and 11.5." })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = RagClient::from_config(&rag_config(&server, Some("test-key"))).expect("client");
    let request = ChatRequest::new("What pH for the indigo bath?").in_conversation("c-42");
    let outcome = client.chat(&request).await.expect("transport ok");

    let ChatOutcome::Reply(reply) = outcome else {
        panic!("expected a reply");
    };
    assert_eq!(reply.text(), "Between 10.8 and 11.5.");
}

#[tokio::test]
async fn backend_errors_come_back_unchanged() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/conversations/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such conversation"))
        .mount(&server)
        .await;

    let client = RagClient::from_config(&rag_config(&server, None)).expect("client");
    let response = client
        .get_conversation("missing")
        .await
        .expect("transport ok");
    assert_eq!(response.status, 404);
    assert!(!response.is_success());
    assert_eq!(response.text(), "no such conversation");
}

#[tokio::test]
async fn plain_text_reply_is_used_as_is() {
    let server = MockServer::start().await;
    mount_chat_reply(&server, json!("just text")).await;

    let client = RagClient::from_config(&rag_config(&server, None)).expect("client");
    let outcome = client
        .chat(&ChatRequest::new("hello"))
        .await
        .expect("transport ok");
    let ChatOutcome::Reply(reply) = outcome else {
        panic!("expected a reply");
    };
    // A bare JSON string has no reply key, so the raw body comes back.
    assert_eq!(reply.text(), r#""just text""#);
}

#[test]
fn missing_base_url_is_reported() {
    let config = RagConfig::default();
    assert!(matches!(
        RagClient::from_config(&config),
        Err(RagError::MissingBaseUrl)
    ));
}
