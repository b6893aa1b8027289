//! Blocking surface tests
#![cfg(feature = "blocking")]

use hyperclova::blocking;
use hyperclova::{ChatParams, Client, Message, Model, RetryPolicy};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn blocking_client(server: &MockServer) -> blocking::Client {
    let inner = Client::builder()
        .api_key("nv-test-key")
        .base_url(server.uri())
        .retry_policy(RetryPolicy::disabled())
        .build()
        .unwrap();
    blocking::Client::from_async(inner).unwrap()
}

#[test]
fn blocking_chat_completion() {
    // The mock server needs a live multi-thread runtime to serve from while
    // the blocking client runs on its own runtime.
    let rt = tokio::runtime::Runtime::new().unwrap();
    let server = rt.block_on(MockServer::start());

    rt.block_on(
        Mock::given(method("POST"))
            .and(path("/v3/chat-completions/HCX-DASH-002"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": { "code": "20000", "message": "OK" },
                "result": {
                    "message": { "role": "assistant", "content": "Hi!" },
                    "finishReason": "stop",
                    "usage": { "promptTokens": 2, "completionTokens": 1, "totalTokens": 3 }
                }
            })))
            .mount(&server),
    );

    let completion = blocking_client(&server)
        .chat()
        .create(ChatParams::new(
            Model::HcxDash002,
            vec![Message::user("hello")],
        ))
        .unwrap();
    assert_eq!(completion.content(), "Hi!");
}

#[test]
fn blocking_stream_iterates_and_reassembles() {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let server = rt.block_on(MockServer::start());

    let body = "event: token\ndata: {\"message\": {\"role\": \"assistant\", \"content\": \"Hel\"}}\n\n\
                event: token\ndata: {\"message\": {\"content\": \"lo\"}}\n\n\
                event: result\ndata: {\"message\": {\"role\": \"assistant\", \"content\": \"Hello\"}, \"finishReason\": \"stop\"}\n\n";

    rt.block_on(
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
            .mount(&server),
    );

    let chunks = blocking_client(&server)
        .chat()
        .create_stream(ChatParams::new(
            Model::Hcx005,
            vec![Message::user("say hello")],
        ))
        .unwrap();

    let completion = chunks.collect_completion().unwrap();
    assert_eq!(completion.content(), "Hello");
}

#[test]
fn blocking_embeddings() {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let server = rt.block_on(MockServer::start());

    rt.block_on(
        Mock::given(method("POST"))
            .and(path("/v1/api-tools/embedding/v2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": { "code": "20000", "message": "OK" },
                "result": { "embedding": [0.5, 0.5], "inputTokens": 2 }
            })))
            .mount(&server),
    );

    let embedding = blocking_client(&server)
        .embeddings()
        .create("hello")
        .unwrap();
    assert_eq!(embedding.dimension(), 2);
}
