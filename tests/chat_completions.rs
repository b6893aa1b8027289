//! Chat completion tests against a mock server

use hyperclova::{
    ChatParams, Client, Error, FinishReason, FunctionDefinition, Message, Model, ResponseFormat,
    RetryPolicy, ThinkingEffort, Tool, ToolChoice,
};
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_KEY: &str = "nv-test-key";

fn test_client(server: &MockServer) -> Client {
    Client::builder()
        .api_key(API_KEY)
        .base_url(server.uri())
        .retry_policy(RetryPolicy::disabled())
        .build()
        .unwrap()
}

fn completion_envelope(content: &str) -> Value {
    json!({
        "status": { "code": "20000", "message": "OK" },
        "result": {
            "message": { "role": "assistant", "content": content },
            "finishReason": "stop",
            "created": 1_700_000_000_000i64,
            "seed": 42,
            "usage": { "promptTokens": 10, "completionTokens": 5, "totalTokens": 15 }
        }
    })
}

#[tokio::test]
async fn create_returns_typed_completion() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v3/chat-completions/HCX-005"))
        .and(header("Authorization", format!("Bearer {API_KEY}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_envelope("Hello!")))
        .expect(1)
        .mount(&server)
        .await;

    let completion = test_client(&server)
        .chat()
        .create(ChatParams::new(
            Model::Hcx005,
            vec![
                Message::system("You are a helpful assistant"),
                Message::user("Hello"),
            ],
        ))
        .await
        .unwrap();

    assert_eq!(completion.content(), "Hello!");
    assert_eq!(completion.finish_reason, Some(FinishReason::Stop));
    assert_eq!(completion.usage.unwrap().total_tokens, 15);
}

#[tokio::test]
async fn request_body_matches_params() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v3/chat-completions/HCX-007"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_envelope("ok")))
        .mount(&server)
        .await;

    test_client(&server)
        .chat()
        .create(
            ChatParams::new(Model::Hcx007, vec![Message::user("hi")])
                .with_temperature(0.5)
                .with_top_p(0.8)
                .with_top_k(16)
                .with_max_tokens(400)
                .with_stop(vec!["END".to_string()])
                .with_seed(7)
                .with_ai_filters(true)
                .with_request_id("req-123"),
        )
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);

    let request = &requests[0];
    assert_eq!(
        request
            .headers
            .get("X-NCP-CLOVASTUDIO-REQUEST-ID")
            .unwrap()
            .to_str()
            .unwrap(),
        "req-123"
    );

    let body: Value = serde_json::from_slice(&request.body).unwrap();
    assert_eq!(body["temperature"], 0.5);
    assert_eq!(body["topP"], 0.8);
    assert_eq!(body["topK"], 16);
    assert_eq!(body["stop"], json!(["END"]));
    assert_eq!(body["seed"], 7);
    assert_eq!(body["includeAiFilters"], true);
    // HCX-007 takes maxCompletionTokens, never maxTokens.
    assert_eq!(body["maxCompletionTokens"], 400);
    assert!(body.get("maxTokens").is_none());
    assert_eq!(body["messages"][0]["role"], "user");
    assert_eq!(body["messages"][0]["content"], "hi");
    // model travels in the path, not the body
    assert!(body.get("model").is_none());
}

#[tokio::test]
async fn structured_output_forces_thinking_none_on_the_wire() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v3/chat-completions/HCX-007"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_envelope("{}")))
        .mount(&server)
        .await;

    test_client(&server)
        .chat()
        .create(
            ChatParams::new(Model::Hcx007, vec![Message::user("give me json")])
                .with_response_format(ResponseFormat::json(json!({
                    "type": "object",
                    "properties": { "answer": { "type": "string" } }
                }))),
        )
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["thinking"]["effort"], "none");
    assert_eq!(body["responseFormat"]["type"], "json");
    assert_eq!(body["maxCompletionTokens"], 2048);
}

#[tokio::test]
async fn thinking_effort_sets_default_budget() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v3/chat-completions/HCX-007"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_envelope("ok")))
        .mount(&server)
        .await;

    test_client(&server)
        .chat()
        .create(
            ChatParams::new(Model::Hcx007, vec![Message::user("think hard")])
                .with_thinking(ThinkingEffort::Medium),
        )
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["thinking"]["effort"], "medium");
    assert_eq!(body["maxCompletionTokens"], 10_240);
}

#[tokio::test]
async fn function_calling_round_trip() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v3/chat-completions/HCX-005"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": { "code": "20000", "message": "OK" },
            "result": {
                "message": {
                    "role": "assistant",
                    "content": "",
                    "toolCalls": [{
                        "id": "call-1",
                        "type": "function",
                        "function": {
                            "name": "get_weather",
                            "arguments": { "city": "Seoul" }
                        }
                    }]
                },
                "finishReason": "tool_calls"
            }
        })))
        .mount(&server)
        .await;

    let completion = test_client(&server)
        .chat()
        .create(
            ChatParams::new(
                Model::Hcx005,
                vec![Message::user("What is the weather in Seoul?")],
            )
            .with_tools(vec![Tool::function(FunctionDefinition::new(
                "get_weather",
                "Look up the weather for a city",
                json!({
                    "type": "object",
                    "properties": { "city": { "type": "string" } },
                    "required": ["city"]
                }),
            ))])
            .with_tool_choice(ToolChoice::auto()),
        )
        .await
        .unwrap();

    assert_eq!(completion.finish_reason, Some(FinishReason::ToolCalls));
    let calls = completion.tool_calls().unwrap();
    assert_eq!(calls[0].id, "call-1");
    assert_eq!(calls[0].function.name, "get_weather");
    assert_eq!(calls[0].function.arguments["city"], "Seoul");

    let requests = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["tools"][0]["type"], "function");
    assert_eq!(body["tools"][0]["function"]["name"], "get_weather");
    assert_eq!(
        body["tools"][0]["function"]["parameters"]["required"],
        json!(["city"])
    );
    assert_eq!(body["toolChoice"], "auto");
}

#[tokio::test]
async fn http_401_maps_to_authentication_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = test_client(&server)
        .chat()
        .create(ChatParams::new(Model::Hcx005, vec![Message::user("hi")]))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Authentication(_)));
}

#[tokio::test]
async fn http_429_maps_to_rate_limit_with_retry_after() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "7"))
        .mount(&server)
        .await;

    let err = test_client(&server)
        .chat()
        .create(ChatParams::new(Model::Hcx005, vec![Message::user("hi")]))
        .await
        .unwrap_err();
    match err {
        Error::RateLimit { retry_after, .. } => {
            assert_eq!(retry_after, Some(Duration::from_secs(7)));
        }
        other => panic!("expected RateLimit, got {other:?}"),
    }
}

#[tokio::test]
async fn http_400_surfaces_envelope_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "status": { "code": "40001", "message": "messages must not be empty" }
        })))
        .mount(&server)
        .await;

    let err = test_client(&server)
        .chat()
        .create(ChatParams::new(Model::Hcx005, vec![Message::user("hi")]))
        .await
        .unwrap_err();
    match err {
        Error::InvalidRequest { code, message } => {
            assert_eq!(code, "40001");
            assert_eq!(message, "messages must not be empty");
        }
        other => panic!("expected InvalidRequest, got {other:?}"),
    }
}

#[tokio::test]
async fn vendor_error_inside_http_200_is_mapped() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": { "code": "40100", "message": "invalid api key" }
        })))
        .mount(&server)
        .await;

    let err = test_client(&server)
        .chat()
        .create(ChatParams::new(Model::Hcx005, vec![Message::user("hi")]))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Authentication(_)));
}

#[tokio::test]
async fn server_errors_are_retried_until_success() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_envelope("recovered")))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::builder()
        .api_key(API_KEY)
        .base_url(server.uri())
        .retry_policy(RetryPolicy {
            max_retries: 3,
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(5),
            backoff_factor: 2.0,
            jitter: 0.0,
            respect_retry_after: true,
        })
        .build()
        .unwrap();

    let completion = client
        .chat()
        .create(ChatParams::new(Model::Hcx005, vec![Message::user("hi")]))
        .await
        .unwrap();
    assert_eq!(completion.content(), "recovered");
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
}

#[tokio::test]
async fn auth_failures_are_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::builder()
        .api_key(API_KEY)
        .base_url(server.uri())
        .max_retries(3)
        .build()
        .unwrap();

    let err = client
        .chat()
        .create(ChatParams::new(Model::Hcx005, vec![Message::user("hi")]))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Authentication(_)));
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn capability_mismatch_fails_before_any_request() {
    let server = MockServer::start().await;

    let err = test_client(&server)
        .chat()
        .create(
            ChatParams::new(Model::Hcx005, vec![Message::user("hi")])
                .with_thinking(ThinkingEffort::Low),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::UnsupportedCapability { .. }));
    assert!(server.received_requests().await.unwrap().is_empty());
}
