//! LangGraph client contract tests
//!
//! These tests pin the HTTP request shape sent to `/runs/stream`, the SSE
//! decoding of streamed node updates, and the status-code error mapping.

use agent_graph::providers::{LangGraphClient, LangGraphConfig};
use agent_graph::{AgentGraph, GraphError, RunRequest, message_name, message_text};
use futures::StreamExt;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const RUN_STREAM: &str = concat!(
    "event: metadata\n",
    "data: {\"run_id\": \"1ef-run\"}\n\n",
    "event: updates\n",
    "data: {\"stock_finder_agent\": {\"messages\": [{\"type\": \"ai\", \"name\": \"stock_finder_agent\", \"content\": \"Selected RELIANCE and TCS for analysis.\"}]}}\n\n",
    "event: updates\n",
    "data: {\"supervisor\": {\"messages\": [{\"type\": \"human\", \"content\": \"Find stocks\"}, {\"type\": \"ai\", \"name\": \"supervisor\", \"content\": \"FINAL VERDICT: BUY\"}]}}\n\n",
    "event: end\n",
    "data: null\n\n"
);

fn client_for(server: &MockServer) -> LangGraphClient {
    let config = LangGraphConfig::new(server.uri()).with_timeout(5);
    LangGraphClient::with_config(config).unwrap()
}

fn sse(body: &'static str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "text/event-stream")
        .set_body_string(body)
}

// ────────────────────────────────────────────────────────────────────────────
// Request format
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_request_includes_run_fields() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/runs/stream"))
        .and(body_partial_json(json!({
            "assistant_id": "supervisor",
            "input": {"messages": [{"role": "user", "content": "Find 2 NSE stocks"}]},
            "stream_mode": ["updates"],
            "config": {"configurable": {"model": "qwen/qwen3-32b", "max_tokens": 1000}}
        })))
        .respond_with(sse(RUN_STREAM))
        .expect(1)
        .mount(&mock_server)
        .await;

    let request = RunRequest::builder()
        .user_message("Find 2 NSE stocks")
        .configurable("model", "qwen/qwen3-32b")
        .configurable("max_tokens", 1000)
        .build();
    let result = client_for(&mock_server).stream(request).await;

    assert!(result.is_ok(), "Request should succeed");
}

#[tokio::test]
async fn test_request_includes_api_key_header() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/runs/stream"))
        .and(header("x-api-key", "lg-test-key"))
        .respond_with(sse(RUN_STREAM))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = LangGraphConfig::new(mock_server.uri()).with_api_key("lg-test-key");
    let client = LangGraphClient::with_config(config).unwrap();
    let result = client.stream(RunRequest::user("Test")).await;

    assert!(result.is_ok());
}

// ────────────────────────────────────────────────────────────────────────────
// Stream decoding
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_stream_yields_node_updates_in_order() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/runs/stream"))
        .respond_with(sse(RUN_STREAM))
        .mount(&mock_server)
        .await;

    let stream = client_for(&mock_server)
        .stream(RunRequest::user("Find stocks"))
        .await
        .unwrap();
    let updates: Vec<_> = stream.map(Result::unwrap).collect().await;

    let nodes: Vec<_> = updates.iter().map(|u| u.node.as_str()).collect();
    assert_eq!(nodes, vec!["stock_finder_agent", "supervisor"]);

    let last = updates[1].last_message().unwrap();
    assert_eq!(message_name(last).as_deref(), Some("supervisor"));
    assert_eq!(message_text(last).as_deref(), Some("FINAL VERDICT: BUY"));
}

#[tokio::test]
async fn test_stream_surfaces_error_event() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/runs/stream"))
        .respond_with(sse(concat!(
            "event: error\n",
            "data: {\"error\": \"GraphRecursionError\", \"message\": \"Recursion limit reached\"}\n\n"
        )))
        .mount(&mock_server)
        .await;

    let stream = client_for(&mock_server)
        .stream(RunRequest::user("Find stocks"))
        .await
        .unwrap();
    let items: Vec<_> = stream.collect().await;

    assert_eq!(items.len(), 1);
    match &items[0] {
        Err(GraphError::RunFailed(msg)) => assert_eq!(msg, "Recursion limit reached"),
        other => panic!("Expected RunFailed, got {other:?}"),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Error handling
// ────────────────────────────────────────────────────────────────────────────

async fn status_error(status: u16, body: &str) -> GraphError {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/runs/stream"))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(&mock_server)
        .await;

    match client_for(&mock_server).stream(RunRequest::user("x")).await {
        Err(err) => err,
        Ok(_) => panic!("Expected HTTP {status} to fail"),
    }
}

#[tokio::test]
async fn test_unauthorized_maps_to_authentication() {
    assert!(matches!(status_error(401, "no key").await, GraphError::AuthenticationFailed));
    assert!(matches!(status_error(403, "forbidden").await, GraphError::AuthenticationFailed));
}

#[tokio::test]
async fn test_missing_assistant_maps_to_not_found() {
    match status_error(404, "{\"detail\": \"Assistant not found\"}").await {
        GraphError::AssistantNotFound(id) => assert_eq!(id, "supervisor"),
        other => panic!("Expected AssistantNotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn test_rate_limit_and_validation_errors() {
    assert!(matches!(
        status_error(429, "slow down").await,
        GraphError::RateLimitExceeded(body) if body == "slow down"
    ));
    assert!(matches!(status_error(422, "bad input").await, GraphError::InvalidRequest(_)));
    assert!(matches!(status_error(400, "bad").await, GraphError::InvalidRequest(_)));
    assert!(matches!(status_error(500, "oops").await, GraphError::RequestFailed(_)));
}
