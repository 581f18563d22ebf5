//! Tests for the Bedrock adapter

use std::time::Duration;

use serde_json::json;
use shared::{ApiFailure, FinishStatus, ProviderId};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::mock_settings;
use crate::services::bedrock_adapter::{BedrockAdapter, INPUT_TOKENS_HEADER, OUTPUT_TOKENS_HEADER};
use crate::traits::ProviderAdapter;
use crate::types::RawProviderResponse;

fn adapter_for(server: &MockServer) -> BedrockAdapter {
    BedrockAdapter::new(mock_settings(ProviderId::Anthropic, &server.uri()), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_build_request_prefills_assistant_turn() {
    let server = MockServer::start().await;
    let adapter = adapter_for(&server);

    let request = adapter.build_request("Salon U is an award-winning salon", 2);

    assert_eq!(request.url, format!("{}/model/anthropic.claude-v2/invoke", server.uri()));
    assert_eq!(request.body["stop_sequences"], json!(["}}"]));
    assert_eq!(request.body["max_tokens_to_sample"], 512);

    let prompt = request.body["prompt"].as_str().unwrap();
    assert!(prompt.starts_with("\n\nHuman: "));
    assert!(prompt.contains("<text>Salon U is an award-winning salon</text>"));
    assert!(prompt.ends_with("Assistant: {"));
}

#[tokio::test]
async fn test_invoke_round_trip_with_header_usage() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/model/anthropic.claude-v2/invoke"))
        .and(header("authorization", "Bearer test-key"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header(INPUT_TOKENS_HEADER, "42")
                .insert_header(OUTPUT_TOKENS_HEADER, "17")
                .set_body_json(json!({
                    "completion": " \"messages\": [\"Salon U, award-winning.\", \"Meet Salon U.\"]",
                    "stop_reason": "stop_sequence",
                    "stop": "}}"
                })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let adapter = adapter_for(&server);
    let request = adapter.build_request("Salon U is an award-winning salon", 2);
    let raw = adapter.send(&request).await.unwrap();
    let result = adapter.parse(raw, 2).unwrap();

    assert_eq!(result.finish, FinishStatus::Success);
    assert_eq!(result.candidates, vec!["Salon U, award-winning.", "Meet Salon U."]);
    assert_eq!(result.usage.prompt_tokens, 42);
    assert_eq!(result.usage.completion_tokens, 17);
}

#[test]
fn test_max_tokens_is_truncated() {
    let adapter =
        BedrockAdapter::new(mock_settings(ProviderId::Anthropic, "http://localhost:1"), Duration::from_secs(5)).unwrap();

    let raw = RawProviderResponse::new(
        json!({ "completion": "\"messages\": [\"half", "stop_reason": "max_tokens" }),
        Duration::from_millis(5),
    );
    let result = adapter.parse(raw, 2).unwrap();

    assert_eq!(result.finish, FinishStatus::Truncated);
    assert!(result.candidates.is_empty());
    assert_eq!(result.usage.total(), 0);
}

#[tokio::test]
async fn test_estimate_uses_count_tokens() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/model/anthropic.claude-v2/count-tokens"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "inputTokens": 77 })))
        .expect(1)
        .mount(&server)
        .await;

    let adapter = adapter_for(&server);
    assert_eq!(adapter.estimate_tokens("Salon U", 2).await.unwrap(), 77);

    let requests = server.received_requests().await.unwrap_or_default();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let inner = body["input"]["invokeModel"]["body"].as_str().unwrap();
    assert!(inner.contains("<text>Salon U</text>"));
}

#[tokio::test]
async fn test_forbidden_is_auth_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({ "message": "invalid token" })))
        .mount(&server)
        .await;

    let adapter = adapter_for(&server);
    let request = adapter.build_request("hello salon", 2);

    assert_eq!(adapter.send(&request).await, Err(ApiFailure::AuthenticationFailed));
    assert_eq!(adapter.estimate_tokens("hello", 2).await, Err(ApiFailure::AuthenticationFailed));
}
