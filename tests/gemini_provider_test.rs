// ABOUTME: HTTP-level tests for the Gemini provider against a wiremock server
// ABOUTME: Verifies request shape, header authentication, and typed failure mapping
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Wellness Insights Contributors

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::error::Error;

use serde_json::json;
use url::Url;
use wellness_insights::config::{ApiKey, GenerationSettings, ProviderConfig};
use wellness_insights::errors::ProviderError;
use wellness_insights::llm::{ChatMessage, ChatRequest, GeminiProvider, LlmProvider};
use wiremock::matchers::{body_partial_json, header, method, path, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TEST_KEY: &str = "test-gemini-key";

fn provider_for(server: &MockServer) -> GeminiProvider {
    GeminiProvider::new(ProviderConfig {
        base_url: Url::parse(&server.uri()).unwrap(),
        api_key: ApiKey::new(TEST_KEY),
        model: "gemini-test".to_owned(),
        generation: GenerationSettings {
            temperature: 0.8,
            top_p: 0.95,
            max_tokens: 2048,
        },
    })
    .unwrap()
}

fn question() -> ChatRequest {
    ChatRequest::new(vec![
        ChatMessage::system("You are a wellness AI."),
        ChatMessage::user("Why is my HRV low?"),
    ])
}

fn candidate(text: &str) -> serde_json::Value {
    json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": text}]},
            "finishReason": "STOP"
        }],
        "usageMetadata": {
            "promptTokenCount": 12,
            "candidatesTokenCount": 8,
            "totalTokenCount": 20
        }
    })
}

// ============================================================================
// Successful calls
// ============================================================================

#[tokio::test]
async fn test_generate_content_request_shape() -> Result<(), Box<dyn Error>> {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/gemini-test:generateContent"))
        .and(header("x-goog-api-key", TEST_KEY))
        .and(query_param_is_missing("key"))
        .and(body_partial_json(json!({
            "contents": [{"role": "user", "parts": [{"text": "Why is my HRV low?"}]}],
            "systemInstruction": {"parts": [{"text": "You are a wellness AI."}]},
            "generationConfig": {"temperature": 0.8, "topP": 0.95, "maxOutputTokens": 2048}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate("Stress lowers HRV.")))
        .expect(1)
        .mount(&server)
        .await;

    let response = provider_for(&server).complete(&question()).await?;

    assert_eq!(response.content, "Stress lowers HRV.");
    assert_eq!(response.model, "gemini-test");
    assert_eq!(response.finish_reason.as_deref(), Some("STOP"));
    assert_eq!(response.usage.map(|u| u.total_tokens), Some(20));

    Ok(())
}

#[tokio::test]
async fn test_json_mode_sets_response_mime_type() -> Result<(), Box<dyn Error>> {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "generationConfig": {"responseMimeType": "application/json"}
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(candidate(r#"{"insight":"a"}"#)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let response = provider_for(&server)
        .complete(&question().with_json_mode())
        .await?;

    assert_eq!(response.content, r#"{"insight":"a"}"#);
    Ok(())
}

#[tokio::test]
async fn test_assistant_turns_use_model_role() -> Result<(), Box<dyn Error>> {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "contents": [
                {"role": "user", "parts": [{"text": "How did I sleep?"}]},
                {"role": "model", "parts": [{"text": "Well."}]},
                {"role": "user", "parts": [{"text": "And HRV?"}]}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate("Steady.")))
        .expect(1)
        .mount(&server)
        .await;

    let request = ChatRequest::new(vec![
        ChatMessage::user("How did I sleep?"),
        ChatMessage::assistant("Well."),
        ChatMessage::user("And HRV?"),
    ]);
    let response = provider_for(&server).complete(&request).await?;

    assert_eq!(response.content, "Steady.");
    Ok(())
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn test_empty_candidate_is_empty_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"candidates": []})))
        .mount(&server)
        .await;

    let error = provider_for(&server)
        .complete(&question())
        .await
        .unwrap_err();

    assert_eq!(error, ProviderError::EmptyResponse { provider: "gemini" });
}

#[tokio::test]
async fn test_blank_text_is_empty_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate("   ")))
        .mount(&server)
        .await;

    let error = provider_for(&server)
        .complete(&question())
        .await
        .unwrap_err();

    assert!(matches!(error, ProviderError::EmptyResponse { .. }));
}

#[tokio::test]
async fn test_server_error_is_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("backend unavailable"))
        .mount(&server)
        .await;

    let error = provider_for(&server)
        .complete(&question())
        .await
        .unwrap_err();

    match error {
        ProviderError::Status { status, body, .. } => {
            assert_eq!(status, 500);
            assert_eq!(body, "backend unavailable");
        }
        other => panic!("expected Status, got {other:?}"),
    }
}

#[tokio::test]
async fn test_undecodable_body_is_invalid_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let error = provider_for(&server)
        .complete(&question())
        .await
        .unwrap_err();

    assert!(matches!(error, ProviderError::InvalidResponse { .. }));
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    let provider = GeminiProvider::new(ProviderConfig {
        base_url: Url::parse("http://127.0.0.1:1").unwrap(),
        api_key: ApiKey::new(TEST_KEY),
        model: "gemini-test".to_owned(),
        generation: GenerationSettings {
            temperature: 0.8,
            top_p: 0.95,
            max_tokens: 2048,
        },
    })
    .unwrap();

    let error = provider.complete(&question()).await.unwrap_err();

    match error {
        ProviderError::Transport { message, .. } => assert!(!message.contains(TEST_KEY)),
        other => panic!("expected Transport, got {other:?}"),
    }
}

#[tokio::test]
async fn test_debug_output_redacts_api_key() {
    let server = MockServer::start().await;
    let rendered = format!("{:?}", provider_for(&server));

    assert!(!rendered.contains(TEST_KEY));
    assert!(rendered.contains("[REDACTED]"));
}
