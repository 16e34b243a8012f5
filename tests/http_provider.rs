//! Tests for the hosted HTTP provider against a mockito server.

use compass_ai::{
    AiClient, GenerateOptions, HostedModelProvider, ModelProvider, Payload, ProviderError,
};
use mockito::{Matcher, Server};
use std::sync::Arc;

const GENERATE_PATH: &str = "/models/test-model:generateContent";

fn provider_for(server: &Server) -> HostedModelProvider {
    HostedModelProvider::with_base_url("test-model", server.url())
        .expect("mock server URL is valid")
        .with_api_key("test-key")
}

fn candidate_body(text: &str) -> String {
    serde_json::json!({
        "candidates": [{
            "content": { "parts": [{ "text": text }] }
        }]
    })
    .to_string()
}

#[tokio::test]
async fn call_model_returns_candidate_text() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", GENERATE_PATH)
        .match_query(Matcher::UrlEncoded("key".into(), "test-key".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(candidate_body("Consider a gap year program."))
        .create_async()
        .await;

    let provider = provider_for(&server);
    let text = provider.call_model("advise me").await.unwrap();

    assert_eq!(text, "Consider a gap year program.");
    mock.assert_async().await;
}

#[tokio::test]
async fn non_success_status_is_preserved() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", GENERATE_PATH)
        .match_query(Matcher::Any)
        .with_status(429)
        .with_body("{\"error\": {\"message\": \"quota exceeded\"}}")
        .create_async()
        .await;

    let provider = provider_for(&server);
    let err = provider.call_model("advise me").await.unwrap_err();

    assert_eq!(err.status(), Some(429));
    match err {
        ProviderError::Status { message, .. } => assert!(message.contains("quota exceeded")),
        other => panic!("expected Status, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_candidates_is_empty_response() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", GENERATE_PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("{\"candidates\": []}")
        .create_async()
        .await;

    let provider = provider_for(&server);
    let err = provider.call_model("advise me").await.unwrap_err();

    assert!(matches!(err, ProviderError::EmptyResponse));
}

#[tokio::test]
async fn missing_api_key_fails_without_network() {
    // No key injected and the request would 500 anyway; the call must
    // fail before dispatch.
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", GENERATE_PATH)
        .match_query(Matcher::Any)
        .with_status(500)
        .expect(0)
        .create_async()
        .await;

    let provider = HostedModelProvider::with_base_url("test-model", server.url()).unwrap();
    // Only run the no-key assertion when the environment has no ambient
    // credentials; CI images sometimes export GOOGLE_API_KEY.
    if std::env::var("COMPASS_AI_API_KEY").is_err()
        && std::env::var("GEMINI_API_KEY").is_err()
        && std::env::var("GOOGLE_API_KEY").is_err()
    {
        let err = provider.call_model("advise me").await.unwrap_err();
        assert!(matches!(err, ProviderError::MissingApiKey { .. }));
        mock.assert_async().await;
    }
}

#[tokio::test]
async fn end_to_end_generate_through_http_provider() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", GENERATE_PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(candidate_body("```json\n{\"courses\": [\"CS101\"]}\n```"))
        .expect(1)
        .create_async()
        .await;

    let client = AiClient::new(Arc::new(provider_for(&server)));
    let options = GenerateOptions::structured().with_context("course_selection");

    let first = client.generate("recommend courses", options.clone()).await.unwrap();
    // Second call is served from cache; mockito's expect(1) would fail
    // the assertion below if the provider were hit twice.
    let second = client.generate("recommend courses", options).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(
        first,
        Payload::Structured(serde_json::json!({"courses": ["CS101"]}))
    );
    _mock.assert_async().await;
}
