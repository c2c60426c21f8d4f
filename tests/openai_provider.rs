//! HTTP-level tests for the OpenAI-compatible embedding provider.

use chunksmith::embeddings::{EmbeddingProvider, OpenAiEmbeddingProvider, ProviderError};
use httpmock::prelude::*;
use serde_json::json;

#[tokio::test]
async fn embed_parses_successful_response() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/embeddings")
                .header("authorization", "Bearer test-key")
                .json_body_partial(r#"{"model": "text-embedding-3-large"}"#);
            then.status(200).json_body(json!({
                "data": [{ "embedding": [0.25, -0.5, 0.75], "index": 0 }]
            }));
        })
        .await;

    let provider = OpenAiEmbeddingProvider::new("test-key", &server.base_url()).unwrap();
    let embedding = provider
        .embed("hello world", "text-embedding-3-large")
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(embedding, vec![0.25, -0.5, 0.75]);
}

#[tokio::test]
async fn embed_surfaces_error_status_with_body() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/embeddings");
            then.status(429).body("rate limited");
        })
        .await;

    let provider = OpenAiEmbeddingProvider::new("test-key", &server.base_url()).unwrap();
    let err = provider.embed("text", "model").await.unwrap_err();

    match err {
        ProviderError::Status { status, body } => {
            assert_eq!(status.as_u16(), 429);
            assert_eq!(body, "rate limited");
        }
        other => panic!("expected status error, got {other}"),
    }
}

#[tokio::test]
async fn embed_reports_missing_data() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/embeddings");
            then.status(200).json_body(json!({ "data": [] }));
        })
        .await;

    let provider = OpenAiEmbeddingProvider::new("test-key", &server.base_url()).unwrap();
    let err = provider.embed("text", "model").await.unwrap_err();
    assert!(matches!(err, ProviderError::MissingData));
}
