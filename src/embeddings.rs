//! Embedding provider capability boundary.
//!
//! The pipeline never talks to a vendor SDK directly: anything that can turn
//! text into a fixed-length float vector satisfies [`EmbeddingProvider`].
//! Failures surface as [`ProviderError`] at this boundary and are collapsed to
//! "empty vector, skip" inside the assembler — degrading gracefully is an
//! explicit, testable contract rather than swallowed exceptions.

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised at the provider boundary.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Transport-level failure (connect, timeout, body decode).
    #[error("embedding request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("embedding endpoint returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// The response parsed but carried no embedding data.
    #[error("embedding response contained no data")]
    MissingData,

    /// The provider could not be constructed from its configuration.
    #[error("invalid provider configuration: {0}")]
    Config(String),
}

/// Computes an embedding vector for a piece of text.
///
/// The pipeline always checks the returned vector for emptiness before use;
/// implementations must not panic on provider-side failures. Retry and
/// backoff, where wanted, belong inside the implementation — the pipeline
/// never retries.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Compute the embedding of `text` with the given model.
    async fn embed(&self, text: &str, model: &str) -> Result<Vec<f32>, ProviderError>;

    /// Human-readable provider name for diagnostics.
    fn name(&self) -> &str;
}

/// Client for OpenAI-compatible `/embeddings` endpoints.
pub struct OpenAiEmbeddingProvider {
    client: reqwest::Client,
    endpoint: String,
}

impl OpenAiEmbeddingProvider {
    /// Builds a provider for the endpoint rooted at `base_url`.
    pub fn new(api_key: &str, base_url: &str) -> Result<Self, ProviderError> {
        if api_key.trim().is_empty() {
            return Err(ProviderError::Config("missing API key".to_string()));
        }

        let mut headers = HeaderMap::new();
        let auth = format!("Bearer {}", api_key.trim());
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth)
                .map_err(|err| ProviderError::Config(err.to_string()))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .use_rustls_tls()
            .build()?;

        Ok(Self {
            client,
            endpoint: format!("{}/embeddings", base_url.trim_end_matches('/')),
        })
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: [&'a str; 1],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddingProvider {
    async fn embed(&self, text: &str, model: &str) -> Result<Vec<f32>, ProviderError> {
        let request = EmbeddingRequest {
            model,
            input: [text],
        };
        let response = self.client.post(&self.endpoint).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            return Err(ProviderError::Status { status, body });
        }

        let parsed: EmbeddingResponse = response.json().await?;
        parsed
            .data
            .into_iter()
            .next()
            .map(|entry| entry.embedding)
            .ok_or(ProviderError::MissingData)
    }

    fn name(&self) -> &str {
        "openai"
    }
}

/// Deterministic hash-based provider for tests and offline demos.
///
/// The same text always maps to the same vector, different texts to different
/// vectors with overwhelming likelihood. Optionally fails for texts containing
/// a configured marker so error paths can be exercised.
pub struct MockEmbeddingProvider {
    dimensions: usize,
    fail_marker: Option<String>,
}

impl Default for MockEmbeddingProvider {
    fn default() -> Self {
        Self {
            dimensions: 8,
            fail_marker: None,
        }
    }
}

impl MockEmbeddingProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the dimensionality of generated vectors.
    #[must_use]
    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = dimensions;
        self
    }

    /// Fail any request whose text contains `marker`.
    #[must_use]
    pub fn failing_for(mut self, marker: impl Into<String>) -> Self {
        self.fail_marker = Some(marker.into());
        self
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbeddingProvider {
    async fn embed(&self, text: &str, _model: &str) -> Result<Vec<f32>, ProviderError> {
        if let Some(marker) = &self.fail_marker {
            if text.contains(marker.as_str()) {
                return Err(ProviderError::MissingData);
            }
        }
        Ok(hash_embedding(text, self.dimensions))
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Folds a text hash into a unit-scale float vector.
fn hash_embedding(text: &str, dimensions: usize) -> Vec<f32> {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let mut hasher = DefaultHasher::new();
    text.hash(&mut hasher);
    let seed = hasher.finish();
    (0..dimensions)
        .map(|i| {
            let bits = seed.rotate_left((i % 8) as u32 * 8) ^ ((i as u64) << 24);
            (bits as f32) / u32::MAX as f32
        })
        .collect()
}
