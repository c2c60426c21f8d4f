//! Run configuration for the embedding pipeline.
//!
//! All tunables live in one immutable [`EmbedderConfig`] value that is threaded
//! explicitly into segmenter and assembler construction. Nothing in the library
//! reads ambient global state.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Default number of tokens shared between consecutive structural chunks.
pub const DEFAULT_OVERLAP_TOKENS: usize = 50;

/// Default embedding model requested from the provider.
pub const DEFAULT_MODEL_NAME: &str = "text-embedding-3-large";

/// Output render selected for a run. The two formats are mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// One CSV row per passage record, embeddings as JSON float arrays.
    Tabular,
    /// Search-index document payload under a `{"value": [...]}` envelope.
    SearchIndex,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "csv" | "tabular" => Ok(Self::Tabular),
            "json" | "search_index" | "search-index" => Ok(Self::SearchIndex),
            other => Err(format!("unknown output format '{other}'")),
        }
    }
}

/// Configuration for a single pipeline run.
///
/// Uses builder-style setters — all are `#[must_use]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedderConfig {
    /// Maximum tokens per passage. Unset means whole documents are embedded
    /// in a single passage.
    pub max_tokens: Option<usize>,
    /// Tokens repeated from the tail of the previous chunk when structural
    /// chunking is enabled.
    pub overlap_tokens: usize,
    /// Selects the structure-aware sliding-overlap segmenter instead of the
    /// fixed token window.
    pub dynamic_chunking: bool,
    /// Model name forwarded to the embedding provider.
    pub model_name: String,
    /// Output render for the run.
    pub output_format: OutputFormat,
    /// When set, an index-definition artifact is generated alongside the
    /// primary output.
    pub index_name: Option<String>,
}

impl Default for EmbedderConfig {
    fn default() -> Self {
        Self {
            max_tokens: None,
            overlap_tokens: DEFAULT_OVERLAP_TOKENS,
            dynamic_chunking: false,
            model_name: DEFAULT_MODEL_NAME.to_string(),
            output_format: OutputFormat::Tabular,
            index_name: None,
        }
    }
}

impl EmbedderConfig {
    /// Create a config with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-passage token budget.
    #[must_use]
    pub fn max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set the overlap window used by structural chunking.
    #[must_use]
    pub fn overlap_tokens(mut self, overlap_tokens: usize) -> Self {
        self.overlap_tokens = overlap_tokens;
        self
    }

    /// Enable or disable structure-aware chunking.
    #[must_use]
    pub fn dynamic_chunking(mut self, enabled: bool) -> Self {
        self.dynamic_chunking = enabled;
        self
    }

    /// Set the embedding model name.
    #[must_use]
    pub fn model_name(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = model_name.into();
        self
    }

    /// Set the output render.
    #[must_use]
    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Request generation of an index-definition artifact.
    #[must_use]
    pub fn index_name(mut self, name: impl Into<String>) -> Self {
        self.index_name = Some(name.into());
        self
    }
}
