//! Shared error taxonomy for the embedding pipeline.

use thiserror::Error;

use crate::embeddings::ProviderError;

/// Errors surfaced by the segmentation and assembly pipeline.
///
/// Recoverable conditions (unreadable files, documents that clean to nothing,
/// failed embedding calls) are handled locally with a warning and never reach
/// this type. `EmbedError` covers the failures that abort a run: broken
/// configuration, IO problems, and output serialization.
#[derive(Debug, Error)]
pub enum EmbedError {
    /// The input path or document could not be interpreted.
    #[error("invalid document: {0}")]
    InvalidDocument(String),

    /// The tokenizer backend could not be constructed.
    #[error("tokenizer error: {0}")]
    Tokenizer(String),

    /// The embedding provider rejected its configuration.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// An output artifact could not be rendered.
    ///
    /// Serialization failures are fatal: a partially written artifact is
    /// worse than none.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Filesystem failure while reading inputs or writing artifacts.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
