//! Token-aware passage segmentation and embedding assembly.
//!
//! ```text
//! Files / wiki tree ──► ingestion::collect_documents ──► DocumentInput
//!
//! DocumentInput ──► normalize::clean_text ──► segmenter (fixed window │ structural overlap)
//!                                  │                        │
//!                                  └── tokenizer ◄──────────┘
//!
//! Passages + title ──► assembler::EmbeddingAssembler ──► PassageRecord set
//!                                  │
//!                                  └─► embeddings::EmbeddingProvider (external capability)
//!
//! PassageRecord set ──► output::tabular (CSV)
//!                   ├─► output::search_index ({"value": [...]})
//!                   └─► output::index_definition (schema artifact)
//! ```

pub mod assembler;
pub mod config;
pub mod embeddings;
pub mod ingestion;
pub mod normalize;
pub mod output;
pub mod segmenter;
pub mod tokenizer;
pub mod types;

pub use assembler::{EmbeddingAssembler, PassageRecord, RunSummary};
pub use config::{EmbedderConfig, OutputFormat};
pub use embeddings::{EmbeddingProvider, MockEmbeddingProvider, OpenAiEmbeddingProvider, ProviderError};
pub use ingestion::{DocumentInput, SourceType, collect_documents};
pub use segmenter::{FixedWindowSegmenter, Segmenter, StructuralOverlapSegmenter};
pub use tokenizer::{Tokenizer, WhitespaceTokenizer};
pub use types::EmbedError;

#[cfg(feature = "tokenizer-tiktoken")]
pub use tokenizer::TiktokenTokenizer;
