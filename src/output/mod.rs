//! Output serialization for assembled passage records.
//!
//! Two mutually exclusive renders per run:
//!
//! * [`tabular`] — one CSV row per record, embeddings as JSON float arrays.
//! * [`search_index`] — search-engine document payload under a
//!   `{"value": [...]}` envelope, plus the derived index-definition artifact
//!   in [`index_definition`].
//!
//! Unlike the rest of the pipeline, serialization failures are fatal: a
//! partially written artifact is worse than none.

pub mod index_definition;
pub mod search_index;
pub mod tabular;

use std::path::Path;

use crate::assembler::PassageRecord;
use crate::config::OutputFormat;
use crate::types::EmbedError;

pub use index_definition::{DEFAULT_VECTOR_DIMENSION, index_definition, write_index_definition};
pub use search_index::{sanitize_document_id, to_search_documents, write_search_index};
pub use tabular::write_tabular;

/// File extension conventionally used for each render.
pub fn file_extension(format: OutputFormat) -> &'static str {
    match format {
        OutputFormat::Tabular => "csv",
        OutputFormat::SearchIndex => "json",
    }
}

/// Writes the primary output artifact in the configured format.
pub fn write_output(
    path: &Path,
    format: OutputFormat,
    records: &[PassageRecord],
) -> Result<(), EmbedError> {
    match format {
        OutputFormat::Tabular => tabular::write_tabular_file(path, records),
        OutputFormat::SearchIndex => search_index::write_search_index(path, records),
    }
}
