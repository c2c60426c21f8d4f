//! Input collaborators for the embedding pipeline.
//!
//! * [`sources`] — filesystem document collection and wiki URL rewriting.
//!
//! The pipeline core consumes a sequence of [`DocumentInput`] values and never
//! performs filesystem traversal itself.

pub mod sources;

pub use sources::{DocumentInput, SourceType, collect_documents, wiki_page_url};
