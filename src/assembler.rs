//! Per-document embedding orchestration.
//!
//! [`EmbeddingAssembler`] drives a full run: normalize each document, segment
//! it into passages, request one title embedding plus one embedding per
//! passage, and accumulate [`PassageRecord`]s. Processing is best effort —
//! unusable documents and failed passages are skipped with a warning, they
//! never abort the run.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::EmbedderConfig;
use crate::embeddings::EmbeddingProvider;
use crate::ingestion::DocumentInput;
use crate::normalize::{clean_text, clean_title};
use crate::segmenter::{Segmenter, segmenter_from_config};
use crate::tokenizer::Tokenizer;

/// One successfully embedded passage.
///
/// Invariant: `embedding` is never empty — passages without an embedding are
/// dropped before a record is constructed. `title_embedding` may be empty
/// when the title embedding failed; that is degraded output, not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassageRecord {
    pub document_id: String,
    pub passage_id: usize,
    pub file_path: String,
    pub passage_index: usize,
    pub text: String,
    pub title: String,
    pub title_embedding: Vec<f32>,
    pub embedding: Vec<f32>,
}

/// Counters accumulated over a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub documents_processed: usize,
    pub documents_skipped: usize,
    pub passages_embedded: usize,
    pub passages_dropped: usize,
}

/// Orchestrates normalization, segmentation, and embedding for a document set.
pub struct EmbeddingAssembler {
    config: EmbedderConfig,
    tokenizer: Arc<dyn Tokenizer>,
    segmenter: Box<dyn Segmenter>,
    provider: Arc<dyn EmbeddingProvider>,
}

impl EmbeddingAssembler {
    pub fn new(
        config: EmbedderConfig,
        tokenizer: Arc<dyn Tokenizer>,
        provider: Arc<dyn EmbeddingProvider>,
    ) -> Self {
        let segmenter = segmenter_from_config(&config, tokenizer.clone());
        Self {
            config,
            tokenizer,
            segmenter,
            provider,
        }
    }

    /// Processes every document in order and returns the accumulated records.
    ///
    /// Passage order within a document is index-ascending; no ordering is
    /// guaranteed between documents.
    pub async fn assemble(&self, documents: &[DocumentInput]) -> (Vec<PassageRecord>, RunSummary) {
        let mut records = Vec::new();
        let mut summary = RunSummary::default();

        for (position, document) in documents.iter().enumerate() {
            info!(
                file = position + 1,
                total = documents.len(),
                path = %document.source_path,
                "processing document"
            );
            self.assemble_document(document, &mut records, &mut summary)
                .await;
        }

        info!(
            documents = summary.documents_processed,
            skipped = summary.documents_skipped,
            passages = summary.passages_embedded,
            dropped = summary.passages_dropped,
            provider = self.provider.name(),
            "assembly complete"
        );
        (records, summary)
    }

    async fn assemble_document(
        &self,
        document: &DocumentInput,
        records: &mut Vec<PassageRecord>,
        summary: &mut RunSummary,
    ) {
        let cleaned = clean_text(&document.raw_text);
        if cleaned.is_empty() {
            warn!(path = %document.source_path, "cleaned text is empty, document ignored");
            summary.documents_skipped += 1;
            return;
        }

        let token_count = self.tokenizer.count_tokens(&cleaned);
        debug!(path = %document.source_path, tokens = token_count, "document cleaned");

        let passages = self.segmenter.segment(&cleaned);
        if passages.is_empty() {
            warn!(path = %document.source_path, "no passages produced, document ignored");
            summary.documents_skipped += 1;
            return;
        }

        let title = self.resolve_title(document);
        let title_embedding = self.embed_or_empty(&title).await;
        if title_embedding.is_empty() {
            warn!(title = %title, "no title embedding available, records will omit it");
        }

        let passage_total = passages.len();
        for (index, passage) in passages.into_iter().enumerate() {
            let passage_index = index + 1;
            let embedding = self.embed_or_empty(&passage).await;
            if embedding.is_empty() {
                debug!(
                    passage = passage_index,
                    total = passage_total,
                    "passage embedding unavailable, dropped"
                );
                summary.passages_dropped += 1;
                continue;
            }

            records.push(PassageRecord {
                document_id: title.clone(),
                passage_id: passage_index,
                file_path: document.source_path.clone(),
                passage_index,
                text: passage,
                title: title.clone(),
                title_embedding: title_embedding.clone(),
                embedding,
            });
            summary.passages_embedded += 1;
            debug!(passage = passage_index, total = passage_total, "passage embedded");
        }

        summary.documents_processed += 1;
    }

    /// Cleans the filename stem into a title, falling back to the raw stem so
    /// no record ever carries an empty title.
    fn resolve_title(&self, document: &DocumentInput) -> String {
        let stem = document
            .local_path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();

        let title = clean_title(&stem);
        if !title.is_empty() {
            return title;
        }
        if !stem.is_empty() {
            return stem;
        }
        document.source_path.clone()
    }

    /// Collapses provider failures and empty submissions to an empty vector.
    async fn embed_or_empty(&self, text: &str) -> Vec<f32> {
        if text.trim().is_empty() {
            warn!("empty text submitted for embedding, returning empty vector");
            return Vec::new();
        }
        match self.provider.embed(text, &self.config.model_name).await {
            Ok(embedding) => embedding,
            Err(err) => {
                warn!(error = %err, provider = self.provider.name(), "embedding request failed");
                Vec::new()
            }
        }
    }
}
