//! Passage segmentation strategies.
//!
//! Two interchangeable strategies turn normalized text into an ordered
//! sequence of passages:
//!
//! * [`FixedWindowSegmenter`] — strict contiguous tiling of the token stream.
//! * [`StructuralOverlapSegmenter`] — paragraph-aware accumulation with a
//!   sliding token overlap between chunks.
//!
//! Both fail safe: on any internal error they log a warning and return an
//! empty sequence, which callers treat as "skip this document".

use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::EmbedderConfig;
use crate::tokenizer::Tokenizer;

/// Produces an ordered sequence of passages from normalized text.
///
/// Passage order must match the order the text appears in the source.
pub trait Segmenter: Send + Sync {
    fn segment(&self, text: &str) -> Vec<String>;
}

/// Builds the segmenter selected by the run configuration.
pub fn segmenter_from_config(
    config: &EmbedderConfig,
    tokenizer: Arc<dyn Tokenizer>,
) -> Box<dyn Segmenter> {
    if config.dynamic_chunking {
        Box::new(StructuralOverlapSegmenter::new(
            tokenizer,
            config.max_tokens,
            config.overlap_tokens,
        ))
    } else {
        Box::new(FixedWindowSegmenter::new(tokenizer, config.max_tokens))
    }
}

/// Slices the token stream into consecutive, non-overlapping windows of
/// exactly `max_tokens` tokens; the final window absorbs the remainder.
///
/// When `max_tokens` is unset, or the document fits the budget, the whole
/// document is returned as a single passage.
pub struct FixedWindowSegmenter {
    tokenizer: Arc<dyn Tokenizer>,
    max_tokens: Option<usize>,
}

impl FixedWindowSegmenter {
    pub fn new(tokenizer: Arc<dyn Tokenizer>, max_tokens: Option<usize>) -> Self {
        Self {
            tokenizer,
            max_tokens,
        }
    }
}

impl Segmenter for FixedWindowSegmenter {
    fn segment(&self, text: &str) -> Vec<String> {
        let tokens = self.tokenizer.encode(text);
        let Some(max_tokens) = self.max_tokens.filter(|max| *max > 0) else {
            return vec![text.to_string()];
        };
        if tokens.len() <= max_tokens {
            return vec![text.to_string()];
        }

        let total_windows = tokens.len().div_ceil(max_tokens);
        let mut passages = Vec::with_capacity(total_windows);
        for window in tokens.chunks(max_tokens) {
            match self.tokenizer.decode(window) {
                Ok(passage) => {
                    debug!(
                        window = passages.len() + 1,
                        total = total_windows,
                        "decoded fixed window"
                    );
                    passages.push(passage);
                }
                Err(err) => {
                    warn!(error = %err, "failed to decode token window, skipping document");
                    return Vec::new();
                }
            }
        }
        passages
    }
}

/// Splits on blank-line boundaries and accumulates paragraphs into chunks,
/// seeding each new chunk with the trailing `overlap_tokens` tokens of the
/// previous one to preserve cross-chunk context.
///
/// Known limitation, preserved deliberately: a single paragraph larger than
/// `max_tokens` is appended whole — the algorithm never splits inside a
/// structural unit, so such a chunk exceeds the budget. An `overlap_tokens`
/// larger than `max_tokens` degenerates to reusing the entire previous chunk
/// as the seed.
pub struct StructuralOverlapSegmenter {
    tokenizer: Arc<dyn Tokenizer>,
    max_tokens: Option<usize>,
    overlap_tokens: usize,
}

impl StructuralOverlapSegmenter {
    pub fn new(
        tokenizer: Arc<dyn Tokenizer>,
        max_tokens: Option<usize>,
        overlap_tokens: usize,
    ) -> Self {
        Self {
            tokenizer,
            max_tokens,
            overlap_tokens,
        }
    }
}

impl Segmenter for StructuralOverlapSegmenter {
    fn segment(&self, text: &str) -> Vec<String> {
        // Without a budget there is nothing to accumulate against; behave
        // like the fixed strategy and emit the whole document.
        let Some(max_tokens) = self.max_tokens.filter(|max| *max > 0) else {
            return vec![text.to_string()];
        };

        let mut chunks = Vec::new();
        let mut buffer = String::new();
        let mut buffer_tokens = 0usize;

        for unit in text.split("\n\n") {
            let unit_tokens = self.tokenizer.count_tokens(unit);

            if buffer_tokens + unit_tokens > max_tokens && !buffer.trim().is_empty() {
                chunks.push(buffer.trim().to_string());

                let buffer_ids = self.tokenizer.encode(&buffer);
                let seed_start = buffer_ids.len().saturating_sub(self.overlap_tokens);
                buffer = match self.tokenizer.decode(&buffer_ids[seed_start..]) {
                    Ok(seed) => seed,
                    Err(err) => {
                        warn!(error = %err, "failed to decode overlap window, skipping document");
                        return Vec::new();
                    }
                };
                // Token accounting restarts from the seed's own length.
                buffer_tokens = self.tokenizer.count_tokens(&buffer);
            }

            if !buffer.is_empty() {
                buffer.push(' ');
            }
            buffer.push_str(unit);
            buffer_tokens += unit_tokens;
        }

        if !buffer.trim().is_empty() {
            chunks.push(buffer.trim().to_string());
        }

        debug!(chunks = chunks.len(), "structural segmentation complete");
        chunks
    }
}
