//! Reversible text↔token-id codecs used for chunk-size accounting.
//!
//! The [`Tokenizer`] trait is a capability boundary: any sub-word tokenizer
//! can satisfy it. All chunking math in this crate operates on token counts,
//! never on characters or words. `decode(encode(x))` is not guaranteed to be
//! byte-identical to `x` (sub-word tokenizers may normalize), but
//! `encode(x).len()` must be deterministic for a given input.

use std::collections::HashMap;
use std::sync::Mutex;

use thiserror::Error;

/// Failure decoding a token-id sequence back into text.
#[derive(Debug, Error)]
pub enum TokenizerError {
    #[error("failed to decode token ids: {0}")]
    Decode(String),
}

/// Text↔token-id codec and token counter.
pub trait Tokenizer: Send + Sync {
    /// Encode text into token ids.
    fn encode(&self, text: &str) -> Vec<u32>;

    /// Decode token ids back into text.
    ///
    /// Slicing a token sequence at an arbitrary boundary can produce ids that
    /// no longer decode to valid UTF-8; implementations report that as an
    /// error rather than panicking.
    fn decode(&self, ids: &[u32]) -> Result<String, TokenizerError>;

    /// Stable token count for chunk-size accounting.
    fn count_tokens(&self, text: &str) -> usize {
        self.encode(text).len()
    }
}

/// `cl100k_base` BPE tokenizer backed by `tiktoken-rs`.
#[cfg(feature = "tokenizer-tiktoken")]
pub struct TiktokenTokenizer {
    bpe: tiktoken_rs::CoreBPE,
}

#[cfg(feature = "tokenizer-tiktoken")]
impl TiktokenTokenizer {
    /// Loads the `cl100k_base` encoding.
    pub fn new() -> Result<Self, crate::types::EmbedError> {
        let bpe = tiktoken_rs::cl100k_base()
            .map_err(|err| crate::types::EmbedError::Tokenizer(err.to_string()))?;
        Ok(Self { bpe })
    }
}

#[cfg(feature = "tokenizer-tiktoken")]
impl Tokenizer for TiktokenTokenizer {
    fn encode(&self, text: &str) -> Vec<u32> {
        self.bpe.encode_with_special_tokens(text)
    }

    fn decode(&self, ids: &[u32]) -> Result<String, TokenizerError> {
        self.bpe
            .decode(ids.to_vec())
            .map_err(|err| TokenizerError::Decode(err.to_string()))
    }
}

/// Deterministic word-level codec for tests and offline demos.
///
/// Each whitespace-separated word is interned into a growing vocabulary, so
/// one token is exactly one word. Not a sub-word tokenizer — useful wherever
/// token arithmetic must be predictable without model data.
#[derive(Default)]
pub struct WhitespaceTokenizer {
    vocab: Mutex<Vocab>,
}

#[derive(Default)]
struct Vocab {
    words: Vec<String>,
    ids: HashMap<String, u32>,
}

impl WhitespaceTokenizer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Tokenizer for WhitespaceTokenizer {
    fn encode(&self, text: &str) -> Vec<u32> {
        let mut vocab = self.vocab.lock().expect("tokenizer vocab poisoned");
        text.split_whitespace()
            .map(|word| match vocab.ids.get(word) {
                Some(id) => *id,
                None => {
                    let id = vocab.words.len() as u32;
                    vocab.words.push(word.to_string());
                    vocab.ids.insert(word.to_string(), id);
                    id
                }
            })
            .collect()
    }

    fn decode(&self, ids: &[u32]) -> Result<String, TokenizerError> {
        let vocab = self.vocab.lock().expect("tokenizer vocab poisoned");
        let mut words = Vec::with_capacity(ids.len());
        for id in ids {
            let word = vocab
                .words
                .get(*id as usize)
                .ok_or_else(|| TokenizerError::Decode(format!("unknown token id {id}")))?;
            words.push(word.as_str());
        }
        Ok(words.join(" "))
    }
}
