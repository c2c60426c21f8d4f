//! End-to-end file embedding pipeline.
//!
//! Reads a file or directory tree, segments each document into token-bounded
//! passages, embeds them, and writes a CSV or search-index JSON artifact.
//! Configuration comes from environment variables:
//!
//! ```text
//! EMBEDDER_INPUT          path to a file or directory (required)
//! EMBEDDER_OUTPUT         output path without extension (required)
//! EMBEDDER_FORMAT         csv | json                      (default: csv)
//! EMBEDDER_MAX_TOKENS     per-passage token budget        (default: unset)
//! EMBEDDER_OVERLAP_TOKENS overlap for dynamic chunking    (default: 50)
//! EMBEDDER_DYNAMIC        1/true enables structural chunking
//! EMBEDDER_MODEL          embedding model name
//! EMBEDDER_INDEX_NAME     also emit an index definition
//! EMBEDDER_WIKI_URL       rewrite file paths into wiki page URLs
//! OPENAI_API_KEY          use a real provider; falls back to the mock
//! OPENAI_BASE_URL         provider endpoint root (default: https://api.openai.com/v1)
//! ```

use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use tracing_subscriber::FmtSubscriber;
use url::Url;

use chunksmith::embeddings::{EmbeddingProvider, MockEmbeddingProvider, OpenAiEmbeddingProvider};
use chunksmith::output::{file_extension, write_index_definition, write_output};
use chunksmith::tokenizer::{TiktokenTokenizer, Tokenizer};
use chunksmith::{
    EmbedError, EmbedderConfig, EmbeddingAssembler, OutputFormat, SourceType, collect_documents,
};

#[tokio::main]
async fn main() -> Result<(), EmbedError> {
    init_tracing();

    let input = PathBuf::from(require_env("EMBEDDER_INPUT")?);
    let output = require_env("EMBEDDER_OUTPUT")?;

    let mut config = EmbedderConfig::new();
    if let Ok(format) = env::var("EMBEDDER_FORMAT") {
        let format: OutputFormat = format.parse().map_err(EmbedError::InvalidDocument)?;
        config = config.output_format(format);
    }
    if let Some(max_tokens) = parse_env::<usize>("EMBEDDER_MAX_TOKENS") {
        config = config.max_tokens(max_tokens);
    }
    if let Some(overlap) = parse_env::<usize>("EMBEDDER_OVERLAP_TOKENS") {
        config = config.overlap_tokens(overlap);
    }
    if env_flag("EMBEDDER_DYNAMIC") {
        config = config.dynamic_chunking(true);
    }
    if let Ok(model) = env::var("EMBEDDER_MODEL") {
        config = config.model_name(model);
    }
    if let Ok(index_name) = env::var("EMBEDDER_INDEX_NAME") {
        config = config.index_name(index_name);
    }

    let source = match env::var("EMBEDDER_WIKI_URL") {
        Ok(raw) => {
            let base_url =
                Url::parse(&raw).map_err(|err| EmbedError::InvalidDocument(err.to_string()))?;
            SourceType::Wiki { base_url }
        }
        Err(_) => SourceType::Filesystem,
    };

    let provider: Arc<dyn EmbeddingProvider> = match env::var("OPENAI_API_KEY") {
        Ok(key) => {
            let base = env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string());
            Arc::new(OpenAiEmbeddingProvider::new(&key, &base)?)
        }
        Err(_) => {
            println!("OPENAI_API_KEY not set, using deterministic mock embeddings");
            Arc::new(MockEmbeddingProvider::new())
        }
    };

    let tokenizer: Arc<dyn Tokenizer> = Arc::new(TiktokenTokenizer::new()?);

    let start = Instant::now();
    let documents = collect_documents(&input, &source).await?;
    let assembler = EmbeddingAssembler::new(config.clone(), tokenizer, provider);
    let (records, summary) = assembler.assemble(&documents).await;

    if let Some(index_name) = &config.index_name {
        let index_path = PathBuf::from(format!("{output}_index_definition.json"));
        write_index_definition(&index_path, index_name, &records)?;
        println!("index definition : {}", index_path.display());
    }

    let output_path = PathBuf::from(format!(
        "{output}.{}",
        file_extension(config.output_format)
    ));
    write_output(&output_path, config.output_format, &records)?;

    println!("\nEmbedding run complete");
    println!("  documents processed : {}", summary.documents_processed);
    println!("  documents skipped   : {}", summary.documents_skipped);
    println!("  passages embedded   : {}", summary.passages_embedded);
    println!("  passages dropped    : {}", summary.passages_dropped);
    println!("  output file         : {}", output_path.display());
    println!("  duration            : {:.2?}", start.elapsed());

    Ok(())
}

fn init_tracing() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let subscriber = FmtSubscriber::builder().with_env_filter("info").finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    });
}

fn require_env(key: &str) -> Result<String, EmbedError> {
    env::var(key).map_err(|_| EmbedError::InvalidDocument(format!("{key} must be set")))
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|value| value.parse().ok())
}

fn env_flag(key: &str) -> bool {
    env::var(key)
        .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}
