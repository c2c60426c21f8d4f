//! End-to-end pipeline tests with mock embeddings.
//!
//! Everything runs against the deterministic word-level tokenizer and the
//! hashing mock provider so token arithmetic and record contents are exactly
//! predictable without network access or model data.

use std::path::PathBuf;
use std::sync::Arc;

use chunksmith::embeddings::MockEmbeddingProvider;
use chunksmith::ingestion::DocumentInput;
use chunksmith::output::{
    DEFAULT_VECTOR_DIMENSION, index_definition, sanitize_document_id, to_search_documents,
    write_tabular,
};
use chunksmith::tokenizer::WhitespaceTokenizer;
use chunksmith::{EmbedderConfig, EmbeddingAssembler, PassageRecord};

fn words(prefix: &str, count: usize) -> String {
    (0..count)
        .map(|i| format!("{prefix}{i}"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn document(name: &str, raw_text: &str) -> DocumentInput {
    DocumentInput {
        source_path: format!("/docs/{name}"),
        local_path: PathBuf::from(format!("/docs/{name}")),
        raw_text: raw_text.to_string(),
    }
}

fn assembler(config: EmbedderConfig, provider: MockEmbeddingProvider) -> EmbeddingAssembler {
    EmbeddingAssembler::new(
        config,
        Arc::new(WhitespaceTokenizer::new()),
        Arc::new(provider),
    )
}

#[tokio::test]
async fn fixed_window_produces_contiguous_indexed_records() {
    let config = EmbedderConfig::new().max_tokens(100);
    let assembler = assembler(config, MockEmbeddingProvider::new());

    let documents = vec![document("guide.md", &words("w", 250))];
    let (records, summary) = assembler.assemble(&documents).await;

    assert_eq!(records.len(), 3);
    assert_eq!(summary.documents_processed, 1);
    assert_eq!(summary.passages_embedded, 3);

    for (i, record) in records.iter().enumerate() {
        assert_eq!(record.passage_index, i + 1);
        assert_eq!(record.passage_id, i + 1);
        assert_eq!(record.document_id, "guide");
        assert_eq!(record.title, "guide");
        assert!(!record.embedding.is_empty());
    }
}

#[tokio::test]
async fn whole_document_under_budget_yields_single_record() {
    let config = EmbedderConfig::new();
    let assembler = assembler(config, MockEmbeddingProvider::new());

    let (records, _) = assembler
        .assemble(&[document("small.md", "just a few words here")])
        .await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].text, "just a few words here");
}

#[tokio::test]
async fn empty_document_is_skipped_and_run_continues() {
    let config = EmbedderConfig::new();
    let assembler = assembler(config, MockEmbeddingProvider::new());

    let documents = vec![
        document("empty.md", "<html><body></body></html>"),
        document("real.md", "actual content survives"),
    ];
    let (records, summary) = assembler.assemble(&documents).await;

    assert_eq!(summary.documents_skipped, 1);
    assert_eq!(summary.documents_processed, 1);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].document_id, "real");
}

#[tokio::test]
async fn failed_passage_embeddings_are_dropped_not_fatal() {
    // The marker word only appears in the final window.
    let config = EmbedderConfig::new().max_tokens(10);
    let provider = MockEmbeddingProvider::new().failing_for("poison");
    let assembler = assembler(config, provider);

    let text = format!("{} poison trailing words", words("w", 18));
    let (records, summary) = assembler.assemble(&[document("doc.md", &text)]).await;

    assert_eq!(summary.passages_dropped, 1);
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| !r.text.contains("poison")));
    // Sibling passages keep their original indices; the drop leaves a gap.
    assert_eq!(
        records.iter().map(|r| r.passage_index).collect::<Vec<_>>(),
        vec![1, 3]
    );
}

#[tokio::test]
async fn title_embedding_failure_degrades_to_empty_vector() {
    let config = EmbedderConfig::new();
    // The title of "notes.md" is "notes"; fail exactly that text.
    let provider = MockEmbeddingProvider::new().failing_for("notes");
    let assembler = assembler(config, provider);

    let (records, _) = assembler
        .assemble(&[document("notes.md", "body text without the marker")])
        .await;

    assert_eq!(records.len(), 1);
    assert!(records[0].title_embedding.is_empty());
    assert!(!records[0].embedding.is_empty());

    // Serialization must carry the empty vector through, never crash.
    let payload = to_search_documents(&records);
    assert_eq!(
        payload["value"][0]["title_vector"].as_array().unwrap().len(),
        0
    );
    let mut buffer = Vec::new();
    write_tabular(&mut buffer, &records).unwrap();
}

#[tokio::test]
async fn dirty_title_is_cleaned_with_stem_fallback() {
    let config = EmbedderConfig::new();
    let assembler = assembler(config, MockEmbeddingProvider::new());

    let documents = vec![DocumentInput {
        source_path: "/docs/Getting%20Started-guide.md".to_string(),
        local_path: PathBuf::from("/docs/Getting%20Started-guide.md"),
        raw_text: "some content".to_string(),
    }];
    let (records, _) = assembler.assemble(&documents).await;
    assert_eq!(records[0].title, "Getting Started guide");
}

#[tokio::test]
async fn search_index_round_trips_scalar_fields() {
    let config = EmbedderConfig::new().max_tokens(50).dynamic_chunking(true);
    let assembler = assembler(config, MockEmbeddingProvider::new());

    let text = format!("{}\n\n{}", words("alpha", 30), words("beta", 30));
    let (records, _) = assembler.assemble(&[document("round_trip.md", &text)]).await;
    assert!(!records.is_empty());

    let payload = to_search_documents(&records);
    let rendered = serde_json::to_string(&payload).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();
    let documents = parsed["value"].as_array().unwrap();
    assert_eq!(documents.len(), records.len());

    for (doc, record) in documents.iter().zip(&records) {
        assert_eq!(doc["content"], record.text.as_str());
        assert_eq!(doc["file_path"], record.file_path.as_str());
        assert_eq!(doc["title"], record.title.as_str());
        assert_eq!(doc["chunk"].as_u64().unwrap() as usize, record.passage_index);
        assert_eq!(doc["passage_id"].as_u64().unwrap() as usize, record.passage_id);
    }
}

#[test]
fn sanitize_is_idempotent_and_never_leads_with_underscore() {
    for raw in ["My Doc_1", "___x", "a/b\\c", "ok-id=2", "%%%"] {
        let once = sanitize_document_id(raw);
        assert_eq!(sanitize_document_id(&once), once);
        assert!(!once.starts_with('_'));
    }
}

#[test]
fn index_definition_uses_default_dimension_without_records() {
    let records: Vec<PassageRecord> = Vec::new();
    let dimension = chunksmith::output::index_definition::vector_dimension(&records);
    assert_eq!(dimension, DEFAULT_VECTOR_DIMENSION);

    let definition = index_definition("empty-run", dimension);
    let fields = definition["fields"].as_array().unwrap();
    let vector = fields.iter().find(|f| f["name"] == "vector").unwrap();
    assert_eq!(vector["dimensions"].as_u64().unwrap() as usize, 1536);
}

#[tokio::test]
async fn index_definition_tracks_observed_dimension() {
    let config = EmbedderConfig::new();
    let provider = MockEmbeddingProvider::new().with_dimensions(12);
    let assembler = assembler(config, provider);

    let (records, _) = assembler.assemble(&[document("dims.md", "some text")]).await;
    let dimension = chunksmith::output::index_definition::vector_dimension(&records);
    assert_eq!(dimension, 12);
}
