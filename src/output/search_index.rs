//! Search-index document payload render.

use std::path::Path;

use serde_json::{Value, json};
use tracing::info;

use crate::assembler::PassageRecord;
use crate::types::EmbedError;

/// Replaces characters a search engine rejects in document keys and strips
/// leading underscores.
///
/// Idempotent by construction. Known limitation: two raw ids differing only
/// in stripped characters can collide after sanitization.
pub fn sanitize_document_id(raw: &str) -> String {
    let sanitized: String = raw
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '=') {
                c
            } else {
                '_'
            }
        })
        .collect();
    sanitized.trim_start_matches('_').to_string()
}

/// Builds the `{"value": [...]}` upload envelope from the record set.
pub fn to_search_documents(records: &[PassageRecord]) -> Value {
    let documents: Vec<Value> = records
        .iter()
        .map(|record| {
            json!({
                "id": sanitize_document_id(&format!(
                    "{}_{}",
                    record.document_id, record.passage_id
                )),
                "content": record.text,
                "file_path": record.file_path,
                "title": record.title,
                "chunk": record.passage_index,
                "passage_id": record.passage_id,
                "vector": record.embedding,
                "title_vector": record.title_embedding,
            })
        })
        .collect();

    json!({ "value": documents })
}

/// Writes the search-index payload as pretty-printed JSON.
pub fn write_search_index(path: &Path, records: &[PassageRecord]) -> Result<(), EmbedError> {
    let payload = to_search_documents(records);
    let file = std::fs::File::create(path)?;
    serde_json::to_writer_pretty(file, &payload)
        .map_err(|err| EmbedError::Serialization(err.to_string()))?;
    info!(path = %path.display(), documents = records.len(), "search-index output written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_replaces_invalid_characters() {
        assert_eq!(sanitize_document_id("My Doc/v1.2_3"), "My_Doc_v1_2_3");
        assert_eq!(sanitize_document_id("a=b-c_d"), "a=b-c_d");
    }

    #[test]
    fn sanitize_strips_leading_underscores() {
        assert_eq!(sanitize_document_id("__hidden"), "hidden");
        assert_eq!(sanitize_document_id("!!front"), "front");
    }

    #[test]
    fn sanitize_is_idempotent() {
        for raw in ["My Doc/v1.2_3", "__x!y", "plain", "ünïcode"] {
            let once = sanitize_document_id(raw);
            assert_eq!(sanitize_document_id(&once), once);
            assert!(!once.starts_with('_'));
        }
    }

    #[test]
    fn envelope_has_value_array_with_expected_fields() {
        let record = PassageRecord {
            document_id: "Getting Started".to_string(),
            passage_id: 2,
            file_path: "/docs/start.md".to_string(),
            passage_index: 2,
            text: "passage body".to_string(),
            title: "Getting Started".to_string(),
            title_embedding: vec![0.9],
            embedding: vec![0.1, 0.2],
        };

        let payload = to_search_documents(&[record]);
        let documents = payload["value"].as_array().unwrap();
        assert_eq!(documents.len(), 1);

        let doc = &documents[0];
        assert_eq!(doc["id"], "Getting_Started_2");
        assert_eq!(doc["content"], "passage body");
        assert_eq!(doc["chunk"], 2);
        assert_eq!(doc["passage_id"], 2);
        assert_eq!(doc["vector"].as_array().unwrap().len(), 2);
        assert_eq!(doc["title_vector"].as_array().unwrap().len(), 1);
    }
}
