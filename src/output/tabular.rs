//! Flat CSV render of the assembled record set.

use std::io::Write;
use std::path::Path;

use tracing::info;

use crate::assembler::PassageRecord;
use crate::types::EmbedError;

const COLUMNS: [&str; 8] = [
    "document_id",
    "passage_id",
    "file_path",
    "passage_index",
    "text",
    "title",
    "title_embedding",
    "embedding",
];

/// Renders records as CSV into an arbitrary writer.
///
/// Embedding columns hold the vectors as JSON float arrays so the file stays
/// a plain two-dimensional table.
pub fn write_tabular<W: Write>(writer: W, records: &[PassageRecord]) -> Result<(), EmbedError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer
        .write_record(COLUMNS)
        .map_err(|err| EmbedError::Serialization(err.to_string()))?;

    for record in records {
        let passage_id = record.passage_id.to_string();
        let passage_index = record.passage_index.to_string();
        let title_embedding = serde_json::to_string(&record.title_embedding)
            .map_err(|err| EmbedError::Serialization(err.to_string()))?;
        let embedding = serde_json::to_string(&record.embedding)
            .map_err(|err| EmbedError::Serialization(err.to_string()))?;
        csv_writer
            .write_record([
                record.document_id.as_str(),
                passage_id.as_str(),
                record.file_path.as_str(),
                passage_index.as_str(),
                record.text.as_str(),
                record.title.as_str(),
                title_embedding.as_str(),
                embedding.as_str(),
            ])
            .map_err(|err| EmbedError::Serialization(err.to_string()))?;
    }

    csv_writer
        .flush()
        .map_err(|err| EmbedError::Serialization(err.to_string()))?;
    Ok(())
}

/// Writes the CSV render to a file.
pub fn write_tabular_file(path: &Path, records: &[PassageRecord]) -> Result<(), EmbedError> {
    let file = std::fs::File::create(path)?;
    write_tabular(file, records)?;
    info!(path = %path.display(), rows = records.len(), "tabular output written");
    Ok(())
}
