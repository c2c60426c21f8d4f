//! Derived index-definition artifact.
//!
//! A fixed-shape schema document describing the search-index fields and a
//! cosine-metric HNSW vector-search profile, parameterized only by the vector
//! dimensionality observed in the record set.

use std::path::Path;

use serde_json::{Value, json};
use tracing::info;

use crate::assembler::PassageRecord;
use crate::types::EmbedError;

/// Dimensionality assumed when no record was produced during the run.
pub const DEFAULT_VECTOR_DIMENSION: usize = 1536;

const VECTOR_PROFILE: &str = "vector-profile-cosine";
const VECTOR_ALGORITHM: &str = "hnsw-cosine";

/// Vector dimensionality of the record set: the first record's embedding
/// length, or [`DEFAULT_VECTOR_DIMENSION`] when no records exist.
pub fn vector_dimension(records: &[PassageRecord]) -> usize {
    records
        .first()
        .map(|record| record.embedding.len())
        .unwrap_or(DEFAULT_VECTOR_DIMENSION)
}

/// Builds the index-definition schema document.
pub fn index_definition(index_name: &str, vector_dimension: usize) -> Value {
    json!({
        "name": index_name,
        "fields": [
            {
                "name": "id",
                "type": "Edm.String",
                "searchable": false,
                "filterable": true,
                "retrievable": true,
                "sortable": false,
                "facetable": false,
                "key": true
            },
            {
                "name": "document_id",
                "type": "Edm.String",
                "searchable": false,
                "filterable": true,
                "retrievable": true,
                "sortable": false,
                "facetable": false
            },
            {
                "name": "passage_id",
                "type": "Edm.Int32",
                "searchable": false,
                "filterable": true,
                "retrievable": true,
                "sortable": false,
                "facetable": false
            },
            {
                "name": "content",
                "type": "Edm.String",
                "searchable": true,
                "filterable": false,
                "retrievable": true,
                "sortable": false,
                "facetable": false,
                "analyzer": "standard.lucene"
            },
            {
                "name": "file_path",
                "type": "Edm.String",
                "searchable": false,
                "filterable": true,
                "retrievable": true,
                "sortable": false,
                "facetable": false
            },
            {
                "name": "title",
                "type": "Edm.String",
                "searchable": true,
                "filterable": true,
                "retrievable": true,
                "sortable": false,
                "facetable": false,
                "analyzer": "standard.lucene"
            },
            {
                "name": "chunk",
                "type": "Edm.Int32",
                "searchable": false,
                "filterable": true,
                "retrievable": true,
                "sortable": false,
                "facetable": false
            },
            {
                "name": "vector",
                "type": "Collection(Edm.Single)",
                "searchable": true,
                "filterable": false,
                "retrievable": false,
                "sortable": false,
                "facetable": false,
                "dimensions": vector_dimension,
                "vectorSearchProfile": VECTOR_PROFILE
            },
            {
                "name": "title_vector",
                "type": "Collection(Edm.Single)",
                "searchable": true,
                "filterable": false,
                "retrievable": false,
                "sortable": false,
                "facetable": false,
                "dimensions": vector_dimension,
                "vectorSearchProfile": VECTOR_PROFILE
            }
        ],
        "vectorSearch": {
            "algorithms": [
                {
                    "name": VECTOR_ALGORITHM,
                    "kind": "hnsw",
                    "hnswParameters": {
                        "metric": "cosine",
                        "m": 4,
                        "efConstruction": 400,
                        "efSearch": 500
                    }
                }
            ],
            "profiles": [
                {
                    "name": VECTOR_PROFILE,
                    "algorithm": VECTOR_ALGORITHM
                }
            ]
        },
        "similarity": {
            "@odata.type": "#Microsoft.Azure.Search.BM25Similarity"
        }
    })
}

/// Writes the index definition derived from the record set.
pub fn write_index_definition(
    path: &Path,
    index_name: &str,
    records: &[PassageRecord],
) -> Result<(), EmbedError> {
    let definition = index_definition(index_name, vector_dimension(records));
    let file = std::fs::File::create(path)?;
    serde_json::to_writer_pretty(file, &definition)
        .map_err(|err| EmbedError::Serialization(err.to_string()))?;
    info!(path = %path.display(), index = index_name, "index definition written");
    Ok(())
}
