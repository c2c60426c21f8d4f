//! Document collection from the filesystem.
//!
//! Enumeration is a collaborator of the core pipeline: it yields
//! `(source_path, raw_text)` pairs and never does any chunking itself.
//! A source can be a single file or a directory tree; for wiki-backed trees
//! the stored path is rewritten into a page URL so downstream search results
//! link to the wiki instead of a local checkout.

use std::path::{Path, PathBuf};

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use tokio::fs;
use tracing::{info, warn};
use url::Url;

use crate::types::EmbedError;

/// Characters left untouched when encoding a wiki page path. Matches the
/// unreserved set plus `/`, which separates page segments.
const WIKI_PATH_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// How collected file paths are recorded on the emitted records.
#[derive(Debug, Clone)]
pub enum SourceType {
    /// Store the local filesystem path as-is.
    Filesystem,
    /// Rewrite paths into wiki page URLs under the given base, e.g.
    /// `https://host/project/_wiki/wikis/project.wiki?pagePath=/Getting%20Started`.
    Wiki { base_url: Url },
}

/// One raw document handed to the pipeline.
#[derive(Debug, Clone)]
pub struct DocumentInput {
    /// Path recorded on output records: local path or rewritten wiki URL.
    pub source_path: String,
    /// Local path the document was read from; its stem seeds the title.
    pub local_path: PathBuf,
    /// Unprocessed file contents.
    pub raw_text: String,
}

/// Collects documents from a file or directory tree.
///
/// Unreadable files are skipped with a warning; only an unusable input root
/// is an error. Directory entries are visited in sorted order so repeated
/// runs produce identical output.
pub async fn collect_documents(
    input: &Path,
    source: &SourceType,
) -> Result<Vec<DocumentInput>, EmbedError> {
    let metadata = fs::metadata(input).await.map_err(|err| {
        EmbedError::InvalidDocument(format!("invalid input path {}: {err}", input.display()))
    })?;

    let (files, root) = if metadata.is_dir() {
        (walk_files(input).await?, input.to_path_buf())
    } else {
        let root = input.parent().unwrap_or_else(|| Path::new("")).to_path_buf();
        (vec![input.to_path_buf()], root)
    };

    let mut documents = Vec::with_capacity(files.len());
    for local_path in files {
        let raw_text = match fs::read_to_string(&local_path).await {
            Ok(text) => text,
            Err(err) => {
                warn!(path = %local_path.display(), error = %err, "failed to read file, skipping");
                continue;
            }
        };
        let source_path = match source {
            SourceType::Filesystem => local_path.display().to_string(),
            SourceType::Wiki { base_url } => wiki_page_url(base_url, &local_path, &root),
        };
        documents.push(DocumentInput {
            source_path,
            local_path,
            raw_text,
        });
    }

    info!(count = documents.len(), input = %input.display(), "collected documents");
    Ok(documents)
}

/// Recursively lists regular files under `root`, sorted for determinism.
async fn walk_files(root: &Path) -> Result<Vec<PathBuf>, EmbedError> {
    let mut pending = vec![root.to_path_buf()];
    let mut files = Vec::new();

    while let Some(dir) = pending.pop() {
        let mut entries = fs::read_dir(&dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let file_type = entry.file_type().await?;
            if file_type.is_dir() {
                pending.push(path);
            } else if file_type.is_file() {
                files.push(path);
            }
        }
    }

    files.sort();
    Ok(files)
}

/// Rewrites a local file path into a wiki page URL.
///
/// The path relative to the collection root is joined with forward slashes,
/// loses a trailing `.md` extension, and is percent-encoded into the
/// `pagePath` query parameter.
pub fn wiki_page_url(base_url: &Url, local_path: &Path, root: &Path) -> String {
    let relative = local_path.strip_prefix(root).unwrap_or(local_path);
    let mut page: String = relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");

    if page.to_ascii_lowercase().ends_with(".md") {
        page.truncate(page.len() - 3);
    }

    let encoded = utf8_percent_encode(&page, WIKI_PATH_SET);
    format!("{base_url}?pagePath=/{encoded}")
}
