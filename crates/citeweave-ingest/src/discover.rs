use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::IngestError;

const SUPPORTED_EXTENSIONS: &[&str] = &["pdf", "txt"];

/// Whether the path has an extension this crate can decode.
pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|s| s.eq_ignore_ascii_case(ext))
        })
}

/// Document identifier: the file name without directories.
pub fn document_id(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Resolve the input path into the documents to extract.
///
/// A file is returned as-is, whatever its extension. A directory is walked
/// recursively for supported files, returned in sorted path order.
pub fn discover_documents(path: &Path) -> Result<Vec<PathBuf>, IngestError> {
    if !path.exists() {
        return Err(IngestError::NotFound(path.to_path_buf()));
    }
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut documents = Vec::new();
    for entry in WalkDir::new(path).follow_links(true) {
        let entry = entry.map_err(|e| IngestError::Walk {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        if entry.file_type().is_file() && is_supported(entry.path()) {
            documents.push(entry.into_path());
        }
    }
    documents.sort();

    if documents.is_empty() {
        tracing::warn!(path = %path.display(), "no PDF or text documents found");
    }
    Ok(documents)
}
