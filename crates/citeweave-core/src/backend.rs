use std::path::Path;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("failed to open document: {0}")]
    OpenError(String),
    #[error("failed to extract text: {0}")]
    ExtractionError(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait for document decoding backends.
///
/// Implementors turn one document into its ordered page texts; whitespace
/// collapsing, sentence splitting and normalization happen downstream in
/// `citeweave_parsing`.
pub trait DocumentBackend: Send + Sync {
    /// Extract the text of every page, in page order.
    fn extract_pages(&self, path: &Path) -> Result<Vec<String>, BackendError>;
}

/// Backend for plain-text documents. Pages are separated by form feeds.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextBackend;

impl DocumentBackend for PlainTextBackend {
    fn extract_pages(&self, path: &Path) -> Result<Vec<String>, BackendError> {
        let bytes = std::fs::read(path)?;
        let text = String::from_utf8(bytes)
            .map_err(|e| BackendError::ExtractionError(format!("invalid UTF-8: {}", e)))?;
        Ok(text.split('\u{0C}').map(str::to_string).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_splits_pages_on_form_feed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.txt");
        std::fs::write(&path, "first page\u{0C}second page").unwrap();

        let pages = PlainTextBackend.extract_pages(&path).unwrap();
        assert_eq!(pages, vec!["first page", "second page"]);
    }

    #[test]
    fn plain_text_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = PlainTextBackend
            .extract_pages(&dir.path().join("absent.txt"))
            .unwrap_err();
        assert!(matches!(err, BackendError::Io(_)));
    }

    #[test]
    fn plain_text_rejects_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.txt");
        std::fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();
        let err = PlainTextBackend.extract_pages(&path).unwrap_err();
        assert!(matches!(err, BackendError::ExtractionError(_)));
    }
}
