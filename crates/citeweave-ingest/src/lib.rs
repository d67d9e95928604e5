use std::path::{Path, PathBuf};

use citeweave_core::{BackendError, DocumentBackend, Statement, backend::PlainTextBackend};
use thiserror::Error;

pub mod discover;

pub use discover::{discover_documents, document_id, is_supported};

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("input path does not exist: {0}")]
    NotFound(PathBuf),
    #[error("failed to walk {path}: {message}")]
    Walk { path: PathBuf, message: String },
    #[error("unsupported document type: {0}")]
    Unsupported(PathBuf),
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        source: BackendError,
    },
    #[cfg(not(feature = "pdf"))]
    #[error("PDF support not compiled in (enable the `pdf` feature of citeweave-ingest)")]
    NoPdfSupport,
}

/// Decoder settings shared by every document of a run.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractOptions {
    /// Fraction of page height dropped from the top of each PDF page.
    pub header_exclusion: f32,
    /// Fraction of page height dropped from the bottom of each PDF page.
    pub footer_exclusion: f32,
}

/// A document that could not be decoded.
#[derive(Debug)]
pub struct Failure {
    pub path: PathBuf,
    pub error: IngestError,
}

/// Statements of every decodable document, plus the ones that failed.
#[derive(Debug, Default)]
pub struct Corpus {
    pub statements: Vec<Statement>,
    pub failures: Vec<Failure>,
}

impl Corpus {
    pub fn documents(&self) -> Vec<String> {
        citeweave_core::document_order(&self.statements)
    }
}

/// Decode one document and normalize it into statements.
///
/// Dispatches on file extension:
/// - `.txt` → plain text, pages split on form feed
/// - `.pdf` → MuPDF (requires the `pdf` feature)
pub fn extract_document(path: &Path, options: &ExtractOptions) -> Result<Vec<Statement>, IngestError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let pages = match ext.as_str() {
        "txt" => decode(path, &PlainTextBackend)?,
        "pdf" => extract_pdf(path, options)?,
        _ => return Err(IngestError::Unsupported(path.to_path_buf())),
    };

    let statements = citeweave_parsing::statements_from_pages(&document_id(path), &pages);
    tracing::debug!(
        path = %path.display(),
        pages = pages.len(),
        statements = statements.len(),
        "extracted document"
    );
    Ok(statements)
}

fn decode(path: &Path, backend: &dyn DocumentBackend) -> Result<Vec<String>, IngestError> {
    backend
        .extract_pages(path)
        .map_err(|source| IngestError::Decode {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(feature = "pdf")]
fn extract_pdf(path: &Path, options: &ExtractOptions) -> Result<Vec<String>, IngestError> {
    let backend = citeweave_pdf_mupdf::MupdfBackend::new()
        .with_header_exclusion(options.header_exclusion)
        .with_footer_exclusion(options.footer_exclusion);
    decode(path, &backend)
}

#[cfg(not(feature = "pdf"))]
fn extract_pdf(_path: &Path, _options: &ExtractOptions) -> Result<Vec<String>, IngestError> {
    Err(IngestError::NoPdfSupport)
}

/// Extract every document in order. A document that fails to decode is
/// logged, recorded in [`Corpus::failures`], and skipped.
///
/// `on_document` is called after each document, successful or not.
pub fn extract_corpus<F>(paths: &[PathBuf], options: &ExtractOptions, mut on_document: F) -> Corpus
where
    F: FnMut(&Path),
{
    let mut corpus = Corpus::default();
    for path in paths {
        match extract_document(path, options) {
            Ok(statements) => corpus.statements.extend(statements),
            Err(error) => {
                tracing::warn!(path = %path.display(), error = %error, "skipping document");
                corpus.failures.push(Failure {
                    path: path.clone(),
                    error,
                });
            }
        }
        on_document(path);
    }

    tracing::info!(
        documents = paths.len(),
        failed = corpus.failures.len(),
        statements = corpus.statements.len(),
        "extraction complete"
    );
    corpus
}
