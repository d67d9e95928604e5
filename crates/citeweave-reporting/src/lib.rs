use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod csv;
pub mod statements;
pub mod tables;

pub use statements::{STATEMENT_HEADER, read_statements, write_statements};
pub use tables::{
    ExportFormat, read_word_counts, write_filter_summary, write_pairs, write_word_counts,
};

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("required input not found: {0}")]
    MissingInput(PathBuf),
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// `line` is the 1-based record number for JSON tables.
    #[error("{path}:{line}: {message}")]
    Malformed {
        path: PathBuf,
        line: usize,
        message: String,
    },
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown output format `{0}` (expected `csv` or `json`)")]
    UnknownFormat(String),
}

pub(crate) fn read_input(path: &Path) -> Result<String, ReportError> {
    if !path.exists() {
        return Err(ReportError::MissingInput(path.to_path_buf()));
    }
    std::fs::read_to_string(path).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn write_output(path: &Path, content: &str) -> Result<(), ReportError> {
    std::fs::write(path, content).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), bytes = content.len(), "wrote output");
    Ok(())
}
