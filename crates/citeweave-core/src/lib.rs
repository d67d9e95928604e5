use std::fmt;

pub mod backend;
pub mod config_file;

pub use backend::{BackendError, DocumentBackend};
pub use config_file::{ConfigError, ConfigFile};

/// A single normalized sentence and the document it was extracted from.
///
/// Statements are produced once per extraction pass and only read afterwards.
/// Their order within a document is the document's reading order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    /// Source document identifier (the file name, without directories).
    pub document: String,
    pub text: String,
}

impl Statement {
    pub fn new(document: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            document: document.into(),
            text: text.into(),
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}", self.document, self.text)
    }
}

/// Document identifiers in first-seen order.
pub fn document_order(statements: &[Statement]) -> Vec<String> {
    let mut order: Vec<String> = Vec::new();
    for statement in statements {
        if !order.iter().any(|d| d == &statement.document) {
            order.push(statement.document.clone());
        }
    }
    order
}
