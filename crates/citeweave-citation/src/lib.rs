use citeweave_core::Statement;
use citeweave_core::config_file::{
    DEFAULT_NAMED_PATTERNS, DEFAULT_NAMED_YEAR_PATTERNS, DEFAULT_UNNAMED_PATTERNS,
};
use regex::{Regex, RegexBuilder};
use thiserror::Error;

pub mod authors;
pub mod classifier;
pub mod combine;
pub mod summary;
pub mod template;

pub use authors::{AuthorSpec, parse_authors};
pub use classifier::{AuthorMatcher, CitationClassifier};
pub use combine::CombinationMode;
pub use summary::{FilterSummary, SummaryRow, summarize};
pub use template::{Bindings, Template};

#[derive(Error, Debug)]
pub enum CitationError {
    #[error("invalid citation pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },
    #[error("template `{template}` is missing the {placeholder} placeholder")]
    MissingPlaceholder {
        template: String,
        placeholder: &'static str,
    },
    #[error("template `{template}` uses {placeholder} but no value is bound for it")]
    Unbound {
        template: String,
        placeholder: &'static str,
    },
    #[error("invalid operator `{0}` (expected `and` or `or`)")]
    InvalidOperator(String),
}

/// Citation pattern configuration: generic shapes plus author templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternSet {
    pub unnamed: Vec<String>,
    /// Templates containing `{name}`.
    pub named: Vec<String>,
    /// Templates containing `{name}` and `{year}`.
    pub named_year: Vec<String>,
}

impl Default for PatternSet {
    fn default() -> Self {
        let owned = |v: &[&str]| v.iter().map(|s| s.to_string()).collect();
        Self {
            unnamed: owned(DEFAULT_UNNAMED_PATTERNS),
            named: owned(DEFAULT_NAMED_PATTERNS),
            named_year: owned(DEFAULT_NAMED_YEAR_PATTERNS),
        }
    }
}

/// Compile a citation pattern; all matching is case-insensitive.
pub(crate) fn compile_pattern(pattern: &str) -> Result<Regex, CitationError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|source| CitationError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })
}

/// Keep the statements that are citations and, when an author scope is
/// given, that cite those authors under `mode`.
///
/// An unset or blank author scope skips the author filter. Statement order
/// is preserved.
pub fn filter_citations(
    statements: &[Statement],
    authors: Option<&str>,
    mode: CombinationMode,
    classifier: &CitationClassifier,
) -> Result<Vec<Statement>, CitationError> {
    let author_specs = authors.map(parse_authors).unwrap_or_default();
    let matchers = classifier.author_matchers(&author_specs)?;

    let filtered: Vec<Statement> = statements
        .iter()
        .filter(|s| classifier.is_citation(&s.text))
        .filter(|s| matchers.is_empty() || classifier.matches_authors(&s.text, &matchers, mode))
        .cloned()
        .collect();

    tracing::info!(
        total = statements.len(),
        kept = filtered.len(),
        authors = matchers.len(),
        %mode,
        "filtered citations"
    );
    Ok(filtered)
}
