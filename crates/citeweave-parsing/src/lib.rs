use std::path::PathBuf;

use citeweave_core::Statement;
use thiserror::Error;

pub mod normalize;
pub mod syllables;
pub mod text_processing;
pub mod tokens;

pub use normalize::{Repair, normalize};
pub use syllables::{SyllableCounter, heuristic_syllables};
pub use tokens::{DocumentWords, ExclusionSet, extract_words};

#[derive(Error, Debug)]
pub enum ParsingError {
    #[error("failed to read exclusion list {path}: {source}")]
    Exclusions {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to read pronouncing dictionary {path}: {source}")]
    Dictionary {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Turn the decoded pages of one document into normalized statements.
///
/// Pipeline:
/// 1. Per page: expand ligatures, collapse whitespace, drop invisible characters
/// 2. Per page: split on sentence boundaries
/// 3. Over the whole document: repair over-eager splits with [`normalize`]
pub fn statements_from_pages<S: AsRef<str>>(document: &str, pages: &[S]) -> Vec<Statement> {
    let mut fragments = Vec::new();
    for page in pages {
        let cleaned = text_processing::clean_page(page.as_ref());
        fragments.extend(text_processing::split_sentences(&cleaned));
    }

    normalize(&fragments)
        .into_iter()
        .map(|text| Statement::new(document, text))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statements_from_pages_reattaches_marker_across_pages() {
        let pages = [
            "Prior work (Smith,\n2020) found effects.  The list:",
            "1. Gather data. Done.",
        ];
        let statements = statements_from_pages("paper.pdf", &pages);
        let texts: Vec<&str> = statements.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(
            texts,
            vec![
                "Prior work (Smith, 2020) found effects.",
                "The list:",
                "1. Gather data.",
                "Done."
            ]
        );
        assert!(statements.iter().all(|s| s.document == "paper.pdf"));
    }
}
