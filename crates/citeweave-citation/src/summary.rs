use citeweave_core::Statement;

use crate::classifier::CitationClassifier;

/// Per-document counts of filtered statements and of the unnamed patterns
/// that matched them.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSummary {
    /// Unnamed pattern sources, one per `pattern_hits` column.
    pub patterns: Vec<String>,
    pub rows: Vec<SummaryRow>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRow {
    pub document: String,
    pub statements: usize,
    pub pattern_hits: Vec<usize>,
}

/// Tally which unnamed patterns account for each document's citations.
///
/// Rows appear in first-seen document order.
pub fn summarize(statements: &[Statement], classifier: &CitationClassifier) -> FilterSummary {
    let patterns: Vec<String> = classifier.unnamed_patterns().map(str::to_string).collect();
    let mut rows: Vec<SummaryRow> = Vec::new();

    for statement in statements {
        let idx = match rows.iter().position(|r| r.document == statement.document) {
            Some(idx) => idx,
            None => {
                rows.push(SummaryRow {
                    document: statement.document.clone(),
                    statements: 0,
                    pattern_hits: vec![0; patterns.len()],
                });
                rows.len() - 1
            }
        };
        let row = &mut rows[idx];
        row.statements += 1;
        for (count, hit) in row
            .pattern_hits
            .iter_mut()
            .zip(classifier.unnamed_hits(&statement.text))
        {
            if hit {
                *count += 1;
            }
        }
    }

    FilterSummary { patterns, rows }
}
