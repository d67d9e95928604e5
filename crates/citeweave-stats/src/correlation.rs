//! Proximity-filtered word-pair correlation.
//!
//! Candidate pairs come from words sharing a document. A candidate is kept
//! only if the two words sit next to each other (separated by nothing but
//! whitespace, commas or hyphens) in some statement, and only if their
//! per-document counts correlate at or above the threshold.
//!
//! Candidate generation is O(documents × words²); the proximity scan and
//! the aggregation are O(pairs × statements). Per-pair work runs on the
//! rayon pool; results keep the sorted pair order.

use std::collections::BTreeSet;

use citeweave_core::Statement;
use rayon::prelude::*;
use regex::{Regex, RegexBuilder};

use crate::StatsError;
use crate::matrix::WordOccurrenceMatrix;

/// Separators allowed between the two words of a proximate pair.
const SEPARATOR: &str = r"[\s,-]*";

#[derive(Debug, Clone, Copy, Default)]
pub struct ProximityOptions {
    /// Match statements case-insensitively. Words are lower-case while
    /// statements keep their original case, so this also finds pairs at the
    /// start of a sentence.
    pub case_insensitive: bool,
}

/// The two directional patterns of a word pair: `w1 … w2` and `w2 … w1`.
#[derive(Debug, Clone)]
pub struct ProximityPattern {
    forward: Regex,
    backward: Regex,
}

impl ProximityPattern {
    pub fn new(word_1: &str, word_2: &str, options: &ProximityOptions) -> Result<Self, StatsError> {
        let build = |a: &str, b: &str| {
            let source = format!("{}{}{}", regex::escape(a), SEPARATOR, regex::escape(b));
            RegexBuilder::new(&source)
                .case_insensitive(options.case_insensitive)
                .build()
                .map_err(|source| StatsError::Pattern {
                    pair: format!("{} / {}", word_1, word_2),
                    source,
                })
        };
        Ok(Self {
            forward: build(word_1, word_2)?,
            backward: build(word_2, word_1)?,
        })
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.forward.is_match(text) || self.backward.is_match(text)
    }

    /// Non-overlapping matches of each direction, summed.
    pub fn count(&self, text: &str) -> u64 {
        (self.forward.find_iter(text).count() + self.backward.find_iter(text).count()) as u64
    }
}

/// A retained word pair.
#[derive(Debug, Clone, PartialEq)]
pub struct WordPair {
    /// Lexicographically smaller word.
    pub word_1: String,
    pub word_2: String,
    pub correlation: f64,
    /// Proximity matches per analysed document, in column order.
    pub occurrences: Vec<(String, u64)>,
}

impl WordPair {
    /// Number of documents in which the pair occurs in proximity.
    pub fn file_count(&self) -> usize {
        self.occurrences.iter().filter(|(_, n)| *n > 0).count()
    }

    /// Total proximity matches across documents.
    pub fn occurrence(&self) -> u64 {
        self.occurrences.iter().map(|(_, n)| n).sum()
    }
}

/// Pearson correlation coefficient of two equally long samples.
///
/// `None` when the samples differ in length, have fewer than two points, or
/// either has zero variance (the coefficient is undefined there).
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }
    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (a, b) in x.iter().zip(y) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx == 0.0 || syy == 0.0 {
        return None;
    }
    Some((sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0))
}

/// All unordered pairs of words that share at least one of `columns`.
///
/// Pairs are `(smaller, larger)` and the set is ordered, which fixes the
/// order of everything computed from it.
pub fn candidate_pairs(matrix: &WordOccurrenceMatrix, columns: &[usize]) -> BTreeSet<(String, String)> {
    let mut pairs = BTreeSet::new();
    for &col in columns {
        let words: Vec<&str> = matrix.words_in(col).collect();
        for (i, first) in words.iter().enumerate() {
            for second in &words[i + 1..] {
                pairs.insert((first.to_string(), second.to_string()));
            }
        }
    }
    pairs
}

/// Find word pairs that appear in proximity and whose per-document counts
/// correlate with coefficient `>= min_correlation`.
pub fn find_correlated_pairs(
    matrix: &WordOccurrenceMatrix,
    document_columns: &[String],
    min_correlation: f64,
    statements: &[Statement],
    options: &ProximityOptions,
) -> Result<Vec<WordPair>, StatsError> {
    if !min_correlation.is_finite() || !(-1.0..=1.0).contains(&min_correlation) {
        return Err(StatsError::InvalidThreshold(min_correlation));
    }
    let columns = document_columns
        .iter()
        .map(|d| {
            matrix
                .column_index(d)
                .ok_or_else(|| StatsError::UnknownDocument(d.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let candidates: Vec<(String, String)> = candidate_pairs(matrix, &columns).into_iter().collect();

    let proximate: Vec<(String, String, ProximityPattern)> = candidates
        .into_par_iter()
        .map(|(w1, w2)| {
            let pattern = ProximityPattern::new(&w1, &w2, options)?;
            let near = statements.iter().any(|s| pattern.is_match(&s.text));
            Ok(near.then_some((w1, w2, pattern)))
        })
        .collect::<Result<Vec<_>, StatsError>>()?
        .into_iter()
        .flatten()
        .collect();

    let statements_by_column: Vec<Vec<&str>> = document_columns
        .iter()
        .map(|d| {
            statements
                .iter()
                .filter(|s| &s.document == d)
                .map(|s| s.text.as_str())
                .collect()
        })
        .collect();

    let counts_of = |word: &str| -> Vec<f64> {
        let row = matrix.row(word).unwrap_or_default();
        columns
            .iter()
            .map(|&c| row.get(c).copied().unwrap_or(0) as f64)
            .collect()
    };

    let retained: Vec<WordPair> = proximate
        .par_iter()
        .filter_map(|(w1, w2, pattern)| {
            let correlation = pearson(&counts_of(w1), &counts_of(w2))?;
            if correlation < min_correlation {
                return None;
            }
            let occurrences = document_columns
                .iter()
                .zip(&statements_by_column)
                .map(|(doc, texts)| (doc.clone(), texts.iter().map(|t| pattern.count(t)).sum()))
                .collect();
            Some(WordPair {
                word_1: w1.clone(),
                word_2: w2.clone(),
                correlation,
                occurrences,
            })
        })
        .collect();

    tracing::info!(
        documents = document_columns.len(),
        words = matrix.len(),
        proximate = proximate.len(),
        retained = retained.len(),
        min_correlation,
        "word pair analysis complete"
    );
    Ok(retained)
}
