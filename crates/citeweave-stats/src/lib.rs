use thiserror::Error;

pub mod correlation;
pub mod frequency;
pub mod matrix;
pub mod word_counts;

pub use correlation::{
    ProximityOptions, ProximityPattern, WordPair, candidate_pairs, find_correlated_pairs, pearson,
};
pub use frequency::FrequencyTable;
pub use matrix::WordOccurrenceMatrix;
pub use word_counts::{WordCountRow, word_counts};

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("correlation threshold must be within [-1, 1], got {0}")]
    InvalidThreshold(f64),
    #[error("document `{0}` is not a column of the word matrix")]
    UnknownDocument(String),
    #[error("row for `{word}` has {found} counts, expected {expected}")]
    RaggedRow {
        word: String,
        expected: usize,
        found: usize,
    },
    #[error("word `{0}` appears more than once")]
    DuplicateWord(String),
    #[error("document `{0}` appears more than once")]
    DuplicateDocument(String),
    #[error("cannot build proximity pattern for {pair}: {source}")]
    Pattern {
        pair: String,
        source: regex::Error,
    },
}
