use crate::matrix::WordOccurrenceMatrix;

/// One row of the word-count table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordCountRow {
    pub word: String,
    pub syllables: u32,
    /// Documents with a non-zero count.
    pub file_count: usize,
    /// Total occurrences across documents.
    pub occurrence: u64,
    /// Per-document counts in matrix column order.
    pub counts: Vec<u64>,
}

/// Flatten the matrix into word-count rows, in lexicographic word order.
pub fn word_counts<F>(matrix: &WordOccurrenceMatrix, syllables: F) -> Vec<WordCountRow>
where
    F: Fn(&str) -> u32,
{
    matrix
        .iter()
        .map(|(word, counts)| WordCountRow {
            word: word.to_string(),
            syllables: syllables(word),
            file_count: counts.iter().filter(|&&c| c > 0).count(),
            occurrence: counts.iter().sum(),
            counts: counts.to_vec(),
        })
        .collect()
}
