use std::collections::{BTreeMap, HashSet};

use crate::StatsError;
use crate::frequency::FrequencyTable;

/// Word × document occurrence counts, stored densely.
///
/// Every word has a count for every document column; absent entries are
/// zero. Rows are kept in lexicographic word order, columns in the order
/// documents were first supplied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordOccurrenceMatrix {
    documents: Vec<String>,
    rows: BTreeMap<String, Vec<u64>>,
}

impl WordOccurrenceMatrix {
    /// Merge per-document frequency tables.
    ///
    /// The column set is the union of all document keys; each row is
    /// zero-filled for documents that never used the word. A document
    /// supplied twice has its counts summed into one column.
    pub fn from_frequencies<I, D>(tables: I) -> Self
    where
        I: IntoIterator<Item = (D, FrequencyTable)>,
        D: Into<String>,
    {
        let tables: Vec<(String, FrequencyTable)> =
            tables.into_iter().map(|(d, t)| (d.into(), t)).collect();

        let mut documents: Vec<String> = Vec::new();
        let mut columns = Vec::with_capacity(tables.len());
        for (document, _) in &tables {
            let col = match documents.iter().position(|d| d == document) {
                Some(col) => col,
                None => {
                    documents.push(document.clone());
                    documents.len() - 1
                }
            };
            columns.push(col);
        }

        let width = documents.len();
        let mut rows: BTreeMap<String, Vec<u64>> = BTreeMap::new();
        for ((_, table), col) in tables.iter().zip(columns) {
            for (word, count) in table.iter() {
                let row = rows
                    .entry(word.to_string())
                    .or_insert_with(|| vec![0; width]);
                row[col] += count;
            }
        }

        Self { documents, rows }
    }

    /// Rebuild a matrix from stored rows (e.g. a word-count table read back
    /// from disk). Every row must have one count per document.
    pub fn from_rows<I>(documents: Vec<String>, rows: I) -> Result<Self, StatsError>
    where
        I: IntoIterator<Item = (String, Vec<u64>)>,
    {
        let mut seen = HashSet::new();
        for document in &documents {
            if !seen.insert(document.as_str()) {
                return Err(StatsError::DuplicateDocument(document.clone()));
            }
        }

        let mut stored = BTreeMap::new();
        for (word, counts) in rows {
            if counts.len() != documents.len() {
                return Err(StatsError::RaggedRow {
                    word,
                    expected: documents.len(),
                    found: counts.len(),
                });
            }
            if stored.contains_key(&word) {
                return Err(StatsError::DuplicateWord(word));
            }
            stored.insert(word, counts);
        }

        Ok(Self {
            documents,
            rows: stored,
        })
    }

    pub fn documents(&self) -> &[String] {
        &self.documents
    }

    pub fn column_index(&self, document: &str) -> Option<usize> {
        self.documents.iter().position(|d| d == document)
    }

    pub fn row(&self, word: &str) -> Option<&[u64]> {
        self.rows.get(word).map(Vec::as_slice)
    }

    pub fn count(&self, word: &str, document: &str) -> u64 {
        match (self.rows.get(word), self.column_index(document)) {
            (Some(row), Some(col)) => row[col],
            _ => 0,
        }
    }

    /// Rows in lexicographic word order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u64])> {
        self.rows.iter().map(|(w, r)| (w.as_str(), r.as_slice()))
    }

    /// Words with a non-zero count in column `col`, in lexicographic order.
    pub fn words_in(&self, col: usize) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .filter(move |(_, row)| row.get(col).is_some_and(|&c| c > 0))
            .map(|(w, _)| w.as_str())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
