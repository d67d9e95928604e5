use std::borrow::Cow;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use citeweave_citation::FilterSummary;
use citeweave_stats::{WordCountRow, WordPair};
use serde::{Deserialize, Serialize};

use crate::csv::{csv_line, split_csv_line};
use crate::{ReportError, read_input, write_output};

const WORD_COUNT_COLUMNS: [&str; 4] = ["word", "syllables", "file_count", "occurrence"];
const PAIR_COLUMNS: [&str; 5] = ["word_1", "word_2", "correlation", "file_count", "occurrence"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl ExportFormat {
    pub fn all() -> &'static [ExportFormat] {
        &[ExportFormat::Csv, ExportFormat::Json]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(ReportError::UnknownFormat(other.to_string())),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct DocumentCount<'a> {
    #[serde(borrow)]
    document: Cow<'a, str>,
    count: u64,
}

#[derive(Serialize, Deserialize)]
struct WordCountRecord<'a> {
    #[serde(borrow)]
    word: Cow<'a, str>,
    syllables: u32,
    file_count: usize,
    occurrence: u64,
    #[serde(borrow)]
    counts: Vec<DocumentCount<'a>>,
}

#[derive(Serialize)]
struct PairRecord<'a> {
    word_1: &'a str,
    word_2: &'a str,
    correlation: f64,
    file_count: usize,
    occurrence: u64,
    occurrences: Vec<DocumentCount<'a>>,
}

#[derive(Serialize)]
struct SummaryRecord<'a> {
    document: &'a str,
    statements: usize,
    patterns: Vec<PatternHits<'a>>,
}

#[derive(Serialize)]
struct PatternHits<'a> {
    pattern: &'a str,
    hits: usize,
}

/// Write the word-count table: `word, syllables, file_count, occurrence,
/// <doc>...`, one column per document in matrix order.
pub fn write_word_counts(
    path: &Path,
    documents: &[String],
    rows: &[WordCountRow],
    format: ExportFormat,
) -> Result<(), ReportError> {
    let content = match format {
        ExportFormat::Csv => {
            let header = WORD_COUNT_COLUMNS
                .iter()
                .map(|c| c.to_string())
                .chain(documents.iter().cloned());
            let mut out = csv_line(header);
            out.push('\n');
            for row in rows {
                let fields = [
                    row.word.clone(),
                    row.syllables.to_string(),
                    row.file_count.to_string(),
                    row.occurrence.to_string(),
                ]
                .into_iter()
                .chain(row.counts.iter().map(u64::to_string));
                out.push_str(&csv_line(fields));
                out.push('\n');
            }
            out
        }
        ExportFormat::Json => {
            let records: Vec<WordCountRecord<'_>> = rows
                .iter()
                .map(|row| WordCountRecord {
                    word: Cow::Borrowed(&row.word),
                    syllables: row.syllables,
                    file_count: row.file_count,
                    occurrence: row.occurrence,
                    counts: paired(documents, &row.counts),
                })
                .collect();
            serde_json::to_string_pretty(&records)?
        }
    };
    write_output(path, &content)
}

/// Read a word-count table written by [`write_word_counts`] back into its
/// document columns and rows.
pub fn read_word_counts(
    path: &Path,
    format: ExportFormat,
) -> Result<(Vec<String>, Vec<WordCountRow>), ReportError> {
    let content = read_input(path)?;
    match format {
        ExportFormat::Csv => word_counts_from_csv(path, &content),
        ExportFormat::Json => word_counts_from_json(path, &content),
    }
}

fn word_counts_from_csv(
    path: &Path,
    content: &str,
) -> Result<(Vec<String>, Vec<WordCountRow>), ReportError> {
    let malformed = |line: usize, message: String| ReportError::Malformed {
        path: path.to_path_buf(),
        line,
        message,
    };

    let mut lines = content.lines().enumerate().filter(|(_, l)| !l.trim().is_empty());
    let Some((_, header)) = lines.next() else {
        return Err(malformed(1, "empty word-count table".to_string()));
    };
    let header = split_csv_line(header).ok_or_else(|| malformed(1, "unterminated quote".into()))?;
    if header.len() < WORD_COUNT_COLUMNS.len()
        || header.iter().zip(WORD_COUNT_COLUMNS).any(|(h, c)| h.as_str() != c)
    {
        return Err(malformed(
            1,
            format!("expected header to start with {}", WORD_COUNT_COLUMNS.join(",")),
        ));
    }
    let documents: Vec<String> = header[WORD_COUNT_COLUMNS.len()..].to_vec();

    let mut rows = Vec::new();
    for (idx, line) in lines {
        let line_no = idx + 1;
        let fields =
            split_csv_line(line).ok_or_else(|| malformed(line_no, "unterminated quote".into()))?;
        if fields.len() != header.len() {
            return Err(malformed(
                line_no,
                format!("expected {} fields, found {}", header.len(), fields.len()),
            ));
        }
        let number = |i: usize| -> Result<u64, ReportError> {
            fields[i].trim().parse::<u64>().map_err(|_| {
                malformed(line_no, format!("`{}` is not a count", fields[i]))
            })
        };
        let counts = (WORD_COUNT_COLUMNS.len()..fields.len())
            .map(&number)
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(WordCountRow {
            word: fields[0].clone(),
            syllables: u32::try_from(number(1)?)
                .map_err(|_| malformed(line_no, "syllable count out of range".into()))?,
            file_count: number(2)? as usize,
            occurrence: number(3)?,
            counts,
        });
    }
    Ok((documents, rows))
}

/// The document columns come from the first record; every other record must
/// list the same documents in the same order. An empty table has none.
fn word_counts_from_json(
    path: &Path,
    content: &str,
) -> Result<(Vec<String>, Vec<WordCountRow>), ReportError> {
    let records: Vec<WordCountRecord<'_>> = serde_json::from_str(content)?;
    let documents: Vec<String> = records
        .first()
        .map(|r| r.counts.iter().map(|c| c.document.to_string()).collect())
        .unwrap_or_default();

    let rows = records
        .into_iter()
        .enumerate()
        .map(|(idx, record)| {
            let same_columns = record.counts.len() == documents.len()
                && record
                    .counts
                    .iter()
                    .zip(&documents)
                    .all(|(c, d)| c.document.as_ref() == d.as_str());
            if !same_columns {
                return Err(ReportError::Malformed {
                    path: path.to_path_buf(),
                    line: idx + 1,
                    message: format!(
                        "record `{}` does not list the documents of the first record",
                        record.word
                    ),
                });
            }
            Ok(WordCountRow {
                counts: record.counts.iter().map(|c| c.count).collect(),
                word: record.word.into_owned(),
                syllables: record.syllables,
                file_count: record.file_count,
                occurrence: record.occurrence,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok((documents, rows))
}

/// Write the pair table: `word_1, word_2, correlation, file_count,
/// occurrence, <doc>...`.
pub fn write_pairs(
    path: &Path,
    documents: &[String],
    pairs: &[WordPair],
    format: ExportFormat,
) -> Result<(), ReportError> {
    let content = match format {
        ExportFormat::Csv => {
            let header = PAIR_COLUMNS
                .iter()
                .map(|c| c.to_string())
                .chain(documents.iter().cloned());
            let mut out = csv_line(header);
            out.push('\n');
            for pair in pairs {
                let fields = [
                    pair.word_1.clone(),
                    pair.word_2.clone(),
                    format!("{:.6}", pair.correlation),
                    pair.file_count().to_string(),
                    pair.occurrence().to_string(),
                ]
                .into_iter()
                .chain(pair.occurrences.iter().map(|(_, n)| n.to_string()));
                out.push_str(&csv_line(fields));
                out.push('\n');
            }
            out
        }
        ExportFormat::Json => {
            let records: Vec<PairRecord<'_>> = pairs
                .iter()
                .map(|pair| PairRecord {
                    word_1: &pair.word_1,
                    word_2: &pair.word_2,
                    correlation: pair.correlation,
                    file_count: pair.file_count(),
                    occurrence: pair.occurrence(),
                    occurrences: pair
                        .occurrences
                        .iter()
                        .map(|(document, count)| DocumentCount {
                            document: Cow::Borrowed(document),
                            count: *count,
                        })
                        .collect(),
                })
                .collect();
            serde_json::to_string_pretty(&records)?
        }
    };
    write_output(path, &content)
}

/// Write the filter summary: `Filename, statements, <pattern>...`.
pub fn write_filter_summary(
    path: &Path,
    summary: &FilterSummary,
    format: ExportFormat,
) -> Result<(), ReportError> {
    let content = match format {
        ExportFormat::Csv => {
            let header = ["Filename".to_string(), "statements".to_string()]
                .into_iter()
                .chain(summary.patterns.iter().cloned());
            let mut out = csv_line(header);
            out.push('\n');
            for row in &summary.rows {
                let fields = [row.document.clone(), row.statements.to_string()]
                    .into_iter()
                    .chain(row.pattern_hits.iter().map(usize::to_string));
                out.push_str(&csv_line(fields));
                out.push('\n');
            }
            out
        }
        ExportFormat::Json => {
            let records: Vec<SummaryRecord<'_>> = summary
                .rows
                .iter()
                .map(|row| SummaryRecord {
                    document: &row.document,
                    statements: row.statements,
                    patterns: summary
                        .patterns
                        .iter()
                        .zip(&row.pattern_hits)
                        .map(|(pattern, &hits)| PatternHits { pattern, hits })
                        .collect(),
                })
                .collect();
            serde_json::to_string_pretty(&records)?
        }
    };
    write_output(path, &content)
}

fn paired<'a>(documents: &'a [String], counts: &[u64]) -> Vec<DocumentCount<'a>> {
    documents
        .iter()
        .zip(counts)
        .map(|(document, &count)| DocumentCount {
            document: Cow::Borrowed(document),
            count,
        })
        .collect()
}
