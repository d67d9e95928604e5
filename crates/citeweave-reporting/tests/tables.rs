use citeweave_citation::{FilterSummary, SummaryRow};
use citeweave_reporting::{
    ExportFormat, ReportError, read_word_counts, write_filter_summary, write_pairs,
    write_word_counts,
};
use citeweave_stats::{WordCountRow, WordPair};

fn rows() -> Vec<WordCountRow> {
    vec![
        WordCountRow {
            word: "graph".into(),
            syllables: 1,
            file_count: 2,
            occurrence: 3,
            counts: vec![2, 1],
        },
        WordCountRow {
            word: "neural".into(),
            syllables: 2,
            file_count: 1,
            occurrence: 1,
            counts: vec![0, 1],
        },
    ]
}

#[test]
fn word_count_csv_reads_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("counts.csv");
    let documents = vec!["a.pdf".to_string(), "smith, 2020.pdf".to_string()];

    write_word_counts(&path, &documents, &rows(), ExportFormat::Csv).unwrap();
    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.starts_with("word,syllables,file_count,occurrence,a.pdf,\"smith, 2020.pdf\"\n"));

    let (docs, back) = read_word_counts(&path, ExportFormat::Csv).unwrap();
    assert_eq!(docs, documents);
    assert_eq!(back, rows());
}

#[test]
fn word_count_read_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("counts.csv");
    assert!(matches!(
        read_word_counts(&path, ExportFormat::Csv),
        Err(ReportError::MissingInput(_))
    ));

    std::fs::write(&path, "word,syllables,file_count,occurrence,a\ngraph,1,1,1\n").unwrap();
    assert!(matches!(
        read_word_counts(&path, ExportFormat::Csv),
        Err(ReportError::Malformed { line: 2, .. })
    ));

    std::fs::write(&path, "word,syllables,file_count,occurrence,a\ngraph,1,1,1,many\n").unwrap();
    assert!(matches!(
        read_word_counts(&path, ExportFormat::Csv),
        Err(ReportError::Malformed { line: 2, .. })
    ));

    std::fs::write(&path, "term,count\n").unwrap();
    assert!(matches!(
        read_word_counts(&path, ExportFormat::Csv),
        Err(ReportError::Malformed { line: 1, .. })
    ));
}

#[test]
fn word_count_json_reads_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("counts.json");
    let documents = vec!["a.pdf".to_string(), "b \"draft\".pdf".to_string()];

    write_word_counts(&path, &documents, &rows(), ExportFormat::Json).unwrap();
    let (docs, back) = read_word_counts(&path, ExportFormat::Json).unwrap();
    assert_eq!(docs, documents);
    assert_eq!(back, rows());

    // A CSV reader rejects the JSON table rather than misreading it.
    assert!(matches!(
        read_word_counts(&path, ExportFormat::Csv),
        Err(ReportError::Malformed { line: 1, .. })
    ));
}

#[test]
fn json_word_counts_need_matching_document_columns() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("counts.json");
    std::fs::write(
        &path,
        r#"[
  {"word": "graph", "syllables": 1, "file_count": 1, "occurrence": 2,
   "counts": [{"document": "a.pdf", "count": 2}, {"document": "b.pdf", "count": 0}]},
  {"word": "neural", "syllables": 2, "file_count": 1, "occurrence": 1,
   "counts": [{"document": "b.pdf", "count": 1}, {"document": "a.pdf", "count": 0}]}
]"#,
    )
    .unwrap();
    assert!(matches!(
        read_word_counts(&path, ExportFormat::Json),
        Err(ReportError::Malformed { line: 2, .. })
    ));

    std::fs::write(&path, "[]").unwrap();
    let (docs, rows) = read_word_counts(&path, ExportFormat::Json).unwrap();
    assert!(docs.is_empty() && rows.is_empty());

    std::fs::write(&path, "word,syllables
").unwrap();
    assert!(matches!(
        read_word_counts(&path, ExportFormat::Json),
        Err(ReportError::Json(_))
    ));
}

#[test]
fn pair_table_csv_and_json() {
    let dir = tempfile::tempdir().unwrap();
    let documents = vec!["a.pdf".to_string(), "b.pdf".to_string()];
    let pairs = vec![WordPair {
        word_1: "network".into(),
        word_2: "neural".into(),
        correlation: 1.0,
        occurrences: vec![("a.pdf".into(), 2), ("b.pdf".into(), 0)],
    }];

    let csv_path = dir.path().join("pairs.csv");
    write_pairs(&csv_path, &documents, &pairs, ExportFormat::Csv).unwrap();
    assert_eq!(
        std::fs::read_to_string(&csv_path).unwrap(),
        "word_1,word_2,correlation,file_count,occurrence,a.pdf,b.pdf\n\
         network,neural,1.000000,1,2,2,0\n"
    );

    let json_path = dir.path().join("pairs.json");
    write_pairs(&json_path, &documents, &pairs, ExportFormat::Json).unwrap();
    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(value[0]["word_1"], "network");
    assert_eq!(value[0]["file_count"], 1);
    assert_eq!(value[0]["occurrences"][1]["document"], "b.pdf");
}

#[test]
fn filter_summary_csv() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("summary.csv");
    let summary = FilterSummary {
        patterns: vec![r"\(\d{4}\)".to_string(), "et al, ".to_string()],
        rows: vec![SummaryRow {
            document: "a.pdf".to_string(),
            statements: 3,
            pattern_hits: vec![2, 1],
        }],
    };
    write_filter_summary(&path, &summary, ExportFormat::Csv).unwrap();
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "Filename,statements,\\(\\d{4}\\),\"et al, \"\na.pdf,3,2,1\n"
    );
}
