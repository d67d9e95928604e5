use std::path::PathBuf;

use citeweave_ingest::{ExtractOptions, IngestError, discover_documents, extract_corpus, extract_document};

#[test]
fn text_document_becomes_normalized_statements() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("review.txt");
    std::fs::write(
        &path,
        "Earlier studies (Smith et al.\n2019) disagree. We list steps:\u{0C}1. Collect. Then stop.",
    )
    .unwrap();

    let statements = extract_document(&path, &ExtractOptions::default()).unwrap();
    assert!(statements.iter().all(|s| s.document == "review.txt"));
    let texts: Vec<&str> = statements.iter().map(|s| s.text.as_str()).collect();
    assert_eq!(texts[0], "Earlier studies (Smith et al. 2019) disagree.");
    assert!(texts.contains(&"1. Collect."));
}

#[test]
fn failed_documents_are_skipped_and_recorded() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.txt"), "First paper (Lee, 2020) says so.").unwrap();
    std::fs::write(dir.path().join("b.txt"), [0xff, 0xfe, 0xfd]).unwrap();
    std::fs::write(dir.path().join("c.txt"), "Third paper agrees.").unwrap();

    let paths = discover_documents(dir.path()).unwrap();
    let mut seen = Vec::new();
    let corpus = extract_corpus(&paths, &ExtractOptions::default(), |p| {
        seen.push(p.to_path_buf())
    });

    assert_eq!(seen, paths);
    assert_eq!(corpus.documents(), vec!["a.txt", "c.txt"]);
    assert_eq!(corpus.failures.len(), 1);
    assert_eq!(corpus.failures[0].path, dir.path().join("b.txt"));
    assert!(matches!(corpus.failures[0].error, IngestError::Decode { .. }));
}

#[test]
fn unsupported_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("table.csv");
    std::fs::write(&path, "a,b").unwrap();

    let err = extract_document(&path, &ExtractOptions::default()).unwrap_err();
    assert!(matches!(err, IngestError::Unsupported(p) if p == PathBuf::from(&path)));
}
