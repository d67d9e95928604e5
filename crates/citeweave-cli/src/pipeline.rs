use std::io::Write;
use std::path::Path;

use anyhow::Context;
use citeweave_citation::{CitationClassifier, filter_citations, summarize};
use citeweave_core::Statement;
use citeweave_ingest::{discover_documents, extract_corpus};
use citeweave_parsing::{ExclusionSet, SyllableCounter, extract_words};
use citeweave_reporting::{
    ReportError, read_statements, read_word_counts, write_filter_summary, write_pairs,
    write_statements, write_word_counts,
};
use citeweave_stats::{
    FrequencyTable, ProximityOptions, WordOccurrenceMatrix, find_correlated_pairs, word_counts,
};
use indicatif::{ProgressBar, ProgressStyle};

use crate::output::{self, ColorMode};
use crate::settings::Settings;

const TOP_PAIRS: usize = 10;

/// Read a statement file a stage depends on, naming the path when it is absent.
fn require_statements(path: &Path, produced_by: &str) -> anyhow::Result<Vec<Statement>> {
    match read_statements(path) {
        Err(ReportError::MissingInput(p)) => anyhow::bail!(
            "the given file {} does not exist (run `citeweave {}` first)",
            p.display(),
            produced_by
        ),
        other => Ok(other?),
    }
}

/// Decode every document under the input path into the statement file.
pub fn extract(settings: &Settings, w: &mut dyn Write, color: ColorMode) -> anyhow::Result<()> {
    let Some(input) = settings.input.as_deref() else {
        anyhow::bail!("no input given: pass -p/--pdf with a document or directory");
    };
    if !input.exists() {
        anyhow::bail!("the given path {} does not exist", input.display());
    }

    let documents = discover_documents(input)?;
    let bar = ProgressBar::new(documents.len() as u64);
    if color.enabled() {
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} [{bar:40.cyan/dim}] {pos}/{len} {msg}")?
                .progress_chars("=> "),
        );
    }
    let corpus = extract_corpus(&documents, &settings.extract_options, |path| {
        bar.set_message(citeweave_ingest::document_id(path));
        bar.inc(1);
    });
    bar.finish_and_clear();

    write_statements(&settings.extract, &corpus.statements)?;
    output::print_failures(w, &corpus.failures, color)?;
    output::print_stage_done(
        w,
        &format!(
            "Extracted {} statements from {} document(s) into",
            corpus.statements.len(),
            documents.len() - corpus.failures.len()
        ),
        &settings.extract,
        color,
    )?;
    Ok(())
}

/// Keep the citation statements, optionally scoped to authors.
pub fn filter(
    settings: &Settings,
    classifier: &CitationClassifier,
    w: &mut dyn Write,
    color: ColorMode,
) -> anyhow::Result<()> {
    let statements = require_statements(&settings.extract, "extract")?;

    let filtered = filter_citations(
        &statements,
        settings.authors.as_deref(),
        settings.operator,
        classifier,
    )?;
    write_statements(&settings.filter, &filtered)?;

    let summary = summarize(&filtered, classifier);
    write_filter_summary(&settings.filter_summary, &summary, settings.format)?;

    output::print_filter_summary(w, &summary, color)?;
    output::print_stage_done(
        w,
        &format!(
            "Kept {} of {} statements as citations in",
            filtered.len(),
            statements.len()
        ),
        &settings.filter,
        color,
    )?;
    Ok(())
}

/// The word lists the count stage reads: exclusions and syllable counts.
pub struct Lexicon {
    exclusions: ExclusionSet,
    syllables: SyllableCounter,
}

impl Lexicon {
    /// A missing default exclusion list means no exclusions; an explicitly
    /// named one must exist.
    pub fn load(settings: &Settings) -> anyhow::Result<Self> {
        let exclusions = if settings.exclude.exists() {
            ExclusionSet::load(&settings.exclude)?
        } else if settings.exclude_required {
            anyhow::bail!("the given file {} does not exist", settings.exclude.display());
        } else {
            tracing::debug!(path = %settings.exclude.display(), "no exclusion list, counting every word");
            ExclusionSet::new()
        };

        let syllables = match &settings.cmudict {
            Some(path) => SyllableCounter::load(path)
                .with_context(|| format!("loading pronouncing dictionary {}", path.display()))?,
            None => SyllableCounter::new(),
        };

        Ok(Self {
            exclusions,
            syllables,
        })
    }
}

/// Count words per document and write the word-count table.
pub fn count(
    settings: &Settings,
    lexicon: &Lexicon,
    w: &mut dyn Write,
    color: ColorMode,
) -> anyhow::Result<WordOccurrenceMatrix> {
    let statements = require_statements(&settings.filter, "filter")?;

    let matrix = WordOccurrenceMatrix::from_frequencies(
        extract_words(&statements, &lexicon.exclusions)
            .into_iter()
            .map(|doc| (doc.document, FrequencyTable::from_words(&doc.words))),
    );
    let rows = word_counts(&matrix, |word| lexicon.syllables.count(word));
    write_word_counts(&settings.output, matrix.documents(), &rows, settings.format)?;

    output::print_stage_done(
        w,
        &format!(
            "Counted {} distinct words across {} document(s) into",
            matrix.len(),
            matrix.documents().len()
        ),
        &settings.output,
        color,
    )?;
    Ok(matrix)
}

/// Find correlated word pairs. `matrix` is the count stage's result when the
/// stages run together; otherwise the word-count table is read back.
pub fn analyse(
    settings: &Settings,
    matrix: Option<WordOccurrenceMatrix>,
    w: &mut dyn Write,
    color: ColorMode,
) -> anyhow::Result<()> {
    let matrix = match matrix {
        Some(matrix) => matrix,
        None => {
            let (documents, rows) = match read_word_counts(&settings.output, settings.format) {
                Err(ReportError::MissingInput(p)) => anyhow::bail!(
                    "the given file {} does not exist (run `citeweave count` first)",
                    p.display()
                ),
                other => other?,
            };
            WordOccurrenceMatrix::from_rows(
                documents,
                rows.into_iter().map(|row| (row.word, row.counts)),
            )?
        }
    };
    let statements = require_statements(&settings.filter, "filter")?;

    let documents = matrix.documents().to_vec();
    let pairs = find_correlated_pairs(
        &matrix,
        &documents,
        settings.min_correlation,
        &statements,
        &ProximityOptions {
            case_insensitive: settings.case_insensitive_proximity,
        },
    )?;
    write_pairs(&settings.analysis, &documents, &pairs, settings.format)?;

    output::print_top_pairs(w, &pairs, TOP_PAIRS, color)?;
    output::print_stage_done(
        w,
        &format!(
            "Found {} correlated pairs (r >= {}) in",
            pairs.len(),
            settings.min_correlation
        ),
        &settings.analysis,
        color,
    )?;
    Ok(())
}

/// Run every stage in sequence.
///
/// Patterns and word lists load before extraction, so a bad configuration
/// fails before any output is written.
pub fn all(settings: &Settings, w: &mut dyn Write, color: ColorMode) -> anyhow::Result<()> {
    let classifier = CitationClassifier::new(&settings.patterns)?;
    let lexicon = Lexicon::load(settings)?;

    extract(settings, w, color)?;
    filter(settings, &classifier, w, color)?;
    let matrix = count(settings, &lexicon, w, color)?;
    analyse(settings, Some(matrix), w, color)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use citeweave_core::ConfigFile;
    use citeweave_reporting::ExportFormat;

    use super::*;
    use crate::StageArgs;

    fn settings_in(dir: &Path) -> Settings {
        let args = StageArgs {
            pdf: Some(dir.join("corpus")),
            ext: Some(dir.join("extracted.txt")),
            filter: Some(dir.join("filtered.txt")),
            filter_summary: Some(dir.join("summary.csv")),
            out: Some(dir.join("counts.csv")),
            analysis: Some(dir.join("analysis.csv")),
            ..Default::default()
        };
        Settings::resolve(&args, &ConfigFile::default(), |_| None).unwrap()
    }

    fn write_corpus(dir: &Path) {
        let corpus = dir.join("corpus");
        std::fs::create_dir(&corpus).unwrap();
        std::fs::write(
            corpus.join("a.txt"),
            "A neural network was trained (Smith, 2020). Nothing cited here.",
        )
        .unwrap();
        std::fs::write(
            corpus.join("b.txt"),
            "Deep neural network models (Lee, 2019). Another neural network result (Lee, 2019).",
        )
        .unwrap();
        std::fs::write(
            corpus.join("c.txt"),
            "Graph methods (Kim, 2018). A neural network (Kim, 2018). Neural network again (Kim, 2018).",
        )
        .unwrap();
    }

    #[test]
    fn all_stages_produce_every_artifact() {
        let dir = tempfile::tempdir().unwrap();
        write_corpus(dir.path());
        let settings = settings_in(dir.path());

        let mut out = Vec::new();
        all(&settings, &mut out, ColorMode(false)).unwrap();

        let filtered = read_statements(&settings.filter).unwrap();
        assert!(filtered.iter().all(|s| s.text.contains('(')));
        assert!(!filtered.iter().any(|s| s.text == "Nothing cited here."));

        let (documents, _) = read_word_counts(&settings.output, settings.format).unwrap();
        assert_eq!(documents, vec!["a.txt", "b.txt", "c.txt"]);

        let analysis = std::fs::read_to_string(&settings.analysis).unwrap();
        assert!(analysis.starts_with("word_1,word_2,correlation,file_count,occurrence,a.txt,b.txt,c.txt\n"));
        assert!(analysis.contains("\nnetwork,neural,"));

        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("network / neural"));
    }

    #[test]
    fn separate_analyse_reads_the_count_table_back() {
        let dir = tempfile::tempdir().unwrap();
        write_corpus(dir.path());
        let settings = settings_in(dir.path());
        let mut sink = Vec::new();

        run_stages_separately(&settings, &mut sink);

        let analysis = std::fs::read_to_string(&settings.analysis).unwrap();
        assert!(analysis.contains("\nnetwork,neural,"));
    }

    fn run_stages_separately(settings: &Settings, sink: &mut Vec<u8>) {
        let classifier = CitationClassifier::new(&settings.patterns).unwrap();
        let lexicon = Lexicon::load(settings).unwrap();
        extract(settings, sink, ColorMode(false)).unwrap();
        filter(settings, &classifier, sink, ColorMode(false)).unwrap();
        count(settings, &lexicon, sink, ColorMode(false)).unwrap();
        analyse(settings, None, sink, ColorMode(false)).unwrap();
    }

    #[test]
    fn separate_analyse_reads_a_json_count_table_back() {
        let dir = tempfile::tempdir().unwrap();
        write_corpus(dir.path());
        let mut settings = settings_in(dir.path());
        settings.format = ExportFormat::Json;
        settings.output = dir.path().join("counts.json");
        settings.analysis = dir.path().join("analysis.json");
        let mut sink = Vec::new();

        run_stages_separately(&settings, &mut sink);

        let (documents, _) = read_word_counts(&settings.output, ExportFormat::Json).unwrap();
        assert_eq!(documents, vec!["a.txt", "b.txt", "c.txt"]);
        let pairs: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&settings.analysis).unwrap()).unwrap();
        let pairs = pairs.as_array().unwrap();
        assert!(
            pairs
                .iter()
                .any(|p| p["word_1"] == "network" && p["word_2"] == "neural")
        );
    }

    #[test]
    fn all_rejects_bad_patterns_before_extracting() {
        let dir = tempfile::tempdir().unwrap();
        write_corpus(dir.path());
        let mut settings = settings_in(dir.path());
        settings.patterns.unnamed.push(r"(\d{4}".to_string());

        assert!(all(&settings, &mut Vec::new(), ColorMode(false)).is_err());
        assert!(!settings.extract.exists());
    }

    #[test]
    fn all_rejects_missing_exclusion_list_before_extracting() {
        let dir = tempfile::tempdir().unwrap();
        write_corpus(dir.path());
        let mut settings = settings_in(dir.path());
        settings.exclude = dir.path().join("stop.txt");
        settings.exclude_required = true;

        let err = all(&settings, &mut Vec::new(), ColorMode(false)).unwrap_err();
        assert!(err.to_string().contains("stop.txt"));
        assert!(!settings.extract.exists());
    }

    #[test]
    fn missing_inputs_name_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings_in(dir.path());
        let mut sink = Vec::new();

        let err = extract(&settings, &mut sink, ColorMode(false)).unwrap_err();
        assert!(err.to_string().contains("corpus"));

        let classifier = CitationClassifier::new(&settings.patterns).unwrap();
        let err = filter(&settings, &classifier, &mut sink, ColorMode(false)).unwrap_err();
        assert!(err.to_string().contains("extracted.txt"));

        let err = analyse(&settings, None, &mut sink, ColorMode(false)).unwrap_err();
        assert!(err.to_string().contains("counts.csv"));
    }

    #[test]
    fn explicit_missing_exclusion_list_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = settings_in(dir.path());
        settings.exclude = PathBuf::from(dir.path().join("stop.txt"));
        let lexicon = Lexicon::load(&settings).unwrap();
        write_statements(&settings.filter, &[Statement::new("a.txt", "x (Smith, 2020).")]).unwrap();
        count(&settings, &lexicon, &mut Vec::new(), ColorMode(false)).unwrap();

        settings.exclude_required = true;
        let err = Lexicon::load(&settings).err().unwrap();
        assert!(err.to_string().contains("stop.txt"));
    }
}
