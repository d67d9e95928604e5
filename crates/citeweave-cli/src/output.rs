use std::io::Write;
use std::path::Path;

use citeweave_citation::FilterSummary;
use citeweave_ingest::Failure;
use citeweave_stats::WordPair;
use owo_colors::OwoColorize;

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// Print a completed-stage line, e.g. `Extracted 120 statements ... -> out.txt`.
pub fn print_stage_done(
    w: &mut dyn Write,
    message: &str,
    destination: &Path,
    color: ColorMode,
) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(
            w,
            "{} {} {}",
            "✓".green().bold(),
            message,
            destination.display().to_string().cyan()
        )
    } else {
        writeln!(w, "✓ {} {}", message, destination.display())
    }
}

/// List documents that could not be decoded.
pub fn print_failures(w: &mut dyn Write, failures: &[Failure], color: ColorMode) -> std::io::Result<()> {
    if failures.is_empty() {
        return Ok(());
    }
    let heading = format!("Skipped {} document(s) that could not be decoded:", failures.len());
    if color.enabled() {
        writeln!(w, "{}", heading.yellow())?;
    } else {
        writeln!(w, "{}", heading)?;
    }
    for failure in failures {
        if color.enabled() {
            writeln!(w, "  {} {}", failure.path.display(), failure.error.to_string().dimmed())?;
        } else {
            writeln!(w, "  {} ({})", failure.path.display(), failure.error)?;
        }
    }
    Ok(())
}

/// Per-document statement counts from the filter stage.
pub fn print_filter_summary(
    w: &mut dyn Write,
    summary: &FilterSummary,
    color: ColorMode,
) -> std::io::Result<()> {
    for row in &summary.rows {
        if color.enabled() {
            writeln!(w, "  {:>5}  {}", row.statements.bold(), row.document)?;
        } else {
            writeln!(w, "  {:>5}  {}", row.statements, row.document)?;
        }
    }
    Ok(())
}

/// Show the strongest pairs after analysis.
pub fn print_top_pairs(
    w: &mut dyn Write,
    pairs: &[WordPair],
    limit: usize,
    color: ColorMode,
) -> std::io::Result<()> {
    let mut ranked: Vec<&WordPair> = pairs.iter().collect();
    ranked.sort_by(|a, b| {
        b.correlation
            .total_cmp(&a.correlation)
            .then_with(|| b.occurrence().cmp(&a.occurrence()))
    });
    for pair in ranked.into_iter().take(limit) {
        let words = format!("{} / {}", pair.word_1, pair.word_2);
        if color.enabled() {
            writeln!(
                w,
                "  {:.3}  {}  ({} in {} docs)",
                pair.correlation.cyan(),
                words.bold(),
                pair.occurrence(),
                pair.file_count()
            )?;
        } else {
            writeln!(
                w,
                "  {:.3}  {}  ({} in {} docs)",
                pair.correlation,
                words,
                pair.occurrence(),
                pair.file_count()
            )?;
        }
    }
    Ok(())
}
