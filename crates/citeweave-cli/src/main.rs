use std::io::IsTerminal;
use std::path::PathBuf;

use citeweave_citation::CitationClassifier;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod output;
mod pipeline;
mod settings;

use output::ColorMode;
use settings::Settings;

/// citeweave - Find citation statements and correlated word pairs across a document corpus
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract normalized statements from PDF and text documents
    Extract(StageArgs),
    /// Keep statements that are citations, optionally scoped to authors
    Filter(StageArgs),
    /// Count words per document in the filtered statements
    Count(StageArgs),
    /// Find proximate word pairs whose per-document counts correlate
    Analyse(StageArgs),
    /// Run extract, filter, count and analyse in sequence
    All(StageArgs),
}

/// Flags shared by every stage. Unset values fall back to `CITEWEAVE_*`
/// environment variables, then the config file, then built-in defaults.
#[derive(Args, Debug, Clone, Default)]
struct StageArgs {
    /// Document or directory of documents to extract
    #[arg(short = 'p', long)]
    pdf: Option<PathBuf>,

    /// Extracted statements file
    #[arg(short = 'e', long)]
    ext: Option<PathBuf>,

    /// Comma-separated authors, each `name` or `name-year`
    #[arg(short = 'a', long)]
    authors: Option<String>,

    /// Filtered statements file
    #[arg(short = 'f', long)]
    filter: Option<PathBuf>,

    /// Per-document filter summary table
    #[arg(long)]
    filter_summary: Option<PathBuf>,

    /// One-word-per-line list of words to leave out of counts
    #[arg(short = 'x', long)]
    exclude: Option<PathBuf>,

    /// Minimum correlation for a word pair to be kept, in [-1, 1]
    #[arg(short = 'c', long = "min-correlation", alias = "corrrate")]
    min_correlation: Option<f64>,

    /// Word-count table
    #[arg(short = 'o', long)]
    out: Option<PathBuf>,

    /// Word-pair analysis table
    #[arg(short = 'l', long)]
    analysis: Option<PathBuf>,

    /// How multiple authors combine: `and` or `or`
    #[arg(long)]
    operator: Option<String>,

    /// Table format: `csv` or `json`
    #[arg(long)]
    format: Option<String>,

    /// CMU pronouncing dictionary for syllable counts
    #[arg(long)]
    cmudict: Option<PathBuf>,

    /// Match word pairs in statements regardless of case
    #[arg(long)]
    case_insensitive_proximity: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

/// Log filter from `CITEWEAVE_LOG`, else `LOG_LEVEL` (accepting `WARNING`
/// and `CRITICAL` spellings), else `warn`. Logs go to stderr.
fn init_tracing() {
    let filter = EnvFilter::try_from_env("CITEWEAVE_LOG").unwrap_or_else(|_| {
        let level = std::env::var("LOG_LEVEL")
            .map(|l| match l.to_ascii_lowercase().as_str() {
                "warning" => "warn".to_string(),
                "critical" | "fatal" => "error".to_string(),
                other => other.to_string(),
            })
            .unwrap_or_else(|_| "warn".to_string());
        EnvFilter::try_new(&level).unwrap_or_else(|_| EnvFilter::new("warn"))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();
    let cli = Cli::parse();

    let (stage, args) = match &cli.command {
        Command::Extract(args) => ("extract", args),
        Command::Filter(args) => ("filter", args),
        Command::Count(args) => ("count", args),
        Command::Analyse(args) => ("analyse", args),
        Command::All(args) => ("all", args),
    };

    let config = citeweave_core::config_file::load_config()?;
    let settings = Settings::resolve(args, &config, |var| std::env::var(var).ok())?;
    tracing::debug!(stage, ?settings, "resolved settings");

    let stdout = std::io::stdout();
    let color = ColorMode(!args.no_color && stdout.is_terminal());
    let mut writer = stdout.lock();

    match cli.command {
        Command::Extract(_) => pipeline::extract(&settings, &mut writer, color),
        Command::Filter(_) => {
            let classifier = CitationClassifier::new(&settings.patterns)?;
            pipeline::filter(&settings, &classifier, &mut writer, color)
        }
        Command::Count(_) => {
            let lexicon = pipeline::Lexicon::load(&settings)?;
            pipeline::count(&settings, &lexicon, &mut writer, color).map(|_| ())
        }
        Command::Analyse(_) => pipeline::analyse(&settings, None, &mut writer, color),
        Command::All(_) => pipeline::all(&settings, &mut writer, color),
    }
}
