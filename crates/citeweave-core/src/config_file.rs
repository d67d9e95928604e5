use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_EXTRACT_PATH: &str = "default_extracted.txt";
pub const DEFAULT_FILTER_PATH: &str = "default_filtered.txt";
pub const DEFAULT_FILTER_SUMMARY_PATH: &str = "default_filter_summary.csv";
pub const DEFAULT_EXCLUDE_PATH: &str = "default_exclude.txt";
pub const DEFAULT_OUTPUT_PATH: &str = "default_output.csv";
pub const DEFAULT_ANALYSIS_PATH: &str = "default_analysis.csv";
pub const DEFAULT_OPERATOR: &str = "or";
pub const DEFAULT_MIN_CORRELATION: f64 = 0.5;

/// Generic citation shapes: `Author et al. (2020)` and `(Author, 2020)`.
pub const DEFAULT_UNNAMED_PATTERNS: &[&str] =
    &[r"[\w\.,]+\s*\(\d{4}\)", r"\([\w\.\s]+.*\d{4}\)"];

/// Author-scoped shapes; `{name}` is replaced by the author name.
pub const DEFAULT_NAMED_PATTERNS: &[&str] = &[
    r"{name}[\w\.,\s]*\(\d{4}\)",
    r"\([^()]*{name}[^()]*\d{4}[^()]*\)",
];

/// Author-and-year shapes; `{name}` and `{year}` are both substituted.
pub const DEFAULT_NAMED_YEAR_PATTERNS: &[&str] = &[
    r"{name}[\w\.,\s]*\({year}\)",
    r"\([^()]*{name}[^()]*{year}[^()]*\)",
];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub patterns: Option<PatternsConfig>,
    pub paths: Option<PathsConfig>,
    pub analysis: Option<AnalysisConfig>,
    pub extraction: Option<ExtractionConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatternsConfig {
    pub unnamed: Option<Vec<String>>,
    pub named: Option<Vec<String>>,
    pub named_year: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathsConfig {
    pub extract: Option<String>,
    pub filter: Option<String>,
    pub filter_summary: Option<String>,
    pub exclude: Option<String>,
    pub output: Option<String>,
    pub analysis: Option<String>,
    /// CMU pronouncing dictionary used for syllable counts.
    pub cmudict: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub operator: Option<String>,
    pub min_correlation: Option<f64>,
    pub case_insensitive_proximity: Option<bool>,
    pub format: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Fraction of page height from the top dropped as running header.
    pub header_exclusion: Option<f32>,
    /// Fraction of page height from the bottom dropped as footer.
    pub footer_exclusion: Option<f32>,
}

impl ConfigFile {
    pub fn unnamed_patterns(&self) -> Vec<String> {
        self.pattern_list(|p| p.unnamed.clone(), DEFAULT_UNNAMED_PATTERNS)
    }

    pub fn named_patterns(&self) -> Vec<String> {
        self.pattern_list(|p| p.named.clone(), DEFAULT_NAMED_PATTERNS)
    }

    pub fn named_year_patterns(&self) -> Vec<String> {
        self.pattern_list(|p| p.named_year.clone(), DEFAULT_NAMED_YEAR_PATTERNS)
    }

    fn pattern_list(
        &self,
        field: impl Fn(&PatternsConfig) -> Option<Vec<String>>,
        defaults: &[&str],
    ) -> Vec<String> {
        self.patterns
            .as_ref()
            .and_then(field)
            .unwrap_or_else(|| defaults.iter().map(|s| s.to_string()).collect())
    }
}

/// Platform config directory path: `<config_dir>/citeweave/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("citeweave").join("config.toml"))
}

/// Load config by cascading CWD `.citeweave.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> Result<ConfigFile, ConfigError> {
    let platform = match config_path() {
        Some(p) => load_from_path(&p)?,
        None => None,
    };
    let cwd = load_from_path(Path::new(".citeweave.toml"))?;

    Ok(match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    })
}

/// Load a config from a specific path. Returns `Ok(None)` if the file doesn't
/// exist; a file that exists but can't be read or parsed is an error.
pub fn load_from_path(path: &Path) -> Result<Option<ConfigFile>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content)
        .map(Some)
        .map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

fn pick<S, T>(overlay: &Option<S>, base: &Option<S>, field: impl Fn(&S) -> Option<T>) -> Option<T> {
    overlay
        .as_ref()
        .and_then(&field)
        .or_else(|| base.as_ref().and_then(&field))
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    ConfigFile {
        patterns: Some(PatternsConfig {
            unnamed: pick(&overlay.patterns, &base.patterns, |p| p.unnamed.clone()),
            named: pick(&overlay.patterns, &base.patterns, |p| p.named.clone()),
            named_year: pick(&overlay.patterns, &base.patterns, |p| p.named_year.clone()),
        }),
        paths: Some(PathsConfig {
            extract: pick(&overlay.paths, &base.paths, |p| p.extract.clone()),
            filter: pick(&overlay.paths, &base.paths, |p| p.filter.clone()),
            filter_summary: pick(&overlay.paths, &base.paths, |p| p.filter_summary.clone()),
            exclude: pick(&overlay.paths, &base.paths, |p| p.exclude.clone()),
            output: pick(&overlay.paths, &base.paths, |p| p.output.clone()),
            analysis: pick(&overlay.paths, &base.paths, |p| p.analysis.clone()),
            cmudict: pick(&overlay.paths, &base.paths, |p| p.cmudict.clone()),
        }),
        analysis: Some(AnalysisConfig {
            operator: pick(&overlay.analysis, &base.analysis, |a| a.operator.clone()),
            min_correlation: pick(&overlay.analysis, &base.analysis, |a| a.min_correlation),
            case_insensitive_proximity: pick(&overlay.analysis, &base.analysis, |a| {
                a.case_insensitive_proximity
            }),
            format: pick(&overlay.analysis, &base.analysis, |a| a.format.clone()),
        }),
        extraction: Some(ExtractionConfig {
            header_exclusion: pick(&overlay.extraction, &base.extraction, |e| {
                e.header_exclusion
            }),
            footer_exclusion: pick(&overlay.extraction, &base.extraction, |e| {
                e.footer_exclusion
            }),
        }),
    }
}
