use std::path::{Path, PathBuf};

use anyhow::Context;
use citeweave_citation::{CombinationMode, PatternSet};
use citeweave_core::ConfigFile;
use citeweave_core::config_file::{
    DEFAULT_ANALYSIS_PATH, DEFAULT_EXCLUDE_PATH, DEFAULT_EXTRACT_PATH, DEFAULT_FILTER_PATH,
    DEFAULT_FILTER_SUMMARY_PATH, DEFAULT_MIN_CORRELATION, DEFAULT_OPERATOR, DEFAULT_OUTPUT_PATH,
};
use citeweave_ingest::ExtractOptions;
use citeweave_reporting::ExportFormat;

use crate::StageArgs;

/// Everything a pipeline run needs, resolved from CLI flags, `CITEWEAVE_*`
/// environment variables, the config file and built-in defaults, in that
/// order of precedence.
#[derive(Debug, Clone)]
pub struct Settings {
    pub input: Option<PathBuf>,
    pub extract: PathBuf,
    pub filter: PathBuf,
    pub filter_summary: PathBuf,
    pub exclude: PathBuf,
    /// The exclusion list was named explicitly and must exist.
    pub exclude_required: bool,
    pub output: PathBuf,
    pub analysis: PathBuf,
    pub cmudict: Option<PathBuf>,
    pub authors: Option<String>,
    pub operator: CombinationMode,
    pub min_correlation: f64,
    pub case_insensitive_proximity: bool,
    pub format: ExportFormat,
    pub patterns: PatternSet,
    pub extract_options: ExtractOptions,
}

impl Settings {
    pub fn resolve<E>(args: &StageArgs, config: &ConfigFile, env: E) -> anyhow::Result<Self>
    where
        E: Fn(&str) -> Option<String>,
    {
        let paths = config.paths.clone().unwrap_or_default();
        let analysis = config.analysis.clone().unwrap_or_default();
        let extraction = config.extraction.clone().unwrap_or_default();

        let path = |flag: &Option<PathBuf>, var: &str, configured: Option<String>, default: PathBuf| {
            flag.clone()
                .or_else(|| env(var).map(PathBuf::from))
                .or_else(|| configured.map(PathBuf::from))
                .unwrap_or(default)
        };

        let exclude_required = args.exclude.is_some() || env("CITEWEAVE_EXCLUDE").is_some();

        let operator = args
            .operator
            .clone()
            .or_else(|| env("CITEWEAVE_OPERATOR"))
            .or(analysis.operator)
            .unwrap_or_else(|| DEFAULT_OPERATOR.to_string());
        let operator: CombinationMode = operator.parse()?;

        let min_correlation = match args.min_correlation {
            Some(value) => value,
            None => match env("CITEWEAVE_MIN_CORRELATION") {
                Some(raw) => raw.trim().parse::<f64>().with_context(|| {
                    format!("CITEWEAVE_MIN_CORRELATION `{}` is not a number", raw)
                })?,
                None => analysis.min_correlation.unwrap_or(DEFAULT_MIN_CORRELATION),
            },
        };
        if !min_correlation.is_finite() || !(-1.0..=1.0).contains(&min_correlation) {
            anyhow::bail!(
                "correlation threshold must be within [-1, 1], got {}",
                min_correlation
            );
        }

        let format = args
            .format
            .clone()
            .or_else(|| env("CITEWEAVE_FORMAT"))
            .or(analysis.format)
            .map(|f| f.parse::<ExportFormat>())
            .transpose()?
            .unwrap_or_default();
        // Default table names take the extension of the chosen format.
        let table = |default: &str| Path::new(default).with_extension(format.as_str());

        let authors = args
            .authors
            .clone()
            .or_else(|| env("CITEWEAVE_AUTHORS"))
            .filter(|a| !a.trim().is_empty());

        let cmudict = args
            .cmudict
            .clone()
            .or_else(|| env("CITEWEAVE_CMUDICT").map(PathBuf::from))
            .or_else(|| paths.cmudict.clone().map(PathBuf::from));

        let ratio = |value: Option<f32>, name: &str| -> anyhow::Result<f32> {
            let value = value.unwrap_or(0.0);
            if !(0.0..1.0).contains(&value) {
                anyhow::bail!("extraction.{} must be within [0, 1), got {}", name, value);
            }
            Ok(value)
        };

        Ok(Self {
            input: args.pdf.clone().or_else(|| env("CITEWEAVE_PDF").map(PathBuf::from)),
            extract: path(&args.ext, "CITEWEAVE_EXTRACT", paths.extract, DEFAULT_EXTRACT_PATH.into()),
            filter: path(&args.filter, "CITEWEAVE_FILTER", paths.filter, DEFAULT_FILTER_PATH.into()),
            filter_summary: path(
                &args.filter_summary,
                "CITEWEAVE_FILTER_SUMMARY",
                paths.filter_summary,
                table(DEFAULT_FILTER_SUMMARY_PATH),
            ),
            exclude: path(&args.exclude, "CITEWEAVE_EXCLUDE", paths.exclude, DEFAULT_EXCLUDE_PATH.into()),
            exclude_required,
            output: path(&args.out, "CITEWEAVE_OUTPUT", paths.output, table(DEFAULT_OUTPUT_PATH)),
            analysis: path(
                &args.analysis,
                "CITEWEAVE_ANALYSIS",
                paths.analysis,
                table(DEFAULT_ANALYSIS_PATH),
            ),
            cmudict,
            authors,
            operator,
            min_correlation,
            case_insensitive_proximity: args.case_insensitive_proximity
                || analysis.case_insensitive_proximity.unwrap_or(false),
            format,
            patterns: PatternSet {
                unnamed: config.unnamed_patterns(),
                named: config.named_patterns(),
                named_year: config.named_year_patterns(),
            },
            extract_options: ExtractOptions {
                header_exclusion: ratio(extraction.header_exclusion, "header_exclusion")?,
                footer_exclusion: ratio(extraction.footer_exclusion, "footer_exclusion")?,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use citeweave_core::config_file::{AnalysisConfig, PathsConfig};

    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn defaults_apply_without_flags_env_or_config() {
        let settings = Settings::resolve(&StageArgs::default(), &ConfigFile::default(), no_env).unwrap();
        assert_eq!(settings.extract, PathBuf::from("default_extracted.txt"));
        assert_eq!(settings.filter, PathBuf::from("default_filtered.txt"));
        assert_eq!(settings.output, PathBuf::from("default_output.csv"));
        assert_eq!(settings.analysis, PathBuf::from("default_analysis.csv"));
        assert_eq!(settings.operator, CombinationMode::Or);
        assert_eq!(settings.min_correlation, 0.5);
        assert_eq!(settings.format, ExportFormat::Csv);
        assert!(!settings.exclude_required);
        assert_eq!(settings.patterns, PatternSet::default());
    }

    #[test]
    fn flag_beats_env_beats_config() {
        let config = ConfigFile {
            paths: Some(PathsConfig {
                filter: Some("from_config.txt".into()),
                output: Some("config_out.csv".into()),
                ..Default::default()
            }),
            analysis: Some(AnalysisConfig {
                operator: Some("and".into()),
                min_correlation: Some(0.7),
                ..Default::default()
            }),
            ..Default::default()
        };
        let vars: HashMap<&str, &str> =
            HashMap::from([("CITEWEAVE_FILTER", "from_env.txt"), ("CITEWEAVE_MIN_CORRELATION", "0.9")]);
        let env = |k: &str| vars.get(k).map(|v| v.to_string());

        let args = StageArgs {
            filter: Some(PathBuf::from("from_flag.txt")),
            ..Default::default()
        };
        let settings = Settings::resolve(&args, &config, env).unwrap();
        assert_eq!(settings.filter, PathBuf::from("from_flag.txt"));
        assert_eq!(settings.output, PathBuf::from("config_out.csv"));
        assert_eq!(settings.min_correlation, 0.9);
        assert_eq!(settings.operator, CombinationMode::And);

        let settings = Settings::resolve(&StageArgs::default(), &config, env).unwrap();
        assert_eq!(settings.filter, PathBuf::from("from_env.txt"));
    }

    #[test]
    fn invalid_values_fail_before_processing() {
        let bad_threshold = StageArgs {
            min_correlation: Some(1.5),
            ..Default::default()
        };
        assert!(Settings::resolve(&bad_threshold, &ConfigFile::default(), no_env).is_err());

        let bad_operator = StageArgs {
            operator: Some("xor".into()),
            ..Default::default()
        };
        assert!(Settings::resolve(&bad_operator, &ConfigFile::default(), no_env).is_err());

        let bad_format = StageArgs {
            format: Some("xlsx".into()),
            ..Default::default()
        };
        assert!(Settings::resolve(&bad_format, &ConfigFile::default(), no_env).is_err());
    }

    #[test]
    fn default_table_names_follow_the_format() {
        let args = StageArgs {
            format: Some("json".into()),
            analysis: Some(PathBuf::from("pairs.csv")),
            ..Default::default()
        };
        let settings = Settings::resolve(&args, &ConfigFile::default(), no_env).unwrap();
        assert_eq!(settings.output, PathBuf::from("default_output.json"));
        assert_eq!(settings.filter_summary, PathBuf::from("default_filter_summary.json"));
        // Named paths are used as given.
        assert_eq!(settings.analysis, PathBuf::from("pairs.csv"));
        assert_eq!(settings.filter, PathBuf::from("default_filtered.txt"));
    }

    #[test]
    fn explicit_exclusion_list_is_required() {
        let args = StageArgs {
            exclude: Some(PathBuf::from("stop.txt")),
            ..Default::default()
        };
        let settings = Settings::resolve(&args, &ConfigFile::default(), no_env).unwrap();
        assert!(settings.exclude_required);
        assert_eq!(settings.exclude, PathBuf::from("stop.txt"));
    }
}
