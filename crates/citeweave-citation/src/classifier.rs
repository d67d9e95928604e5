use regex::Regex;

use crate::authors::AuthorSpec;
use crate::combine::CombinationMode;
use crate::template::{Bindings, NAME_PLACEHOLDER, Template, YEAR_PLACEHOLDER};
use crate::{CitationError, PatternSet, compile_pattern};

/// Compiled citation patterns.
///
/// Construction validates every pattern and template, so a malformed
/// configuration is reported once, up front, rather than per statement.
#[derive(Debug, Clone)]
pub struct CitationClassifier {
    unnamed: Vec<Regex>,
    named: Vec<Template>,
    named_year: Vec<Template>,
}

/// The candidate regexes for one author.
#[derive(Debug, Clone)]
pub struct AuthorMatcher {
    pub author: AuthorSpec,
    patterns: Vec<Regex>,
}

impl CitationClassifier {
    pub fn new(patterns: &PatternSet) -> Result<Self, CitationError> {
        let unnamed = patterns
            .unnamed
            .iter()
            .map(|p| compile_pattern(p))
            .collect::<Result<Vec<_>, _>>()?;

        let named = validate_templates(&patterns.named, false)?;
        let named_year = validate_templates(&patterns.named_year, true)?;

        Ok(Self {
            unnamed,
            named,
            named_year,
        })
    }

    /// Source text of the unnamed patterns, in configuration order.
    pub fn unnamed_patterns(&self) -> impl Iterator<Item = &str> {
        self.unnamed.iter().map(Regex::as_str)
    }

    /// Whether any unnamed pattern matches somewhere in `text`.
    pub fn is_citation(&self, text: &str) -> bool {
        self.unnamed.iter().any(|re| re.is_match(text))
    }

    /// Per unnamed pattern, whether it matches `text`.
    pub fn unnamed_hits(&self, text: &str) -> Vec<bool> {
        self.unnamed.iter().map(|re| re.is_match(text)).collect()
    }

    /// Build the candidate regexes for an author: named-year templates for
    /// `name-year` entries, named templates for bare names.
    pub fn author_matcher(&self, author: &AuthorSpec) -> Result<AuthorMatcher, CitationError> {
        let templates = match author {
            AuthorSpec::Name(_) => &self.named,
            AuthorSpec::NameYear { .. } => &self.named_year,
        };
        let bindings = author.bindings();
        let patterns = templates
            .iter()
            .map(|t| t.bind(&bindings))
            .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(
            name = author.name(),
            year = ?author.year(),
            templates = patterns.len(),
            "bound author templates"
        );
        Ok(AuthorMatcher {
            author: author.clone(),
            patterns,
        })
    }

    pub fn author_matchers(
        &self,
        authors: &[AuthorSpec],
    ) -> Result<Vec<AuthorMatcher>, CitationError> {
        authors.iter().map(|a| self.author_matcher(a)).collect()
    }

    /// Whether `text` cites this author.
    ///
    /// Two-stage: a region matched by one of the author's templates must
    /// itself satisfy an unnamed pattern, so a name in running prose next to
    /// an unrelated year does not count.
    pub fn cites(&self, text: &str, matcher: &AuthorMatcher) -> bool {
        matcher.patterns.iter().any(|candidate| {
            candidate
                .find_iter(text)
                .any(|region| self.is_citation(region.as_str()))
        })
    }

    /// Whether `text` cites the given authors under `mode`.
    pub fn matches_authors(
        &self,
        text: &str,
        matchers: &[AuthorMatcher],
        mode: CombinationMode,
    ) -> bool {
        mode.evaluate(matchers, |m| self.cites(text, m))
    }

    /// Convenience form of [`matches_authors`](Self::matches_authors) that
    /// binds the templates first.
    pub fn is_named_citation(
        &self,
        text: &str,
        authors: &[AuthorSpec],
        mode: CombinationMode,
    ) -> Result<bool, CitationError> {
        let matchers = self.author_matchers(authors)?;
        Ok(self.matches_authors(text, &matchers, mode))
    }
}

fn validate_templates(sources: &[String], with_year: bool) -> Result<Vec<Template>, CitationError> {
    sources
        .iter()
        .map(|source| {
            let template = Template::new(source.as_str());
            let missing = if !template.has_name() {
                Some(NAME_PLACEHOLDER)
            } else if with_year && !template.has_year() {
                Some(YEAR_PLACEHOLDER)
            } else {
                None
            };
            if let Some(placeholder) = missing {
                return Err(CitationError::MissingPlaceholder {
                    template: source.clone(),
                    placeholder,
                });
            }
            // Bind sample values so a malformed template fails here, not per statement.
            let sample = Bindings {
                name: Some("sample"),
                year: with_year.then_some("1999"),
            };
            template.bind(&sample)?;
            Ok(template)
        })
        .collect()
}
