use regex::Regex;

use crate::{CitationError, compile_pattern};

pub const NAME_PLACEHOLDER: &str = "{name}";
pub const YEAR_PLACEHOLDER: &str = "{year}";

/// Values substituted into a [`Template`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Bindings<'a> {
    pub name: Option<&'a str>,
    pub year: Option<&'a str>,
}

impl<'a> Bindings<'a> {
    pub fn name(name: &'a str) -> Self {
        Self {
            name: Some(name),
            year: None,
        }
    }

    pub fn name_year(name: &'a str, year: &'a str) -> Self {
        Self {
            name: Some(name),
            year: Some(year),
        }
    }
}

/// A citation pattern with `{name}` / `{year}` placeholders.
///
/// Bound values are regex-escaped, so an author name is always matched
/// literally while the rest of the template keeps its regex meaning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
}

impl Template {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn has_name(&self) -> bool {
        self.source.contains(NAME_PLACEHOLDER)
    }

    pub fn has_year(&self) -> bool {
        self.source.contains(YEAR_PLACEHOLDER)
    }

    /// Substitute bindings, producing the regex source text.
    ///
    /// Every placeholder in the template must be bound; extra bindings are
    /// ignored.
    pub fn render(&self, bindings: &Bindings<'_>) -> Result<String, CitationError> {
        let mut rendered = self.source.clone();
        for (placeholder, value) in [
            (NAME_PLACEHOLDER, bindings.name),
            (YEAR_PLACEHOLDER, bindings.year),
        ] {
            if !rendered.contains(placeholder) {
                continue;
            }
            let value = value.ok_or_else(|| CitationError::Unbound {
                template: self.source.clone(),
                placeholder,
            })?;
            rendered = rendered.replace(placeholder, &regex::escape(value));
        }
        Ok(rendered)
    }

    /// Render and compile into a case-insensitive regex.
    pub fn bind(&self, bindings: &Bindings<'_>) -> Result<Regex, CitationError> {
        compile_pattern(&self.render(bindings)?)
    }
}
