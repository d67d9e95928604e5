use crate::template::Bindings;

/// One entry of a comma-separated author scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorSpec {
    /// `smith`
    Name(String),
    /// `jones-2019`
    NameYear { name: String, year: String },
}

impl AuthorSpec {
    /// Parse one (already lower-cased) entry.
    ///
    /// A trailing `-<digits>` makes it a name-year pair; any other hyphen
    /// is part of the name (`smith-jones`).
    pub fn parse(entry: &str) -> Option<Self> {
        let entry = entry.trim();
        if entry.is_empty() {
            return None;
        }
        if let Some((name, year)) = entry.rsplit_once('-') {
            let (name, year) = (name.trim(), year.trim());
            if !name.is_empty() && !year.is_empty() && year.chars().all(|c| c.is_ascii_digit()) {
                return Some(AuthorSpec::NameYear {
                    name: name.to_string(),
                    year: year.to_string(),
                });
            }
        }
        Some(AuthorSpec::Name(entry.to_string()))
    }

    pub fn name(&self) -> &str {
        match self {
            AuthorSpec::Name(name) | AuthorSpec::NameYear { name, .. } => name,
        }
    }

    pub fn year(&self) -> Option<&str> {
        match self {
            AuthorSpec::Name(_) => None,
            AuthorSpec::NameYear { year, .. } => Some(year),
        }
    }

    pub fn bindings(&self) -> Bindings<'_> {
        match self {
            AuthorSpec::Name(name) => Bindings::name(name),
            AuthorSpec::NameYear { name, year } => Bindings::name_year(name, year),
        }
    }
}

/// Parse an author scope: lower-cased, split on commas, entries trimmed,
/// blanks dropped.
pub fn parse_authors(list: &str) -> Vec<AuthorSpec> {
    list.to_lowercase()
        .split(',')
        .filter_map(AuthorSpec::parse)
        .collect()
}
