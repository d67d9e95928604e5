use std::fmt;
use std::str::FromStr;

use crate::CitationError;

/// How per-author results combine into one decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CombinationMode {
    /// At least one author must match; stops at the first match.
    #[default]
    Or,
    /// Every author must match; stops at the first miss.
    And,
}

impl CombinationMode {
    /// Apply `predicate` to `items` with short-circuit semantics.
    ///
    /// An empty sequence is `false` under [`Or`](Self::Or) and `true` under
    /// [`And`](Self::And).
    pub fn evaluate<I, F>(self, items: I, predicate: F) -> bool
    where
        I: IntoIterator,
        F: FnMut(I::Item) -> bool,
    {
        let mut items = items.into_iter();
        match self {
            CombinationMode::Or => items.any(predicate),
            CombinationMode::And => items.all(predicate),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CombinationMode::Or => "or",
            CombinationMode::And => "and",
        }
    }
}

impl FromStr for CombinationMode {
    type Err = CitationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "or" => Ok(CombinationMode::Or),
            "and" => Ok(CombinationMode::And),
            _ => Err(CitationError::InvalidOperator(s.to_string())),
        }
    }
}

impl fmt::Display for CombinationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn or_short_circuits_on_first_success() {
        let mut calls = 0;
        let result = CombinationMode::Or.evaluate([false, true, true], |b| {
            calls += 1;
            b
        });
        assert!(result);
        assert_eq!(calls, 2);
    }

    #[test]
    fn and_short_circuits_on_first_failure() {
        let mut calls = 0;
        let result = CombinationMode::And.evaluate([true, false, true], |b| {
            calls += 1;
            b
        });
        assert!(!result);
        assert_eq!(calls, 2);
    }

    #[test]
    fn terminal_results() {
        assert!(!CombinationMode::Or.evaluate([false, false], |b| b));
        assert!(CombinationMode::And.evaluate([true, true], |b| b));
        assert!(!CombinationMode::Or.evaluate(Vec::<bool>::new(), |b| b));
        assert!(CombinationMode::And.evaluate(Vec::<bool>::new(), |b| b));
    }

    #[test]
    fn parses_operator_names() {
        assert_eq!("or".parse::<CombinationMode>().unwrap(), CombinationMode::Or);
        assert_eq!(" AND ".parse::<CombinationMode>().unwrap(), CombinationMode::And);
        assert!(matches!(
            "xor".parse::<CombinationMode>(),
            Err(CitationError::InvalidOperator(op)) if op == "xor"
        ));
        assert_eq!(CombinationMode::And.to_string(), "and");
    }
}
