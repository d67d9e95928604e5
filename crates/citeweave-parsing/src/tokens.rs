use std::collections::HashSet;
use std::path::Path;

use citeweave_core::Statement;
use once_cell::sync::Lazy;
use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

use crate::ParsingError;

/// Words dropped from every document before counting.
#[derive(Debug, Clone, Default)]
pub struct ExclusionSet {
    words: HashSet<String>,
}

impl ExclusionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        Self { words }
    }

    /// Load a one-word-per-line exclusion file.
    pub fn load(path: &Path) -> Result<Self, ParsingError> {
        let content =
            std::fs::read_to_string(path).map_err(|source| ParsingError::Exclusions {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self::from_words(content.lines()))
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// The kept words of one document, in reading order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentWords {
    pub document: String,
    pub words: Vec<String>,
}

/// Split text into word-boundary tokens, punctuation included, whitespace dropped.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_word_bounds()
        .filter(|t| !t.trim().is_empty())
        .map(str::to_string)
        .collect()
}

/// Isolate digit runs: `model3b` becomes `model`, `3`, `b`.
pub fn split_digits(tokens: &[String]) -> Vec<String> {
    static DIGITS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());

    let mut pieces = Vec::with_capacity(tokens.len());
    for token in tokens {
        let mut last = 0;
        for m in DIGITS_RE.find_iter(token) {
            if m.start() > last {
                pieces.push(token[last..m.start()].to_string());
            }
            pieces.push(m.as_str().to_string());
            last = m.end();
        }
        if last < token.len() {
            pieces.push(token[last..].to_string());
        }
    }
    pieces
}

/// Re-join hyphenated compounds the tokenizer split apart.
///
/// A token ending in `-`, or followed by a token starting with `-`, absorbs
/// the next token; this repeats, so `state - of - the - art` collapses into
/// one token.
pub fn merge_hyphen_words(tokens: &[String]) -> Vec<String> {
    let mut merged = Vec::with_capacity(tokens.len());
    let mut idx = 0;
    while idx < tokens.len() {
        let mut current = tokens[idx].clone();
        while idx + 1 < tokens.len() && (current.ends_with('-') || tokens[idx + 1].starts_with('-'))
        {
            current.push_str(&tokens[idx + 1]);
            idx += 1;
        }
        merged.push(current);
        idx += 1;
    }
    merged
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn has_alpha_run(word: &str) -> bool {
    let mut prev_alpha = false;
    for c in word.chars() {
        let alpha = c.is_alphabetic();
        if alpha && prev_alpha {
            return true;
        }
        prev_alpha = alpha;
    }
    false
}

/// Strip, lower-case and filter one token; `None` if it is not kept.
pub fn clean_word(token: &str, exclusions: &ExclusionSet) -> Option<String> {
    let word = token.trim_matches(|c: char| !is_word_char(c)).to_lowercase();
    if has_alpha_run(&word) && !exclusions.contains(&word) {
        Some(word)
    } else {
        None
    }
}

/// Words of one statement, after tokenizing and cleansing.
pub fn statement_words(text: &str, exclusions: &ExclusionSet) -> Vec<String> {
    let tokens = split_digits(&tokenize(text));
    merge_hyphen_words(&tokens)
        .iter()
        .filter_map(|t| clean_word(t, exclusions))
        .collect()
}

/// Decompose statements into per-document word sequences.
///
/// Documents appear in first-seen order; words keep statement order.
pub fn extract_words(statements: &[Statement], exclusions: &ExclusionSet) -> Vec<DocumentWords> {
    let mut documents: Vec<DocumentWords> = Vec::new();
    for statement in statements {
        let words = statement_words(&statement.text, exclusions);
        match documents
            .iter_mut()
            .find(|d| d.document == statement.document)
        {
            Some(doc) => doc.words.extend(words),
            None => documents.push(DocumentWords {
                document: statement.document.clone(),
                words,
            }),
        }
    }
    documents
}
