use std::collections::HashMap;
use std::path::Path;

use crate::ParsingError;

const VOWELS: &[char] = &['a', 'e', 'i', 'o', 'u', 'y'];

fn is_vowel(c: char) -> bool {
    VOWELS.contains(&c)
}

/// Estimate syllables by counting vowel groups.
///
/// A leading vowel opens a group, every consonant-to-vowel transition opens
/// another, a trailing `e` is treated as silent and a trailing `le` as
/// voiced. Never returns less than 1.
pub fn heuristic_syllables(word: &str) -> u32 {
    let chars: Vec<char> = word.to_lowercase().chars().collect();
    let mut count: i64 = 0;

    if chars.first().is_some_and(|&c| is_vowel(c)) {
        count += 1;
    }
    for pair in chars.windows(2) {
        if is_vowel(pair[1]) && !is_vowel(pair[0]) {
            count += 1;
        }
    }

    let lower: String = chars.iter().collect();
    if lower.ends_with('e') {
        count -= 1;
    }
    if lower.ends_with("le") {
        count += 1;
    }
    count.max(1) as u32
}

/// Syllable counts from a CMU-format pronouncing dictionary, with
/// [`heuristic_syllables`] for words it does not know.
#[derive(Debug, Clone, Default)]
pub struct SyllableCounter {
    dictionary: HashMap<String, u32>,
}

impl SyllableCounter {
    /// A counter with an empty dictionary (heuristic only).
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse CMU dictionary text: `WORD  PH0 PH1 ...` per line, `;;;` comments.
    ///
    /// Only the first pronunciation of a word is kept; alternates are written
    /// as `WORD(2)` and skipped. The syllable count is the number of phonemes
    /// carrying a stress digit.
    pub fn from_cmudict_str(content: &str) -> Self {
        let mut dictionary = HashMap::new();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with(";;;") {
                continue;
            }
            let mut parts = line.split_whitespace();
            let Some(word) = parts.next() else {
                continue;
            };
            if word.ends_with(')') {
                continue;
            }
            let syllables = parts
                .filter(|ph| ph.ends_with(|c: char| c.is_ascii_digit()))
                .count() as u32;
            dictionary.entry(word.to_lowercase()).or_insert(syllables);
        }
        Self { dictionary }
    }

    pub fn load(path: &Path) -> Result<Self, ParsingError> {
        let bytes = std::fs::read(path).map_err(|source| ParsingError::Dictionary {
            path: path.to_path_buf(),
            source,
        })?;
        // The published cmudict is Latin-1; decode lossily rather than fail.
        Ok(Self::from_cmudict_str(&String::from_utf8_lossy(&bytes)))
    }

    pub fn len(&self) -> usize {
        self.dictionary.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dictionary.is_empty()
    }

    pub fn count(&self, word: &str) -> u32 {
        match self.dictionary.get(&word.to_lowercase()) {
            Some(&n) => n,
            None => heuristic_syllables(word),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heuristic_syllables() {
        assert_eq!(heuristic_syllables("the"), 1);
        assert_eq!(heuristic_syllables("table"), 2);
        assert_eq!(heuristic_syllables("correlation"), 4);
        assert_eq!(heuristic_syllables("analysis"), 4);
        assert_eq!(heuristic_syllables("rhythm"), 1);
        assert_eq!(heuristic_syllables("Apple"), 2);
        assert_eq!(heuristic_syllables(""), 1);
    }

    #[test]
    fn test_dictionary_lookup_prefers_first_pronunciation() {
        let dict = SyllableCounter::from_cmudict_str(
            ";;; comment line\n\
             DATA  D EY1 T AH0\n\
             DATA(1)  D AE1 T AH0\n\
             FIRE  F AY1 ER0\n",
        );
        assert_eq!(dict.len(), 2);
        assert_eq!(dict.count("data"), 2);
        assert_eq!(dict.count("Fire"), 2);
        // heuristic fallback: "fire" would otherwise count as 1
        assert_eq!(heuristic_syllables("fire"), 1);
        assert_eq!(dict.count("table"), 2);
    }

    #[test]
    fn test_load_missing_dictionary() {
        let dir = tempfile::tempdir().unwrap();
        let err = SyllableCounter::load(&dir.path().join("cmudict.dict")).unwrap_err();
        assert!(matches!(err, ParsingError::Dictionary { .. }));
    }
}
