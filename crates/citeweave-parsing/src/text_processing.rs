use once_cell::sync::Lazy;
use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

/// Expand common typographic ligatures found in PDFs.
pub fn expand_ligatures(text: &str) -> String {
    text.replace('\u{FB00}', "ff")
        .replace('\u{FB01}', "fi")
        .replace('\u{FB02}', "fl")
        .replace('\u{FB03}', "ffi")
        .replace('\u{FB04}', "ffl")
        .replace(['\u{FB05}', '\u{FB06}'], "st")
}

/// Replace every run of whitespace (including newlines) with a single space.
pub fn collapse_whitespace(text: &str) -> String {
    static RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
    RE.replace_all(text, " ").into_owned()
}

/// Drop control characters and invisible format characters (zero-width
/// spaces, soft hyphens, byte-order marks) left behind by PDF text layers.
pub fn strip_non_printable(text: &str) -> String {
    text.chars()
        .filter(|&c| {
            !c.is_control()
                && !matches!(
                    c,
                    '\u{00AD}' | '\u{200B}'..='\u{200F}' | '\u{2060}' | '\u{FEFF}'
                )
        })
        .collect()
}

/// Prepare one page of decoded text for sentence splitting.
pub fn clean_page(text: &str) -> String {
    let text = expand_ligatures(text);
    let text = collapse_whitespace(&text);
    strip_non_printable(&text)
}

/// Split text on Unicode (UAX #29) sentence boundaries.
///
/// Fragments are returned untrimmed and may be whitespace-only; the
/// normalizer discards those.
pub fn split_sentences(text: &str) -> Vec<String> {
    text.split_sentence_bounds().map(str::to_string).collect()
}
