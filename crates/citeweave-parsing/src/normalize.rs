//! Repair of over-eager sentence splitting.
//!
//! Sentence tokenizers split on periods that do not end a sentence: the
//! period of a numbered-list marker, the inside of a parenthetical, a stray
//! closing clause. [`normalize`] walks the raw fragments once and glues such
//! pieces back onto the previous statement.
//!
//! The output is a fixed point: normalizing it again changes nothing. Two
//! things keep it so. A merge that leaves the last statement repairable
//! against the one before it folds the two together, and list headers are
//! split off only where both halves keep their parentheses balanced.

use once_cell::sync::Lazy;
use regex::Regex;

/// A numbered-list marker standing alone: `3.` or `12 .`
static NUMBERED_MARKER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\s*\.$").unwrap());

/// A list header followed by its first numbered item: `as follows: 1.`
static LIST_INTRO_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r":\s*\d+\s*\.").unwrap());

/// Why a fragment was merged into the previous statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repair {
    /// The fragment does not start with a word character.
    Continuation,
    /// The previous statement or the fragment has unbalanced parentheses.
    UnbalancedParens,
    /// The previous statement is only a numbered-list marker.
    NumberedMarker,
}

/// Whether `text` has as many `(` as `)`.
pub fn is_balanced(text: &str) -> bool {
    text.matches('(').count() == text.matches(')').count()
}

fn starts_with_word_char(text: &str) -> bool {
    text.chars()
        .next()
        .is_some_and(|c| c.is_alphanumeric() || c == '_')
}

/// Decide whether `current` (already trimmed, non-empty) continues `previous`.
pub fn repair_for(previous: &str, current: &str) -> Option<Repair> {
    if !starts_with_word_char(current) {
        Some(Repair::Continuation)
    } else if !is_balanced(previous) || !is_balanced(current) {
        Some(Repair::UnbalancedParens)
    } else if NUMBERED_MARKER_RE.is_match(previous) {
        Some(Repair::NumberedMarker)
    } else {
        None
    }
}

/// Split a fragment that holds a list header and its first numbered item.
///
/// The split happens right after the colon; text before the colon is not
/// checked for being a complete sentence.
pub fn split_list_intro(fragment: &str) -> Option<(&str, &str)> {
    let m = LIST_INTRO_RE.find(fragment)?;
    let at = m.start() + 1;
    Some((fragment[..at].trim(), fragment[at..].trim()))
}

/// Split `text` at successive list introductions.
///
/// Stops at the first introduction whose header or remainder has unbalanced
/// parentheses: `See (the list: 1. a) here.` stays whole.
pub fn split_list_items(text: &str) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut rest = text;
    while let Some((header, item)) = split_list_intro(rest) {
        if !is_balanced(header) || !is_balanced(item) {
            break;
        }
        pieces.push(header.to_string());
        rest = item;
    }
    pieces.push(rest.to_string());
    pieces
}

/// Fold the last statement into the one before it while the pair is still
/// repairable, then split what remains at its list introductions.
fn settle_last(statements: &mut Vec<String>) {
    while let [.., previous, last] = statements.as_slice()
        && let Some(repair) = repair_for(previous, last)
    {
        tracing::trace!(?repair, "folding statement into its predecessor");
        let Some(last) = statements.pop() else { break };
        if let Some(previous) = statements.last_mut() {
            previous.push(' ');
            previous.push_str(&last);
        }
    }
    if let Some(last) = statements.pop() {
        statements.extend(split_list_items(&last));
    }
}

/// Merge fragments that are artifacts of over-splitting.
///
/// Single pass over the fragments; merges only ever extend the tail of the
/// output, so output order follows input order. Blank fragments are dropped.
pub fn normalize<S: AsRef<str>>(raw: &[S]) -> Vec<String> {
    let mut statements: Vec<String> = Vec::with_capacity(raw.len());

    for fragment in raw {
        let current = fragment.as_ref().trim();
        if current.is_empty() {
            continue;
        }

        if let Some(last) = statements.last_mut()
            && let Some(repair) = repair_for(last, current)
        {
            tracing::trace!(?repair, fragment = current, "merging fragment");
            last.push(' ');
            last.push_str(current);
            settle_last(&mut statements);
            continue;
        }

        statements.extend(split_list_items(current));
    }

    statements
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merges_continuation_and_numbered_marker() {
        let raw = ["This is a sentence", "(see note)", "3", ".", "First point."];
        assert_eq!(
            normalize(&raw),
            vec!["This is a sentence (see note)", "3 . First point."]
        );
    }

    #[test]
    fn numbered_marker_only_matches_whole_entry() {
        // "Step 3." is not a bare marker, so the next sentence stays separate.
        let raw = ["Step 3.", "Then continue."];
        assert_eq!(normalize(&raw), vec!["Step 3.", "Then continue."]);

        let raw = ["12 .", "Twelfth item."];
        assert_eq!(normalize(&raw), vec!["12 . Twelfth item."]);
    }

    #[test]
    fn merges_split_parenthetical() {
        let raw = ["Results (see Smith et al.", "2020) hold.", "Next one."];
        assert_eq!(
            normalize(&raw),
            vec!["Results (see Smith et al. 2020) hold.", "Next one."]
        );
    }

    #[test]
    fn unbalanced_current_fragment_merges_into_balanced_previous() {
        let raw = ["Balanced sentence.", "Opens (here but never closes."];
        assert_eq!(
            normalize(&raw),
            vec!["Balanced sentence. Opens (here but never closes."]
        );
    }

    #[test]
    fn splits_list_header_after_colon() {
        let raw = ["The steps are: 1. Collect data", "Then analyse."];
        assert_eq!(
            normalize(&raw),
            vec!["The steps are:", "1. Collect data", "Then analyse."]
        );
    }

    #[test]
    fn colon_without_numbered_item_is_kept() {
        let raw = ["Note: this is fine."];
        assert_eq!(normalize(&raw), vec!["Note: this is fine."]);
    }

    #[test]
    fn skips_blank_fragments_and_trims() {
        let raw = ["   ", "  First.  ", "", "Second."];
        assert_eq!(normalize(&raw), vec!["First.", "Second."]);
    }

    #[test]
    fn leading_non_word_fragment_is_emitted() {
        let raw = ["(Intro) text.", "More text."];
        assert_eq!(normalize(&raw), vec!["(Intro) text.", "More text."]);

        let raw = ["  ", "- dangling", "Next."];
        assert_eq!(normalize(&raw), vec!["- dangling", "Next."]);
    }

    #[test]
    fn second_pass_is_a_fixed_point() {
        let raw = [
            "This is a sentence",
            "(see note)",
            "3",
            ".",
            "First point.",
            "Another claim holds.",
            ", which is continued",
            "Final words.",
        ];
        let once = normalize(&raw);
        let twice = normalize(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn list_split_inside_parenthetical_is_skipped() {
        let raw = ["See (the list: 1. a) here.", "Next."];
        let once = normalize(&raw);
        assert_eq!(once, vec!["See (the list: 1. a) here.", "Next."]);
        assert_eq!(normalize(&once), once);
    }

    #[test]
    fn splits_every_balanced_list_intro() {
        assert_eq!(
            split_list_items("Steps: 1. Collect: 2. Clean"),
            vec!["Steps:", "1. Collect:", "2. Clean"]
        );
        // Stops once a header would leave a parenthesis open.
        assert_eq!(
            split_list_items("Steps: 1. Collect (raw: 2. x)"),
            vec!["Steps:", "1. Collect (raw: 2. x)"]
        );
    }

    #[test]
    fn merged_statement_is_split_at_new_list_intro() {
        let raw = ["Steps: 1.", "Collect: 2. Clean."];
        let once = normalize(&raw);
        assert_eq!(once, vec!["Steps:", "1. Collect:", "2. Clean."]);
        assert_eq!(normalize(&once), once);
    }

    #[test]
    fn unbalanced_tail_folds_into_earlier_statements() {
        // ") x" joins "B." and leaves it unbalanced, so it cannot stand
        // apart from "A." either.
        let raw = ["A.", "B.", ") x"];
        let once = normalize(&raw);
        assert_eq!(once, vec!["A. B. ) x"]);
        assert_eq!(normalize(&once), once);
    }

    #[test]
    fn repair_rules_in_priority_order() {
        assert_eq!(repair_for("Prev.", ") tail"), Some(Repair::Continuation));
        assert_eq!(repair_for("Prev (a", "b"), Some(Repair::UnbalancedParens));
        assert_eq!(repair_for("7.", "Item"), Some(Repair::NumberedMarker));
        assert_eq!(repair_for("Prev.", "Item"), None);
    }
}
