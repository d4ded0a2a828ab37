use std::sync::LazyLock;

use regex::Regex;

/// Feminine gender marker appended to catalog entries.
const FEMININE_MARKER: char = 'נ';
/// Masculine gender marker appended to catalog entries.
const MASCULINE_MARKER: char = 'ז';

// Parenthesis glyphs in pasted Hebrew text are frequently unpaired, so each
// combination gets its own pattern.
static PAIRED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(.*\)").expect("valid paired-parenthesis pattern"));
static LEFT_ONLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(.*\(").expect("valid left-parenthesis pattern"));
static RIGHT_ONLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(.*?)\s?\).*?\)").expect("valid right-parenthesis pattern"));

/// Removes a trailing gender marker (`" ז"` or `" נ"`) from an entry.
///
/// Only a marker preceded by a space is removed, and only one. Strings of
/// fewer than two characters are returned unchanged; everything else is
/// trimmed.
///
/// # Examples
///
/// ```
/// use yesod::normalizer::strip_gender_suffix;
///
/// assert_eq!(strip_gender_suffix("שלום טוב ז"), "שלום טוב");
/// assert_eq!(strip_gender_suffix("תלמידה נ"), "תלמידה");
/// assert_eq!(strip_gender_suffix("שלום"), "שלום");
/// ```
pub fn strip_gender_suffix(text: &str) -> String {
    let mut chars = text.chars().rev();
    let (Some(last), Some(before_last)) = (chars.next(), chars.next()) else {
        return text.to_string();
    };

    if before_last == ' ' && (last == MASCULINE_MARKER || last == FEMININE_MARKER) {
        text[..text.len() - last.len_utf8()].trim().to_string()
    } else {
        text.trim().to_string()
    }
}

/// Removes an alternate plural form written in parentheses.
///
/// - `(` and `)` present: the span from the first `(` to the last `)` is
///   removed.
/// - only `(` present: the span from the first `(` to the last `(` is
///   removed, treating the repeated `(` as a closer.
/// - only `)` present: the span from the first `)` to the following `)`,
///   plus one whitespace character before it, is removed.
///
/// The result is always trimmed.
///
/// # Examples
///
/// ```
/// use yesod::normalizer::strip_parenthetical_plural;
///
/// assert_eq!(strip_parenthetical_plural("ספר (ספרים)"), "ספר");
/// assert_eq!(strip_parenthetical_plural("ספר (ספרים("), "ספר");
/// assert_eq!(strip_parenthetical_plural("ספר )ספרים)"), "ספר");
/// assert_eq!(strip_parenthetical_plural(" ספר "), "ספר");
/// ```
pub fn strip_parenthetical_plural(text: &str) -> String {
    let has_left = text.contains('(');
    let has_right = text.contains(')');

    let stripped = match (has_left, has_right) {
        (true, true) => PAIRED.replace_all(text, ""),
        (true, false) => LEFT_ONLY.replace_all(text, ""),
        (false, true) => RIGHT_ONLY.replace_all(text, "${1}"),
        (false, false) => return text.trim().to_string(),
    };

    stripped.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gender_marker_requires_preceding_space() {
        assert_eq!(strip_gender_suffix("אז"), "אז");
        assert_eq!(strip_gender_suffix("זמן"), "זמן");
    }

    #[test]
    fn gender_only_one_marker_is_removed() {
        assert_eq!(strip_gender_suffix("ספר ז ז"), "ספר ז");
    }

    #[test]
    fn gender_leaves_interior_markers() {
        assert_eq!(strip_gender_suffix("ז ספר"), "ז ספר");
    }

    #[test]
    fn gender_short_strings_are_unchanged() {
        assert_eq!(strip_gender_suffix(""), "");
        assert_eq!(strip_gender_suffix("ז"), "ז");
        assert_eq!(strip_gender_suffix(" "), " ");
    }

    #[test]
    fn gender_marker_alone_after_space_leaves_empty() {
        assert_eq!(strip_gender_suffix(" נ"), "");
    }

    #[test]
    fn gender_unmarked_text_is_trimmed() {
        assert_eq!(strip_gender_suffix("  שלום  "), "שלום");
    }

    #[test]
    fn plural_paired_is_removed() {
        assert_eq!(strip_parenthetical_plural("ספר (ספרים)"), "ספר");
        assert_eq!(strip_parenthetical_plural("(ספרים) ספר"), "ספר");
    }

    #[test]
    fn plural_paired_is_greedy_to_last_right_parenthesis() {
        assert_eq!(strip_parenthetical_plural("a (b) c (d) e"), "a  e");
    }

    #[test]
    fn plural_reversed_pair_is_untouched() {
        // Both glyphs exist but never form a "(...)" span
        assert_eq!(strip_parenthetical_plural(" a ) b ( c "), "a ) b ( c");
    }

    #[test]
    fn plural_left_only_cuts_to_last_left_parenthesis() {
        assert_eq!(strip_parenthetical_plural("ספר (ספרים( עוד"), "ספר  עוד");
        assert_eq!(strip_parenthetical_plural("a (b (c (d"), "a d");
    }

    #[test]
    fn plural_single_left_parenthesis_is_untouched() {
        assert_eq!(strip_parenthetical_plural("ספר (ספרים"), "ספר (ספרים");
    }

    #[test]
    fn plural_right_only_removes_between_right_parentheses() {
        assert_eq!(strip_parenthetical_plural("ספר )ספרים) עוד"), "ספר עוד");
    }

    #[test]
    fn plural_single_right_parenthesis_is_untouched() {
        assert_eq!(strip_parenthetical_plural("ספר ספרים)"), "ספר ספרים)");
    }

    #[test]
    fn plural_without_parentheses_is_trimmed() {
        assert_eq!(strip_parenthetical_plural("ספר"), "ספר");
        assert_eq!(strip_parenthetical_plural("\tספר\n"), "ספר");
    }
}
