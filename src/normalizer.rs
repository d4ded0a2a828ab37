//! Canonicalization of Hebrew and English catalog text.
//!
//! Everything in this module is a pure function over `&str`; nothing
//! touches the database. The store calls [`strip_niqqud`] on every write
//! of Hebrew text, and the search layer uses [`contains_text`] to reject
//! empty queries before any statement runs.

mod niqqud;
mod sort_keys;
mod suffix;
mod transliterate;

pub use niqqud::{NIQQUD, contains_niqqud, strip_niqqud};
pub use sort_keys::{SortChunk, lesson_number, numeric_sort_key};
pub use suffix::{strip_gender_suffix, strip_parenthetical_plural};
pub use transliterate::{Transliterator, transliterate};

/// Returns true if `c` lies in the Hebrew block (U+0590–U+05FF) or the
/// Hebrew presentation forms (U+FB1D–U+FB4F).
pub fn is_hebrew_char(c: char) -> bool {
    matches!(c, '\u{0590}'..='\u{05FF}' | '\u{FB1D}'..='\u{FB4F}')
}

/// Returns true if the text contains at least one Hebrew character.
///
/// A single Hebrew letter is enough to treat the whole string as Hebrew.
///
/// # Examples
///
/// ```
/// use yesod::normalizer::is_hebrew;
///
/// assert!(is_hebrew("שלום"));
/// assert!(is_hebrew("book ספר"));
/// assert!(!is_hebrew("book"));
/// ```
pub fn is_hebrew(text: &str) -> bool {
    text.chars().any(is_hebrew_char)
}

/// Returns true if the text contains an ASCII alphanumeric character or a
/// Hebrew character.
///
/// This is the validation gate for every required text field and for
/// search tokens.
///
/// # Examples
///
/// ```
/// use yesod::normalizer::contains_text;
///
/// assert!(contains_text("book"));
/// assert!(contains_text("  7 "));
/// assert!(contains_text("ספר"));
/// assert!(!contains_text("   "));
/// assert!(!contains_text("?!"));
/// ```
pub fn contains_text(text: &str) -> bool {
    text.chars().any(|c| c.is_ascii_alphanumeric() || is_hebrew_char(c))
}

/// Prepares an entry for lookup on an external dictionary website.
///
/// Strips the gender marker and the parenthesized plural, removes niqqud
/// from Hebrew text and drops sentence punctuation (`.`, `!`, `?`).
///
/// # Examples
///
/// ```
/// use yesod::normalizer::website_search_text;
///
/// assert_eq!(website_search_text("סֵפֶר (סְפָרִים) ז"), "ספר");
/// assert_eq!(website_search_text("Good morning!"), "Good morning");
/// ```
pub fn website_search_text(text: &str) -> String {
    let text = strip_gender_suffix(text);
    let mut text = strip_parenthetical_plural(&text);

    if is_hebrew(&text) {
        text = strip_niqqud(&text);
    }

    text.chars()
        .filter(|c| !matches!(c, '.' | '!' | '?'))
        .collect::<String>()
        .trim()
        .to_string()
}
