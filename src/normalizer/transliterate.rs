use super::{contains_niqqud, is_hebrew_char};

/// Latin keys and the Hebrew letters they type.
///
/// The mapping is many-to-one on purpose: several Latin letters stand for
/// the same Hebrew letter. Upper-case `C M N P X` give the final forms and
/// upper-case `T` gives tet.
const LATIN_TO_HEBREW: [(char, char); 32] = [
    ('a', 'א'),
    ('b', 'ב'),
    ('c', 'כ'),
    ('d', 'ד'),
    ('e', 'ע'),
    ('f', 'פ'),
    ('g', 'ג'),
    ('h', 'ה'),
    ('i', 'י'),
    ('j', 'ח'),
    ('k', 'ק'),
    ('l', 'ל'),
    ('m', 'מ'),
    ('n', 'נ'),
    ('o', 'ו'),
    ('p', 'פ'),
    ('q', 'ק'),
    ('r', 'ר'),
    ('s', 'ס'),
    ('t', 'ת'),
    ('u', 'ו'),
    ('v', 'ו'),
    ('w', 'ש'),
    ('x', 'צ'),
    ('y', 'י'),
    ('z', 'ז'),
    ('T', 'ט'),
    ('C', 'ך'),
    ('M', 'ם'),
    ('N', 'ן'),
    ('P', 'ף'),
    ('X', 'ץ'),
];

fn hebrew_for(c: char) -> Option<char> {
    LATIN_TO_HEBREW
        .iter()
        .find(|(latin, _)| *latin == c)
        .map(|(_, hebrew)| *hebrew)
}

/// Maps typed Latin letters in an input buffer to Hebrew letters.
///
/// - A buffer that already carries niqqud is returned unchanged (it was
///   pasted, not typed).
/// - Hebrew characters pass through.
/// - Mapped Latin letters are replaced.
/// - Latin letters without a mapping are dropped.
/// - Anything else (spaces, digits, punctuation) passes through.
///
/// # Examples
///
/// ```
/// use yesod::normalizer::transliterate;
///
/// assert_eq!(transliterate("slwM"), "סלשם");
/// assert_eq!(transliterate("ספר 2"), "ספר 2");
/// ```
pub fn transliterate(buffer: &str) -> String {
    if contains_niqqud(buffer) {
        return buffer.to_string();
    }

    buffer
        .chars()
        .filter_map(|c| {
            if is_hebrew_char(c) {
                Some(c)
            } else if let Some(hebrew) = hebrew_for(c) {
                Some(hebrew)
            } else if c.is_ascii_alphabetic() {
                None
            } else {
                Some(c)
            }
        })
        .collect()
}

/// Live transliteration for a single input field.
///
/// This is a thin adapter for edit-driven UIs; [`transliterate`] is the
/// real entry point and holds all of the conversion rules. The UI calls
/// [`Transliterator::on_edit`] with the buffer before and after each edit
/// and writes the returned text back into the field. `previous` is only
/// used to skip edits that leave the buffer unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct Transliterator;

impl Transliterator {
    /// Creates a new transliterator.
    pub fn new() -> Self {
        Self
    }

    /// Returns the buffer to display after an edit from `previous` to
    /// `current`.
    ///
    /// Edits that leave the buffer unchanged are returned as-is, so writing
    /// the result back into the field does not cascade.
    ///
    /// # Examples
    ///
    /// ```
    /// use yesod::normalizer::Transliterator;
    ///
    /// let t = Transliterator::new();
    /// let after_s = t.on_edit("", "s");
    /// assert_eq!(after_s, "ס");
    /// assert_eq!(t.on_edit(&after_s, "סl"), "סל");
    /// ```
    pub fn on_edit(&self, previous: &str, current: &str) -> String {
        if previous == current {
            return current.to_string();
        }
        transliterate(current)
    }
}
