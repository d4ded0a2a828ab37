use std::cmp::Ordering;

/// Characters trimmed from both ends of a lesson name before its number is
/// parsed (the book title prefix `Ha-yesod`).
const LESSON_PREFIX_CHARS: &str = "Ha-yesod";

/// One run of a [`numeric_sort_key`]: either non-digit text or a digit run
/// compared by numeric value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortChunk {
    Text(String),
    Number(String),
}

impl SortChunk {
    fn digits(digits: &str) -> Self {
        let significant = digits.trim_start_matches('0');
        SortChunk::Number(significant.to_string())
    }
}

impl Ord for SortChunk {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortChunk::Text(a), SortChunk::Text(b)) => a.cmp(b),
            // Leading zeros are already stripped, so a longer run is larger
            (SortChunk::Number(a), SortChunk::Number(b)) => {
                a.len().cmp(&b.len()).then_with(|| a.cmp(b))
            }
            (SortChunk::Text(_), SortChunk::Number(_)) => Ordering::Less,
            (SortChunk::Number(_), SortChunk::Text(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for SortChunk {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Splits text into alternating non-digit and digit runs so that embedded
/// integers compare numerically.
///
/// The key always starts with a (possibly empty) text run, so keys of any
/// two strings line up chunk for chunk. Digit runs of any length are
/// compared without overflow.
///
/// # Examples
///
/// ```
/// use yesod::normalizer::numeric_sort_key;
///
/// let mut numbers = vec!["10", "1", "2"];
/// numbers.sort_by_key(|s| numeric_sort_key(s));
/// assert_eq!(numbers, vec!["1", "2", "10"]);
/// ```
pub fn numeric_sort_key(text: &str) -> Vec<SortChunk> {
    let mut chunks = Vec::new();
    let mut rest = text;

    loop {
        let digit_start = rest.find(|c: char| c.is_ascii_digit()).unwrap_or(rest.len());
        chunks.push(SortChunk::Text(rest[..digit_start].to_string()));
        rest = &rest[digit_start..];
        if rest.is_empty() {
            break;
        }

        let digit_end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        chunks.push(SortChunk::digits(&rest[..digit_end]));
        rest = &rest[digit_end..];
        if rest.is_empty() {
            chunks.push(SortChunk::Text(String::new()));
            break;
        }
    }

    chunks
}

/// Extracts the lesson number from a name such as `"Ha-yesod 12"`.
///
/// Returns `None` when no number remains after trimming the title prefix.
///
/// # Examples
///
/// ```
/// use yesod::normalizer::lesson_number;
///
/// assert_eq!(lesson_number("Ha-yesod 12"), Some(12.0));
/// assert_eq!(lesson_number("Ha-yesod 3.5"), Some(3.5));
/// assert_eq!(lesson_number("Review"), None);
/// ```
pub fn lesson_number(name: &str) -> Option<f64> {
    name.trim()
        .trim_matches(|c| LESSON_PREFIX_CHARS.contains(c))
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
}
