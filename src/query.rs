//! Search predicate composition.
//!
//! Builds parameterized `LIKE` predicates from raw user input. User text is
//! only ever bound as a parameter; column names come from the closed
//! [`SearchColumn`] set and never from input.

use std::fmt;

/// Columns that text search may target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchColumn {
    English,
    Hebrew,
    HebrewNoNiqqud,
    Topic,
}

impl SearchColumn {
    /// The columns searched for audio entries.
    pub const AUDIO: [SearchColumn; 3] = [
        SearchColumn::English,
        SearchColumn::Hebrew,
        SearchColumn::HebrewNoNiqqud,
    ];

    /// The columns searched for webpages.
    pub const WEBPAGE: [SearchColumn; 1] = [SearchColumn::Topic];

    /// Returns the column name as it appears in SQL.
    pub fn as_sql(self) -> &'static str {
        match self {
            SearchColumn::English => "english",
            SearchColumn::Hebrew => "hebrew",
            SearchColumn::HebrewNoNiqqud => "hebrew_no_niqqud",
            SearchColumn::Topic => "topic",
        }
    }
}

impl fmt::Display for SearchColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// A SQL boolean expression with its bound parameters.
///
/// `sql` uses positional `?` placeholders; `params` holds one value per
/// placeholder, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextPredicate {
    pub sql: String,
    pub params: Vec<String>,
}

/// Returns the `LIKE` pattern for a search term.
///
/// The term is wrapped as `%term%` unless it already contains a literal
/// `%`, in which case the caller's pattern is used as-is.
///
/// # Examples
///
/// ```
/// use yesod::query::like_pattern;
///
/// assert_eq!(like_pattern("book"), "%book%");
/// assert_eq!(like_pattern("%oo%"), "%oo%");
/// assert_eq!(like_pattern("bo%"), "bo%");
/// ```
pub fn like_pattern(search_text: &str) -> String {
    if search_text.contains('%') {
        search_text.to_string()
    } else {
        format!("%{search_text}%")
    }
}

/// Builds a predicate that is true when the term matches any of the given
/// columns (OR'd).
///
/// SQLite's `LIKE` is case-insensitive for ASCII, which gives the
/// case-insensitive substring semantics for English text.
///
/// # Examples
///
/// ```
/// use yesod::query::{SearchColumn, build_text_predicate};
///
/// let predicate = build_text_predicate("book", &SearchColumn::AUDIO);
/// assert_eq!(
///     predicate.sql,
///     "(english LIKE ? OR hebrew LIKE ? OR hebrew_no_niqqud LIKE ?)"
/// );
/// assert_eq!(predicate.params, vec!["%book%"; 3]);
/// ```
pub fn build_text_predicate(search_text: &str, columns: &[SearchColumn]) -> TextPredicate {
    if columns.is_empty() {
        return TextPredicate {
            sql: "0".to_string(),
            params: Vec::new(),
        };
    }

    let pattern = like_pattern(search_text);
    let clauses: Vec<String> = columns
        .iter()
        .map(|column| format!("{column} LIKE ?"))
        .collect();

    TextPredicate {
        sql: format!("({})", clauses.join(" OR ")),
        params: vec![pattern; columns.len()],
    }
}

/// Extracts the search token from the raw text of an input widget.
///
/// List selections are displayed as `"label | id"`; for those only the
/// label before the first `|` is searched. A `|` is only treated as a
/// separator when the text contains a space followed by `|`. Anything
/// else is searched whole, trimmed.
///
/// # Examples
///
/// ```
/// use yesod::query::extract_search_token;
///
/// assert_eq!(extract_search_token("book      | 12"), "book");
/// assert_eq!(extract_search_token("  good morning "), "good morning");
/// assert_eq!(extract_search_token("a|b"), "a|b");
/// ```
pub fn extract_search_token(raw_widget_text: &str) -> String {
    if !raw_widget_text.contains(" |") {
        return raw_widget_text.trim().to_string();
    }
    match raw_widget_text.split_once('|') {
        Some((label, _)) => label.trim().to_string(),
        None => raw_widget_text.trim().to_string(),
    }
}
