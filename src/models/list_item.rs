use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Separator between a list label and its id, as rendered for selection
/// lists. The six spaces keep ids visually apart from long labels.
pub const LIST_SEPARATOR: &str = "      | ";

/// One row of a selection list: a display label and the id it selects.
///
/// Renders as `"<label>      | <id>"`; [`ListItem::parse`] reads that form
/// back, splitting on the last `|`.
///
/// # Examples
///
/// ```
/// use yesod::{AudioId, ListItem};
///
/// let item = ListItem::new("book", AudioId::new(12));
/// let shown = item.to_string();
/// assert_eq!(shown, "book      | 12");
/// assert_eq!(ListItem::<AudioId>::parse(&shown), Some(item));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListItem<I> {
    pub label: String,
    pub id: I,
}

impl<I> ListItem<I> {
    pub fn new(label: impl Into<String>, id: I) -> Self {
        Self {
            label: label.into(),
            id,
        }
    }
}

impl<I: FromStr> ListItem<I> {
    /// Parses a rendered list row. Returns `None` when there is no `|` or
    /// the text after it is not an id.
    pub fn parse(text: &str) -> Option<Self> {
        let (label, id) = text.rsplit_once('|')?;
        let id = id.trim().parse().ok()?;
        Some(Self::new(label.trim(), id))
    }
}

impl<I: fmt::Display> fmt::Display for ListItem<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{LIST_SEPARATOR}{}", self.label, self.id)
    }
}
