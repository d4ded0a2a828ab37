use serde::{Deserialize, Serialize};

use super::CategoryId;

/// Returns the stored key for a category name.
///
/// Names are trimmed and spaces become underscores, so `"body parts"` and
/// `"body_parts"` name the same category.
///
/// # Examples
///
/// ```
/// use yesod::models::category_key;
///
/// assert_eq!(category_key(" body parts "), "body_parts");
/// assert_eq!(category_key("numbers"), "numbers");
/// ```
pub fn category_key(name: &str) -> String {
    name.trim().replace(' ', "_")
}

/// A named set of audio entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    id: CategoryId,
    name: String,
}

impl Category {
    /// Creates a category, keying the name with [`category_key`].
    pub fn new(id: CategoryId, name: &str) -> Self {
        Self {
            id,
            name: category_key(name),
        }
    }

    /// Returns the category's identifier.
    pub fn id(&self) -> CategoryId {
        self.id
    }

    /// Returns the stored (underscored) name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the name with underscores shown as spaces.
    pub fn display_name(&self) -> String {
        self.name.replace('_', " ")
    }
}

/// Category whose member list is ordered by the numbers in its labels.
pub const NUMBERS_CATEGORY: &str = "numbers";
