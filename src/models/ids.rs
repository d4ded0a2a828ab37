use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Declares a typed wrapper around a database row id.
///
/// Each id type serializes as the raw integer and parses from the decimal
/// form shown after the `|` in list displays.
macro_rules! row_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps a raw row id.
            pub fn new(id: i64) -> Self {
                Self(id)
            }

            /// Returns the underlying row id.
            pub fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse().map(Self)
            }
        }
    };
}

row_id!(
    /// Identifier of an audio entry (`hebrew_audio.audio_id`).
    AudioId
);
row_id!(
    /// Identifier of a lesson (`lesson.lesson_id`).
    LessonId
);
row_id!(
    /// Identifier of a category (`category.category_id`).
    CategoryId
);
row_id!(
    /// Identifier of a saved webpage (`webpage.url_id`).
    WebpageId
);
