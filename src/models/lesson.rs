use serde::{Deserialize, Serialize};

use super::LessonId;
use crate::normalizer::lesson_number;

/// A named grouping of audio entries, typically a chapter of the course
/// book such as `"Ha-yesod 12"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    id: LessonId,
    name: String,
}

impl Lesson {
    /// Creates a lesson.
    ///
    /// # Examples
    ///
    /// ```
    /// use yesod::{Lesson, LessonId};
    ///
    /// let lesson = Lesson::new(LessonId::new(4), "Ha-yesod 12");
    /// assert_eq!(lesson.name(), "Ha-yesod 12");
    /// assert_eq!(lesson.number(), Some(12.0));
    /// ```
    pub fn new(id: LessonId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Returns the lesson's identifier.
    pub fn id(&self) -> LessonId {
        self.id
    }

    /// Returns the lesson's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the numeric part of the name, if there is one.
    pub fn number(&self) -> Option<f64> {
        lesson_number(&self.name)
    }
}
