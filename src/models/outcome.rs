//! Results of catalog operations that are informational rather than
//! failures: the caller is told what happened and decides what to show.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Lesson;

/// Result of adding an entry to a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipChange {
    Added,
    /// The pair was already present; nothing was written.
    AlreadyMember,
}

/// Result of removing an entry from a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Removal {
    Removed,
    /// The entry was not in the category (or the category does not exist).
    NotAMember,
}

/// Result of linking an entry to a webpage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkChange {
    Linked,
    AlreadyLinked,
}

/// Lesson side of an entry's display state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LessonState {
    HasLesson(Lesson),
    NoLesson,
}

impl LessonState {
    /// Returns true when the entry is assigned to a lesson.
    pub fn is_member(&self) -> bool {
        matches!(self, LessonState::HasLesson(_))
    }

    /// Returns the assigned lesson, if any.
    pub fn lesson(&self) -> Option<&Lesson> {
        match self {
            LessonState::HasLesson(lesson) => Some(lesson),
            LessonState::NoLesson => None,
        }
    }
}

/// Category side of an entry's display state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryState {
    MemberOfCurrentCategory,
    NotMemberOfCurrentCategory,
}

impl From<bool> for CategoryState {
    fn from(is_member: bool) -> Self {
        if is_member {
            CategoryState::MemberOfCurrentCategory
        } else {
            CategoryState::NotMemberOfCurrentCategory
        }
    }
}

/// Derived state of a selected entry. Recomputed on every selection and
/// never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayState {
    pub category: CategoryState,
    pub lesson: LessonState,
}

impl fmt::Display for MembershipChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MembershipChange::Added => write!(f, "added"),
            MembershipChange::AlreadyMember => write!(f, "already a member"),
        }
    }
}

impl fmt::Display for Removal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Removal::Removed => write!(f, "removed"),
            Removal::NotAMember => write!(f, "not a member, nothing to remove"),
        }
    }
}

impl fmt::Display for LinkChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkChange::Linked => write!(f, "linked"),
            LinkChange::AlreadyLinked => write!(f, "already linked"),
        }
    }
}
