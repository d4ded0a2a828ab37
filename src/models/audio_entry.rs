use serde::{Deserialize, Serialize};

use super::{AudioId, LessonId};

/// Audio file name stored for entries without a recording.
pub const NO_AUDIO: &str = "No Audio";

/// A catalogued vocabulary item: Hebrew text, its English gloss and the
/// audio clip that pronounces it.
///
/// `hebrew_no_niqqud` is always `strip_niqqud(hebrew)`; the store derives
/// it on every write and callers never set it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioEntry {
    pub id: AudioId,
    pub english: String,
    pub hebrew: String,
    pub hebrew_no_niqqud: String,
    pub audio_file: String,
    pub lesson_id: Option<LessonId>,
}

impl AudioEntry {
    /// Returns true if the entry has a recording.
    pub fn has_audio(&self) -> bool {
        self.audio_file != NO_AUDIO && !self.audio_file.trim().is_empty()
    }
}

/// Input for creating an audio entry.
///
/// # Examples
///
/// ```
/// use yesod::NewAudioEntry;
///
/// let entry = NewAudioEntry::new("book", "סֵפֶר")
///     .audio_file("sefer.mp3")
///     .lesson("Ha-yesod 3");
///
/// assert_eq!(entry.english, "book");
/// assert_eq!(entry.lesson.as_deref(), Some("Ha-yesod 3"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewAudioEntry {
    pub english: String,
    pub hebrew: String,
    pub audio_file: Option<String>,
    pub lesson: Option<String>,
}

impl NewAudioEntry {
    /// Creates an entry without audio and without a lesson.
    pub fn new(english: impl Into<String>, hebrew: impl Into<String>) -> Self {
        Self {
            english: english.into(),
            hebrew: hebrew.into(),
            ..Default::default()
        }
    }

    /// Sets the audio file name.
    pub fn audio_file(mut self, audio_file: impl Into<String>) -> Self {
        self.audio_file = Some(audio_file.into());
        self
    }

    /// Sets the lesson the entry belongs to; created if it does not exist.
    pub fn lesson(mut self, lesson: impl Into<String>) -> Self {
        self.lesson = Some(lesson.into());
        self
    }
}

/// Replacement values for an existing audio entry.
///
/// Lesson assignment is not part of an edit; it goes through the
/// membership manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioEntryUpdate {
    pub english: String,
    pub hebrew: String,
    pub audio_file: String,
}

impl AudioEntryUpdate {
    /// Creates an update carrying all editable fields.
    pub fn new(
        english: impl Into<String>,
        hebrew: impl Into<String>,
        audio_file: impl Into<String>,
    ) -> Self {
        Self {
            english: english.into(),
            hebrew: hebrew.into(),
            audio_file: audio_file.into(),
        }
    }
}

impl From<&AudioEntry> for AudioEntryUpdate {
    fn from(entry: &AudioEntry) -> Self {
        Self::new(&entry.english, &entry.hebrew, &entry.audio_file)
    }
}
