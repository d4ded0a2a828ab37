mod audio_entry;
mod category;
mod ids;
mod lesson;
mod list_item;
mod outcome;
mod webpage;

pub use audio_entry::{AudioEntry, AudioEntryUpdate, NO_AUDIO, NewAudioEntry};
pub use category::{Category, NUMBERS_CATEGORY, category_key};
pub use ids::{AudioId, CategoryId, LessonId, WebpageId};
pub use lesson::Lesson;
pub use list_item::{LIST_SEPARATOR, ListItem};
pub use outcome::{
    CategoryState, DisplayState, LessonState, LinkChange, MembershipChange, Removal,
};
pub use webpage::{Webpage, decode_url, format_hyperlink};
