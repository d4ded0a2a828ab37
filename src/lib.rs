pub mod config;
pub mod db;
pub mod error;
pub mod membership;
pub mod models;
pub mod normalizer;
pub mod query;
pub mod search;
pub mod store;

pub use config::{Config, ConfigError, ensure_database_directory};
pub use db::Database;
pub use error::{CatalogError, Result};
pub use membership::MembershipManager;
pub use models::{
    AudioEntry, AudioEntryUpdate, AudioId, Category, CategoryId, CategoryState, DisplayState,
    Lesson, LessonId, LessonState, LinkChange, ListItem, MembershipChange, NO_AUDIO,
    NewAudioEntry, Removal, Webpage, WebpageId,
};
pub use search::SearchOrchestrator;
pub use store::CatalogStore;
