use rusqlite::{Connection, OptionalExtension};
use tracing::{debug, info, warn};

use crate::CatalogStore;
use crate::error::{Result, StatementContext};
use crate::models::{
    AudioId, CategoryId, CategoryState, DisplayState, LessonState, ListItem, MembershipChange,
    NUMBERS_CATEGORY, Removal, category_key,
};
use crate::normalizer::numeric_sort_key;
use crate::store::{
    find_category_in, get_audio_in, not_found, query_list, resolve_or_create_lesson_in,
    validate_text,
};

/// Lesson assignment and category membership for audio entries.
///
/// An entry has at most one lesson and belongs to any number of
/// categories. Categories are created on first use and persist when they
/// become empty.
///
/// # Examples
///
/// ```
/// use yesod::{CatalogStore, Database, MembershipChange, MembershipManager, NewAudioEntry};
///
/// # fn main() -> yesod::Result<()> {
/// let store = CatalogStore::new(Database::in_memory()?);
/// let dog = store.create_audio_entry(&NewAudioEntry::new("dog", "כלב"))?;
///
/// let membership = MembershipManager::new(&store);
/// assert_eq!(membership.add_to_category(dog, "animals")?, MembershipChange::Added);
/// assert_eq!(membership.add_to_category(dog, "animals")?, MembershipChange::AlreadyMember);
/// assert!(membership.is_member(dog, "animals")?);
/// # Ok(())
/// # }
/// ```
pub struct MembershipManager<'a> {
    store: &'a CatalogStore,
}

impl<'a> MembershipManager<'a> {
    pub fn new(store: &'a CatalogStore) -> Self {
        Self { store }
    }

    fn conn(&self) -> &Connection {
        self.store.database().connection()
    }

    /// Assigns the entry to the named lesson, creating the lesson if it is
    /// new, and returns the refreshed lesson state.
    pub fn set_lesson(&self, audio_id: AudioId, lesson_name: &str) -> Result<LessonState> {
        validate_text("lesson", lesson_name)?;
        let name = lesson_name.trim();

        self.store.database().in_transaction(|conn| {
            require_audio(conn, audio_id)?;
            let lesson_id = resolve_or_create_lesson_in(conn, name)?;

            let sql = "UPDATE hebrew_audio SET lesson_id = ?1 WHERE audio_id = ?2";
            debug!(statement = sql, "assigning lesson");
            conn.execute(sql, (lesson_id.get(), audio_id.get()))
                .with_statement(sql)?;
            info!(audio_id = %audio_id, lesson = name, "assigned lesson");
            Ok(())
        })?;

        self.lesson_state(audio_id)
    }

    /// Removes the entry's lesson assignment and returns the refreshed
    /// lesson state.
    pub fn clear_lesson(&self, audio_id: AudioId) -> Result<LessonState> {
        let sql = "UPDATE hebrew_audio SET lesson_id = NULL WHERE audio_id = ?1";
        debug!(statement = sql, "clearing lesson");
        let changed = self
            .conn()
            .execute(sql, [audio_id.get()])
            .with_statement(sql)?;
        if changed == 0 {
            return Err(not_found("audio entry", audio_id.get()));
        }
        info!(audio_id = %audio_id, "cleared lesson");

        self.lesson_state(audio_id)
    }

    /// Returns whether the entry has a lesson, and which one.
    pub fn lesson_state(&self, audio_id: AudioId) -> Result<LessonState> {
        let entry = get_audio_in(self.conn(), audio_id)?
            .ok_or_else(|| not_found("audio entry", audio_id.get()))?;

        let Some(lesson_id) = entry.lesson_id else {
            return Ok(LessonState::NoLesson);
        };
        Ok(match self.store.get_lesson(lesson_id)? {
            Some(lesson) => LessonState::HasLesson(lesson),
            None => LessonState::NoLesson,
        })
    }

    /// Adds the entry to a category, creating the category on first use.
    ///
    /// Adding an existing member writes nothing and returns
    /// [`MembershipChange::AlreadyMember`].
    pub fn add_to_category(
        &self,
        audio_id: AudioId,
        category_name: &str,
    ) -> Result<MembershipChange> {
        validate_text("category", category_name)?;
        let key = category_key(category_name);

        let change = self.store.database().in_transaction(|conn| {
            require_audio(conn, audio_id)?;
            let category_id = resolve_or_create_category_in(conn, &key)?;

            let sql = "INSERT INTO category_member (category_id, audio_id) VALUES (?1, ?2)";
            debug!(statement = sql, "adding category member");
            match conn
                .execute(sql, (category_id.get(), audio_id.get()))
                .with_statement(sql)
            {
                Ok(_) => Ok(MembershipChange::Added),
                Err(e) if e.is_duplicate_key() => Ok(MembershipChange::AlreadyMember),
                Err(e) => Err(e),
            }
        })?;

        match change {
            MembershipChange::Added => {
                info!(audio_id = %audio_id, category = %key, "added to category");
            }
            MembershipChange::AlreadyMember => {
                warn!(audio_id = %audio_id, category = %key, "already a member");
            }
        }
        Ok(change)
    }

    /// Removes the entry from a category.
    ///
    /// Removing a non-member (including from a category that does not
    /// exist) returns [`Removal::NotAMember`] and changes nothing.
    pub fn remove_from_category(&self, audio_id: AudioId, category_name: &str) -> Result<Removal> {
        let Some(category) = find_category_in(self.conn(), category_name)? else {
            warn!(audio_id = %audio_id, category = category_name, "no such category");
            return Ok(Removal::NotAMember);
        };

        let sql = "DELETE FROM category_member WHERE category_id = ?1 AND audio_id = ?2";
        debug!(statement = sql, "removing category member");
        let removed = self
            .conn()
            .execute(sql, (category.id().get(), audio_id.get()))
            .with_statement(sql)?;

        if removed == 0 {
            warn!(audio_id = %audio_id, category = category.name(), "not a member");
            Ok(Removal::NotAMember)
        } else {
            info!(audio_id = %audio_id, category = category.name(), "removed from category");
            Ok(Removal::Removed)
        }
    }

    /// Returns true if the entry belongs to the named category.
    pub fn is_member(&self, audio_id: AudioId, category_name: &str) -> Result<bool> {
        let sql = "SELECT EXISTS(
                       SELECT 1 FROM category_member m
                       JOIN category c ON c.category_id = m.category_id
                       WHERE c.name = ?1 AND m.audio_id = ?2)";
        debug!(statement = sql, "checking category membership");
        self.conn()
            .query_row(sql, (category_key(category_name), audio_id.get()), |row| {
                row.get(0)
            })
            .with_statement(sql)
    }

    /// Returns the members of a category ordered by English.
    ///
    /// Members of the `numbers` category (in any case) are ordered by the
    /// numbers in their labels instead, so `"2"` comes before `"10"`.
    pub fn list_category_members(&self, category_name: &str) -> Result<Vec<ListItem<AudioId>>> {
        let key = category_key(category_name);
        let sql = "SELECT a.english, a.audio_id
                   FROM hebrew_audio a
                   JOIN category_member m ON m.audio_id = a.audio_id
                   JOIN category c ON c.category_id = m.category_id
                   WHERE c.name = ?1
                   ORDER BY a.english, a.audio_id";
        let mut members = query_list(self.conn(), sql, [&key], |row| {
            Ok(ListItem::new(
                row.get::<_, String>(0)?,
                AudioId::new(row.get(1)?),
            ))
        })?;

        if key.eq_ignore_ascii_case(NUMBERS_CATEGORY) {
            members.sort_by_cached_key(|item| numeric_sort_key(&item.to_string()));
        }
        Ok(members)
    }

    /// Derives the display state of an entry for the category currently
    /// selected in the caller, if any.
    pub fn display_state(
        &self,
        audio_id: AudioId,
        current_category: Option<&str>,
    ) -> Result<DisplayState> {
        let lesson = self.lesson_state(audio_id)?;
        let is_member = match current_category {
            Some(name) => self.is_member(audio_id, name)?,
            None => false,
        };
        Ok(DisplayState {
            category: CategoryState::from(is_member),
            lesson,
        })
    }
}

fn require_audio(conn: &Connection, audio_id: AudioId) -> Result<()> {
    match get_audio_in(conn, audio_id)? {
        Some(_) => Ok(()),
        None => Err(not_found("audio entry", audio_id.get())),
    }
}

/// Returns the id of the category with the given key, inserting the
/// directory row if needed. Callers run this inside a transaction.
fn resolve_or_create_category_in(conn: &Connection, key: &str) -> Result<CategoryId> {
    let sql = "SELECT category_id FROM category WHERE name = ?1";
    let existing: Option<i64> = conn
        .query_row(sql, [key], |row| row.get(0))
        .optional()
        .with_statement(sql)?;
    if let Some(id) = existing {
        return Ok(CategoryId::new(id));
    }

    let sql = "INSERT INTO category (name) VALUES (?1)";
    debug!(statement = sql, category = key, "creating category");
    conn.execute(sql, [key]).with_statement(sql)?;
    info!(category = key, "created category");
    Ok(CategoryId::new(conn.last_insert_rowid()))
}
