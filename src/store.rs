use std::cmp::Ordering;

use rusqlite::{Connection, OptionalExtension, Params, Row, params_from_iter};
use tracing::{debug, info, warn};

use crate::error::{CatalogError, Result, StatementContext};
use crate::models::{
    AudioEntry, AudioEntryUpdate, AudioId, Category, CategoryId, Lesson, LessonId, LinkChange,
    ListItem, NO_AUDIO, NewAudioEntry, Removal, Webpage, WebpageId, category_key,
};
use crate::normalizer::{contains_text, lesson_number, strip_niqqud};
use crate::query::{SearchColumn, build_text_predicate};
use crate::Database;

/// Persistent catalog of audio entries, lessons, categories and webpages.
///
/// CatalogStore owns the [`Database`] and is the only place that writes
/// `hebrew_no_niqqud`: every write that touches `hebrew` derives it with
/// [`strip_niqqud`] before persisting.
///
/// # Examples
///
/// ```
/// use yesod::{CatalogStore, Database, NewAudioEntry};
///
/// # fn main() -> yesod::Result<()> {
/// let store = CatalogStore::new(Database::in_memory()?);
/// let id = store.create_audio_entry(&NewAudioEntry::new("book", "סֵפֶר"))?;
///
/// let entry = store.get_audio_detail(id)?;
/// assert_eq!(entry.hebrew_no_niqqud, "ספר");
/// # Ok(())
/// # }
/// ```
pub struct CatalogStore {
    db: Database,
}

impl CatalogStore {
    /// Creates a store over an opened database.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Returns a reference to the underlying database.
    pub fn database(&self) -> &Database {
        &self.db
    }

    // ---------------------------------------------------------------
    // Audio entries
    // ---------------------------------------------------------------

    /// Inserts a new audio entry and returns its id.
    ///
    /// English and Hebrew text are required. A blank audio file is stored
    /// as [`NO_AUDIO`]. When a lesson name is given the lesson is resolved
    /// (or created) in the same transaction as the insert.
    ///
    /// # Errors
    ///
    /// [`CatalogError::Validation`] if english, hebrew or a non-blank lesson
    /// name contains no text.
    pub fn create_audio_entry(&self, entry: &NewAudioEntry) -> Result<AudioId> {
        validate_text("english", &entry.english)?;
        validate_text("hebrew", &entry.hebrew)?;
        let lesson = match entry.lesson.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => {
                validate_text("lesson", name)?;
                Some(name)
            }
            _ => None,
        };

        let english = entry.english.trim();
        let hebrew = entry.hebrew.trim();
        let hebrew_no_niqqud = strip_niqqud(hebrew);
        let audio_file = audio_file_or_sentinel(entry.audio_file.as_deref());

        let id = self.db.in_transaction(|conn| {
            let lesson_id = match lesson {
                Some(name) => Some(resolve_or_create_lesson_in(conn, name)?),
                None => None,
            };

            let sql = "INSERT INTO hebrew_audio
                           (english, hebrew, hebrew_no_niqqud, audio_file, lesson_id)
                       VALUES (?1, ?2, ?3, ?4, ?5)";
            debug!(statement = sql, "inserting audio entry");
            conn.execute(
                sql,
                (
                    english,
                    hebrew,
                    &hebrew_no_niqqud,
                    audio_file,
                    lesson_id.map(LessonId::get),
                ),
            )
            .with_statement(sql)?;
            Ok(AudioId::new(conn.last_insert_rowid()))
        })?;

        info!(audio_id = %id, english, "created audio entry");
        Ok(id)
    }

    /// Replaces the text and audio file of an existing entry.
    ///
    /// `hebrew_no_niqqud` is recomputed from the new Hebrew text. The
    /// lesson assignment is left untouched.
    ///
    /// # Errors
    ///
    /// [`CatalogError::Validation`] for missing text and
    /// [`CatalogError::NotFound`] if the entry does not exist.
    pub fn update_audio_entry(&self, id: AudioId, update: &AudioEntryUpdate) -> Result<()> {
        validate_text("english", &update.english)?;
        validate_text("hebrew", &update.hebrew)?;

        let hebrew = update.hebrew.trim();
        let sql = "UPDATE hebrew_audio
                   SET english = ?1, hebrew = ?2, hebrew_no_niqqud = ?3, audio_file = ?4
                   WHERE audio_id = ?5";
        debug!(statement = sql, audio_id = %id, "updating audio entry");
        let changed = self
            .db
            .connection()
            .execute(
                sql,
                (
                    update.english.trim(),
                    hebrew,
                    strip_niqqud(hebrew),
                    audio_file_or_sentinel(Some(update.audio_file.as_str())),
                    id.get(),
                ),
            )
            .with_statement(sql)?;

        if changed == 0 {
            return Err(not_found("audio entry", id.get()));
        }
        info!(audio_id = %id, "updated audio entry");
        Ok(())
    }

    /// Deletes an entry together with its webpage links and category
    /// memberships.
    pub fn delete_audio_entry(&self, id: AudioId) -> Result<()> {
        let sql = "DELETE FROM hebrew_audio WHERE audio_id = ?1";
        debug!(statement = sql, audio_id = %id, "deleting audio entry");
        let changed = self
            .db
            .connection()
            .execute(sql, [id.get()])
            .with_statement(sql)?;

        if changed == 0 {
            return Err(not_found("audio entry", id.get()));
        }
        info!(audio_id = %id, "deleted audio entry");
        Ok(())
    }

    /// Returns the full record of an entry.
    pub fn get_audio_detail(&self, id: AudioId) -> Result<AudioEntry> {
        get_audio_in(self.db.connection(), id)?.ok_or_else(|| not_found("audio entry", id.get()))
    }

    /// Returns entries whose English, Hebrew or unvocalized Hebrew contains
    /// the token, ordered by English.
    ///
    /// A `%` in the token is used as the caller's own `LIKE` pattern.
    pub fn find_audio_by_text(&self, token: &str) -> Result<Vec<ListItem<AudioId>>> {
        let predicate = build_text_predicate(token, &SearchColumn::AUDIO);
        let sql = format!(
            "SELECT english, audio_id FROM hebrew_audio
             WHERE {}
             ORDER BY english, audio_id",
            predicate.sql
        );
        query_list(
            self.db.connection(),
            &sql,
            params_from_iter(predicate.params.iter()),
            audio_item,
        )
    }

    /// Returns every entry, ordered by English.
    pub fn list_audio(&self) -> Result<Vec<ListItem<AudioId>>> {
        let sql = "SELECT english, audio_id FROM hebrew_audio ORDER BY english, audio_id";
        query_list(self.db.connection(), sql, [], audio_item)
    }

    // ---------------------------------------------------------------
    // Lessons
    // ---------------------------------------------------------------

    /// Returns all lessons ordered by the number in their names.
    ///
    /// `"Ha-yesod 9"` sorts before `"Ha-yesod 10"`. Lessons without a
    /// number follow the numbered ones, by name.
    pub fn list_lessons(&self) -> Result<Vec<Lesson>> {
        let sql = "SELECT lesson_id, name FROM lesson";
        let mut lessons = query_list(self.db.connection(), sql, [], lesson_from_row)?;
        lessons.sort_by(|a, b| {
            let by_number = match (lesson_number(a.name()), lesson_number(b.name())) {
                (Some(x), Some(y)) => x.total_cmp(&y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            };
            by_number.then_with(|| a.name().cmp(b.name()))
        });
        Ok(lessons)
    }

    /// Returns the id of the named lesson, creating it if needed.
    ///
    /// Lookup, insert and re-lookup run in one transaction.
    pub fn resolve_or_create_lesson(&self, name: &str) -> Result<LessonId> {
        validate_text("lesson", name)?;
        self.db
            .in_transaction(|conn| resolve_or_create_lesson_in(conn, name.trim()))
    }

    /// Looks up a lesson by exact (trimmed) name.
    pub fn find_lesson(&self, name: &str) -> Result<Option<Lesson>> {
        find_lesson_in(self.db.connection(), name.trim())
    }

    /// Looks up a lesson by id.
    pub fn get_lesson(&self, id: LessonId) -> Result<Option<Lesson>> {
        let sql = "SELECT lesson_id, name FROM lesson WHERE lesson_id = ?1";
        debug!(statement = sql, lesson_id = %id, "querying lesson");
        self.db
            .connection()
            .query_row(sql, [id.get()], lesson_from_row)
            .optional()
            .with_statement(sql)
    }

    /// Returns the entries assigned to a lesson, ordered by English.
    ///
    /// An unknown lesson has no members.
    pub fn list_lesson_members(&self, lesson_name: &str) -> Result<Vec<ListItem<AudioId>>> {
        let sql = "SELECT a.english, a.audio_id
                   FROM hebrew_audio a
                   JOIN lesson l ON l.lesson_id = a.lesson_id
                   WHERE l.name = ?1
                   ORDER BY a.english, a.audio_id";
        query_list(self.db.connection(), sql, [lesson_name.trim()], audio_item)
    }

    // ---------------------------------------------------------------
    // Categories
    // ---------------------------------------------------------------

    /// Returns all categories ordered by name, including empty ones.
    pub fn list_categories(&self) -> Result<Vec<Category>> {
        let sql = "SELECT category_id, name FROM category ORDER BY name";
        query_list(self.db.connection(), sql, [], category_from_row)
    }

    /// Looks up a category by name; spaces and underscores are equivalent.
    pub fn find_category(&self, name: &str) -> Result<Option<Category>> {
        find_category_in(self.db.connection(), name)
    }

    // ---------------------------------------------------------------
    // Webpages
    // ---------------------------------------------------------------

    /// Saves a webpage and returns its id.
    pub fn create_webpage(&self, topic: &str, url: &str) -> Result<WebpageId> {
        validate_text("topic", topic)?;
        validate_text("url", url)?;

        let sql = "INSERT INTO webpage (topic, url) VALUES (?1, ?2)";
        debug!(statement = sql, "inserting webpage");
        let conn = self.db.connection();
        conn.execute(sql, (topic.trim(), url.trim()))
            .with_statement(sql)?;

        let id = WebpageId::new(conn.last_insert_rowid());
        info!(url_id = %id, topic = topic.trim(), "created webpage");
        Ok(id)
    }

    /// Replaces the topic and URL of a saved webpage.
    pub fn update_webpage(&self, id: WebpageId, topic: &str, url: &str) -> Result<()> {
        validate_text("topic", topic)?;
        validate_text("url", url)?;

        let sql = "UPDATE webpage SET topic = ?1, url = ?2 WHERE url_id = ?3";
        debug!(statement = sql, url_id = %id, "updating webpage");
        let changed = self
            .db
            .connection()
            .execute(sql, (topic.trim(), url.trim(), id.get()))
            .with_statement(sql)?;

        if changed == 0 {
            return Err(not_found("webpage", id.get()));
        }
        info!(url_id = %id, "updated webpage");
        Ok(())
    }

    /// Deletes a webpage and its links to audio entries.
    pub fn delete_webpage(&self, id: WebpageId) -> Result<()> {
        let sql = "DELETE FROM webpage WHERE url_id = ?1";
        debug!(statement = sql, url_id = %id, "deleting webpage");
        let changed = self
            .db
            .connection()
            .execute(sql, [id.get()])
            .with_statement(sql)?;

        if changed == 0 {
            return Err(not_found("webpage", id.get()));
        }
        info!(url_id = %id, "deleted webpage");
        Ok(())
    }

    /// Returns a saved webpage.
    pub fn get_webpage(&self, id: WebpageId) -> Result<Webpage> {
        get_webpage_in(self.db.connection(), id)?.ok_or_else(|| not_found("webpage", id.get()))
    }

    /// Returns every webpage, ordered by topic.
    pub fn list_webpages(&self) -> Result<Vec<ListItem<WebpageId>>> {
        let sql = "SELECT topic, url_id FROM webpage ORDER BY topic, url_id";
        query_list(self.db.connection(), sql, [], webpage_item)
    }

    /// Returns webpages whose topic contains the token, ordered by topic.
    pub fn find_webpages_by_topic(&self, token: &str) -> Result<Vec<ListItem<WebpageId>>> {
        let predicate = build_text_predicate(token, &SearchColumn::WEBPAGE);
        let sql = format!(
            "SELECT topic, url_id FROM webpage WHERE {} ORDER BY topic, url_id",
            predicate.sql
        );
        query_list(
            self.db.connection(),
            &sql,
            params_from_iter(predicate.params.iter()),
            webpage_item,
        )
    }

    // ---------------------------------------------------------------
    // Audio ↔ webpage links
    // ---------------------------------------------------------------

    /// Links an entry to a webpage. Linking twice is reported, not an error.
    pub fn link_audio_webpage(&self, audio_id: AudioId, url_id: WebpageId) -> Result<LinkChange> {
        self.db.in_transaction(|conn| {
            if get_audio_in(conn, audio_id)?.is_none() {
                return Err(not_found("audio entry", audio_id.get()));
            }
            if get_webpage_in(conn, url_id)?.is_none() {
                return Err(not_found("webpage", url_id.get()));
            }

            let sql = "INSERT OR IGNORE INTO audio_url_link (audio_id, url_id) VALUES (?1, ?2)";
            debug!(statement = sql, "linking audio entry to webpage");
            let inserted = conn
                .execute(sql, (audio_id.get(), url_id.get()))
                .with_statement(sql)?;

            if inserted == 0 {
                warn!(audio_id = %audio_id, url_id = %url_id, "already linked");
                Ok(LinkChange::AlreadyLinked)
            } else {
                info!(audio_id = %audio_id, url_id = %url_id, "linked audio entry to webpage");
                Ok(LinkChange::Linked)
            }
        })
    }

    /// Removes a link. Removing a link that does not exist is reported.
    pub fn unlink_audio_webpage(&self, audio_id: AudioId, url_id: WebpageId) -> Result<Removal> {
        let sql = "DELETE FROM audio_url_link WHERE audio_id = ?1 AND url_id = ?2";
        debug!(statement = sql, "unlinking audio entry from webpage");
        let removed = self
            .db
            .connection()
            .execute(sql, (audio_id.get(), url_id.get()))
            .with_statement(sql)?;

        if removed == 0 {
            warn!(audio_id = %audio_id, url_id = %url_id, "link did not exist");
            Ok(Removal::NotAMember)
        } else {
            info!(audio_id = %audio_id, url_id = %url_id, "unlinked audio entry from webpage");
            Ok(Removal::Removed)
        }
    }

    /// Returns the webpages linked to an entry, ordered by topic.
    pub fn webpages_for_audio(&self, audio_id: AudioId) -> Result<Vec<ListItem<WebpageId>>> {
        let sql = "SELECT w.topic, w.url_id
                   FROM webpage w
                   JOIN audio_url_link l ON l.url_id = w.url_id
                   WHERE l.audio_id = ?1
                   ORDER BY w.topic, w.url_id";
        query_list(self.db.connection(), sql, [audio_id.get()], webpage_item)
    }

    /// Returns the entries linked to a webpage, ordered by English.
    pub fn audio_for_webpage(&self, url_id: WebpageId) -> Result<Vec<ListItem<AudioId>>> {
        let sql = "SELECT a.english, a.audio_id
                   FROM hebrew_audio a
                   JOIN audio_url_link l ON l.audio_id = a.audio_id
                   WHERE l.url_id = ?1
                   ORDER BY a.english, a.audio_id";
        query_list(self.db.connection(), sql, [url_id.get()], audio_item)
    }
}

// -------------------------------------------------------------------
// Connection-level helpers, usable inside a transaction
// -------------------------------------------------------------------

pub(crate) fn validate_text(field: &'static str, text: &str) -> Result<()> {
    if contains_text(text) {
        Ok(())
    } else {
        Err(CatalogError::validation(field))
    }
}

pub(crate) fn not_found(entity: &'static str, id: i64) -> CatalogError {
    CatalogError::NotFound { entity, id }
}

fn audio_file_or_sentinel(audio_file: Option<&str>) -> &str {
    match audio_file.map(str::trim) {
        Some(file) if !file.is_empty() => file,
        _ => NO_AUDIO,
    }
}

/// Runs a query and maps every row. The statement text is logged and
/// attached to any error.
pub(crate) fn query_list<T, P: Params>(
    conn: &Connection,
    sql: &str,
    params: P,
    map: impl FnMut(&Row<'_>) -> rusqlite::Result<T>,
) -> Result<Vec<T>> {
    debug!(statement = sql, "executing query");
    let mut stmt = conn.prepare(sql).with_statement(sql)?;
    let rows = stmt.query_map(params, map).with_statement(sql)?;
    rows.collect::<rusqlite::Result<Vec<T>>>()
        .with_statement(sql)
}

pub(crate) fn get_audio_in(conn: &Connection, id: AudioId) -> Result<Option<AudioEntry>> {
    let sql = "SELECT audio_id, english, hebrew, hebrew_no_niqqud, audio_file, lesson_id
               FROM hebrew_audio WHERE audio_id = ?1";
    debug!(statement = sql, audio_id = %id, "querying audio entry");
    conn.query_row(sql, [id.get()], |row| {
        Ok(AudioEntry {
            id: AudioId::new(row.get(0)?),
            english: row.get(1)?,
            hebrew: row.get(2)?,
            hebrew_no_niqqud: row.get(3)?,
            audio_file: row
                .get::<_, Option<String>>(4)?
                .unwrap_or_else(|| NO_AUDIO.to_string()),
            lesson_id: row.get::<_, Option<i64>>(5)?.map(LessonId::new),
        })
    })
    .optional()
    .with_statement(sql)
}

fn get_webpage_in(conn: &Connection, id: WebpageId) -> Result<Option<Webpage>> {
    let sql = "SELECT url_id, topic, url FROM webpage WHERE url_id = ?1";
    debug!(statement = sql, url_id = %id, "querying webpage");
    conn.query_row(sql, [id.get()], |row| {
        Ok(Webpage {
            id: WebpageId::new(row.get(0)?),
            topic: row.get(1)?,
            url: row.get(2)?,
        })
    })
    .optional()
    .with_statement(sql)
}

pub(crate) fn find_lesson_in(conn: &Connection, name: &str) -> Result<Option<Lesson>> {
    let sql = "SELECT lesson_id, name FROM lesson WHERE name = ?1";
    debug!(statement = sql, lesson = name, "querying lesson");
    conn.query_row(sql, [name], lesson_from_row)
        .optional()
        .with_statement(sql)
}

/// Looks the lesson up, inserts it if missing, then looks it up again.
/// Callers run this inside a transaction.
pub(crate) fn resolve_or_create_lesson_in(conn: &Connection, name: &str) -> Result<LessonId> {
    if let Some(lesson) = find_lesson_in(conn, name)? {
        return Ok(lesson.id());
    }

    let sql = "INSERT INTO lesson (name) VALUES (?1)";
    debug!(statement = sql, lesson = name, "creating lesson");
    conn.execute(sql, [name]).with_statement(sql)?;

    let lesson = find_lesson_in(conn, name)?.ok_or_else(|| CatalogError::Store {
        statement: sql.to_string(),
        source: rusqlite::Error::QueryReturnedNoRows,
    })?;
    info!(lesson_id = %lesson.id(), lesson = name, "created lesson");
    Ok(lesson.id())
}

pub(crate) fn find_category_in(conn: &Connection, name: &str) -> Result<Option<Category>> {
    let sql = "SELECT category_id, name FROM category WHERE name = ?1";
    debug!(statement = sql, category = name, "querying category");
    conn.query_row(sql, [category_key(name)], category_from_row)
        .optional()
        .with_statement(sql)
}

fn audio_item(row: &Row<'_>) -> rusqlite::Result<ListItem<AudioId>> {
    Ok(ListItem::new(
        row.get::<_, String>(0)?,
        AudioId::new(row.get(1)?),
    ))
}

fn webpage_item(row: &Row<'_>) -> rusqlite::Result<ListItem<WebpageId>> {
    Ok(ListItem::new(
        row.get::<_, String>(0)?,
        WebpageId::new(row.get(1)?),
    ))
}

fn lesson_from_row(row: &Row<'_>) -> rusqlite::Result<Lesson> {
    Ok(Lesson::new(
        LessonId::new(row.get(0)?),
        row.get::<_, String>(1)?,
    ))
}

fn category_from_row(row: &Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category::new(
        CategoryId::new(row.get(0)?),
        &row.get::<_, String>(1)?,
    ))
}

#[cfg(test)]
#[path = "store/tests.rs"]
mod tests;
