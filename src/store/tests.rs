use super::*;
use crate::normalizer::strip_niqqud;

fn store() -> CatalogStore {
    CatalogStore::new(Database::in_memory().expect("failed to create in-memory database"))
}

fn stored_derived_text(store: &CatalogStore, id: AudioId) -> String {
    store
        .database()
        .connection()
        .query_row(
            "SELECT hebrew_no_niqqud FROM hebrew_audio WHERE audio_id = ?1",
            [id.get()],
            |row| row.get(0),
        )
        .unwrap()
}

fn labels<I>(items: &[ListItem<I>]) -> Vec<&str> {
    items.iter().map(|item| item.label.as_str()).collect()
}

// -------------------------------------------------------------------
// Audio entries
// -------------------------------------------------------------------

#[test]
fn create_derives_unvocalized_hebrew() {
    let store = store();
    let hebrew = "שָׁלוֹם";
    let id = store
        .create_audio_entry(&NewAudioEntry::new("hello", hebrew))
        .unwrap();

    assert_eq!(stored_derived_text(&store, id), strip_niqqud(hebrew));
    assert_eq!(stored_derived_text(&store, id), "שלום");
}

#[test]
fn create_without_audio_stores_sentinel() {
    let store = store();
    let id = store
        .create_audio_entry(&NewAudioEntry::new("book", "ספר").audio_file("   "))
        .unwrap();

    let entry = store.get_audio_detail(id).unwrap();
    assert_eq!(entry.audio_file, NO_AUDIO);
    assert!(!entry.has_audio());
}

#[test]
fn create_trims_text_fields() {
    let store = store();
    let id = store
        .create_audio_entry(&NewAudioEntry::new("  book ", " ספר ").audio_file(" sefer.mp3 "))
        .unwrap();

    let entry = store.get_audio_detail(id).unwrap();
    assert_eq!(entry.english, "book");
    assert_eq!(entry.hebrew, "ספר");
    assert_eq!(entry.audio_file, "sefer.mp3");
}

#[test]
fn create_rejects_missing_text_before_writing() {
    let store = store();

    let err = store
        .create_audio_entry(&NewAudioEntry::new("", "ספר"))
        .unwrap_err();
    assert!(matches!(err, CatalogError::Validation { field: "english" }));

    let err = store
        .create_audio_entry(&NewAudioEntry::new("book", "?!"))
        .unwrap_err();
    assert!(matches!(err, CatalogError::Validation { field: "hebrew" }));

    assert!(store.list_audio().unwrap().is_empty());
}

#[test]
fn create_with_lesson_creates_lesson_once() {
    let store = store();
    let first = store
        .create_audio_entry(&NewAudioEntry::new("book", "ספר").lesson("Ha-yesod 3"))
        .unwrap();
    let second = store
        .create_audio_entry(&NewAudioEntry::new("pen", "עט").lesson(" Ha-yesod 3 "))
        .unwrap();

    let lessons = store.list_lessons().unwrap();
    assert_eq!(lessons.len(), 1);

    let lesson_id = lessons[0].id();
    assert_eq!(store.get_audio_detail(first).unwrap().lesson_id, Some(lesson_id));
    assert_eq!(store.get_audio_detail(second).unwrap().lesson_id, Some(lesson_id));
}

#[test]
fn create_with_blank_lesson_assigns_none() {
    let store = store();
    let id = store
        .create_audio_entry(&NewAudioEntry::new("book", "ספר").lesson("  "))
        .unwrap();

    assert_eq!(store.get_audio_detail(id).unwrap().lesson_id, None);
    assert!(store.list_lessons().unwrap().is_empty());
}

#[test]
fn create_with_invalid_lesson_writes_nothing() {
    let store = store();
    let err = store
        .create_audio_entry(&NewAudioEntry::new("book", "ספר").lesson("..."))
        .unwrap_err();

    assert!(matches!(err, CatalogError::Validation { field: "lesson" }));
    assert!(store.list_audio().unwrap().is_empty());
}

#[test]
fn update_recomputes_unvocalized_hebrew() {
    let store = store();
    let id = store
        .create_audio_entry(&NewAudioEntry::new("book", "ספר"))
        .unwrap();

    store
        .update_audio_entry(id, &AudioEntryUpdate::new("books", "סְפָרִים", "sfarim.mp3"))
        .unwrap();

    let entry = store.get_audio_detail(id).unwrap();
    assert_eq!(entry.english, "books");
    assert_eq!(entry.hebrew, "סְפָרִים");
    assert_eq!(entry.hebrew_no_niqqud, "ספרים");
    assert_eq!(entry.audio_file, "sfarim.mp3");
}

#[test]
fn update_keeps_lesson_assignment() {
    let store = store();
    let id = store
        .create_audio_entry(&NewAudioEntry::new("book", "ספר").lesson("Ha-yesod 1"))
        .unwrap();
    let before = store.get_audio_detail(id).unwrap();

    store
        .update_audio_entry(id, &AudioEntryUpdate::from(&before))
        .unwrap();

    assert_eq!(store.get_audio_detail(id).unwrap().lesson_id, before.lesson_id);
}

#[test]
fn update_missing_entry_is_not_found() {
    let store = store();
    let err = store
        .update_audio_entry(AudioId::new(99), &AudioEntryUpdate::new("a", "א", NO_AUDIO))
        .unwrap_err();

    assert!(matches!(err, CatalogError::NotFound { id: 99, .. }));
}

#[test]
fn delete_removes_entry() {
    let store = store();
    let id = store
        .create_audio_entry(&NewAudioEntry::new("book", "ספר"))
        .unwrap();

    store.delete_audio_entry(id).unwrap();

    assert!(matches!(
        store.get_audio_detail(id),
        Err(CatalogError::NotFound { .. })
    ));
    assert!(matches!(
        store.delete_audio_entry(id),
        Err(CatalogError::NotFound { .. })
    ));
}

// -------------------------------------------------------------------
// Text search
// -------------------------------------------------------------------

#[test]
fn find_matches_any_text_column() {
    let store = store();
    let id = store
        .create_audio_entry(&NewAudioEntry::new("book", "סֵפֶר"))
        .unwrap();

    for token in ["book", "BOO", "סֵפֶר", "ספר", "פר"] {
        let results = store.find_audio_by_text(token).unwrap();
        assert_eq!(results.len(), 1, "token {token}");
        assert_eq!(results[0].id, id);
        assert_eq!(results[0].label, "book");
    }
}

#[test]
fn find_orders_by_english() {
    let store = store();
    for (english, hebrew) in [("bread", "לחם"), ("apple", "תפוח"), ("cabbage", "כרוב")] {
        store
            .create_audio_entry(&NewAudioEntry::new(english, hebrew))
            .unwrap();
    }

    let results = store.find_audio_by_text("a").unwrap();
    assert_eq!(labels(&results), vec!["apple", "bread", "cabbage"]);
}

#[test]
fn find_with_explicit_wildcard() {
    let store = store();
    for (english, hebrew) in [("book", "ספר"), ("food", "אוכל"), ("box", "קופסה")] {
        store
            .create_audio_entry(&NewAudioEntry::new(english, hebrew))
            .unwrap();
    }

    let results = store.find_audio_by_text("%oo%").unwrap();
    assert_eq!(labels(&results), vec!["book", "food"]);

    let results = store.find_audio_by_text("b%").unwrap();
    assert_eq!(labels(&results), vec!["book", "box"]);
}

#[test]
fn find_treats_quotes_as_text() {
    let store = store();
    store
        .create_audio_entry(&NewAudioEntry::new("o'clock", "שעה"))
        .unwrap();

    let results = store.find_audio_by_text("o'clock").unwrap();
    assert_eq!(results.len(), 1);

    let results = store.find_audio_by_text("x' OR '1'='1").unwrap();
    assert!(results.is_empty());
}

#[test]
fn find_with_no_match_is_empty() {
    let store = store();
    store
        .create_audio_entry(&NewAudioEntry::new("book", "ספר"))
        .unwrap();

    assert!(store.find_audio_by_text("table").unwrap().is_empty());
}

// -------------------------------------------------------------------
// Lessons
// -------------------------------------------------------------------

#[test]
fn lessons_sort_by_number_not_text() {
    let store = store();
    for name in ["Ha-yesod 10", "Review", "Ha-yesod 2", "Ha-yesod 1", "Appendix"] {
        store.resolve_or_create_lesson(name).unwrap();
    }

    let names: Vec<String> = store
        .list_lessons()
        .unwrap()
        .iter()
        .map(|l| l.name().to_string())
        .collect();
    assert_eq!(
        names,
        vec!["Ha-yesod 1", "Ha-yesod 2", "Ha-yesod 10", "Appendix", "Review"]
    );
}

#[test]
fn resolve_or_create_is_stable() {
    let store = store();
    let first = store.resolve_or_create_lesson("Ha-yesod 5").unwrap();
    let second = store.resolve_or_create_lesson("  Ha-yesod 5").unwrap();

    assert_eq!(first, second);
    assert_eq!(store.list_lessons().unwrap().len(), 1);
}

#[test]
fn find_and_get_lesson() {
    let store = store();
    let id = store.resolve_or_create_lesson("Ha-yesod 4").unwrap();

    let found = store.find_lesson("Ha-yesod 4").unwrap().unwrap();
    assert_eq!(found.id(), id);
    assert_eq!(store.get_lesson(id).unwrap(), Some(found));

    assert_eq!(store.find_lesson("Ha-yesod 40").unwrap(), None);
    assert_eq!(store.get_lesson(LessonId::new(999)).unwrap(), None);
}

#[test]
fn lesson_members_are_ordered_by_english() {
    let store = store();
    for english in ["pen", "book"] {
        store
            .create_audio_entry(&NewAudioEntry::new(english, "מילה").lesson("Ha-yesod 1"))
            .unwrap();
    }
    store
        .create_audio_entry(&NewAudioEntry::new("cat", "חתול").lesson("Ha-yesod 2"))
        .unwrap();

    let members = store.list_lesson_members("Ha-yesod 1").unwrap();
    assert_eq!(labels(&members), vec!["book", "pen"]);
    assert!(store.list_lesson_members("Ha-yesod 9").unwrap().is_empty());
}

// -------------------------------------------------------------------
// Webpages and links
// -------------------------------------------------------------------

#[test]
fn webpage_crud() {
    let store = store();
    let id = store
        .create_webpage(" verbs ", "https://example.com/verbs")
        .unwrap();

    let page = store.get_webpage(id).unwrap();
    assert_eq!(page.topic, "verbs");

    store
        .update_webpage(id, "binyanim", "https://example.com/binyanim")
        .unwrap();
    let page = store.get_webpage(id).unwrap();
    assert_eq!(page.topic, "binyanim");
    assert_eq!(page.url, "https://example.com/binyanim");

    store.delete_webpage(id).unwrap();
    assert!(matches!(
        store.get_webpage(id),
        Err(CatalogError::NotFound { entity: "webpage", .. })
    ));
}

#[test]
fn webpage_requires_topic_and_url() {
    let store = store();
    assert!(matches!(
        store.create_webpage("", "https://example.com"),
        Err(CatalogError::Validation { field: "topic" })
    ));
    assert!(matches!(
        store.create_webpage("verbs", " "),
        Err(CatalogError::Validation { field: "url" })
    ));
}

#[test]
fn webpages_list_and_search_by_topic() {
    let store = store();
    store.create_webpage("verbs", "https://example.com/1").unwrap();
    store.create_webpage("adverbs", "https://example.com/2").unwrap();
    store.create_webpage("nouns", "https://example.com/3").unwrap();

    assert_eq!(
        labels(&store.list_webpages().unwrap()),
        vec!["adverbs", "nouns", "verbs"]
    );
    assert_eq!(
        labels(&store.find_webpages_by_topic("verb").unwrap()),
        vec!["adverbs", "verbs"]
    );
    assert_eq!(
        labels(&store.find_webpages_by_topic("verb%").unwrap()),
        vec!["verbs"]
    );
}

#[test]
fn links_resolve_in_both_directions() {
    let store = store();
    let book = store
        .create_audio_entry(&NewAudioEntry::new("book", "ספר"))
        .unwrap();
    let pen = store
        .create_audio_entry(&NewAudioEntry::new("pen", "עט"))
        .unwrap();
    let nouns = store.create_webpage("nouns", "https://example.com/n").unwrap();
    let objects = store.create_webpage("objects", "https://example.com/o").unwrap();

    assert_eq!(store.link_audio_webpage(book, nouns).unwrap(), LinkChange::Linked);
    assert_eq!(store.link_audio_webpage(book, objects).unwrap(), LinkChange::Linked);
    assert_eq!(store.link_audio_webpage(pen, nouns).unwrap(), LinkChange::Linked);

    assert_eq!(
        labels(&store.webpages_for_audio(book).unwrap()),
        vec!["nouns", "objects"]
    );
    assert_eq!(labels(&store.audio_for_webpage(nouns).unwrap()), vec!["book", "pen"]);
}

#[test]
fn linking_twice_is_reported() {
    let store = store();
    let book = store
        .create_audio_entry(&NewAudioEntry::new("book", "ספר"))
        .unwrap();
    let page = store.create_webpage("nouns", "https://example.com").unwrap();

    store.link_audio_webpage(book, page).unwrap();
    assert_eq!(
        store.link_audio_webpage(book, page).unwrap(),
        LinkChange::AlreadyLinked
    );
    assert_eq!(store.webpages_for_audio(book).unwrap().len(), 1);
}

#[test]
fn linking_unknown_records_is_not_found() {
    let store = store();
    let page = store.create_webpage("nouns", "https://example.com").unwrap();

    assert!(matches!(
        store.link_audio_webpage(AudioId::new(5), page),
        Err(CatalogError::NotFound { entity: "audio entry", id: 5 })
    ));
}

#[test]
fn unlink_reports_missing_link() {
    let store = store();
    let book = store
        .create_audio_entry(&NewAudioEntry::new("book", "ספר"))
        .unwrap();
    let page = store.create_webpage("nouns", "https://example.com").unwrap();
    store.link_audio_webpage(book, page).unwrap();

    assert_eq!(store.unlink_audio_webpage(book, page).unwrap(), Removal::Removed);
    assert_eq!(
        store.unlink_audio_webpage(book, page).unwrap(),
        Removal::NotAMember
    );
    assert!(store.audio_for_webpage(page).unwrap().is_empty());
}

#[test]
fn deleting_webpage_removes_its_links() {
    let store = store();
    let book = store
        .create_audio_entry(&NewAudioEntry::new("book", "ספר"))
        .unwrap();
    let page = store.create_webpage("nouns", "https://example.com").unwrap();
    store.link_audio_webpage(book, page).unwrap();

    store.delete_webpage(page).unwrap();
    assert!(store.webpages_for_audio(book).unwrap().is_empty());
}

#[test]
fn categories_start_empty() {
    let store = store();
    assert!(store.list_categories().unwrap().is_empty());
    assert_eq!(store.find_category("animals").unwrap(), None);
}
