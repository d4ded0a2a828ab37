/// Complete database schema for the vocabulary catalog.
///
/// Uses CREATE TABLE/INDEX IF NOT EXISTS for idempotent execution.
/// Column names match databases written by earlier versions of the
/// application so existing catalogs open unchanged.
pub const INITIAL_SCHEMA: &str = r#"
-- Lessons: named chapters, created lazily on first assignment
CREATE TABLE IF NOT EXISTS lesson (
    lesson_id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE
);

-- Audio entries; hebrew_no_niqqud is always derived from hebrew
CREATE TABLE IF NOT EXISTS hebrew_audio (
    audio_id INTEGER PRIMARY KEY,
    english TEXT NOT NULL,
    hebrew TEXT NOT NULL,
    hebrew_no_niqqud TEXT NOT NULL,
    audio_file TEXT NOT NULL DEFAULT 'No Audio',
    lesson_id INTEGER,
    FOREIGN KEY (lesson_id) REFERENCES lesson(lesson_id) ON DELETE SET NULL
);

-- Saved reference webpages
CREATE TABLE IF NOT EXISTS webpage (
    url_id INTEGER PRIMARY KEY,
    topic TEXT NOT NULL,
    url TEXT NOT NULL
);

-- Junction table: links audio entries to webpages (many-to-many)
CREATE TABLE IF NOT EXISTS audio_url_link (
    audio_id INTEGER NOT NULL,
    url_id INTEGER NOT NULL,
    PRIMARY KEY (audio_id, url_id),
    FOREIGN KEY (audio_id) REFERENCES hebrew_audio(audio_id) ON DELETE CASCADE,
    FOREIGN KEY (url_id) REFERENCES webpage(url_id) ON DELETE CASCADE
);

-- Category directory: names are trimmed with spaces replaced by underscores
-- and compared case-insensitively
CREATE TABLE IF NOT EXISTS category (
    category_id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE COLLATE NOCASE
);

-- Junction table: category membership is a set per category
CREATE TABLE IF NOT EXISTS category_member (
    category_id INTEGER NOT NULL,
    audio_id INTEGER NOT NULL,
    PRIMARY KEY (category_id, audio_id),
    FOREIGN KEY (category_id) REFERENCES category(category_id) ON DELETE CASCADE,
    FOREIGN KEY (audio_id) REFERENCES hebrew_audio(audio_id) ON DELETE CASCADE
);

-- Index for ordering lists by English gloss
CREATE INDEX IF NOT EXISTS idx_hebrew_audio_english ON hebrew_audio(english);
CREATE INDEX IF NOT EXISTS idx_hebrew_audio_lesson ON hebrew_audio(lesson_id);

-- Indexes for reverse junction lookups
CREATE INDEX IF NOT EXISTS idx_audio_url_link_url ON audio_url_link(url_id);
CREATE INDEX IF NOT EXISTS idx_category_member_audio ON category_member(audio_id);
"#;
