/// Database schema for the note store.
///
/// Uses CREATE TABLE/INDEX IF NOT EXISTS so it can run on every open.
/// `tags.note_id` is a plain foreign key with no cascade action: tag rows
/// must be removed explicitly before their note.
pub const SCHEMA: &str = r#"
-- Notes table: AUTOINCREMENT keeps deleted ids from being handed out again
CREATE TABLE IF NOT EXISTS notes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    content TEXT NOT NULL
);

-- Tags table: each tag is owned by exactly one note
CREATE TABLE IF NOT EXISTS tags (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    note_id INTEGER NOT NULL REFERENCES notes(id)
);

-- Owner lookups when loading and deleting a note's tags
CREATE INDEX IF NOT EXISTS idx_tags_note ON tags(note_id);

-- Exact title lookups for tag resolution and search
CREATE INDEX IF NOT EXISTS idx_tags_title ON tags(title);
"#;
