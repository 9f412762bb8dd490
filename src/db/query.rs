//! Read queries over the note store.
//!
//! Every query returns an empty result rather than an error when nothing
//! matches. Results are ordered by ascending id.

use rusqlite::{Connection, ToSql, params};
use tracing::debug;

use crate::error::Result;
use crate::models::{Note, NoteBuilder, NoteId, Tag};

/// Which notes to read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteFilter {
    /// Every stored note.
    All,
    /// The note with this id, if any.
    Id(NoteId),
    /// Notes whose title contains the term (SQLite `LIKE`, so ASCII letters
    /// match case-insensitively) or that own a tag titled exactly the term.
    Search(String),
}

/// Which tags to read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagFilter {
    /// Tags titled exactly this (case-sensitive).
    Title(String),
    /// Tags owned by this note.
    Owner(NoteId),
}

const SELECT_NOTES: &str = "SELECT n.id, n.title, n.content FROM notes n";

const SEARCH_CONDITION: &str = r"WHERE n.title LIKE '%' || ?1 || '%' ESCAPE '\'
    OR EXISTS (SELECT 1 FROM tags t WHERE t.note_id = n.id AND t.title = ?2)";

/// Reads notes matching `filter`, each with its tags loaded.
pub fn notes(conn: &Connection, filter: &NoteFilter) -> Result<Vec<Note>> {
    let rows = match filter {
        NoteFilter::All => {
            note_rows(conn, &format!("{SELECT_NOTES} ORDER BY n.id"), params![])?
        }
        NoteFilter::Id(id) => note_rows(
            conn,
            &format!("{SELECT_NOTES} WHERE n.id = ?1"),
            params![id],
        )?,
        NoteFilter::Search(term) => {
            let pattern = escape_like(term);
            note_rows(
                conn,
                &format!("{SELECT_NOTES} {SEARCH_CONDITION} ORDER BY n.id"),
                params![pattern, term],
            )?
        }
    };
    debug!(?filter, count = rows.len(), "notes queried");

    rows.into_iter()
        .map(|(id, title, content)| {
            let tags = tags(conn, &TagFilter::Owner(id))?;
            Ok(NoteBuilder::new()
                .id(id)
                .title(title)
                .content(content)
                .tags(tags)
                .build())
        })
        .collect()
}

/// Reads the single note with `id`.
pub fn note(conn: &Connection, id: NoteId) -> Result<Option<Note>> {
    Ok(notes(conn, &NoteFilter::Id(id))?.into_iter().next())
}

/// Reads tags matching `filter`.
pub fn tags(conn: &Connection, filter: &TagFilter) -> Result<Vec<Tag>> {
    let (sql, value): (&str, &dyn ToSql) = match filter {
        TagFilter::Title(title) => (
            "SELECT id, title, note_id FROM tags WHERE title = ?1 ORDER BY id",
            title as &dyn ToSql,
        ),
        TagFilter::Owner(id) => (
            "SELECT id, title, note_id FROM tags WHERE note_id = ?1 ORDER BY id",
            id as &dyn ToSql,
        ),
    };

    let mut stmt = conn.prepare_cached(sql)?;
    let tags = stmt
        .query_map([value], |row| {
            Ok(Tag::new(row.get(0)?, row.get::<_, String>(1)?, row.get(2)?))
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(tags)
}

/// Counts stored notes.
pub fn count_notes(conn: &Connection) -> Result<usize> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM notes", [], |row| row.get(0))?;
    Ok(usize::try_from(count).unwrap_or_default())
}

fn note_rows(
    conn: &Connection,
    sql: &str,
    params: &[&dyn ToSql],
) -> Result<Vec<(NoteId, String, String)>> {
    let mut stmt = conn.prepare_cached(sql)?;
    let rows = stmt
        .query_map(params, |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

/// Escapes `LIKE` wildcards so the term is matched literally.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
