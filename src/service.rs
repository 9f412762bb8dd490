use std::fmt;
use std::str::FromStr;

use rusqlite::Connection;
use tracing::{debug, info};

use crate::db::query::{self, NoteFilter, TagFilter};
use crate::db::write;
use crate::error::{NoteError, Result};
use crate::{Database, Note, NoteId};

/// What `add_note` does when a tag with the requested title already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TagReuse {
    /// Move the existing tag to the new note. Its previous owner loses it.
    #[default]
    Reparent,
    /// Leave the existing tag alone and give the new note its own copy.
    Fresh,
}

impl fmt::Display for TagReuse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reparent => write!(f, "reparent"),
            Self::Fresh => write!(f, "fresh"),
        }
    }
}

impl FromStr for TagReuse {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reparent" => Ok(Self::Reparent),
            "fresh" => Ok(Self::Fresh),
            other => Err(format!(
                "unknown tag reuse policy '{other}' (expected 'reparent' or 'fresh')"
            )),
        }
    }
}

/// Service layer providing note management operations.
///
/// NoteService owns the [`Database`] and runs every operation as a single
/// scoped transaction. It is UI-independent and shared by the CLI and TUI.
///
/// # Examples
///
/// ```
/// use notekeep::{Database, NoteService};
///
/// # fn main() -> notekeep::Result<()> {
/// let service = NoteService::new(Database::in_memory()?);
///
/// let note = service.add_note("Groceries", "Milk and eggs", "errands")?;
/// assert_eq!(service.search_notes("errands")?, vec![note]);
/// # Ok(())
/// # }
/// ```
pub struct NoteService {
    db: Database,
    tag_reuse: TagReuse,
}

impl NoteService {
    /// Creates a service with the default [`TagReuse::Reparent`] policy.
    pub fn new(db: Database) -> Self {
        Self::with_tag_reuse(db, TagReuse::default())
    }

    pub fn with_tag_reuse(db: Database, tag_reuse: TagReuse) -> Self {
        Self { db, tag_reuse }
    }

    /// Returns a reference to the underlying database.
    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn tag_reuse(&self) -> TagReuse {
        self.tag_reuse
    }

    /// Creates a note, optionally tagged.
    ///
    /// Fails with [`NoteError::Validation`] before touching the store if
    /// `title` or `content` is empty. Whitespace counts as content. An empty `tag_title` means no tag.
    ///
    /// When a tag titled exactly `tag_title` already exists (the one with the
    /// lowest id, if there are several), the configured [`TagReuse`] policy
    /// decides whether it is moved to the new note or a new tag is created.
    pub fn add_note(&self, title: &str, content: &str, tag_title: &str) -> Result<Note> {
        validate_required(title, content)?;

        let note = self.db.scoped_transaction(|tx| {
            let id = write::insert_note(tx, title, content)?;
            if !tag_title.is_empty() {
                self.attach_tag(tx, id, tag_title)?;
            }
            load(tx, id)
        })?;

        info!(note_id = %note.id(), tags = note.tags().len(), "note added");
        Ok(note)
    }

    /// Resolves `tag_title` for a freshly inserted note.
    fn attach_tag(&self, conn: &Connection, owner: NoteId, tag_title: &str) -> Result<()> {
        let existing = query::tags(conn, &TagFilter::Title(tag_title.to_string()))?
            .into_iter()
            .next();

        match (existing, self.tag_reuse) {
            (Some(tag), TagReuse::Reparent) => {
                write::reassign_tag(conn, tag.id(), owner)?;
                debug!(
                    tag_id = %tag.id(),
                    from = %tag.note_id(),
                    to = %owner,
                    "existing tag moved to new note"
                );
            }
            _ => {
                write::insert_tag(conn, tag_title, owner)?;
            }
        }
        Ok(())
    }

    /// Overwrites a note's title and content. Its tags are left as they are.
    ///
    /// Fails with [`NoteError::NotFound`] if no note has `id`.
    pub fn update_note(&self, id: NoteId, title: &str, content: &str) -> Result<Note> {
        let note = self.db.scoped_transaction(|tx| {
            if !write::update_note(tx, id, title, content)? {
                return Err(NoteError::NotFound(id));
            }
            load(tx, id)
        })?;

        info!(note_id = %id, "note updated");
        Ok(note)
    }

    /// Deletes a note and every tag it owns.
    ///
    /// Fails with [`NoteError::NotFound`] if no note has `id`.
    pub fn delete_note(&self, id: NoteId) -> Result<()> {
        let tags_removed = self
            .db
            .scoped_transaction(|tx| write::delete_note(tx, id)?.ok_or(NoteError::NotFound(id)))?;

        info!(note_id = %id, tags_removed, "note deleted");
        Ok(())
    }

    /// Returns a single note, or `None` if it does not exist.
    pub fn get_note(&self, id: NoteId) -> Result<Option<Note>> {
        self.db.scoped_transaction(|tx| query::note(tx, id))
    }

    /// Returns every stored note in ascending id order.
    pub fn list_all_notes(&self) -> Result<Vec<Note>> {
        self.db
            .scoped_transaction(|tx| query::notes(tx, &NoteFilter::All))
    }

    /// Returns notes whose title contains `term` or that own a tag titled
    /// exactly `term`, in ascending id order.
    ///
    /// The title match uses SQLite `LIKE`, so ASCII letters compare without
    /// case; the tag match is exact. An empty term matches every note.
    pub fn search_notes(&self, term: &str) -> Result<Vec<Note>> {
        let notes = self
            .db
            .scoped_transaction(|tx| query::notes(tx, &NoteFilter::Search(term.to_string())))?;

        debug!(term, count = notes.len(), "notes searched");
        Ok(notes)
    }
}

/// Rejects empty titles and content.
fn validate_required(title: &str, content: &str) -> Result<()> {
    match (title.is_empty(), content.is_empty()) {
        (false, false) => Ok(()),
        (true, false) => Err(NoteError::Validation("Title cannot be empty".into())),
        (false, true) => Err(NoteError::Validation("Content cannot be empty".into())),
        (true, true) => Err(NoteError::Validation(
            "Title and content cannot be empty".into(),
        )),
    }
}

/// Reads back a note written in the current transaction.
fn load(conn: &Connection, id: NoteId) -> Result<Note> {
    query::note(conn, id)?.ok_or(NoteError::NotFound(id))
}
