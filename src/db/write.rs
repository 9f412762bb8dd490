//! Mutations over the note store.
//!
//! These run against whatever connection or transaction they are given; the
//! caller decides the unit of work.

use rusqlite::{Connection, params};
use tracing::debug;

use crate::error::Result;
use crate::models::{NoteId, Tag, TagId};

/// Inserts a note and returns its store-assigned id.
pub fn insert_note(conn: &Connection, title: &str, content: &str) -> Result<NoteId> {
    conn.execute(
        "INSERT INTO notes (title, content) VALUES (?1, ?2)",
        params![title, content],
    )?;
    let id = NoteId::new(conn.last_insert_rowid());
    debug!(note_id = %id, "note inserted");
    Ok(id)
}

/// Inserts a tag owned by `owner`.
pub fn insert_tag(conn: &Connection, title: &str, owner: NoteId) -> Result<Tag> {
    conn.execute(
        "INSERT INTO tags (title, note_id) VALUES (?1, ?2)",
        params![title, owner],
    )?;
    let id = TagId::new(conn.last_insert_rowid());
    debug!(tag_id = %id, note_id = %owner, "tag inserted");
    Ok(Tag::new(id, title, owner))
}

/// Moves an existing tag to a new owner.
///
/// Returns false if the tag does not exist.
pub fn reassign_tag(conn: &Connection, tag: TagId, owner: NoteId) -> Result<bool> {
    let changed = conn.execute(
        "UPDATE tags SET note_id = ?1 WHERE id = ?2",
        params![owner, tag],
    )?;
    debug!(tag_id = %tag, note_id = %owner, changed, "tag reassigned");
    Ok(changed > 0)
}

/// Overwrites a note's title and content.
///
/// Returns false if the note does not exist.
pub fn update_note(conn: &Connection, id: NoteId, title: &str, content: &str) -> Result<bool> {
    let changed = conn.execute(
        "UPDATE notes SET title = ?1, content = ?2 WHERE id = ?3",
        params![title, content, id],
    )?;
    Ok(changed > 0)
}

/// Deletes a note together with every tag it owns.
///
/// Tag rows go first; the foreign key on `tags.note_id` rejects the note
/// delete otherwise. Returns the number of tags removed, or `None` if the
/// note does not exist.
pub fn delete_note(conn: &Connection, id: NoteId) -> Result<Option<usize>> {
    let tags_removed = conn.execute("DELETE FROM tags WHERE note_id = ?1", [id])?;
    let notes_removed = conn.execute("DELETE FROM notes WHERE id = ?1", [id])?;

    if notes_removed == 0 {
        return Ok(None);
    }
    debug!(note_id = %id, tags_removed, "note deleted");
    Ok(Some(tags_removed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;
    use crate::db::query::{self, TagFilter};
    use crate::error::NoteError;

    #[test]
    fn delete_note_removes_owned_tags() {
        let db = Database::in_memory().unwrap();
        let removed = db
            .scoped_transaction(|tx| {
                let id = insert_note(tx, "Title", "Body")?;
                insert_tag(tx, "one", id)?;
                insert_tag(tx, "two", id)?;
                delete_note(tx, id)
            })
            .unwrap();

        assert_eq!(removed, Some(2));
        let session = db.open_session().unwrap();
        assert!(
            query::tags(&session, &TagFilter::Title("one".into()))
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn delete_missing_note_reports_none() {
        let db = Database::in_memory().unwrap();
        let removed = db
            .scoped_transaction(|tx| delete_note(tx, NoteId::new(5)))
            .unwrap();
        assert_eq!(removed, None);
    }

    #[test]
    fn foreign_key_blocks_deleting_note_with_tags_directly() {
        let db = Database::in_memory().unwrap();
        let result = db.scoped_transaction(|tx| {
            let id = insert_note(tx, "Title", "Body")?;
            insert_tag(tx, "kept", id)?;
            tx.execute("DELETE FROM notes WHERE id = ?1", [id])?;
            Ok(())
        });

        assert!(matches!(result, Err(NoteError::OperationFailed(_))));
    }

    #[test]
    fn tag_for_missing_note_is_rejected() {
        let db = Database::in_memory().unwrap();
        let result = db.scoped_transaction(|tx| insert_tag(tx, "orphan", NoteId::new(77)));
        assert!(matches!(result, Err(NoteError::OperationFailed(_))));
    }

    #[test]
    fn reassign_tag_changes_owner() {
        let db = Database::in_memory().unwrap();
        let (tag, second) = db
            .scoped_transaction(|tx| {
                let first = insert_note(tx, "First", "a")?;
                let second = insert_note(tx, "Second", "b")?;
                let tag = insert_tag(tx, "shared", first)?;
                assert!(reassign_tag(tx, tag.id(), second)?);
                Ok((tag, second))
            })
            .unwrap();

        let session = db.open_session().unwrap();
        let owned = query::tags(&session, &TagFilter::Owner(second)).unwrap();
        assert_eq!(owned.len(), 1);
        assert_eq!(owned[0].id(), tag.id());
    }

    #[test]
    fn update_missing_note_reports_false() {
        let db = Database::in_memory().unwrap();
        let changed = db
            .scoped_transaction(|tx| update_note(tx, NoteId::new(1), "t", "c"))
            .unwrap();
        assert!(!changed);
    }
}
