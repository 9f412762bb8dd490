use serde::{Deserialize, Serialize};

use super::{NoteId, TagId};

/// A tag owned by exactly one note.
///
/// `note_id` is a back-reference for navigation only; the owning note
/// controls the tag's lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    id: TagId,
    title: String,
    note_id: NoteId,
}

impl Tag {
    /// Creates a tag record.
    ///
    /// # Examples
    ///
    /// ```
    /// use notekeep::{NoteId, Tag, TagId};
    ///
    /// let tag = Tag::new(TagId::new(1), "rust", NoteId::new(4));
    /// assert_eq!(tag.title(), "rust");
    /// assert_eq!(tag.note_id(), NoteId::new(4));
    /// ```
    pub fn new(id: TagId, title: impl Into<String>, note_id: NoteId) -> Self {
        Self {
            id,
            title: title.into(),
            note_id,
        }
    }

    pub fn id(&self) -> TagId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the note that owns this tag.
    pub fn note_id(&self) -> NoteId {
        self.note_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_owner_reference() {
        let tag = Tag::new(TagId::new(2), "work", NoteId::new(5));
        let json = serde_json::to_value(&tag).unwrap();

        assert_eq!(json["id"], 2);
        assert_eq!(json["title"], "work");
        assert_eq!(json["note_id"], 5);
    }
}
