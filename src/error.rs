use thiserror::Error;

use crate::models::NoteId;

/// Errors surfaced by the note store and the service built on it.
#[derive(Debug, Error)]
pub enum NoteError {
    /// A required field was empty. Raised before the store is touched.
    #[error("{0}")]
    Validation(String),

    /// The operation targeted a note that does not exist.
    #[error("Note {0} not found")]
    NotFound(NoteId),

    /// The store could not be reached, or has already been closed.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Any other store-level failure. The enclosing transaction has been
    /// rolled back by the time this is returned.
    #[error("Operation failed: {0}")]
    OperationFailed(#[from] rusqlite::Error),
}

/// Result type for note store operations.
pub type Result<T> = std::result::Result<T, NoteError>;

impl NoteError {
    /// Returns true when the failure means "nothing happened" to the store
    /// because the request itself was unusable.
    pub fn is_user_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::NotFound(_))
    }

    /// Message suitable for showing to the user.
    ///
    /// # Examples
    ///
    /// ```
    /// use notekeep::{NoteError, NoteId};
    ///
    /// let err = NoteError::NotFound(NoteId::new(7));
    /// assert_eq!(err.user_message(), "Nothing changed: Note 7 not found");
    ///
    /// let err = NoteError::Connection("database is closed".to_string());
    /// assert!(err.user_message().starts_with("Unexpected error occurred"));
    /// ```
    pub fn user_message(&self) -> String {
        if self.is_user_error() {
            format!("Nothing changed: {self}")
        } else {
            format!("Unexpected error occurred: {self}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_and_not_found_are_user_errors() {
        assert!(NoteError::Validation("Title cannot be empty".into()).is_user_error());
        assert!(NoteError::NotFound(NoteId::new(1)).is_user_error());
    }

    #[test]
    fn store_failures_are_not_user_errors() {
        assert!(!NoteError::Connection("gone".into()).is_user_error());
        let err = NoteError::from(rusqlite::Error::QueryReturnedNoRows);
        assert!(!err.is_user_error());
        assert!(matches!(err, NoteError::OperationFailed(_)));
    }

    #[test]
    fn validation_message_is_shown_verbatim() {
        let err = NoteError::Validation("Title and content cannot be empty".into());
        assert_eq!(
            err.user_message(),
            "Nothing changed: Title and content cannot be empty"
        );
    }

    #[test]
    fn operation_failed_keeps_source() {
        use std::error::Error as _;

        let err = NoteError::from(rusqlite::Error::InvalidQuery);
        assert!(err.source().is_some());
        assert!(err.user_message().contains("Unexpected error occurred"));
    }
}
