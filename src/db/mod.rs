mod schema;

pub mod query;
pub mod write;

use std::ops::{Deref, DerefMut};
use std::path::Path;

use parking_lot::{MappedMutexGuard, Mutex, MutexGuard};
use rusqlite::{Connection, Transaction};
use tracing::{debug, info, warn};

use crate::error::{NoteError, Result};
use schema::SCHEMA;

/// Gateway to the note store.
///
/// Holds the single process-wide SQLite connection. Every unit of work borrows
/// it through a [`Session`], which keeps it locked until dropped, so two
/// transactions never share a session even if the database is shared between
/// threads.
pub struct Database {
    conn: Mutex<Option<Connection>>,
    location: String,
}

/// Exclusive handle on the store's connection.
///
/// Released when dropped.
pub struct Session<'a> {
    conn: MappedMutexGuard<'a, Connection>,
}

impl Deref for Session<'_> {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        &self.conn
    }
}

impl DerefMut for Session<'_> {
    fn deref_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }
}

impl Database {
    /// Opens an in-memory SQLite database.
    ///
    /// Automatically initializes the schema on connection open.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| unreachable_store(":memory:", e))?;
        Self::with_connection(conn, ":memory:".to_string())
    }

    /// Opens a file-based SQLite database at the given path.
    ///
    /// Creates the database file if it does not exist, but not its parent
    /// directory. Fails with [`NoteError::Connection`] if the file cannot be
    /// opened or is not a SQLite database.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let location = path.display().to_string();
        let conn = Connection::open(path).map_err(|e| unreachable_store(&location, e))?;
        Self::with_connection(conn, location)
    }

    fn with_connection(conn: Connection, location: String) -> Result<Self> {
        initialize_schema(&conn).map_err(|e| unreachable_store(&location, e))?;
        info!(location = %location, "note store opened");

        Ok(Self {
            conn: Mutex::new(Some(conn)),
            location,
        })
    }

    /// Returns where the store lives: a file path or `:memory:`.
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Acquires the connection for exclusive use.
    ///
    /// Blocks while another session is open. Fails with
    /// [`NoteError::Connection`] once the database has been closed.
    pub fn open_session(&self) -> Result<Session<'_>> {
        let guard = self.conn.lock();
        let conn = MutexGuard::try_map(guard, Option::as_mut)
            .map_err(|_| NoteError::Connection(format!("{} is closed", self.location)))?;

        Ok(Session { conn })
    }

    /// Runs `body` as one unit of work.
    ///
    /// Commits when `body` returns `Ok`, rolls back when it returns `Err`.
    /// The session is released on every exit path; if `body` panics the
    /// transaction guard rolls back while unwinding.
    ///
    /// # Examples
    ///
    /// ```
    /// use notekeep::Database;
    ///
    /// # fn main() -> notekeep::Result<()> {
    /// let db = Database::in_memory()?;
    /// let count: i64 = db.scoped_transaction(|tx| {
    ///     Ok(tx.query_row("SELECT COUNT(*) FROM notes", [], |row| row.get(0))?)
    /// })?;
    /// assert_eq!(count, 0);
    /// # Ok(())
    /// # }
    /// ```
    pub fn scoped_transaction<T, F>(&self, body: F) -> Result<T>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T>,
    {
        let mut session = self.open_session()?;
        let tx = session.transaction()?;
        debug!("transaction started");

        match body(&tx) {
            Ok(value) => {
                tx.commit()?;
                debug!("transaction committed");
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback() {
                    warn!(error = %rollback_err, "rollback failed");
                } else {
                    warn!(error = %err, "transaction rolled back");
                }
                Err(err)
            }
        }
    }

    /// Releases the connection.
    ///
    /// Safe to call more than once; only the first call does anything.
    pub fn close(&self) -> Result<()> {
        let Some(conn) = self.conn.lock().take() else {
            debug!(location = %self.location, "note store already closed");
            return Ok(());
        };

        conn.close().map_err(|(_, err)| {
            warn!(location = %self.location, error = %err, "closing note store failed");
            NoteError::OperationFailed(err)
        })?;
        info!(location = %self.location, "note store closed");
        Ok(())
    }

    /// Returns true once [`Database::close`] has run.
    pub fn is_closed(&self) -> bool {
        self.conn.lock().is_none()
    }
}

/// Enables foreign keys and creates missing tables.
fn initialize_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

fn unreachable_store(location: &str, err: rusqlite::Error) -> NoteError {
    NoteError::Connection(format!("cannot open {location}: {err}"))
}
