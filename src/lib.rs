pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod service;
pub mod tui;

pub use db::Database;
pub use error::{NoteError, Result};
pub use models::{Note, NoteBuilder, NoteId, Tag, TagId};
pub use service::{NoteService, TagReuse};
