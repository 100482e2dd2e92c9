//! Storage module for persisting recordings
//!
//! This module handles all database operations for the crawler, including:
//! - SQLite database initialization and schema management
//! - Lookup of recordings by their audio URL
//! - Insertion with the audio URL as the unique key
//! - Aggregate queries for the statistics report

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStore;
pub use traits::{RecordStore, StorageError, StorageResult};

use std::path::Path;

/// Opens (or creates) the recording database at `path`
pub fn open_storage(path: &Path) -> StorageResult<SqliteStore> {
    SqliteStore::new(path)
}

/// One published lecture capture, as read from a listing row
///
/// `audio_url` is always absolute and is the identity of the recording.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recording {
    pub title: String,
    pub audio_url: String,
    pub course_code: Option<String>,
    pub lecturer: Option<String>,
    pub room: Option<String>,
    pub published: Option<String>,
}

/// A recording as persisted in the database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRecording {
    pub id: i64,
    pub recording: Recording,
    pub discovered_at: String,
}

/// Result of inserting a recording
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The recording was new and has been stored under this id
    Inserted(i64),

    /// Another writer already stored a recording with the same audio URL
    Conflict,
}

impl InsertOutcome {
    pub fn is_inserted(&self) -> bool {
        matches!(self, Self::Inserted(_))
    }
}
