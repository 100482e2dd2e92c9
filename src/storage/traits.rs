//! Storage traits and error types
//!
//! The crawler only depends on the narrow [`RecordStore`] contract, so any
//! backend that can answer "exists by audio URL" and "insert" can stand in for
//! the SQLite implementation.

use crate::storage::{InsertOutcome, Recording, StoredRecording};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Storage lock poisoned")]
    Poisoned,
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for recording store backends
///
/// Implementations must be shareable across tasks; the scheduled pass runs on
/// a tokio worker while the first pass may run on the main task.
pub trait RecordStore: Send + Sync {
    /// Looks up a recording by its unique audio URL
    fn find_by_audio_url(&self, audio_url: &str) -> StorageResult<Option<StoredRecording>>;

    /// Inserts a recording
    ///
    /// A uniqueness violation on `audio_url` is reported as
    /// [`InsertOutcome::Conflict`], not as an error.
    fn insert(&self, recording: &Recording) -> StorageResult<InsertOutcome>;

    // ===== Statistics =====

    /// Counts all stored recordings
    fn count_recordings(&self) -> StorageResult<u64>;

    /// Counts recordings per course code, most recordings first
    ///
    /// Recordings without a course code are not included.
    fn count_by_course(&self) -> StorageResult<Vec<(String, u64)>>;

    /// Returns the most recently discovered recording
    fn latest_recording(&self) -> StorageResult<Option<StoredRecording>>;
}
