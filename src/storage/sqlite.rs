//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the RecordStore trait.

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{RecordStore, StorageError, StorageResult};
use crate::storage::{InsertOutcome, Recording, StoredRecording};
use chrono::Utc;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

const SELECT_COLUMNS: &str =
    "SELECT id, title, audio_url, course_code, lecturer, room, published, discovered_at FROM recordings";

/// SQLite storage backend
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens or creates the database at `path` and initializes the schema
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Creates an in-memory database
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StorageError::Poisoned)
    }
}

fn row_to_stored(row: &Row<'_>) -> rusqlite::Result<StoredRecording> {
    Ok(StoredRecording {
        id: row.get(0)?,
        recording: Recording {
            title: row.get(1)?,
            audio_url: row.get(2)?,
            course_code: row.get(3)?,
            lecturer: row.get(4)?,
            room: row.get(5)?,
            published: row.get(6)?,
        },
        discovered_at: row.get(7)?,
    })
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(e, _) => {
            e.code == ErrorCode::ConstraintViolation
                && e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
        }
        _ => false,
    }
}

impl RecordStore for SqliteStore {
    fn find_by_audio_url(&self, audio_url: &str) -> StorageResult<Option<StoredRecording>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!("{} WHERE audio_url = ?1", SELECT_COLUMNS))?;
        let found = stmt
            .query_row(params![audio_url], row_to_stored)
            .optional()?;
        Ok(found)
    }

    fn insert(&self, recording: &Recording) -> StorageResult<InsertOutcome> {
        let conn = self.conn()?;
        let now = Utc::now().to_rfc3339();
        let result = conn.execute(
            "INSERT INTO recordings (title, audio_url, course_code, lecturer, room, published, discovered_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                recording.title,
                recording.audio_url,
                recording.course_code,
                recording.lecturer,
                recording.room,
                recording.published,
                now
            ],
        );

        match result {
            Ok(_) => Ok(InsertOutcome::Inserted(conn.last_insert_rowid())),
            Err(e) if is_unique_violation(&e) => Ok(InsertOutcome::Conflict),
            Err(e) => Err(e.into()),
        }
    }

    fn count_recordings(&self) -> StorageResult<u64> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM recordings", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn count_by_course(&self) -> StorageResult<Vec<(String, u64)>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT course_code, COUNT(*) AS n FROM recordings
             WHERE course_code IS NOT NULL
             GROUP BY course_code
             ORDER BY n DESC, course_code ASC",
        )?;

        let rows = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? as u64))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    fn latest_recording(&self) -> StorageResult<Option<StoredRecording>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!("{} ORDER BY id DESC LIMIT 1", SELECT_COLUMNS))?;
        let latest = stmt.query_row([], row_to_stored).optional()?;
        Ok(latest)
    }
}
