//! Database schema definitions
//!
//! This module contains the SQL schema for the Lecture-Crawler database.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- One row per published recording; audio_url is the identity
CREATE TABLE IF NOT EXISTS recordings (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    audio_url TEXT NOT NULL UNIQUE,
    course_code TEXT,
    lecturer TEXT,
    room TEXT,
    published TEXT,
    discovered_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_recordings_course ON recordings(course_code);
"#;

/// Initializes the database schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
