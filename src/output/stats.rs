//! Statistics generation from the recording database
//!
//! This module provides functionality for extracting and displaying
//! catalogue statistics from the storage layer.

use crate::storage::{RecordStore, StorageResult, StoredRecording};

/// Recording catalogue summary
#[derive(Debug, Clone)]
pub struct RecordingStatistics {
    /// Total number of stored recordings
    pub total_recordings: u64,

    /// Recordings per course code, most recordings first
    pub by_course: Vec<(String, u64)>,

    /// The most recently discovered recording
    pub latest: Option<StoredRecording>,
}

impl RecordingStatistics {
    /// Recordings that carry no course code
    pub fn without_course(&self) -> u64 {
        let with_course: u64 = self.by_course.iter().map(|(_, n)| n).sum();
        self.total_recordings.saturating_sub(with_course)
    }
}

/// Loads statistics from storage
pub fn load_statistics(store: &dyn RecordStore) -> StorageResult<RecordingStatistics> {
    Ok(RecordingStatistics {
        total_recordings: store.count_recordings()?,
        by_course: store.count_by_course()?,
        latest: store.latest_recording()?,
    })
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &RecordingStatistics) {
    println!("=== Recording Statistics ===\n");

    println!("Overview:");
    println!("  Total recordings: {}", stats.total_recordings);
    println!("  Courses: {}", stats.by_course.len());
    println!();

    if !stats.by_course.is_empty() {
        println!("Recordings by Course:");
        for (course, count) in &stats.by_course {
            let percentage = if stats.total_recordings > 0 {
                (*count as f64 / stats.total_recordings as f64) * 100.0
            } else {
                0.0
            };
            println!("  {}: {} ({:.1}%)", course, count, percentage);
        }

        let without_course = stats.without_course();
        if without_course > 0 {
            println!("  (no course): {}", without_course);
        }
        println!();
    }

    match &stats.latest {
        Some(latest) => {
            println!("Latest Recording:");
            println!("  Title: {}", latest.recording.title);
            println!("  Audio: {}", latest.recording.audio_url);
            if let Some(published) = &latest.recording.published {
                println!("  Published: {}", published);
            }
            println!("  Discovered: {}", latest.discovered_at);
        }
        None => println!("No recordings stored yet."),
    }
}
