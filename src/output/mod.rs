//! Output module for reporting on the recording catalogue
//!
//! This module handles:
//! - Loading aggregate statistics from the store
//! - Printing them for the `--stats` command

pub mod stats;

pub use stats::{load_statistics, print_statistics, RecordingStatistics};
