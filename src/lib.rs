//! Lecture-Crawler: keeps a local catalogue of published lecture recordings
//!
//! This crate crawls the paginated recording listing of a lecture capture site,
//! extracts recording metadata from every page, stores only recordings it has
//! not seen before, and re-arms itself on a business-hours schedule.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod storage;

use thiserror::Error;

/// Main error type for Lecture-Crawler operations
#[derive(Debug, Error)]
pub enum CrawlerError {
    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Unexpected HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("HTML parse error for {url}: {message}")]
    HtmlParse { url: String, message: String },

    #[error("Cannot form a fetchable URL from {base_url} and {path}")]
    Locator { base_url: String, path: String },

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

impl CrawlerError {
    /// Returns true if this error came from fetching a page
    pub fn is_fetch_failure(&self) -> bool {
        matches!(self, Self::Http { .. } | Self::Status { .. })
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Lecture-Crawler operations
pub type Result<T> = std::result::Result<T, CrawlerError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlCursor, Orchestrator, PaginationCrawler, PassSummary};
pub use state::ScheduleState;
pub use storage::{InsertOutcome, Recording, RecordStore, SqliteStore};
