//! Crawler module for the lecture listing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching of listing pages
//! - Extraction of recordings and the next-page locator
//! - The pagination pass with new-vs-known decisions
//! - Rescheduling of the next pass

mod coordinator;
mod fetcher;
mod orchestrator;
mod parser;
mod scheduler;

#[cfg(test)]
mod testing;

pub use coordinator::{CrawlCursor, PaginationCrawler, PassSummary};
pub use fetcher::{build_http_client, user_agent_string, HttpFetcher, PageFetcher};
pub use orchestrator::{Orchestrator, PassFuture, PassOutcome};
pub use parser::{extract, resolve_url, ExtractedPage, NEXT_LABEL, PAGINATOR_LINK_SELECTOR, ROW_SELECTOR};
pub use scheduler::{compute_next_delay, next_fire_time, RescheduleScheduler};

use crate::config::Config;
use crate::storage::SqliteStore;
use crate::CrawlerError;
use std::path::Path;
use std::sync::Arc;

/// Builds an orchestrator with the production fetcher and SQLite store
///
/// # Example
///
/// ```no_run
/// use lecture_crawler::config::load_config;
/// use lecture_crawler::crawler::build_orchestrator;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("config.toml"))?;
/// let orchestrator = build_orchestrator(&config)?;
/// orchestrator.run(0).await;
/// # Ok(())
/// # }
/// ```
pub fn build_orchestrator(config: &Config) -> Result<Arc<Orchestrator>, CrawlerError> {
    let store = SqliteStore::new(Path::new(&config.storage.database_path))?;
    let fetcher = HttpFetcher::from_config(&config.user_agent, &config.crawler)?;
    Ok(Arc::new(Orchestrator::from_config(
        config,
        Arc::new(fetcher),
        Arc::new(store),
    )))
}
