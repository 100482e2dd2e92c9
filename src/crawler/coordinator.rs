//! Pagination crawler - one full pass over the listing
//!
//! A pass walks the listing page by page:
//! - fetch the page named by the current cursor
//! - extract candidate recordings and the next-page locator
//! - store every candidate whose audio URL is not yet known
//! - follow the locator until a page has none
//!
//! Page N+1 is only fetched after page N is fully persisted. A failed fetch
//! or parse ends the pass; recordings saved from earlier pages stay saved.

use crate::crawler::fetcher::PageFetcher;
use crate::crawler::parser::{extract, resolve_url};
use crate::storage::{InsertOutcome, RecordStore, Recording};
use crate::CrawlerError;
use std::sync::Arc;

/// The page a pass is about to fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlCursor {
    /// Scheme and host of the site
    pub base_url: String,

    /// Path (with query) of the page, or an absolute URL from the paginator
    pub path: String,
}

impl CrawlCursor {
    pub fn new(base_url: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            path: path.into(),
        }
    }

    /// Cursor for listing page `page` under `start_path`
    pub fn listing_page(base_url: impl Into<String>, start_path: &str, page: u32) -> Self {
        Self::new(base_url, format!("{}?page={}", start_path, page))
    }

    /// The absolute URL to fetch
    pub fn url(&self) -> Result<String, CrawlerError> {
        resolve_url(&self.base_url, &self.path).ok_or_else(|| CrawlerError::Locator {
            base_url: self.base_url.clone(),
            path: self.path.clone(),
        })
    }

    /// The cursor for the next page, sharing this cursor's base URL
    pub fn follow(&self, locator: String) -> Self {
        Self::new(self.base_url.clone(), locator)
    }
}

/// Counters for one completed pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassSummary {
    pub pages_visited: u32,
    pub recordings_seen: u32,
    pub inserted: u32,
    pub duplicates: u32,
    pub conflicts: u32,
    pub store_errors: u32,
}

/// Drives crawl passes against one fetcher and one store
pub struct PaginationCrawler {
    fetcher: Arc<dyn PageFetcher>,
    store: Arc<dyn RecordStore>,
    max_pages: Option<u32>,
}

impl PaginationCrawler {
    /// Creates a crawler; `max_pages` of `None` leaves the pass unbounded
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        store: Arc<dyn RecordStore>,
        max_pages: Option<u32>,
    ) -> Self {
        Self {
            fetcher,
            store,
            max_pages,
        }
    }

    /// Runs one pass starting at `start`
    ///
    /// # Returns
    ///
    /// * `Ok(PassSummary)` - Pagination ran out (or the page ceiling was hit)
    /// * `Err(CrawlerError)` - A page could not be fetched or parsed
    pub async fn crawl(&self, start: CrawlCursor) -> Result<PassSummary, CrawlerError> {
        let mut summary = PassSummary::default();
        let mut cursor = start;

        loop {
            if let Some(max_pages) = self.max_pages {
                if summary.pages_visited >= max_pages {
                    tracing::warn!(
                        "Stopping pass after {} pages (max-pages); next page {} not fetched",
                        max_pages,
                        cursor.path
                    );
                    break;
                }
            }

            let url = cursor.url()?;
            tracing::debug!("Fetching listing page: {}", url);

            let body = self.fetcher.fetch(&url).await?;
            let page = extract(&body, &cursor.base_url)
                .map_err(|message| CrawlerError::HtmlParse {
                    url: url.clone(),
                    message,
                })?;

            summary.pages_visited += 1;
            summary.recordings_seen += page.recordings.len() as u32;
            tracing::debug!(
                "Page {} yielded {} candidate recordings",
                url,
                page.recordings.len()
            );

            for recording in &page.recordings {
                self.save_if_new(recording, &mut summary);
            }

            match page.next_page {
                Some(locator) => cursor = cursor.follow(locator),
                None => break,
            }
        }

        Ok(summary)
    }

    /// Stores `recording` unless its audio URL is already known
    ///
    /// The lookup and the insert are separate statements, so a concurrent
    /// writer can slip in between; the store reports that as a conflict.
    fn save_if_new(&self, recording: &Recording, summary: &mut PassSummary) {
        match self.store.find_by_audio_url(&recording.audio_url) {
            Ok(Some(_)) => {
                summary.duplicates += 1;
                return;
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!("Lookup failed for {}: {}", recording.audio_url, e);
                summary.store_errors += 1;
                return;
            }
        }

        match self.store.insert(recording) {
            Ok(InsertOutcome::Inserted(id)) => {
                tracing::info!("New recording {}: {} ({})", id, recording.title, recording.audio_url);
                summary.inserted += 1;
            }
            Ok(InsertOutcome::Conflict) => {
                tracing::debug!("Recording {} was inserted concurrently", recording.audio_url);
                summary.conflicts += 1;
            }
            Err(e) => {
                tracing::warn!("Insert failed for {}: {}", recording.audio_url, e);
                summary.store_errors += 1;
            }
        }
    }
}
