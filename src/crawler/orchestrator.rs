//! Orchestrator - one pass, then arm the next
//!
//! `run` crawls from a caller-chosen listing page. Whatever the outcome, it
//! then arms the next pass (if none is armed) on the business-hours schedule.
//! Scheduled passes always start again from page 0.

use crate::config::Config;
use crate::crawler::coordinator::{CrawlCursor, PaginationCrawler, PassSummary};
use crate::crawler::fetcher::PageFetcher;
use crate::crawler::scheduler::{compute_next_delay, RescheduleScheduler};
use crate::storage::RecordStore;
use chrono::Local;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Future returned by [`Orchestrator::run`]
pub type PassFuture = Pin<Box<dyn Future<Output = PassOutcome> + Send>>;

/// How a pass ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassOutcome {
    Completed(PassSummary),
    Failed(String),
}

impl PassOutcome {
    pub fn summary(&self) -> Option<&PassSummary> {
        match self {
            Self::Completed(summary) => Some(summary),
            Self::Failed(_) => None,
        }
    }
}

pub struct Orchestrator {
    crawler: PaginationCrawler,
    scheduler: RescheduleScheduler,
    base_url: String,
    start_path: String,
    schedule: bool,
}

impl Orchestrator {
    pub fn new(
        crawler: PaginationCrawler,
        scheduler: RescheduleScheduler,
        base_url: impl Into<String>,
        start_path: impl Into<String>,
        schedule: bool,
    ) -> Self {
        Self {
            crawler,
            scheduler,
            base_url: base_url.into(),
            start_path: start_path.into(),
            schedule,
        }
    }

    /// Wires a crawler and a fresh scheduler from the configuration
    pub fn from_config(
        config: &Config,
        fetcher: Arc<dyn PageFetcher>,
        store: Arc<dyn RecordStore>,
    ) -> Self {
        let crawler = PaginationCrawler::new(fetcher, store, config.crawler.max_pages);
        Self::new(
            crawler,
            RescheduleScheduler::new(),
            config.site.base_url.clone(),
            config.site.start_path.clone(),
            config.crawler.schedule,
        )
    }

    pub fn scheduler(&self) -> &RescheduleScheduler {
        &self.scheduler
    }

    /// Runs one pass from `start_page`, then arms the next pass
    ///
    /// Crawl failures are logged and returned as [`PassOutcome::Failed`];
    /// they never stop the schedule.
    pub fn run(self: Arc<Self>, start_page: u32) -> PassFuture {
        Box::pin(async move {
            tracing::info!(
                "Fetching at: {} (start page {})",
                Local::now().format("%Y-%m-%d %H:%M:%S %z"),
                start_page
            );

            let cursor = CrawlCursor::listing_page(&*self.base_url, &self.start_path, start_page);
            let outcome = match self.crawler.crawl(cursor).await {
                Ok(summary) => {
                    tracing::info!(
                        "Pass complete: {} pages, {} new, {} known, {} conflicts, {} store errors",
                        summary.pages_visited,
                        summary.inserted,
                        summary.duplicates,
                        summary.conflicts,
                        summary.store_errors
                    );
                    PassOutcome::Completed(summary)
                }
                Err(e) => {
                    tracing::error!("Pass failed: {}", e);
                    PassOutcome::Failed(e.to_string())
                }
            };

            if self.schedule {
                self.arm_next();
            }

            outcome
        })
    }

    fn arm_next(self: &Arc<Self>) {
        if self.scheduler.is_armed() {
            return;
        }

        let delay = compute_next_delay(&Local::now());
        let this = Arc::clone(self);
        self.scheduler.arm_next_run(delay, move || async move {
            this.run(0).await;
        });
    }
}
