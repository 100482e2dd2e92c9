//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with proper user agent strings
//! - GET requests for listing pages
//! - Classifying non-success statuses and transport errors as fetch failures
//!
//! There is no retry: a failed fetch ends the current pass.

use crate::config::{CrawlerConfig, UserAgentConfig};
use crate::CrawlerError;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Capability to fetch the raw bytes of a page
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches `url`, failing on transport errors and non-2xx statuses
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, CrawlerError>;
}

/// Formats the user agent string: `CrawlerName/Version (+ContactURL; ContactEmail)`
pub fn user_agent_string(config: &UserAgentConfig) -> String {
    format!(
        "{}/{} (+{}; {})",
        config.crawler_name, config.crawler_version, config.contact_url, config.contact_email
    )
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use lecture_crawler::config::{CrawlerConfig, UserAgentConfig};
/// use lecture_crawler::crawler::build_http_client;
///
/// let config = UserAgentConfig {
///     crawler_name: "LectureCrawler".to_string(),
///     crawler_version: "1.0".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
///
/// let client = build_http_client(&config, &CrawlerConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    crawler: &CrawlerConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent_string(user_agent))
        .timeout(Duration::from_secs(crawler.request_timeout))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// reqwest-backed [`PageFetcher`]
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a fetcher from the configuration sections it depends on
    pub fn from_config(
        user_agent: &UserAgentConfig,
        crawler: &CrawlerConfig,
    ) -> Result<Self, CrawlerError> {
        Ok(Self::new(build_http_client(user_agent, crawler)?))
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, CrawlerError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| CrawlerError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CrawlerError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|source| CrawlerError::Http {
            url: url.to_string(),
            source,
        })?;

        Ok(body.to_vec())
    }
}
