//! Fixture fetcher and listing builder shared by the crawler unit tests

use crate::crawler::fetcher::PageFetcher;
use crate::CrawlerError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// Serves canned bodies by URL and records every request
pub struct FixtureFetcher {
    pages: HashMap<String, Vec<u8>>,
    requests: Mutex<Vec<String>>,
}

impl FixtureFetcher {
    pub fn new(pages: Vec<(String, String)>) -> Self {
        Self {
            pages: pages
                .into_iter()
                .map(|(url, body)| (url, body.into_bytes()))
                .collect(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageFetcher for FixtureFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, CrawlerError> {
        self.requests.lock().unwrap().push(url.to_string());
        self.pages.get(url).cloned().ok_or_else(|| CrawlerError::Status {
            url: url.to_string(),
            status: 404,
        })
    }
}

/// A listing page with one lecture row per audio href
pub fn listing(audio: &[&str], next: Option<&str>) -> String {
    let rows: String = audio
        .iter()
        .map(|href| {
            format!(
                r#"<tr class="lecture"><td class="title">Forelesning {0}</td><td class="audio"><a href="{0}">Lyd</a></td></tr>"#,
                href
            )
        })
        .collect();
    let paginator = next
        .map(|href| format!(r#"<a href="{}">Neste</a>"#, href))
        .unwrap_or_default();
    format!(
        r#"<html><body><table>{}</table><div class="paginator">{}</div></body></html>"#,
        rows, paginator
    )
}
