#![allow(dead_code)]

use async_trait::async_trait;
use school_calendar_scraper::{FetchError, HtmlFetcher, ScraperConfig};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

pub const BASE_URL: &str = "http://school.test";

pub fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("{}: {}", path.display(), e))
}

/// Serves canned pages, optionally after a delay, and remembers every request.
/// Unknown URLs fail like a 404 would.
#[derive(Default)]
pub struct FakeFetcher {
    pages: HashMap<String, String>,
    delays: HashMap<String, Duration>,
    requests: Mutex<Vec<String>>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.pages.insert(url.into(), html.into());
        self
    }

    pub fn delayed(mut self, url: impl Into<String>, ms: u64) -> Self {
        self.delays.insert(url.into(), Duration::from_millis(ms));
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn was_requested(&self, url: &str) -> bool {
        self.requests().iter().any(|r| r == url)
    }
}

#[async_trait]
impl HtmlFetcher for FakeFetcher {
    async fn fetch_html(&self, url: &str) -> Result<String, FetchError> {
        self.requests.lock().unwrap().push(url.to_string());

        if let Some(delay) = self.delays.get(url) {
            tokio::time::sleep(*delay).await;
        }

        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::InvalidUrl(format!("no page for {}", url)))
    }
}

/// Minimal athletic detail page
pub fn detail_page(title: &str, date: &str, time: &str) -> String {
    format!(
        r#"<html><body><div class="calendar-detail">
            <h1>{}</h1>
            <div class="date">{}</div>
            <div class="time">Time: {}</div>
        </div></body></html>"#,
        title, date, time
    )
}

/// Config pointed at the fake site, caching into a scratch directory
pub fn test_config(name: &str) -> ScraperConfig {
    let mut config = ScraperConfig::with_base_url(BASE_URL);
    config.cache_dir = std::env::temp_dir()
        .join(format!("school_calendar_scraper_it_{}", std::process::id()))
        .join(name);
    config
}
