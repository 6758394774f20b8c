//! Test utilities for listing-crawler
//!
//! HTML builders matching the default selectors and an in-memory
//! [`PageFetcher`] so crawl tests never touch the network.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::infrastructure::http_client::{FetchError, PageFetcher};

pub const LISTING_URL: &str = "https://www.tayara.tn/fr/ads/c/Véhicules/?page=";
pub const BASE_URL: &str = "https://www.tayara.tn";

/// One listing article in the site's markup
pub fn article_html(title: &str, price: &str, href: &str, image: &str) -> String {
    format!(
        r#"<article class="mx-0">
            <a href="{href}">
                <img src="{image}" alt="">
                <h2 class="card-title font-arabic text-sm font-medium leading-5 text-gray-800 max-w-min min-w-full line-clamp-2 my-2">{title}</h2>
                <data class="font-bold font-arabic text-red-600 undefined" value="{price}">{price}</data>
            </a>
        </article>"#
    )
}

/// Listing page wrapping the given articles in the article container
pub fn listing_page(articles: &[String]) -> String {
    format!(
        r#"<html><body>
        <div class="flex flex-wrap justify-evenly lg:justify-around xl:justify-center mt-10 mb-4 gap-y-5 gap-x-0 lg:gap-x-4 xl:gap-x-4">
        {}
        </div>
        </body></html>"#,
        articles.join("\n")
    )
}

/// Detail page with the given criteria
pub fn detail_page(criteria: &[(&str, &str)]) -> String {
    let items: String = criteria
        .iter()
        .map(|(key, value)| {
            format!(
                r#"<li class="col-span-6 lg:col-span-3"><span class="text-gray-600/80">{key}</span><span class="text-gray-700/80">{value}</span></li>"#
            )
        })
        .collect();
    format!(r#"<html><body><ul class="grid gap-3 grid-cols-12">{items}</ul></body></html>"#)
}

enum Fixture {
    Body(String),
    Status(u16),
    Panic,
}

/// In-memory fetcher keyed by URL; unknown URLs answer 404
#[derive(Default)]
pub struct FixtureFetcher {
    pages: HashMap<String, Fixture>,
    delays: HashMap<String, Duration>,
    requests: Mutex<Vec<String>>,
}

impl FixtureFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.pages.insert(url.into(), Fixture::Body(body.into()));
        self
    }

    pub fn with_status(mut self, url: impl Into<String>, status: u16) -> Self {
        self.pages.insert(url.into(), Fixture::Status(status));
        self
    }

    /// Fetching this URL panics, simulating a worker-level fault
    pub fn with_panic(mut self, url: impl Into<String>) -> Self {
        self.pages.insert(url.into(), Fixture::Panic);
        self
    }

    pub fn with_delay(mut self, url: impl Into<String>, delay: Duration) -> Self {
        self.delays.insert(url.into(), delay);
        self
    }

    /// URLs requested so far, in request order
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl PageFetcher for FixtureFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(url.to_string());
        }
        if let Some(delay) = self.delays.get(url) {
            tokio::time::sleep(*delay).await;
        }
        match self.pages.get(url) {
            Some(Fixture::Body(body)) => Ok(body.clone()),
            Some(Fixture::Status(status)) => Err(FetchError::Status {
                status: *status,
                url: url.to_string(),
            }),
            Some(Fixture::Panic) => panic!("fixture fault for {url}"),
            None => Err(FetchError::Status {
                status: 404,
                url: url.to_string(),
            }),
        }
    }
}
