//! # Crawl Scheduler
//!
//! Partitions `1..=max_page` statically across `worker_count` workers, runs
//! them concurrently and concatenates their outputs in worker-index order.
//! Workers share nothing mutable; the only synchronization is the final join.

use std::any::Any;
use std::sync::Arc;

use futures::future::join_all;
use tokio::task::JoinError;
use tracing::{error, info, warn};

use super::page_worker::PageWorker;
use super::report::CrawlReport;
use super::CrawlError;
use crate::domain::partition_pages;
use crate::infrastructure::config::{AppConfig, CrawlSettings};
use crate::infrastructure::http_client::PageFetcher;
use crate::infrastructure::parsing::{DetailExtractor, ListingExtractor, ParsingConfig};

pub struct CrawlScheduler {
    settings: Arc<CrawlSettings>,
    fetcher: Arc<dyn PageFetcher>,
    listing_extractor: Arc<ListingExtractor>,
    detail_extractor: Arc<DetailExtractor>,
}

impl CrawlScheduler {
    /// Compile the selectors once; workers share the compiled extractors
    pub fn new(
        settings: CrawlSettings,
        parsing: &ParsingConfig,
        fetcher: Arc<dyn PageFetcher>,
    ) -> Result<Self, CrawlError> {
        let listing_extractor = ListingExtractor::with_config(&parsing.listing_selectors, &settings.base_url)?;
        let detail_extractor = DetailExtractor::with_config(&parsing.detail_selectors)?;

        Ok(Self {
            settings: Arc::new(settings),
            fetcher,
            listing_extractor: Arc::new(listing_extractor),
            detail_extractor: Arc::new(detail_extractor),
        })
    }

    pub fn from_config(config: &AppConfig, fetcher: Arc<dyn PageFetcher>) -> Result<Self, CrawlError> {
        Self::new(config.crawl.clone(), &config.parsing, fetcher)
    }

    pub fn settings(&self) -> &CrawlSettings {
        &self.settings
    }

    /// Crawl with the configured page bound and worker count
    pub async fn run(&self) -> Result<CrawlReport, CrawlError> {
        self.crawl(self.settings.max_page, self.settings.worker_count).await
    }

    /// Crawl pages `1..=max_page` with `worker_count` concurrent workers.
    ///
    /// Returns only after every worker has finished. A worker that dies is
    /// reported as failed and its partition is absent from the records,
    /// unless `fail_on_worker_error` is set, in which case the crawl errors.
    pub async fn crawl(&self, max_page: u32, worker_count: usize) -> Result<CrawlReport, CrawlError> {
        if worker_count == 0 {
            return Err(CrawlError::InvalidWorkerCount);
        }

        let ranges = partition_pages(max_page, worker_count);
        info!(max_page, worker_count, "Starting crawl");

        let handles: Vec<_> = ranges
            .iter()
            .cloned()
            .map(|range| {
                let worker = self.worker();
                tokio::spawn(async move { worker.run(&range).await })
            })
            .collect();
        let results = join_all(handles).await;

        let mut report = CrawlReport::default();
        for (range, result) in ranges.into_iter().zip(results) {
            match result {
                Ok(output) => report.push_completed(range, output.records, output.skips),
                Err(join_error) => {
                    let reason = describe_join_error(join_error);
                    error!(worker = range.worker_index(), pages = ?range.pages(), "Worker failed: {}", reason);
                    if self.settings.fail_on_worker_error {
                        return Err(CrawlError::WorkerFailed {
                            worker_index: range.worker_index(),
                            pages: range.pages().to_vec(),
                            reason,
                        });
                    }
                    report.push_failed(range, reason);
                }
            }
        }

        if report.is_empty() {
            warn!("No data scraped");
        } else {
            info!(
                records = report.records().len(),
                skipped = report.skips().len(),
                failed_workers = report.failed_workers().count(),
                "Crawl finished"
            );
        }
        Ok(report)
    }

    fn worker(&self) -> PageWorker {
        PageWorker::new(
            Arc::clone(&self.fetcher),
            Arc::clone(&self.listing_extractor),
            Arc::clone(&self.detail_extractor),
            Arc::clone(&self.settings),
        )
    }
}

fn describe_join_error(join_error: JoinError) -> String {
    if join_error.is_panic() {
        panic_message(join_error.into_panic())
    } else {
        "worker task was cancelled".to_string()
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("worker panicked: {message}")
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("worker panicked: {message}")
    } else {
        "worker panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawling::WorkerOutcome;
    use crate::domain::{ListingRecord, SkipReason};
    use crate::infrastructure::config::OutputConfig;
    use crate::infrastructure::output::CollectionWriter;
    use crate::test_utils::{article_html, detail_page, listing_page, FixtureFetcher, BASE_URL, LISTING_URL};
    use std::time::Duration;

    fn settings(fail_on_worker_error: bool) -> CrawlSettings {
        CrawlSettings {
            listing_url: LISTING_URL.to_string(),
            base_url: BASE_URL.to_string(),
            max_page: 4,
            min_price: 0,
            worker_count: 2,
            fail_on_worker_error,
        }
    }

    fn scheduler(fetcher: FixtureFetcher, fail_on_worker_error: bool) -> CrawlScheduler {
        CrawlScheduler::new(settings(fail_on_worker_error), &ParsingConfig::default(), Arc::new(fetcher)).unwrap()
    }

    fn page_url(page: u32) -> String {
        format!("{LISTING_URL}{page}")
    }

    /// One listing per page, each with its own detail page
    fn four_page_site() -> FixtureFetcher {
        (1..=4).fold(FixtureFetcher::new(), |fetcher, page| {
            fetcher
                .with_page(
                    page_url(page),
                    listing_page(&[article_html(&format!("car-{page}"), "10,000DT", &format!("/item/{page}"), "c.jpg")]),
                )
                .with_page(
                    format!("{BASE_URL}/item/{page}"),
                    detail_page(&[("Page", page.to_string().as_str())]),
                )
        })
    }

    fn titles(records: &[ListingRecord]) -> Vec<&str> {
        records.iter().map(ListingRecord::title).collect()
    }

    #[tokio::test]
    async fn output_is_ordered_by_worker_not_completion() {
        // Worker 1 owns pages 1 and 3 and is slowed down so worker 2 finishes first
        let fetcher = four_page_site()
            .with_delay(page_url(1), Duration::from_millis(80))
            .with_delay(page_url(3), Duration::from_millis(80));

        let report = scheduler(fetcher, false).run().await.unwrap();

        assert_eq!(titles(report.records()), ["car-1", "car-3", "car-2", "car-4"]);
        assert_eq!(report.records()[0].attributes()["Page"], "1");
        assert_eq!(report.workers().len(), 2);
        assert!(!report.is_partial());
    }

    #[tokio::test]
    async fn repeated_runs_serialize_identically() {
        let first = scheduler(four_page_site().with_delay(page_url(2), Duration::from_millis(30)), false)
            .run()
            .await
            .unwrap();
        let second = scheduler(four_page_site().with_delay(page_url(1), Duration::from_millis(30)), false)
            .run()
            .await
            .unwrap();

        let writer = CollectionWriter::new(&OutputConfig::default());
        assert_eq!(
            writer.render(first.records()).unwrap(),
            writer.render(second.records()).unwrap()
        );
    }

    #[tokio::test]
    async fn every_page_failing_yields_empty_report() {
        let report = scheduler(FixtureFetcher::new(), false).run().await.unwrap();

        assert!(report.is_empty());
        assert!(!report.is_partial());
        assert_eq!(report.skip_count(SkipReason::ListingFetchFailed), 4);
    }

    #[tokio::test]
    async fn panicking_worker_is_reported_and_others_survive() {
        let fetcher = four_page_site().with_panic(page_url(2));

        let report = scheduler(fetcher, false).run().await.unwrap();

        assert_eq!(titles(report.records()), ["car-1", "car-3"]);
        assert!(report.is_partial());
        let failed: Vec<_> = report.failed_workers().collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].range.worker_index(), 2);
        match &failed[0].outcome {
            WorkerOutcome::Failed { reason } => assert!(reason.contains("fixture fault")),
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[tokio::test]
    async fn panicking_worker_fails_crawl_when_configured() {
        let fetcher = four_page_site().with_panic(page_url(3));

        let err = scheduler(fetcher, true).run().await.unwrap_err();
        match err {
            CrawlError::WorkerFailed {
                worker_index, pages, ..
            } => {
                assert_eq!(worker_index, 1);
                assert_eq!(pages, vec![1, 3]);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[tokio::test]
    async fn zero_workers_is_rejected() {
        let result = scheduler(four_page_site(), false).crawl(4, 0).await;
        assert_eq!(result.unwrap_err(), CrawlError::InvalidWorkerCount);
    }

    #[tokio::test]
    async fn more_workers_than_pages_leaves_idle_workers() {
        let report = scheduler(four_page_site(), false).crawl(2, 5).await.unwrap();

        assert_eq!(titles(report.records()), ["car-1", "car-2"]);
        assert_eq!(report.workers().len(), 5);
        assert!(report.workers()[2..].iter().all(|w| w.range.is_empty()));
    }

    #[tokio::test]
    async fn zero_pages_fetches_nothing() {
        let report = scheduler(four_page_site(), false).crawl(0, 3).await.unwrap();
        assert!(report.is_empty());
        assert!(report.skips().is_empty());
    }

    #[test]
    fn invalid_selector_fails_construction() {
        let mut parsing = ParsingConfig::default();
        parsing.listing_selectors.article = vec!["article[".to_string()];

        let result = CrawlScheduler::new(settings(false), &parsing, Arc::new(FixtureFetcher::new()));
        assert!(matches!(result, Err(CrawlError::Parser(_))));
    }
}
