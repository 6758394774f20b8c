//! Listing Crawler - concurrent crawler for paginated classified-ad listings
//!
//! Listing pages are split statically across a fixed number of workers. Each
//! worker extracts the listings priced above a threshold, follows every
//! listing to its detail page and merges the detail attributes into the
//! record. Results are concatenated in worker order and written as one JSON
//! array.

pub mod crawling;
pub mod domain;
pub mod infrastructure;

#[cfg(test)]
pub mod test_utils;

pub use crawling::{CrawlError, CrawlReport, CrawlScheduler, PageWorker, WorkerOutcome, WorkerReport};
pub use domain::{partition_pages, CandidateRecord, ListingRecord, PageRange, SkipEvent, SkipReason, SkipUnit};
pub use infrastructure::{
    AppConfig, CollectionWriter, ConfigManager, FetchError, HttpClient, HttpClientConfig, PageFetcher,
};
