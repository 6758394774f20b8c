//! # Crawling core
//!
//! - `page_worker`: sequential listing → detail processing of one page range
//! - `scheduler`: static partitioning, concurrent workers, ordered aggregation
//! - `report`: typed per-worker outcomes and the final collection

use thiserror::Error;

use crate::infrastructure::ParsingError;

pub mod page_worker;
pub mod report;
pub mod scheduler;

pub use page_worker::{PageWorker, WorkerOutput};
pub use report::{CrawlReport, WorkerOutcome, WorkerReport};
pub use scheduler::CrawlScheduler;

/// Fatal crawl errors; everything recoverable is absorbed into skip events
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CrawlError {
    #[error("Worker count must be at least 1")]
    InvalidWorkerCount,

    #[error("Worker {worker_index} failed on pages {pages:?}: {reason}")]
    WorkerFailed {
        worker_index: usize,
        pages: Vec<u32>,
        reason: String,
    },

    #[error("Parser initialization failed: {0}")]
    Parser(#[from] ParsingError),
}
