//! # Page Worker
//!
//! Processes one [`PageRange`] strictly sequentially: fetch a listing page,
//! extract its candidates, then fetch and merge each candidate's detail page
//! before moving to the next page. The only suspension points are the two
//! fetches.

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::{CandidateRecord, ListingRecord, PageRange, SkipEvent, SkipReason, SkipUnit};
use crate::infrastructure::config::CrawlSettings;
use crate::infrastructure::http_client::PageFetcher;
use crate::infrastructure::parsing::{
    ContextualParser, DetailExtractor, DetailParseContext, ListingExtractor, ListingParseContext,
};

/// Records of one worker in page then article order, plus its skip diagnostics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkerOutput {
    pub records: Vec<ListingRecord>,
    pub skips: Vec<SkipEvent>,
}

/// Worker that owns one page range and its local output list
#[derive(Clone)]
pub struct PageWorker {
    fetcher: Arc<dyn PageFetcher>,
    listing_extractor: Arc<ListingExtractor>,
    detail_extractor: Arc<DetailExtractor>,
    settings: Arc<CrawlSettings>,
}

impl PageWorker {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        listing_extractor: Arc<ListingExtractor>,
        detail_extractor: Arc<DetailExtractor>,
        settings: Arc<CrawlSettings>,
    ) -> Self {
        Self {
            fetcher,
            listing_extractor,
            detail_extractor,
            settings,
        }
    }

    /// Process every page of `range` in order
    pub async fn run(&self, range: &PageRange) -> WorkerOutput {
        let worker = range.worker_index();
        let mut output = WorkerOutput::default();

        debug!(worker, pages = range.len(), "Worker started");
        for &page in range.pages() {
            self.process_page(worker, page, &mut output).await;
        }
        info!(
            worker,
            records = output.records.len(),
            skipped = output.skips.len(),
            "Worker finished"
        );
        output
    }

    async fn process_page(&self, worker: usize, page: u32, output: &mut WorkerOutput) {
        let url = self.settings.listing_page_url(page);
        info!(worker, page, "Scraping page {}...", page);

        let body = match self.fetcher.fetch(&url).await {
            Ok(body) => body,
            Err(e) => {
                record_skip(
                    worker,
                    output,
                    SkipEvent::new(SkipUnit::Page { page }, SkipReason::ListingFetchFailed).with_detail(e.to_string()),
                );
                return;
            }
        };

        let context = ListingParseContext::new(page, self.settings.min_price);
        let extraction = match self.listing_extractor.parse_str(&body, &context) {
            Ok(extraction) if extraction.container_found => extraction,
            Ok(_) => {
                record_skip(
                    worker,
                    output,
                    SkipEvent::new(SkipUnit::Page { page }, SkipReason::ListingContainerMissing)
                        .with_detail("no data found on page"),
                );
                return;
            }
            Err(e) => {
                record_skip(
                    worker,
                    output,
                    SkipEvent::new(SkipUnit::Page { page }, SkipReason::ListingContainerMissing).with_detail(e.to_string()),
                );
                return;
            }
        };

        for skip in extraction.skips {
            record_skip(worker, output, skip);
        }
        for candidate in extraction.candidates {
            let record = self.enrich(worker, page, candidate, output).await;
            output.records.push(record);
        }
    }

    /// Fetch and merge detail attributes; any failure keeps the bare record
    async fn enrich(
        &self,
        worker: usize,
        page: u32,
        candidate: CandidateRecord,
        output: &mut WorkerOutput,
    ) -> ListingRecord {
        let unit = SkipUnit::Detail {
            page,
            link: candidate.link.clone(),
        };

        if !candidate.has_link() {
            record_skip(
                worker,
                output,
                SkipEvent::new(unit, SkipReason::DetailFetchFailed).with_detail("listing has no link"),
            );
            return candidate.into_bare_record();
        }

        let body = match self.fetcher.fetch(&candidate.link).await {
            Ok(body) => body,
            Err(e) => {
                record_skip(
                    worker,
                    output,
                    SkipEvent::new(unit, SkipReason::DetailFetchFailed).with_detail(e.to_string()),
                );
                return candidate.into_bare_record();
            }
        };

        let context = DetailParseContext::new(candidate.link.as_str(), page);
        match self.detail_extractor.parse_str(&body, &context) {
            Ok(extraction) => {
                if !extraction.criteria_found {
                    record_skip(
                        worker,
                        output,
                        SkipEvent::new(unit, SkipReason::DetailCriteriaMissing).with_detail("no criteria found"),
                    );
                }
                candidate.enrich(extraction.attributes)
            }
            Err(e) => {
                record_skip(
                    worker,
                    output,
                    SkipEvent::new(unit, SkipReason::DetailParseFailed).with_detail(e.to_string()),
                );
                candidate.into_bare_record()
            }
        }
    }
}

fn record_skip(worker: usize, output: &mut WorkerOutput, event: SkipEvent) {
    event.log(worker);
    output.skips.push(event);
}
