//! Crawl outcome reporting

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::{ListingRecord, PageRange, SkipEvent, SkipReason};

/// How a single worker ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WorkerOutcome {
    Completed { record_count: usize },
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkerReport {
    pub range: PageRange,
    pub outcome: WorkerOutcome,
}

impl WorkerReport {
    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, WorkerOutcome::Failed { .. })
    }
}

/// Final collection plus per-worker outcomes and all skip diagnostics.
///
/// Records are the concatenation of each worker's list in worker-index order.
#[derive(Debug, Clone, Default)]
pub struct CrawlReport {
    records: Vec<ListingRecord>,
    workers: Vec<WorkerReport>,
    skips: Vec<SkipEvent>,
}

impl CrawlReport {
    pub(crate) fn push_completed(&mut self, range: PageRange, records: Vec<ListingRecord>, skips: Vec<SkipEvent>) {
        self.workers.push(WorkerReport {
            range,
            outcome: WorkerOutcome::Completed {
                record_count: records.len(),
            },
        });
        self.records.extend(records);
        self.skips.extend(skips);
    }

    pub(crate) fn push_failed(&mut self, range: PageRange, reason: String) {
        self.workers.push(WorkerReport {
            range,
            outcome: WorkerOutcome::Failed { reason },
        });
    }

    pub fn records(&self) -> &[ListingRecord] {
        &self.records
    }

    pub fn workers(&self) -> &[WorkerReport] {
        &self.workers
    }

    pub fn skips(&self) -> &[SkipEvent] {
        &self.skips
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn failed_workers(&self) -> impl Iterator<Item = &WorkerReport> {
        self.workers.iter().filter(|w| w.is_failed())
    }

    /// True when at least one worker's partition is missing from the records
    pub fn is_partial(&self) -> bool {
        self.workers.iter().any(WorkerReport::is_failed)
    }

    pub fn skip_count(&self, reason: SkipReason) -> usize {
        self.skips.iter().filter(|s| s.reason == reason).count()
    }

    /// Skip totals keyed by reason code
    pub fn skip_summary(&self) -> BTreeMap<&'static str, usize> {
        let mut summary = BTreeMap::new();
        for skip in &self.skips {
            *summary.entry(skip.reason.code()).or_insert(0) += 1;
        }
        summary
    }
}
