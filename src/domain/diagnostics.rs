//! Structured skip diagnostics.
//!
//! Every unit (page, article, detail fetch) that contributes nothing or
//! degrades produces one [`SkipEvent`]. Events are logged as structured
//! `tracing` records and collected into the crawl report.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Why a unit was skipped or degraded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Listing page returned a non-success status or failed in transport
    ListingFetchFailed,
    /// Listing page had no article container
    ListingContainerMissing,
    /// Article had no price element
    PriceMissing,
    /// Price text did not parse as a number
    PriceUnparsable,
    /// Price was not above the configured threshold
    PriceBelowThreshold,
    /// Article markup was malformed (e.g. link without href)
    ArticleMalformed,
    /// Detail page could not be fetched; record kept without attributes
    DetailFetchFailed,
    /// Detail page had no criteria list; record kept without attributes
    DetailCriteriaMissing,
    /// Detail document could not be processed; record kept without attributes
    DetailParseFailed,
}

impl SkipReason {
    /// Stable reason code used in logs and reports
    pub fn code(self) -> &'static str {
        match self {
            Self::ListingFetchFailed => "listing_fetch_failed",
            Self::ListingContainerMissing => "listing_container_missing",
            Self::PriceMissing => "price_missing",
            Self::PriceUnparsable => "price_unparsable",
            Self::PriceBelowThreshold => "price_below_threshold",
            Self::ArticleMalformed => "article_malformed",
            Self::DetailFetchFailed => "detail_fetch_failed",
            Self::DetailCriteriaMissing => "detail_criteria_missing",
            Self::DetailParseFailed => "detail_parse_failed",
        }
    }

    /// Whether the base record still made it into the collection
    pub fn keeps_record(self) -> bool {
        matches!(
            self,
            Self::DetailFetchFailed | Self::DetailCriteriaMissing | Self::DetailParseFailed
        )
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// The unit a skip applies to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "unit", rename_all = "snake_case")]
pub enum SkipUnit {
    Page { page: u32 },
    Article { page: u32, index: usize },
    Detail { page: u32, link: String },
}

impl fmt::Display for SkipUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Page { page } => write!(f, "page {page}"),
            Self::Article { page, index } => write!(f, "page {page} article {index}"),
            Self::Detail { page, link } => write!(f, "page {page} detail {link}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkipEvent {
    pub unit: SkipUnit,
    pub reason: SkipReason,
    /// Free-form context (error text, offending value)
    pub detail: Option<String>,
}

impl SkipEvent {
    pub fn new(unit: SkipUnit, reason: SkipReason) -> Self {
        Self {
            unit,
            reason,
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Emit the event as a structured log record
    pub fn log(&self, worker: usize) {
        let detail = self.detail.as_deref().unwrap_or("");
        match self.reason {
            SkipReason::PriceBelowThreshold => tracing::debug!(
                worker,
                unit = %self.unit,
                reason = self.reason.code(),
                record_kept = self.reason.keeps_record(),
                detail,
                "unit skipped"
            ),
            _ => tracing::warn!(
                worker,
                unit = %self.unit,
                reason = self.reason.code(),
                record_kept = self.reason.keeps_record(),
                detail,
                "unit skipped"
            ),
        }
    }
}
