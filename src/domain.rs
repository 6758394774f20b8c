//! Domain module - listing records, page partitioning and crawl diagnostics
//!
//! Each module is its own file in the domain/ directory; public exports are
//! defined here for convenience.

pub mod diagnostics;
pub mod listing;
pub mod page_range;

pub use diagnostics::{SkipEvent, SkipReason, SkipUnit};
pub use listing::{CandidateRecord, ListingRecord, UNKNOWN};
pub use page_range::{partition_pages, PageRange};
