//! Static partitioning of the listing page range across workers.
//!
//! Worker `i` (1-indexed) of `n` receives pages `i, i + n, i + 2n, …` up to
//! `max_page`. The partition is decided before any fetch begins.

use serde::{Deserialize, Serialize};

/// Ordered set of page numbers owned by exactly one worker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRange {
    worker_index: usize,
    pages: Vec<u32>,
}

impl PageRange {
    pub fn new(worker_index: usize, pages: Vec<u32>) -> Self {
        Self {
            worker_index,
            pages,
        }
    }

    /// 1-based index of the owning worker
    pub fn worker_index(&self) -> usize {
        self.worker_index
    }

    pub fn pages(&self) -> &[u32] {
        &self.pages
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// Split `1..=max_page` into `worker_count` strided ranges.
///
/// Always returns `worker_count` ranges; trailing ones are empty when there
/// are fewer pages than workers.
pub fn partition_pages(max_page: u32, worker_count: usize) -> Vec<PageRange> {
    (1..=worker_count)
        .map(|worker_index| {
            let pages = u32::try_from(worker_index)
                .ok()
                .filter(|first| *first <= max_page)
                .map(|first| (first..=max_page).step_by(worker_count).collect::<Vec<u32>>())
                .unwrap_or_default();
            PageRange::new(worker_index, pages)
        })
        .collect()
}
