use std::collections::BTreeSet;

use crate::{CursorChain, FetchError};

/// The state of an engine after its latest change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaginationSnapshot {
    /// Bumped whenever the options change or the pages are invalidated.
    pub generation: u64,
    pub total_count: Option<usize>,
    pub loaded_pages: BTreeSet<usize>,
    pub pending_pages: BTreeSet<usize>,
    /// The error of the last page that failed.
    pub error: Option<FetchError>,
    pub cursors: CursorChain,
}

impl PaginationSnapshot {
    pub fn is_loading(&self) -> bool {
        !self.pending_pages.is_empty()
    }
}
