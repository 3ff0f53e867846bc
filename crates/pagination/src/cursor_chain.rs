use std::collections::BTreeMap;

use crate::Cursor;

/// The end cursor of every fetched page, keyed by the index of the page that returned it.
///
/// Page `n` continues from `cursor_before(n)`, the end cursor of page `n - 1`. Cursors are only
/// meaningful for the options they were fetched with, the chain is cleared whenever those change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CursorChain {
    cursors: BTreeMap<usize, Cursor>,
}

impl CursorChain {
    pub fn record(&mut self, page_index: usize, cursor: Cursor) {
        self.cursors.insert(page_index, cursor);
    }

    pub fn get(&self, page_index: usize) -> Option<&Cursor> {
        self.cursors.get(&page_index)
    }

    pub fn cursor_before(&self, page_index: usize) -> Option<&Cursor> {
        self.get(page_index.checked_sub(1)?)
    }

    pub fn clear(&mut self) {
        self.cursors.clear();
    }

    pub fn len(&self) -> usize {
        self.cursors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cursors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &Cursor)> + '_ {
        self.cursors.iter().map(|(page_index, cursor)| (*page_index, cursor))
    }
}
