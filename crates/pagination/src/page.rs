use std::fmt;

use serde::{Deserialize, Serialize};

/// An opaque continuation token returned by a connection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
    pub fn new(cursor: impl Into<String>) -> Self {
        Self(cursor.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
    pub has_previous_page: bool,
    pub start_cursor: Option<Cursor>,
    pub end_cursor: Option<Cursor>,
}

/// One fetched page. Pages are shared as `Arc<PageData<R>>` and never modified in place: a
/// patched row produces a new page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageData<R> {
    pub rows: Vec<R>,
    pub page_info: PageInfo,
    pub page_index: usize,
    pub total_count: Option<usize>,
}

impl<R> PageData<R> {
    pub fn row(&self, offset: usize) -> Option<&R> {
        self.rows.get(offset)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
