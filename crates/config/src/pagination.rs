#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PaginationConfig {
    /// Number of rows per page. 100 by default.
    pub page_size: usize,
    /// Pages fetched past the end of a requested row range, so scrolling does not wait on the
    /// network at every page boundary.
    pub buffer_pages: usize,
    /// The maximum number of page requests in flight at once.
    pub max_concurrent_pages: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            page_size: 100,
            buffer_pages: 1,
            max_concurrent_pages: 4,
        }
    }
}
