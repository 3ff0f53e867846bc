//! Which pages a row range needs, and how each one is requested.

use std::ops::Range;

use crate::{Cursor, CursorChain};

/// How a page is requested from its connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageRequest {
    /// The head of the connection, no cursor nor offset.
    First,
    /// The rows following the end cursor of the previous page.
    After(Cursor),
    /// The rows following the first `n` rows, for pages whose predecessor is not known yet.
    Offset(usize),
}

/// The paging variables a list document declares. A variable the document does not declare is
/// ignored by the server, so requests never rely on one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagingArguments {
    pub after: bool,
    pub offset: bool,
}

impl PagingArguments {
    pub const ALL: Self = Self {
        after: true,
        offset: true,
    };
}

/// The request for `page_index`, or `None` while it has to wait for its predecessor.
///
/// Page 0 is the head of the connection. Page 1 only ever continues from the cursor of page 0.
/// Deeper pages continue from their predecessor when its cursor is known and fall back to an
/// offset otherwise, which lets a view jump to any position without loading every page before.
pub fn plan_page(
    page_index: usize,
    page_size: usize,
    cursors: &CursorChain,
    arguments: PagingArguments,
) -> Option<PageRequest> {
    if page_index == 0 {
        return Some(PageRequest::First);
    }

    if let Some(cursor) = cursors.cursor_before(page_index).filter(|_| arguments.after) {
        return Some(PageRequest::After(cursor.clone()));
    }

    (page_index >= 2 && arguments.offset).then(|| PageRequest::Offset(page_index * page_size))
}

/// Pages covering the rows `start..end`, followed by `buffer_pages` more, never past the last
/// page when the total count is known.
pub fn pages_for_rows(
    rows: Range<usize>,
    page_size: usize,
    buffer_pages: usize,
    total_count: Option<usize>,
) -> Range<usize> {
    if rows.is_empty() || page_size == 0 {
        return 0..0;
    }

    let first = rows.start / page_size;
    let mut end = (rows.end - 1) / page_size + 1 + buffer_pages;

    if let Some(total_count) = total_count {
        end = end.min(page_count(total_count, page_size));
    }

    first..end.max(first)
}

/// Number of pages holding `total_count` rows. An empty connection still has its first page.
pub fn page_count(total_count: usize, page_size: usize) -> usize {
    total_count.div_ceil(page_size.max(1)).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_pages_never_use_offsets() {
        let cursors = CursorChain::default();

        assert_eq!(plan_page(0, 100, &cursors, PagingArguments::ALL), Some(PageRequest::First));
        assert_eq!(plan_page(1, 100, &cursors, PagingArguments::ALL), None);
        assert_eq!(plan_page(2, 100, &cursors, PagingArguments::ALL), Some(PageRequest::Offset(200)));
    }

    #[test]
    fn known_cursors_are_preferred() {
        let mut cursors = CursorChain::default();
        cursors.record(0, Cursor::new("c0"));
        cursors.record(4, Cursor::new("c4"));

        assert_eq!(plan_page(1, 100, &cursors, PagingArguments::ALL), Some(PageRequest::After(Cursor::new("c0"))));
        assert_eq!(plan_page(5, 100, &cursors, PagingArguments::ALL), Some(PageRequest::After(Cursor::new("c4"))));
        assert_eq!(plan_page(6, 100, &cursors, PagingArguments::ALL), Some(PageRequest::Offset(600)));
    }

    #[test]
    fn undeclared_variables_are_never_used() {
        let mut cursors = CursorChain::default();
        cursors.record(0, Cursor::new("c0"));

        let cursors_only = PagingArguments {
            after: true,
            offset: false,
        };
        assert_eq!(plan_page(1, 100, &cursors, cursors_only), Some(PageRequest::After(Cursor::new("c0"))));
        assert_eq!(plan_page(5, 100, &cursors, cursors_only), None);

        let offsets_only = PagingArguments {
            after: false,
            offset: true,
        };
        assert_eq!(plan_page(1, 100, &cursors, offsets_only), None);
        assert_eq!(plan_page(2, 100, &cursors, offsets_only), Some(PageRequest::Offset(200)));

        let neither = PagingArguments {
            after: false,
            offset: false,
        };
        assert_eq!(plan_page(0, 100, &cursors, neither), Some(PageRequest::First));
        assert_eq!(plan_page(3, 100, &cursors, neither), None);
    }

    #[test]
    fn row_ranges_map_to_pages_with_a_buffer() {
        assert_eq!(pages_for_rows(150..250, 100, 1, None), 1..4);
        assert_eq!(pages_for_rows(150..250, 100, 0, None), 1..3);
        assert_eq!(pages_for_rows(0..1, 100, 0, None), 0..1);
        assert_eq!(pages_for_rows(10..10, 100, 1, None), 0..0);
    }

    #[test]
    fn total_count_bounds_the_range() {
        assert_eq!(pages_for_rows(150..250, 100, 1, Some(220)), 1..3);
        assert_eq!(pages_for_rows(900..1000, 100, 1, Some(220)), 9..9);
        assert_eq!(pages_for_rows(0..100, 100, 1, Some(0)), 0..1);
        assert_eq!(page_count(200, 100), 2);
        assert_eq!(page_count(201, 100), 3);
    }
}
