use std::ops::Range;

pub const DEFAULT_PAGE_SIZE: usize = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    pub page_size: usize,
    pub current_page: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub range: Range<usize>,
    pub has_more: bool,
}

/// Slice of a view of `view_len` items selected by `cursor`.
pub fn page(view_len: usize, cursor: &PageCursor) -> Page {
    let start = (cursor.current_page * cursor.page_size).min(view_len);
    let end = ((cursor.current_page + 1) * cursor.page_size).min(view_len);
    Page {
        range: start..end,
        has_more: (cursor.current_page + 1) * cursor.page_size < view_len,
    }
}

/// Tracks how much of the view has been materialized.
///
/// `current_page` is the last page on screen. A load-more is split into
/// [`Pager::begin_advance`] and [`Pager::finish_advance`] so the caller can
/// wait between the two; a second begin while one is pending is refused.
#[derive(Debug, Clone)]
pub struct Pager {
    cursor: PageCursor,
    in_flight: bool,
}

impl Default for Pager {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Pager {
    pub fn new(page_size: usize) -> Self {
        Self {
            cursor: PageCursor {
                page_size: page_size.max(1),
                current_page: 0,
            },
            in_flight: false,
        }
    }

    pub fn cursor(&self) -> PageCursor {
        self.cursor
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Back to the first page; its slice replaces whatever was shown.
    pub fn reset(&mut self, view_len: usize) -> Page {
        self.cursor.current_page = 0;
        page(view_len, &self.cursor)
    }

    pub fn has_more(&self, view_len: usize) -> bool {
        page(view_len, &self.cursor).has_more
    }

    /// Number of view items currently materialized.
    pub fn shown(&self, view_len: usize) -> usize {
        page(view_len, &self.cursor).range.end
    }

    pub fn begin_advance(&mut self, view_len: usize) -> bool {
        if self.in_flight || !self.has_more(view_len) {
            return false;
        }
        self.in_flight = true;
        true
    }

    /// Moves to the next page and returns the slice to append. Returns
    /// `None` when no advance was pending.
    pub fn finish_advance(&mut self, view_len: usize) -> Option<Page> {
        if !self.in_flight {
            return None;
        }
        self.in_flight = false;
        if !self.has_more(view_len) {
            return None;
        }
        self.cursor.current_page += 1;
        Some(page(view_len, &self.cursor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pages_cover_the_view_exactly_once() {
        let len = 100;
        let mut pager = Pager::new(24);
        let mut seen: Vec<usize> = pager.reset(len).range.collect();
        let mut pages = 1;
        while pager.begin_advance(len) {
            let page = pager.finish_advance(len).unwrap();
            seen.extend(page.range);
            pages += 1;
        }
        assert_eq!(pages, 5);
        assert_eq!(seen, (0..len).collect::<Vec<_>>());
        assert!(!pager.has_more(len));
        assert_eq!(pager.shown(len), len);
    }

    #[test]
    fn fifth_page_reports_no_more() {
        let cursor = PageCursor {
            page_size: 24,
            current_page: 4,
        };
        let last = page(100, &cursor);
        assert_eq!(last.range, 96..100);
        assert!(!last.has_more);

        let fourth = page(100, &PageCursor { current_page: 3, ..cursor });
        assert!(fourth.has_more);
    }

    #[test]
    fn advance_is_refused_while_pending() {
        let mut pager = Pager::new(10);
        pager.reset(35);
        assert!(pager.begin_advance(35));
        assert!(!pager.begin_advance(35));
        assert_eq!(pager.finish_advance(35).unwrap().range, 10..20);
        assert_eq!(pager.finish_advance(35), None);
        assert!(pager.begin_advance(35));
    }

    #[test]
    fn reset_returns_to_first_page() {
        let mut pager = Pager::new(10);
        pager.reset(50);
        pager.begin_advance(50);
        pager.finish_advance(50);
        assert_eq!(pager.cursor().current_page, 1);

        let first = pager.reset(7);
        assert_eq!(first.range, 0..7);
        assert!(!first.has_more);
        assert_eq!(pager.cursor().current_page, 0);
    }

    #[test]
    fn empty_view_has_an_empty_first_page() {
        let mut pager = Pager::default();
        let first = pager.reset(0);
        assert!(first.range.is_empty());
        assert!(!pager.begin_advance(0));
    }
}
