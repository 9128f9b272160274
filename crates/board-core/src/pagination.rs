//! Paging primitives and the page-number window shown in paging controls

use crate::error::{BoardError, Result};
use serde::{Deserialize, Serialize};

/// Default number of page links in a paging control
pub const DEFAULT_BAR_LENGTH: usize = 5;

/// Computes a bounded, centered run of page indices around the current page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationWindow {
    size: usize,
    backfill: bool,
}

impl PaginationWindow {
    /// Create a window of `size` links; `size` must be odd and positive
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 || size % 2 == 0 {
            return Err(BoardError::InvalidWindowSize(size));
        }
        Ok(Self {
            size,
            backfill: true,
        })
    }

    /// Toggle pulling the window start back near the last page.
    ///
    /// Without backfill the window is cut short at the last page instead
    /// (`[9, 10, 11, 12]` for page 11 of 13).
    pub fn with_backfill(mut self, backfill: bool) -> Self {
        self.backfill = backfill;
        self
    }

    /// Number of links in a full window
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn backfills(&self) -> bool {
        self.backfill
    }

    /// Window for zero-based `current_page` out of `total_pages`.
    ///
    /// Negative input is rejected; a current page past the end is clamped to
    /// the last page.
    pub fn window(&self, current_page: i64, total_pages: i64) -> Result<Vec<usize>> {
        if current_page < 0 || total_pages < 0 {
            return Err(BoardError::InvalidPaginationInput {
                current_page,
                total_pages,
            });
        }
        let current = usize::try_from(current_page).unwrap_or(usize::MAX);
        let total = usize::try_from(total_pages).unwrap_or(usize::MAX);
        Ok(self.pages(current, total))
    }

    /// Infallible form of [`window`](Self::window) for unsigned input
    pub fn pages(&self, current_page: usize, total_pages: usize) -> Vec<usize> {
        if total_pages == 0 {
            return Vec::new();
        }

        let last = total_pages - 1;
        let current = current_page.min(last);
        let half = self.size / 2;

        let mut start = current.saturating_sub(half);
        let end = last.min(start.saturating_add(self.size - 1));

        if self.backfill && end - start + 1 < self.size {
            start = end.saturating_sub(self.size - 1);
        }

        (start..=end).collect()
    }
}

impl Default for PaginationWindow {
    fn default() -> Self {
        Self {
            size: DEFAULT_BAR_LENGTH,
            backfill: true,
        }
    }
}

/// Backfilling window of `size` links around `current_page`
pub fn window(current_page: i64, total_pages: i64, size: usize) -> Result<Vec<usize>> {
    PaginationWindow::new(size)?.window(current_page, total_pages)
}

/// Requested slice of a listing (zero-based page)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: usize,
    pub size: usize,
}

impl PageRequest {
    pub fn new(page: usize, size: usize) -> Self {
        Self {
            page,
            size: size.max(1),
        }
    }

    /// Index of the first item on this page
    pub fn offset(&self) -> usize {
        self.page.saturating_mul(self.size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(0, 10)
    }
}

/// One page of a listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub size: usize,
    pub total_items: usize,
}

impl<T> Page<T> {
    /// Empty page for a request
    pub fn empty(request: PageRequest) -> Self {
        Self {
            items: Vec::new(),
            page: request.page,
            size: request.size,
            total_items: 0,
        }
    }

    /// Cut the requested page out of an already ordered listing
    pub fn slice(all: Vec<T>, request: PageRequest) -> Self {
        let total_items = all.len();
        let items = all
            .into_iter()
            .skip(request.offset())
            .take(request.size)
            .collect();
        Self {
            items,
            page: request.page,
            size: request.size,
            total_items,
        }
    }

    pub fn total_pages(&self) -> usize {
        if self.size == 0 {
            return 0;
        }
        self.total_items.div_ceil(self.size)
    }

    pub fn is_first(&self) -> bool {
        self.page == 0
    }

    pub fn is_last(&self) -> bool {
        self.page + 1 >= self.total_pages()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Page links to show for this page
    pub fn window(&self, window: &PaginationWindow) -> Vec<usize> {
        window.pages(self.page, self.total_pages())
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_items: self.total_items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_window_at_first_page() {
        assert_eq!(window(0, 13, 5).unwrap(), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_window_at_last_page_extends_backward() {
        assert_eq!(window(12, 13, 5).unwrap(), vec![8, 9, 10, 11, 12]);
    }

    #[test]
    fn test_window_near_last_page_backfills() {
        assert_eq!(window(11, 13, 5).unwrap(), vec![8, 9, 10, 11, 12]);
    }

    #[test]
    fn test_window_fewer_pages_than_size() {
        assert_eq!(window(0, 3, 5).unwrap(), vec![0, 1, 2]);
        assert_eq!(window(2, 3, 5).unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_window_centered() {
        assert_eq!(window(3, 13, 5).unwrap(), vec![1, 2, 3, 4, 5]);
        assert_eq!(window(6, 13, 5).unwrap(), vec![4, 5, 6, 7, 8]);
        assert_eq!(window(6, 13, 3).unwrap(), vec![5, 6, 7]);
    }

    #[test]
    fn test_window_without_backfill_matches_legacy_bar() {
        let bar = PaginationWindow::default().with_backfill(false);
        let cases: [(usize, Vec<usize>); 8] = [
            (0, vec![0, 1, 2, 3, 4]),
            (1, vec![0, 1, 2, 3, 4]),
            (2, vec![0, 1, 2, 3, 4]),
            (3, vec![1, 2, 3, 4, 5]),
            (4, vec![2, 3, 4, 5, 6]),
            (10, vec![8, 9, 10, 11, 12]),
            (11, vec![9, 10, 11, 12]),
            (12, vec![10, 11, 12]),
        ];
        for (current, expected) in cases {
            assert_eq!(bar.pages(current, 13), expected, "current page {}", current);
        }
    }

    #[test]
    fn test_window_empty_when_no_pages() {
        assert!(window(0, 0, 5).unwrap().is_empty());
    }

    #[test]
    fn test_window_single_page() {
        assert_eq!(window(0, 1, 5).unwrap(), vec![0]);
    }

    #[test]
    fn test_window_current_past_end_is_clamped() {
        assert_eq!(window(40, 13, 5).unwrap(), vec![8, 9, 10, 11, 12]);
    }

    #[test]
    fn test_window_negative_input_rejected() {
        assert!(matches!(
            window(-1, 13, 5),
            Err(BoardError::InvalidPaginationInput { current_page: -1, .. })
        ));
        assert!(matches!(
            window(0, -3, 5),
            Err(BoardError::InvalidPaginationInput { total_pages: -3, .. })
        ));
    }

    #[test]
    fn test_window_size_must_be_odd() {
        assert!(matches!(window(0, 13, 4), Err(BoardError::InvalidWindowSize(4))));
        assert!(matches!(window(0, 13, 0), Err(BoardError::InvalidWindowSize(0))));
    }

    #[test]
    fn test_window_is_contiguous_and_bounded() {
        let bar = PaginationWindow::default();
        for total in 0..20usize {
            for current in 0..total {
                let pages = bar.pages(current, total);
                assert!(pages.len() <= bar.size());
                assert_eq!(pages.len(), total.min(bar.size()));
                assert!(pages.contains(&current));
                assert!(pages.windows(2).all(|w| w[1] == w[0] + 1));
                assert!(pages.iter().all(|p| *p < total));
            }
        }
    }

    #[test]
    fn test_page_slice() {
        let page = Page::slice((0..23).collect::<Vec<_>>(), PageRequest::new(2, 10));
        assert_eq!(page.items, vec![20, 21, 22]);
        assert_eq!(page.total_pages(), 3);
        assert!(page.is_last());
        assert!(!page.is_first());
    }

    #[test]
    fn test_page_window() {
        let page = Page::slice((0..130).collect::<Vec<_>>(), PageRequest::new(12, 10));
        assert_eq!(page.window(&PaginationWindow::default()), vec![8, 9, 10, 11, 12]);
    }

    #[test]
    fn test_empty_page() {
        let page: Page<u8> = Page::empty(PageRequest::default());
        assert!(page.is_empty());
        assert_eq!(page.total_pages(), 0);
        assert!(page.window(&PaginationWindow::default()).is_empty());
    }
}
