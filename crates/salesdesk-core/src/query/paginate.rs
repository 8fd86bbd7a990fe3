//! # Paginate Stage
//!
//! Page window arithmetic.
//!
//! ```text
//!   totalItems = 8, limit = 3
//!
//!   index:   0  1  2 │ 3  4  5 │ 6  7
//!   page:    ───1─── │ ───2─── │ ─3─
//!
//!   totalPages  = ceil(8 / 3) = 3          (1 when totalItems = 0)
//!   currentPage = clamp(requested, 1, totalPages)
//!   window      = [(currentPage-1)·limit, currentPage·limit) ∩ [0, totalItems)
//! ```

/// The resolved window for one page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub total_items: usize,
    pub total_pages: u32,
    pub current_page: u32,
    pub limit: u32,
    /// Inclusive start index.
    pub start: usize,
    /// Exclusive end index.
    pub end: usize,
}

impl PageWindow {
    /// Resolves a page request against a sequence length.
    ///
    /// A zero `limit` is treated as 1.
    ///
    /// ## Example
    /// ```rust
    /// use salesdesk_core::query::PageWindow;
    ///
    /// let window = PageWindow::new(8, 2, 3);
    /// assert_eq!((window.start, window.end), (3, 6));
    /// assert_eq!(window.total_pages, 3);
    ///
    /// // Past the end clamps to the last page.
    /// let window = PageWindow::new(8, 99, 3);
    /// assert_eq!(window.current_page, 3);
    /// assert_eq!((window.start, window.end), (6, 8));
    /// ```
    pub fn new(total_items: usize, page: u32, limit: u32) -> Self {
        let limit = limit.max(1);
        let per_page = limit as usize;

        let total_pages = total_items.div_ceil(per_page).max(1);
        let total_pages = u32::try_from(total_pages).unwrap_or(u32::MAX);
        let current_page = page.clamp(1, total_pages);

        let start = ((current_page - 1) as usize)
            .saturating_mul(per_page)
            .min(total_items);
        let end = start.saturating_add(per_page).min(total_items);

        Self {
            total_items,
            total_pages,
            current_page,
            limit,
            start,
            end,
        }
    }

    /// The window's slice of `items`.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let end = self.end.min(items.len());
        &items[self.start.min(end)..end]
    }

    pub fn has_next_page(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn has_prev_page(&self) -> bool {
        self.current_page > 1
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
