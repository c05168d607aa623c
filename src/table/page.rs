//! Page slicing and the page-number strip.

/// Page sizes offered by the rows-per-page selector.
pub const ROWS_PER_PAGE_OPTIONS: [usize; 4] = [10, 20, 30, 50];

/// Default page size.
pub const DEFAULT_ROWS_PER_PAGE: usize = 10;

/// Most page numbers shown at once in the navigation strip.
pub const PAGE_WINDOW: usize = 5;

/// Current page (1-based) and page size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageState {
    pub current_page: usize,
    pub rows_per_page: usize,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            current_page: 1,
            rows_per_page: DEFAULT_ROWS_PER_PAGE,
        }
    }
}

/// Whether `rows` is one of [`ROWS_PER_PAGE_OPTIONS`].
pub fn is_rows_per_page_option(rows: usize) -> bool {
    ROWS_PER_PAGE_OPTIONS.contains(&rows)
}

impl PageState {
    /// Page 1 at `rows_per_page`, or at [`DEFAULT_ROWS_PER_PAGE`] when the
    /// size is not one of the offered options.
    pub fn new(rows_per_page: usize) -> Self {
        let rows_per_page = if is_rows_per_page_option(rows_per_page) {
            rows_per_page
        } else {
            DEFAULT_ROWS_PER_PAGE
        };
        Self {
            current_page: 1,
            rows_per_page,
        }
    }

    /// Same page size, back on page 1.
    pub fn first(self) -> Self {
        Self {
            current_page: 1,
            ..self
        }
    }

    /// `ceil(total_rows / rows_per_page)`; zero when there are no rows.
    pub fn total_pages(&self, total_rows: usize) -> usize {
        total_rows.div_ceil(self.rows_per_page.max(1))
    }

    /// Whether `page` is a valid target for `total_rows` rows.
    pub fn contains(&self, page: usize, total_rows: usize) -> bool {
        page >= 1 && page <= self.total_pages(total_rows)
    }

    /// Half-open row range `[start, end)` of the current page, clamped to `total_rows`.
    pub fn bounds(&self, total_rows: usize) -> (usize, usize) {
        let rows = self.rows_per_page.max(1);
        let start = self.current_page.saturating_sub(1).saturating_mul(rows);
        let end = start.saturating_add(rows);
        (start.min(total_rows), end.min(total_rows))
    }
}

/// Page numbers for the navigation strip: at most [`PAGE_WINDOW`], centred on
/// `current` where possible and pinned to the first/last pages near the edges.
pub fn page_window(current: usize, total_pages: usize) -> Vec<usize> {
    let count = total_pages.min(PAGE_WINDOW);
    let first = if total_pages <= PAGE_WINDOW || current <= 3 {
        1
    } else if current + 2 >= total_pages {
        total_pages - (PAGE_WINDOW - 1)
    } else {
        current - 2
    };
    (first..first + count).collect()
}
