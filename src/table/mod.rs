//! Positions table: filter → sort → paginate.
//!
//! The pipeline is recomputed from scratch for every state snapshot. Order
//! of the steps matters for correctness:
//!
//! 1. free-text search on the stock code (case-insensitive substring)
//! 2. position filter (skipped for `All`)
//! 3. value / PnL range filters (only bounds that parsed)
//! 4. single-key stable sort
//! 5. page slice `[(page-1)*rows, page*rows)`
//!
//! ```
//! use bandarscope::StockPosition;
//! use bandarscope::table::{self, TableEvent, TableState, SortKey};
//!
//! let rows = vec![
//!     StockPosition::new("BBCA", 5_000_000_000.0),
//!     StockPosition::new("TLKM", -2_000_000_000.0),
//!     StockPosition::new("BBRI", 800_000_000.0),
//! ];
//! let state = TableState::new(10)
//!     .apply(TableEvent::Search("bb".into()), &rows)
//!     .apply(TableEvent::Sort(SortKey::ValueBn), &rows);
//!
//! let view = table::view(&rows, &state);
//! assert_eq!(view.total_rows, 2);
//! assert_eq!(view.rows[0].stock_code, "BBRI");
//! ```

pub mod filter;
pub mod page;
pub mod sort;
pub mod state;

pub use filter::{Bound, FilterState, PositionFilter, parse_bound};
pub use page::{PageState, ROWS_PER_PAGE_OPTIONS, is_rows_per_page_option, page_window};
pub use sort::{SortDirection, SortKey, SortState};
pub use state::{TableEvent, TableState};

use crate::types::StockPosition;

/// The slice of rows to render plus the numbers around it.
#[derive(Clone, Debug)]
pub struct TableView<'a> {
    /// Rows on the current page, in display order.
    pub rows: Vec<&'a StockPosition>,
    /// Rows that survived filtering (all pages).
    pub total_rows: usize,
    pub total_pages: usize,
    pub current_page: usize,
    /// Zero-based index of the first row on this page.
    pub start: usize,
    /// Zero-based exclusive end of this page.
    pub end: usize,
}

impl TableView<'_> {
    /// Nothing matched the filters.
    pub fn is_empty(&self) -> bool {
        self.total_rows == 0
    }

    /// Page numbers for the navigation strip.
    pub fn page_window(&self) -> Vec<usize> {
        page_window(self.current_page, self.total_pages)
    }

    /// "Showing a-b of n" label.
    pub fn range_label(&self) -> String {
        format!(
            "Showing {}-{} of {} rows",
            (self.start + 1).min(self.total_rows),
            self.end,
            self.total_rows
        )
    }
}

/// Filter and sort every row, without slicing.
pub fn filtered_sorted<'a>(
    positions: &'a [StockPosition],
    filters: &FilterState,
    sort: &SortState,
) -> Vec<&'a StockPosition> {
    let mut rows = filters.apply(positions);
    sort.sort(&mut rows);
    rows
}

/// Run the full pipeline for one state snapshot.
pub fn view<'a>(positions: &'a [StockPosition], state: &TableState) -> TableView<'a> {
    let rows = filtered_sorted(positions, &state.filters, &state.sort);
    let total_rows = rows.len();
    let (start, end) = state.page.bounds(total_rows);
    TableView {
        rows: rows[start..end].to_vec(),
        total_rows,
        total_pages: state.page.total_pages(total_rows),
        current_page: state.page.current_page,
        start,
        end,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(n: usize) -> Vec<StockPosition> {
        (0..n)
            .map(|i| StockPosition::new(&format!("S{i:03}"), (i as f64 + 1.0) * 1e9))
            .collect()
    }

    #[test]
    fn view_slices_current_page() {
        let rows = data(25);
        let state = TableState::new(10).apply(TableEvent::GoToPage(3), &rows);
        let v = view(&rows, &state);
        assert_eq!(v.rows.len(), 5);
        assert_eq!(v.total_pages, 3);
        assert_eq!((v.start, v.end), (20, 25));
        assert_eq!(v.rows[0].stock_code, "S020");
        assert_eq!(v.range_label(), "Showing 21-25 of 25 rows");
    }

    #[test]
    fn empty_view() {
        let rows = data(3);
        let state = TableState::default().apply(TableEvent::Search("zzz".into()), &rows);
        let v = view(&rows, &state);
        assert!(v.is_empty());
        assert!(v.rows.is_empty());
        assert_eq!(v.total_pages, 0);
        assert!(v.page_window().is_empty());
    }

    #[test]
    fn sort_then_slice() {
        let rows = data(15);
        let state = TableState::new(10)
            .apply(TableEvent::Sort(SortKey::ValueBn), &rows)
            .apply(TableEvent::Sort(SortKey::ValueBn), &rows);
        let v = view(&rows, &state);
        assert_eq!(v.rows[0].stock_code, "S014");
        assert_eq!(v.rows.len(), 10);
    }
}
