//! Table state as an explicit snapshot updated by events.

use crate::types::StockPosition;

use super::filter::{Bound, FilterState, PositionFilter};
use super::page::{PageState, is_rows_per_page_option};
use super::sort::{SortKey, SortState};

/// A user action on the positions table.
#[derive(Clone, Debug, PartialEq)]
pub enum TableEvent {
    /// Free-text search typed into the search box.
    Search(String),
    /// Position dropdown changed.
    SetPosition(PositionFilter),
    /// A range input changed (raw text, parsed on the way in).
    SetBound(Bound, String),
    /// Column header clicked.
    Sort(SortKey),
    /// "Clear all filters": resets filters, search, and sort.
    Clear,
    GoToPage(usize),
    NextPage,
    PrevPage,
    SetRowsPerPage(usize),
    /// Source rows were replaced.
    DataLoaded,
}

/// Everything that determines which rows are on screen.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TableState {
    pub filters: FilterState,
    pub sort: SortState,
    pub page: PageState,
    /// Length of the source data the state was last applied to.
    pub data_len: usize,
}

impl TableState {
    pub fn new(rows_per_page: usize) -> Self {
        Self {
            page: PageState::new(rows_per_page),
            ..Default::default()
        }
    }

    /// Produce the next state. `self` is left untouched.
    ///
    /// Any change to filters, search, sort, page size, or the source data
    /// length puts the table back on page 1. Page requests outside
    /// `[1, total_pages]` are ignored.
    pub fn apply(&self, event: TableEvent, positions: &[StockPosition]) -> TableState {
        let mut next = self.clone();
        match event {
            TableEvent::Search(query) => {
                next.filters.search_query = query;
                next.page = next.page.first();
            }
            TableEvent::SetPosition(position) => {
                next.filters.position = position;
                next.page = next.page.first();
            }
            TableEvent::SetBound(bound, text) => {
                next.filters = next.filters.with_bound(bound, &text);
                next.page = next.page.first();
            }
            TableEvent::Sort(key) => {
                next.sort = next.sort.toggle(key);
                next.page = next.page.first();
            }
            TableEvent::Clear => {
                next.filters = FilterState::default();
                next.sort = SortState::default();
                next.page = next.page.first();
            }
            TableEvent::GoToPage(page) => next.go_to(page, positions),
            TableEvent::NextPage => next.go_to(self.page.current_page + 1, positions),
            TableEvent::PrevPage => {
                next.go_to(self.page.current_page.saturating_sub(1), positions)
            }
            TableEvent::SetRowsPerPage(rows) => {
                if is_rows_per_page_option(rows) {
                    next.page = PageState::new(rows);
                }
            }
            TableEvent::DataLoaded => {
                if positions.len() != self.data_len {
                    next.page = next.page.first();
                }
                next.data_len = positions.len();
            }
        }
        next
    }

    fn go_to(&mut self, page: usize, positions: &[StockPosition]) {
        let filtered = self.filters.apply(positions).len();
        if self.page.contains(page, filtered) {
            self.page.current_page = page;
        }
    }

    /// Apply a sequence of events in order.
    pub fn apply_all<I>(&self, events: I, positions: &[StockPosition]) -> TableState
    where
        I: IntoIterator<Item = TableEvent>,
    {
        events
            .into_iter()
            .fold(self.clone(), |state, event| state.apply(event, positions))
    }
}
