//! Property-based tests for the positions-table pipeline.
//!
//! These tests use proptest to check that the weight, filter, sort and
//! paging invariants hold across randomly generated result sets.

use bandarscope::table::{
    self, Bound, FilterState, PositionFilter, ROWS_PER_PAGE_OPTIONS, SortDirection, SortKey,
    SortState, TableEvent, TableState,
};
use bandarscope::{NetPosition, StockPosition, metrics};
use proptest::prelude::*;

/// Signed net value between -50bn and +50bn, zero included.
fn value_strategy() -> impl Strategy<Value = f64> {
    (-50_000i64..=50_000i64).prop_map(|m| m as f64 * 1_000_000.0)
}

fn position_strategy() -> impl Strategy<Value = StockPosition> {
    (
        "[A-Z]{4}",
        value_strategy(),
        prop::option::of(1.0f64..20_000.0),
        0.0f64..20_000.0,
        0.0f64..20_000.0,
    )
        .prop_map(|(code, value, price, buy_avg, sell_avg)| {
            let p = StockPosition::new(&code, value).with_avg_prices(buy_avg, sell_avg);
            match price {
                Some(price) => p.with_current_price(price),
                None => p,
            }
        })
}

fn positions_strategy() -> impl Strategy<Value = Vec<StockPosition>> {
    prop::collection::vec(position_strategy(), 0..120)
}

fn sort_key_strategy() -> impl Strategy<Value = SortKey> {
    prop_oneof![
        Just(SortKey::CurrentPrice),
        Just(SortKey::WeightPct),
        Just(SortKey::ValueBn),
    ]
}

fn filter_strategy() -> impl Strategy<Value = FilterState> {
    (
        prop_oneof![
            Just(PositionFilter::All),
            Just(PositionFilter::NetBuy),
            Just(PositionFilter::NetSell),
        ],
        prop::option::of(0u32..30),
        prop::option::of(0u32..30),
        "[A-Z]{0,2}",
    )
        .prop_map(|(position, min, max, search)| {
            let text = |b: Option<u32>| b.map(|v| v.to_string()).unwrap_or_default();
            FilterState::default()
                .with_position(position)
                .with_bound(Bound::MinValue, &text(min))
                .with_bound(Bound::MaxValue, &text(max))
                .with_search(&search)
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    // ========================================================================
    // DERIVED METRICS
    // ========================================================================

    /// Weights add up to the share of the total the rows account for.
    #[test]
    fn weights_sum_to_share_of_total(
        positions in positions_strategy(),
        total in 1.0e9f64..1.0e13,
    ) {
        let weighted = metrics::with_weights(&positions, total);
        let sum: f64 = weighted.iter().filter_map(|p| p.weight_pct).sum();
        let expected: f64 = positions.iter().map(|p| p.value_raw.abs()).sum::<f64>() / total * 100.0;
        prop_assert!((sum - expected).abs() <= 1e-6 * expected.max(1.0),
            "sum={} expected={}", sum, expected);
        prop_assert!(weighted.iter().all(|p| p.weight_pct.is_some_and(|w| w >= 0.0)));
    }

    /// Weighting never touches anything but `weight_pct`.
    #[test]
    fn weights_preserve_other_fields(positions in positions_strategy(), total in 1.0f64..1.0e12) {
        let weighted = metrics::with_weights(&positions, total);
        prop_assert_eq!(weighted.len(), positions.len());
        for (w, p) in weighted.iter().zip(&positions) {
            let unweighted = StockPosition { weight_pct: None, ..w.clone() };
            prop_assert_eq!(&unweighted, p);
        }
    }

    // ========================================================================
    // FILTERING
    // ========================================================================

    /// Filtered rows are a subsequence of the source.
    #[test]
    fn filter_is_subset(positions in positions_strategy(), filters in filter_strategy()) {
        let rows = filters.apply(&positions);
        prop_assert!(rows.len() <= positions.len());
        let mut source = positions.iter();
        for row in &rows {
            prop_assert!(source.any(|p| std::ptr::eq(p, *row)), "row out of order or foreign");
        }
    }

    /// Filtering a filtered set changes nothing.
    #[test]
    fn filter_is_idempotent(positions in positions_strategy(), filters in filter_strategy()) {
        let once: Vec<StockPosition> = filters.apply(&positions).into_iter().cloned().collect();
        let twice = filters.apply(&once);
        prop_assert_eq!(twice.len(), once.len());
    }

    /// Every surviving row satisfies the value bounds and the position filter.
    #[test]
    fn filter_respects_bounds(positions in positions_strategy(), filters in filter_strategy()) {
        for row in filters.apply(&positions) {
            let abs = row.value_raw.abs();
            if let Some(min) = filters.min_value {
                prop_assert!(abs >= min * 1e9);
            }
            if let Some(max) = filters.max_value {
                prop_assert!(abs <= max * 1e9);
            }
            match filters.position {
                PositionFilter::NetBuy => prop_assert_eq!(row.position, NetPosition::NetBuy),
                PositionFilter::NetSell => prop_assert_eq!(row.position, NetPosition::NetSell),
                PositionFilter::All => {}
            }
        }
    }

    // ========================================================================
    // SORTING
    // ========================================================================

    /// Ascending output is non-decreasing in the sort value.
    #[test]
    fn ascending_is_ordered(positions in positions_strategy(), key in sort_key_strategy()) {
        let mut rows: Vec<&StockPosition> = positions.iter().collect();
        SortState::by(key, SortDirection::Asc).sort(&mut rows);
        for pair in rows.windows(2) {
            prop_assert!(key.value_of(pair[0]) <= key.value_of(pair[1]));
        }
    }

    /// Descending then ascending on the same key gives reversed values.
    #[test]
    fn desc_is_reverse_of_asc(positions in positions_strategy(), key in sort_key_strategy()) {
        let mut asc: Vec<&StockPosition> = positions.iter().collect();
        SortState::by(key, SortDirection::Asc).sort(&mut asc);
        let mut desc: Vec<&StockPosition> = positions.iter().collect();
        SortState::by(key, SortDirection::Desc).sort(&mut desc);

        let asc_values: Vec<f64> = asc.iter().map(|p| key.value_of(p)).collect();
        let mut desc_values: Vec<f64> = desc.iter().map(|p| key.value_of(p)).collect();
        desc_values.reverse();
        prop_assert_eq!(asc_values, desc_values);
    }

    // ========================================================================
    // PAGINATION
    // ========================================================================

    /// Page slices stay within the filtered row count and never exceed the page size.
    #[test]
    fn page_slice_is_bounded(
        positions in positions_strategy(),
        rows_idx in 0usize..ROWS_PER_PAGE_OPTIONS.len(),
        page in 0usize..20,
    ) {
        let rows_per_page = ROWS_PER_PAGE_OPTIONS[rows_idx];
        let state = TableState::new(rows_per_page)
            .apply(TableEvent::DataLoaded, &positions)
            .apply(TableEvent::GoToPage(page), &positions);
        let view = table::view(&positions, &state);
        prop_assert!(view.end <= view.total_rows);
        prop_assert!(view.start <= view.end);
        prop_assert!(view.rows.len() <= rows_per_page);
        prop_assert!(state.page.current_page >= 1);
        prop_assert!(state.page.current_page <= view.total_pages.max(1));
    }

    /// Changing rows-per-page always lands on page 1.
    #[test]
    fn rows_per_page_change_resets(
        positions in positions_strategy(),
        page in 1usize..10,
        rows_idx in 0usize..ROWS_PER_PAGE_OPTIONS.len(),
    ) {
        let state = TableState::new(10)
            .apply(TableEvent::DataLoaded, &positions)
            .apply(TableEvent::GoToPage(page), &positions)
            .apply(TableEvent::SetRowsPerPage(ROWS_PER_PAGE_OPTIONS[rows_idx]), &positions);
        prop_assert_eq!(state.page.current_page, 1);
    }

    /// The page strip never shows more than five pages and always includes the current one.
    #[test]
    fn page_window_contains_current(total in 1usize..200, current_seed in 0usize..200) {
        let current = current_seed % total + 1;
        let window = table::page_window(current, total);
        prop_assert!(window.len() <= 5);
        prop_assert!(window.contains(&current));
        prop_assert!(window.iter().all(|p| *p >= 1 && *p <= total));
    }
}
