//! Derived metrics computed client-side from a loaded result set.

use crate::types::{StockPosition, SummaryStats};

/// `|value_raw| / total_value * 100`, or `None` when the total is zero or not finite.
pub fn weight_pct(value_raw: f64, total_value: f64) -> Option<f64> {
    if total_value == 0.0 || !total_value.is_finite() {
        return None;
    }
    Some(value_raw.abs() / total_value * 100.0)
}

/// Attach `weight_pct` to every position.
///
/// A zero (or non-finite) total returns the positions unchanged, so no
/// division by zero ever reaches the table.
pub fn with_weights(positions: &[StockPosition], total_value: f64) -> Vec<StockPosition> {
    if weight_pct(0.0, total_value).is_none() {
        return positions.to_vec();
    }
    positions
        .iter()
        .map(|p| StockPosition {
            weight_pct: weight_pct(p.value_raw, total_value),
            ..p.clone()
        })
        .collect()
}

/// The total a broker summary's weights are measured against: gross buy plus gross sell.
pub fn summary_total_value(summary: Option<&SummaryStats>) -> f64 {
    summary
        .map(|s| s.total_buy_value + s.total_sell_value)
        .unwrap_or(0.0)
}

/// Headline counts shown above a positions table.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PositionStats {
    /// Sum of signed net values.
    pub total_net_value: f64,
    /// Stocks whose sell average is above the buy average.
    pub winning: usize,
    /// Stocks whose sell average is below the buy average.
    pub losing: usize,
}

pub fn position_stats(positions: &[StockPosition]) -> PositionStats {
    positions
        .iter()
        .fold(PositionStats::default(), |mut acc, p| {
            acc.total_net_value += p.value_raw;
            if p.diff_pct > 0.0 {
                acc.winning += 1;
            } else if p.diff_pct < 0.0 {
                acc.losing += 1;
            }
            acc
        })
}
