//! Search, position, and range filters for the positions table.

use crate::types::{BILLION, NetPosition, StockPosition};

/// Categorical filter on [`NetPosition`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PositionFilter {
    #[default]
    All,
    NetBuy,
    NetSell,
}

impl PositionFilter {
    pub fn matches(self, position: NetPosition) -> bool {
        match self {
            PositionFilter::All => true,
            PositionFilter::NetBuy => position == NetPosition::NetBuy,
            PositionFilter::NetSell => position == NetPosition::NetSell,
        }
    }
}

impl std::str::FromStr for PositionFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['_', ' '], "-").as_str() {
            "all" => Ok(PositionFilter::All),
            "buy" | "net-buy" => Ok(PositionFilter::NetBuy),
            "sell" | "net-sell" => Ok(PositionFilter::NetSell),
            other => Err(format!("unknown position filter: {other}")),
        }
    }
}

/// Which numeric bound an input edits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Bound {
    /// Minimum absolute value, in billions.
    MinValue,
    /// Maximum absolute value, in billions.
    MaxValue,
    /// Minimum signed net value, raw rupiah.
    MinPnl,
    /// Maximum signed net value, raw rupiah.
    MaxPnl,
}

/// Parse a bound from user text. Blank or unparseable text means "no bound".
///
/// The whole trimmed text must be a number: `"1.5abc"` is no bound, not 1.5.
pub fn parse_bound(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    text.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// All active row filters.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FilterState {
    pub position: PositionFilter,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
    pub min_pnl: Option<f64>,
    pub max_pnl: Option<f64>,
    pub search_query: String,
}

impl FilterState {
    /// Set one bound from raw input text.
    pub fn with_bound(mut self, bound: Bound, text: &str) -> Self {
        let value = parse_bound(text);
        match bound {
            Bound::MinValue => self.min_value = value,
            Bound::MaxValue => self.max_value = value,
            Bound::MinPnl => self.min_pnl = value,
            Bound::MaxPnl => self.max_pnl = value,
        }
        self
    }

    pub fn with_position(mut self, position: PositionFilter) -> Self {
        self.position = position;
        self
    }

    pub fn with_search(mut self, query: &str) -> Self {
        self.search_query = query.to_string();
        self
    }

    /// Whether a row survives every filter, applied in order:
    /// search, position, value range, PnL range.
    pub fn matches(&self, p: &StockPosition) -> bool {
        let query = self.search_query.trim();
        if !query.is_empty()
            && !p
                .stock_code
                .to_lowercase()
                .contains(&query.to_lowercase())
        {
            return false;
        }

        if !self.position.matches(p.position) {
            return false;
        }

        let abs_value = p.value_raw.abs();
        if let Some(min) = self.min_value {
            if abs_value < min * BILLION {
                return false;
            }
        }
        if let Some(max) = self.max_value {
            if abs_value > max * BILLION {
                return false;
            }
        }

        if let Some(min) = self.min_pnl {
            if p.value_raw < min {
                return false;
            }
        }
        if let Some(max) = self.max_pnl {
            if p.value_raw > max {
                return false;
            }
        }

        true
    }

    /// Keep the matching rows, preserving order.
    pub fn apply<'a>(&self, positions: &'a [StockPosition]) -> Vec<&'a StockPosition> {
        positions.iter().filter(|p| self.matches(p)).collect()
    }

    /// Number of filter groups in effect (the "N active" badge).
    ///
    /// Value bounds count once together, as do PnL bounds.
    pub fn active_count(&self) -> usize {
        [
            self.position != PositionFilter::All,
            self.min_value.is_some() || self.max_value.is_some(),
            self.min_pnl.is_some() || self.max_pnl.is_some(),
            !self.search_query.trim().is_empty(),
        ]
        .iter()
        .filter(|active| **active)
        .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<StockPosition> {
        vec![
            StockPosition::new("BBCA", 5_000_000_000.0),
            StockPosition::new("TLKM", -2_000_000_000.0),
            StockPosition::new("BBRI", 800_000_000.0),
            StockPosition::new("ANTM", 0.0),
        ]
    }

    fn codes(rows: &[&StockPosition]) -> Vec<String> {
        rows.iter().map(|p| p.stock_code.clone()).collect()
    }

    #[test]
    fn parse_bound_rules() {
        assert_eq!(parse_bound(""), None);
        assert_eq!(parse_bound("   "), None);
        assert_eq!(parse_bound("abc"), None);
        assert_eq!(parse_bound("NaN"), None);
        assert_eq!(parse_bound(" 1.5 "), Some(1.5));
        assert_eq!(parse_bound("-20"), Some(-20.0));
        assert_eq!(parse_bound("1.5abc"), None);
        assert_eq!(parse_bound("12 bn"), None);
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let data = rows();
        let f = FilterState::default().with_search("bb");
        assert_eq!(codes(&f.apply(&data)), vec!["BBCA", "BBRI"]);
    }

    #[test]
    fn blank_search_is_ignored() {
        let data = rows();
        let f = FilterState::default().with_search("   ");
        assert_eq!(f.apply(&data).len(), data.len());
        assert_eq!(f.active_count(), 0);
    }

    #[test]
    fn position_filter_net_buy() {
        let data = vec![
            StockPosition::new("A", 1.0).with_position(NetPosition::NetBuy),
            StockPosition::new("B", -1.0).with_position(NetPosition::NetSell),
        ];
        let f = FilterState::default().with_position(PositionFilter::NetBuy);
        assert_eq!(codes(&f.apply(&data)), vec!["A"]);
    }

    #[test]
    fn parse_position_filter() {
        assert_eq!("NET BUY".parse::<PositionFilter>(), Ok(PositionFilter::NetBuy));
        assert_eq!("sell".parse::<PositionFilter>(), Ok(PositionFilter::NetSell));
        assert_eq!("all".parse::<PositionFilter>(), Ok(PositionFilter::All));
        assert!("neutral".parse::<PositionFilter>().is_err());
    }

    #[test]
    fn neutral_only_passes_all() {
        let data = rows();
        let sell = FilterState::default().with_position(PositionFilter::NetSell);
        assert_eq!(codes(&sell.apply(&data)), vec!["TLKM"]);
        assert!(PositionFilter::All.matches(NetPosition::Neutral));
        assert!(!PositionFilter::NetBuy.matches(NetPosition::Neutral));
    }

    #[test]
    fn value_bounds_are_in_billions_on_absolute_value() {
        let data = rows();
        let f = FilterState::default()
            .with_bound(Bound::MinValue, "1")
            .with_bound(Bound::MaxValue, "3");
        assert_eq!(codes(&f.apply(&data)), vec!["TLKM"]);
    }

    #[test]
    fn pnl_bounds_are_signed_raw() {
        let data = rows();
        let f = FilterState::default().with_bound(Bound::MaxPnl, "0");
        assert_eq!(codes(&f.apply(&data)), vec!["TLKM", "ANTM"]);
        let f = FilterState::default().with_bound(Bound::MinPnl, "1000000000");
        assert_eq!(codes(&f.apply(&data)), vec!["BBCA"]);
    }

    #[test]
    fn unparseable_bound_is_not_applied() {
        let data = rows();
        let f = FilterState::default().with_bound(Bound::MinValue, "lots");
        assert_eq!(f.min_value, None);
        assert_eq!(f.apply(&data).len(), data.len());
    }

    #[test]
    fn active_count_groups_bounds() {
        let f = FilterState::default()
            .with_position(PositionFilter::NetSell)
            .with_bound(Bound::MinValue, "1")
            .with_bound(Bound::MaxValue, "2")
            .with_bound(Bound::MaxPnl, "0")
            .with_search("bb");
        assert_eq!(f.active_count(), 4);
    }
}
