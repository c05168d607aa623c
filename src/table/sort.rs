//! Single-key column sort.

use std::cmp::Ordering;
use std::fmt;

use crate::types::StockPosition;

/// Sortable columns of the positions table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SortKey {
    CurrentPrice,
    WeightPct,
    ValueBn,
}

impl SortKey {
    pub const ALL: [SortKey; 3] = [SortKey::CurrentPrice, SortKey::WeightPct, SortKey::ValueBn];

    /// The value a row is ranked by, with the column's fallbacks applied.
    pub fn value_of(self, p: &StockPosition) -> f64 {
        match self {
            SortKey::CurrentPrice => p.market_price(),
            SortKey::WeightPct => p.weight_pct.unwrap_or(0.0),
            SortKey::ValueBn => p.value_bn(),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortKey::CurrentPrice => write!(f, "current_price"),
            SortKey::WeightPct => write!(f, "weight_pct"),
            SortKey::ValueBn => write!(f, "value_bn"),
        }
    }
}

impl std::str::FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "current_price" | "price" => Ok(SortKey::CurrentPrice),
            "weight_pct" | "weight" => Ok(SortKey::WeightPct),
            "value_bn" | "value" => Ok(SortKey::ValueBn),
            other => Err(format!("unknown sort key: {other}")),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn reverse(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    /// Apply this direction to an ascending comparison.
    pub fn order(self, ascending: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ascending,
            SortDirection::Desc => ascending.reverse(),
        }
    }
}

/// Active sort column, if any.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SortState {
    pub key: Option<SortKey>,
    pub direction: SortDirection,
}

impl SortState {
    pub fn by(key: SortKey, direction: SortDirection) -> Self {
        Self {
            key: Some(key),
            direction,
        }
    }

    /// Header click: the same column while ascending flips to descending,
    /// anything else starts ascending.
    pub fn toggle(self, key: SortKey) -> Self {
        let direction = if self.key == Some(key) && self.direction == SortDirection::Asc {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        };
        Self::by(key, direction)
    }

    /// Stable sort in place. No key leaves the order untouched; ties keep input order.
    pub fn sort(&self, rows: &mut [&StockPosition]) {
        let Some(key) = self.key else {
            return;
        };
        let direction = self.direction;
        rows.sort_by(|a, b| direction.order(key.value_of(a).total_cmp(&key.value_of(b))));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(rows: &[&StockPosition]) -> Vec<String> {
        rows.iter().map(|p| p.stock_code.clone()).collect()
    }

    #[test]
    fn toggle_cycle() {
        let s = SortState::default().toggle(SortKey::ValueBn);
        assert_eq!(s, SortState::by(SortKey::ValueBn, SortDirection::Asc));
        let s = s.toggle(SortKey::ValueBn);
        assert_eq!(s.direction, SortDirection::Desc);
        let s = s.toggle(SortKey::ValueBn);
        assert_eq!(s.direction, SortDirection::Asc);
    }

    #[test]
    fn toggle_other_key_restarts_ascending() {
        let s = SortState::by(SortKey::ValueBn, SortDirection::Desc).toggle(SortKey::WeightPct);
        assert_eq!(s, SortState::by(SortKey::WeightPct, SortDirection::Asc));
    }

    #[test]
    fn value_bn_sorts_by_magnitude() {
        let data = [
            StockPosition::new("A", -3.0e9),
            StockPosition::new("B", 1.0e9),
            StockPosition::new("C", 2.0e9),
        ];
        let mut rows: Vec<&StockPosition> = data.iter().collect();
        SortState::by(SortKey::ValueBn, SortDirection::Desc).sort(&mut rows);
        assert_eq!(codes(&rows), vec!["A", "C", "B"]);
    }

    #[test]
    fn current_price_uses_fallback() {
        let data = [
            StockPosition::new("A", 1.0).with_current_price(500.0),
            StockPosition::new("B", 1.0).with_avg_prices(100.0, 0.0),
            StockPosition::new("C", 1.0).with_avg_prices(0.0, 300.0),
        ];
        let mut rows: Vec<&StockPosition> = data.iter().collect();
        SortState::by(SortKey::CurrentPrice, SortDirection::Asc).sort(&mut rows);
        assert_eq!(codes(&rows), vec!["B", "C", "A"]);
    }

    #[test]
    fn missing_weight_sorts_as_zero() {
        let mut weighted = StockPosition::new("W", 1.0);
        weighted.weight_pct = Some(5.0);
        let data = [weighted, StockPosition::new("N", 1.0)];
        let mut rows: Vec<&StockPosition> = data.iter().collect();
        SortState::by(SortKey::WeightPct, SortDirection::Asc).sort(&mut rows);
        assert_eq!(codes(&rows), vec!["N", "W"]);
    }

    #[test]
    fn ties_keep_input_order() {
        let data = [
            StockPosition::new("X", 1.0e9),
            StockPosition::new("Y", -1.0e9),
            StockPosition::new("Z", 1.0e9),
        ];
        let mut rows: Vec<&StockPosition> = data.iter().collect();
        SortState::by(SortKey::ValueBn, SortDirection::Desc).sort(&mut rows);
        assert_eq!(codes(&rows), vec!["X", "Y", "Z"]);
    }

    #[test]
    fn no_key_is_noop() {
        let data = [StockPosition::new("B", 1.0), StockPosition::new("A", 9.0)];
        let mut rows: Vec<&StockPosition> = data.iter().collect();
        SortState::default().sort(&mut rows);
        assert_eq!(codes(&rows), vec!["B", "A"]);
    }

    #[test]
    fn parse_keys() {
        assert_eq!("value".parse::<SortKey>(), Ok(SortKey::ValueBn));
        assert_eq!("weight_pct".parse::<SortKey>(), Ok(SortKey::WeightPct));
        assert!("volume".parse::<SortKey>().is_err());
    }
}
