//! Accumulation/distribution table: stocks that show up in every one of a
//! broker's transactions, filtered by broker, sector, and stock code.

use std::cmp::Ordering;
use std::fmt;

use rustc_hash::FxHashSet;

use crate::table::SortDirection;

/// A stock a broker has been consistently net buying (or selling).
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AccumulatedStock {
    pub stock_code: String,
    pub broker_code: String,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub appearances: u32,
    /// Percentage of the broker's transactions that include this stock.
    pub appearance_rate: f64,
    pub total_transactions: u32,
    pub buy_volume: i64,
    pub sell_volume: i64,
    pub net_volume: i64,
    pub buy_value: i64,
    pub sell_value: i64,
    pub net_value: i64,
    pub avg_price: f64,
    pub first_seen: Option<String>,
    pub last_seen: Option<String>,
}

impl AccumulatedStock {
    pub fn new(stock_code: &str, broker_code: &str, net_volume: i64) -> Self {
        Self {
            stock_code: stock_code.to_string(),
            broker_code: broker_code.to_string(),
            net_volume,
            ..Default::default()
        }
    }

    pub fn with_sector(mut self, sector: &str) -> Self {
        self.sector = Some(sector.to_string());
        self
    }

    /// Positive net volume.
    pub fn is_accumulating(&self) -> bool {
        self.net_volume > 0
    }

    /// Negative net volume.
    pub fn is_distributing(&self) -> bool {
        self.net_volume < 0
    }
}

/// Sortable columns of the accumulation table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AccumulationSortKey {
    StockCode,
    Sector,
    Industry,
    NetVolume,
    AvgPrice,
}

impl fmt::Display for AccumulationSortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AccumulationSortKey::StockCode => "stock_code",
            AccumulationSortKey::Sector => "sector",
            AccumulationSortKey::Industry => "industry",
            AccumulationSortKey::NetVolume => "net_volume",
            AccumulationSortKey::AvgPrice => "avg_price",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for AccumulationSortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stock_code" | "code" => Ok(AccumulationSortKey::StockCode),
            "sector" => Ok(AccumulationSortKey::Sector),
            "industry" => Ok(AccumulationSortKey::Industry),
            "net_volume" | "volume" => Ok(AccumulationSortKey::NetVolume),
            "avg_price" | "price" => Ok(AccumulationSortKey::AvgPrice),
            other => Err(format!("unknown sort key: {other}")),
        }
    }
}

/// Sort for the accumulation table; defaults to net volume, largest first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AccumulationSort {
    pub key: AccumulationSortKey,
    pub direction: SortDirection,
}

impl Default for AccumulationSort {
    fn default() -> Self {
        Self {
            key: AccumulationSortKey::NetVolume,
            direction: SortDirection::Desc,
        }
    }
}

impl AccumulationSort {
    /// Header click: the same column while descending flips to ascending,
    /// anything else starts descending.
    pub fn toggle(self, key: AccumulationSortKey) -> Self {
        let direction = if self.key == key && self.direction == SortDirection::Desc {
            SortDirection::Asc
        } else {
            SortDirection::Desc
        };
        Self { key, direction }
    }

    fn compare(&self, a: &AccumulatedStock, b: &AccumulatedStock) -> Ordering {
        let ascending = match self.key {
            AccumulationSortKey::StockCode => a.stock_code.cmp(&b.stock_code),
            AccumulationSortKey::Sector => a.sector.cmp(&b.sector),
            AccumulationSortKey::Industry => a.industry.cmp(&b.industry),
            AccumulationSortKey::NetVolume => a.net_volume.cmp(&b.net_volume),
            AccumulationSortKey::AvgPrice => a.avg_price.total_cmp(&b.avg_price),
        };
        self.direction.order(ascending)
    }
}

/// Broker / sector / code filters. `None` means "all".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AccumulationFilter {
    pub broker: Option<String>,
    pub sector: Option<String>,
    pub search: String,
}

impl AccumulationFilter {
    pub fn matches(&self, stock: &AccumulatedStock) -> bool {
        let broker_ok = self
            .broker
            .as_deref()
            .is_none_or(|b| stock.broker_code == b);
        let sector_ok = self
            .sector
            .as_deref()
            .is_none_or(|s| stock.sector.as_deref() == Some(s));
        let search_ok = stock
            .stock_code
            .to_lowercase()
            .contains(&self.search.trim().to_lowercase());
        broker_ok && sector_ok && search_ok
    }
}

/// Filter then sort the accumulation rows.
pub fn view<'a>(
    stocks: &'a [AccumulatedStock],
    filter: &AccumulationFilter,
    sort: &AccumulationSort,
) -> Vec<&'a AccumulatedStock> {
    let mut rows: Vec<&AccumulatedStock> = stocks.iter().filter(|s| filter.matches(s)).collect();
    rows.sort_by(|a, b| sort.compare(a, b));
    rows
}

/// Distinct broker codes, in order of first appearance.
pub fn brokers(stocks: &[AccumulatedStock]) -> Vec<String> {
    distinct(stocks.iter().map(|s| s.broker_code.as_str()))
}

/// Distinct non-empty sectors, in order of first appearance.
pub fn sectors(stocks: &[AccumulatedStock]) -> Vec<String> {
    distinct(
        stocks
            .iter()
            .filter_map(|s| s.sector.as_deref())
            .filter(|s| !s.is_empty()),
    )
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = FxHashSet::default();
    values
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}

/// Accumulating vs distributing counts for the summary cards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AccumulationCounts {
    pub accumulating: usize,
    pub distributing: usize,
}

pub fn counts(stocks: &[AccumulatedStock]) -> AccumulationCounts {
    AccumulationCounts {
        accumulating: stocks.iter().filter(|s| s.is_accumulating()).count(),
        distributing: stocks.iter().filter(|s| s.is_distributing()).count(),
    }
}
