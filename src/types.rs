//! Broker-summary data model: per-stock net positions, broker identity, summary totals.
//!
//! Everything here arrives from the analysis service and is treated as
//! immutable; the only client-side field is [`StockPosition::weight_pct`].

use std::fmt;

/// One billion rupiah, the unit of the "Total Value (Bn)" column.
pub const BILLION: f64 = 1_000_000_000.0;

/// Net direction of a broker on a stock.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "String", into = "String"))]
pub enum NetPosition {
    NetBuy,
    NetSell,
    #[default]
    Neutral,
}

impl NetPosition {
    /// Wire/display label.
    pub fn as_str(self) -> &'static str {
        match self {
            NetPosition::NetBuy => "NET BUY",
            NetPosition::NetSell => "NET SELL",
            NetPosition::Neutral => "NEUTRAL",
        }
    }

    /// Classify a signed net value.
    pub fn from_value(value_raw: f64) -> Self {
        if value_raw > 0.0 {
            NetPosition::NetBuy
        } else if value_raw < 0.0 {
            NetPosition::NetSell
        } else {
            NetPosition::Neutral
        }
    }
}

impl From<&str> for NetPosition {
    /// Anything other than the two directional labels is neutral.
    fn from(s: &str) -> Self {
        match s.trim() {
            "NET BUY" => NetPosition::NetBuy,
            "NET SELL" => NetPosition::NetSell,
            _ => NetPosition::Neutral,
        }
    }
}

impl From<String> for NetPosition {
    fn from(s: String) -> Self {
        NetPosition::from(s.as_str())
    }
}

impl From<NetPosition> for String {
    fn from(p: NetPosition) -> Self {
        p.as_str().to_string()
    }
}

impl fmt::Display for NetPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A broker's merged buy/sell activity on one stock.
///
/// `value_raw` is signed: buy value minus sell value, in rupiah.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StockPosition {
    pub stock_code: String,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub broker_code: Option<String>,
    pub buy_lot: i64,
    pub sell_lot: i64,
    pub net_lot: i64,
    #[cfg_attr(feature = "serde", serde(deserialize_with = "nullable::zero"))]
    pub buy_value: f64,
    #[cfg_attr(feature = "serde", serde(deserialize_with = "nullable::zero"))]
    pub sell_value: f64,
    #[cfg_attr(feature = "serde", serde(deserialize_with = "nullable::zero"))]
    pub value_raw: f64,
    #[cfg_attr(feature = "serde", serde(deserialize_with = "nullable::zero"))]
    pub buy_avg_price: f64,
    #[cfg_attr(feature = "serde", serde(deserialize_with = "nullable::zero"))]
    pub sell_avg_price: f64,
    /// Last traded price; absent until the service enriches it.
    pub current_price: Option<f64>,
    /// Sell average relative to buy average, in percent.
    #[cfg_attr(feature = "serde", serde(deserialize_with = "nullable::zero"))]
    pub diff_pct: f64,
    pub position: NetPosition,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub investor_type: Option<String>,
    /// Share of the loaded total value, in percent. Computed client-side.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub weight_pct: Option<f64>,
}

impl StockPosition {
    /// Position with a signed net value; direction follows the sign.
    pub fn new(stock_code: &str, value_raw: f64) -> Self {
        Self {
            stock_code: stock_code.to_string(),
            value_raw,
            position: NetPosition::from_value(value_raw),
            ..Default::default()
        }
    }

    pub fn with_avg_prices(mut self, buy: f64, sell: f64) -> Self {
        self.buy_avg_price = buy;
        self.sell_avg_price = sell;
        self
    }

    pub fn with_current_price(mut self, price: f64) -> Self {
        self.current_price = Some(price);
        self
    }

    pub fn with_position(mut self, position: NetPosition) -> Self {
        self.position = position;
        self
    }

    pub fn with_diff_pct(mut self, diff_pct: f64) -> Self {
        self.diff_pct = diff_pct;
        self
    }

    /// Absolute net value in billions.
    pub fn value_bn(&self) -> f64 {
        self.value_raw.abs() / BILLION
    }

    /// Price shown in the "Current Price" column.
    ///
    /// Falls back to the sell average, then the buy average, when the current
    /// price is missing or zero.
    pub fn market_price(&self) -> f64 {
        first_nonzero(&[
            self.current_price.unwrap_or(0.0),
            self.sell_avg_price,
            self.buy_avg_price,
        ])
    }

    /// Price shown in the "Avg Price" column (buy side first).
    pub fn broker_avg_price(&self) -> f64 {
        first_nonzero(&[self.buy_avg_price, self.sell_avg_price])
    }
}

fn first_nonzero(values: &[f64]) -> f64 {
    values
        .iter()
        .copied()
        .find(|v| *v != 0.0 && !v.is_nan())
        .unwrap_or(0.0)
}

/// Identity and period of one broker-summary upload.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BrokerInfo {
    pub broker_code: String,
    pub broker_name: String,
    pub date_start: String,
    pub date_end: String,
    pub timestamp: Option<String>,
    pub source: Option<String>,
}

/// Aggregate buy/sell totals for one broker summary.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SummaryStats {
    pub total_buy_value: f64,
    pub total_sell_value: f64,
    pub net_value: f64,
    pub total_buy_value_formatted: Option<String>,
    pub total_sell_value_formatted: Option<String>,
    pub net_value_formatted: Option<String>,
    pub position: NetPosition,
}

/// One broker's summary: identity, per-stock positions, totals.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BrokerSummary {
    pub broker_info: Option<BrokerInfo>,
    pub stocks: Vec<StockPosition>,
    pub total_stocks: usize,
    pub summary: Option<SummaryStats>,
}

#[cfg(feature = "serde")]
mod nullable {
    use serde::{Deserialize, Deserializer};

    /// Accept `null` where a number is expected and read it as zero.
    pub fn zero<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(d)?.unwrap_or(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn net_position_from_label() {
        assert_eq!(NetPosition::from("NET BUY"), NetPosition::NetBuy);
        assert_eq!(NetPosition::from("NET SELL"), NetPosition::NetSell);
        assert_eq!(NetPosition::from("NEUTRAL"), NetPosition::Neutral);
        assert_eq!(NetPosition::from("something else"), NetPosition::Neutral);
    }

    #[test]
    fn net_position_from_value() {
        assert_eq!(NetPosition::from_value(1.0), NetPosition::NetBuy);
        assert_eq!(NetPosition::from_value(-1.0), NetPosition::NetSell);
        assert_eq!(NetPosition::from_value(0.0), NetPosition::Neutral);
    }

    #[test]
    fn value_bn_is_absolute() {
        let p = StockPosition::new("TLKM", -2_500_000_000.0);
        assert_eq!(p.value_bn(), 2.5);
        assert_eq!(p.position, NetPosition::NetSell);
    }

    #[test]
    fn market_price_fallback_chain() {
        let p = StockPosition::new("BBCA", 1.0).with_avg_prices(9_000.0, 9_100.0);
        assert_eq!(p.market_price(), 9_100.0);

        let p = p.with_current_price(9_250.0);
        assert_eq!(p.market_price(), 9_250.0);

        // zero current price is treated as missing
        let p = StockPosition::new("BBRI", 1.0)
            .with_avg_prices(4_500.0, 0.0)
            .with_current_price(0.0);
        assert_eq!(p.market_price(), 4_500.0);

        assert_eq!(StockPosition::new("X", 1.0).market_price(), 0.0);
    }

    #[test]
    fn broker_avg_prefers_buy_side() {
        let p = StockPosition::new("ASII", 1.0).with_avg_prices(5_000.0, 5_200.0);
        assert_eq!(p.broker_avg_price(), 5_000.0);
        let p = StockPosition::new("ASII", -1.0).with_avg_prices(0.0, 5_200.0);
        assert_eq!(p.broker_avg_price(), 5_200.0);
    }
}
