//! Plain-text rendering of tables, panels, and progress lines.

use std::fmt;

use bandarscope::accumulation::AccumulationCounts;
use bandarscope::badge::{Freshness, Status};
use bandarscope::format::{billions, count_compact, idr, idr_compact, signed_pct};
use bandarscope::metrics::{PositionStats, position_stats};
use bandarscope::table::TableView;
use bandarscope::{AccumulatedStock, BrokerSummary};
use bandarscope_client::{
    AccumulationSummary, DomainProgress, MasterDataStats, NewsItem, ReloadDomain, ReloadProgress,
    SentimentReport,
};
use chrono::{DateTime, Utc};

/// Unix seconds as `2024-01-01 00:00 UTC`; out-of-range values print raw.
pub fn unix_time(secs: i64) -> String {
    DateTime::<Utc>::from_timestamp(secs, 0)
        .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| secs.to_string())
}

/// An RFC 3339 timestamp as `01 Jan 2024 09:30`; anything unparseable prints as given.
pub fn timestamp(text: &str) -> String {
    DateTime::parse_from_rfc3339(text)
        .map(|t| t.format("%d %b %Y %H:%M").to_string())
        .unwrap_or_else(|_| text.to_string())
}

fn or_dash(price: f64) -> String {
    if price > 0.0 {
        format!("{price:.0}")
    } else {
        "-".into()
    }
}

/// Broker summary header, positions page, and page strip.
pub struct PositionsReport<'a> {
    pub summary: Option<&'a BrokerSummary>,
    /// Every weighted row, for the headline counts.
    pub all_rows: &'a [bandarscope::StockPosition],
    pub view: &'a TableView<'a>,
}

impl fmt::Display for PositionsReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(summary) = self.summary {
            if let Some(info) = &summary.broker_info {
                writeln!(f, "BROKER {} {}", info.broker_code, info.broker_name)?;
                if !info.date_start.is_empty() || !info.date_end.is_empty() {
                    writeln!(f, "  Period: {} to {}", info.date_start, info.date_end)?;
                }
            }
            if let Some(stats) = &summary.summary {
                writeln!(
                    f,
                    "  Buy {}  Sell {}  Net {}",
                    idr_compact(stats.total_buy_value),
                    idr_compact(stats.total_sell_value),
                    idr_compact(stats.net_value),
                )?;
            }
        }
        let PositionStats {
            total_net_value,
            winning,
            losing,
        } = position_stats(self.all_rows);
        writeln!(
            f,
            "  Stocks: {}  Net value: {}  Winning: {winning}  Losing: {losing}",
            self.all_rows.len(),
            idr(total_net_value),
        )?;
        writeln!(f)?;

        if self.view.is_empty() {
            writeln!(f, "No positions match the current filters.")?;
            return Ok(());
        }

        writeln!(
            f,
            "  {:8} {:9} {:>10} {:>10} {:>10} {:>9} {:>8}",
            "Stock", "Position", "Value(B)", "BuyAvg", "Price", "Diff", "Weight"
        )?;
        for p in &self.view.rows {
            let weight = p
                .weight_pct
                .map(|w| format!("{w:.2}%"))
                .unwrap_or_else(|| "-".into());
            writeln!(
                f,
                "  {:8} {:9} {:>10} {:>10} {:>10} {:>9} {:>8}",
                p.stock_code,
                p.position.badge().label,
                billions(p.value_raw),
                or_dash(p.broker_avg_price()),
                or_dash(p.market_price()),
                signed_pct(p.diff_pct),
                weight,
            )?;
        }
        writeln!(f, "\n  {}", self.view.range_label())?;
        let strip: Vec<String> = self
            .view
            .page_window()
            .into_iter()
            .map(|n| {
                if n == self.view.current_page {
                    format!("[{n}]")
                } else {
                    n.to_string()
                }
            })
            .collect();
        writeln!(
            f,
            "  Page {} of {}: {}",
            self.view.current_page,
            self.view.total_pages,
            strip.join(" ")
        )
    }
}

/// Accumulation rows plus the summary cards and filter facets.
pub struct AccumulationReport<'a> {
    pub rows: &'a [&'a AccumulatedStock],
    pub counts: AccumulationCounts,
    pub summary: Option<&'a AccumulationSummary>,
    pub brokers: &'a [String],
    pub sectors: &'a [String],
}

impl fmt::Display for AccumulationReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ACCUMULATION:")?;
        if let Some(s) = self.summary {
            write!(f, "  Brokers: {}", s.total_brokers)?;
            if let Some(stocks) = s.total_stocks {
                write!(f, "  Stocks: {stocks}")?;
            }
            if let Some(updated) = &s.last_updated {
                write!(f, "  Updated: {}", timestamp(updated))?;
            }
            writeln!(f)?;
        }
        writeln!(
            f,
            "  Accumulating: {}  Distributing: {}",
            self.counts.accumulating, self.counts.distributing
        )?;
        writeln!(f, "  Brokers: {}", self.brokers.join(", "))?;
        writeln!(f, "  Sectors: {}", self.sectors.join(", "))?;
        writeln!(f)?;

        if self.rows.is_empty() {
            return writeln!(f, "No stocks match the current filters.");
        }
        writeln!(
            f,
            "  {:8} {:6} {:22} {:>10} {:>12} {:>12}",
            "Stock", "Broker", "Sector", "NetVol", "AvgPrice", "NetValue"
        )?;
        for s in self.rows {
            writeln!(
                f,
                "  {:8} {:6} {:22} {:>10} {:>12} {:>12}",
                s.stock_code,
                s.broker_code,
                s.sector.as_deref().unwrap_or("-"),
                count_compact(s.net_volume),
                idr(s.avg_price),
                idr_compact(s.net_value as f64),
            )?;
        }
        writeln!(f, "\n  {} rows", self.rows.len())
    }
}

/// Master-data stats with freshness badges.
pub struct StatsPanel<'a>(pub &'a MasterDataStats);

impl fmt::Display for StatsPanel<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "MASTER DATA:")?;
        writeln!(f, "  {:12} {:>8} {:8} {}", "Domain", "Stocks", "Status", "Age")?;
        for (domain, stats) in [
            (ReloadDomain::Technical, &self.0.technical),
            (ReloadDomain::Fundamental, &self.0.fundamental),
        ] {
            writeln!(
                f,
                "  {:12} {:>8} {:8} {}",
                domain.path_segment(),
                stats.total_stocks,
                Freshness::from_stale(stats.is_stale).badge().label,
                stats.age.as_deref().unwrap_or("-"),
            )?;
        }
        Ok(())
    }
}

fn domain_line(f: &mut fmt::Formatter<'_>, name: ReloadDomain, p: &DomainProgress) -> fmt::Result {
    if p.is_running {
        writeln!(
            f,
            "  {:12} {:>5.1}%  {}/{}  ok {}  failed {}",
            name.path_segment(),
            p.percent(),
            p.current,
            p.total,
            p.successful,
            p.failed,
        )
    } else {
        writeln!(f, "  {:12} {}", name.path_segment(), p.status.as_deref().unwrap_or("idle"))
    }
}

/// One progress tick.
pub struct ProgressLine<'a>(pub &'a ReloadProgress);

impl fmt::Display for ProgressLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        domain_line(f, ReloadDomain::Technical, &self.0.technical)?;
        domain_line(f, ReloadDomain::Fundamental, &self.0.fundamental)
    }
}

/// One page of the news feed.
pub struct NewsPage<'a> {
    pub items: &'a [NewsItem],
    pub page: usize,
    pub total_pages: usize,
    pub total: usize,
}

impl fmt::Display for NewsPage<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.items.is_empty() {
            return writeln!(f, "No news.");
        }
        for item in self.items {
            write!(
                f,
                "- [{}] {}",
                item.instrument().badge().label,
                item.display_symbol().unwrap_or("-"),
            )?;
            if let Some(urgency) = item.urgency() {
                write!(f, " ({})", urgency.badge().label)?;
            }
            writeln!(f, "  {}", unix_time(item.published))?;
            writeln!(f, "  {}", item.title)?;
            if let Some(sentiment) = &item.sentiment {
                writeln!(
                    f,
                    "  {} {:+.2} ({:.0}% confidence)",
                    item.sentiment_label().badge().label,
                    sentiment.score,
                    sentiment.confidence * 100.0,
                )?;
            }
            if let Some(provider) = &item.provider {
                writeln!(f, "  via {}", provider.name)?;
            }
        }
        writeln!(
            f,
            "\n  Page {} of {} ({} items)",
            self.page, self.total_pages, self.total
        )
    }
}

/// Market sentiment summary and top scored headlines.
pub struct SentimentPanel<'a>(pub &'a SentimentReport);

impl fmt::Display for SentimentPanel<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let market = &self.0.market_sentiment;
        writeln!(
            f,
            "SENTIMENT: {} (score {:+.3}, {} news)",
            market.sentiment().badge().label,
            market.weighted_score,
            market.news_count,
        )?;
        let b = &market.breakdown;
        writeln!(
            f,
            "  Bullish {}  Bearish {}  Neutral {}",
            b.bullish, b.bearish, b.neutral
        )?;
        if self.0.top_news.is_empty() {
            return Ok(());
        }
        writeln!(f, "\nTOP NEWS:")?;
        for (i, n) in self.0.top_news.iter().enumerate() {
            writeln!(
                f,
                "  {:>2}. {:+.2} {}",
                i + 1,
                n.sentiment_score,
                n.title.as_deref().unwrap_or("(untitled)"),
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bandarscope::StockPosition;
    use bandarscope::table::{self, TableState};
    use bandarscope_client::{DomainStats, MarketSentiment, ScoredNews};

    #[test]
    fn unix_time_formats_utc() {
        assert_eq!(unix_time(1_704_067_200), "2024-01-01 00:00 UTC");
    }

    #[test]
    fn timestamp_falls_back_to_raw() {
        assert_eq!(timestamp("2024-03-05T09:30:00+07:00"), "05 Mar 2024 09:30");
        assert_eq!(timestamp("yesterday"), "yesterday");
    }

    #[test]
    fn positions_report_lists_page() {
        let rows = vec![
            StockPosition::new("BBCA", 5e9).with_avg_prices(9_000.0, 9_100.0),
            StockPosition::new("TLKM", -2e9),
        ];
        let state = TableState::new(10);
        let view = table::view(&rows, &state);
        let text = PositionsReport {
            summary: None,
            all_rows: &rows,
            view: &view,
        }
        .to_string();
        assert!(text.contains("BBCA"));
        assert!(text.contains("TLKM"));
        assert!(text.contains("Showing 1-2 of 2 rows"));
        assert!(text.contains("[1]"));
    }

    #[test]
    fn empty_view_says_so() {
        let rows: Vec<StockPosition> = Vec::new();
        let view = table::view(&rows, &TableState::default());
        let text = PositionsReport {
            summary: None,
            all_rows: &rows,
            view: &view,
        }
        .to_string();
        assert!(text.contains("No positions match"));
    }

    #[test]
    fn stats_panel_badges() {
        let stats = MasterDataStats {
            technical: DomainStats {
                total_stocks: 900,
                is_stale: true,
                age: Some("3 days".into()),
            },
            ..Default::default()
        };
        let text = StatsPanel(&stats).to_string();
        assert!(text.contains("Stale"));
        assert!(text.contains("Fresh"));
        assert!(text.contains("3 days"));
    }

    #[test]
    fn progress_line_shows_percent_when_running() {
        let progress = ReloadProgress {
            technical: DomainProgress {
                is_running: true,
                current: 25,
                total: 100,
                ..Default::default()
            },
            ..Default::default()
        };
        let text = ProgressLine(&progress).to_string();
        assert!(text.contains("25.0%"));
        assert!(text.contains("idle"));
    }

    #[test]
    fn sentiment_panel_lists_top_news() {
        let report = SentimentReport {
            market_sentiment: MarketSentiment {
                overall_sentiment: Some("bullish".into()),
                weighted_score: 0.42,
                news_count: 12,
                ..Default::default()
            },
            top_news: vec![ScoredNews {
                title: Some("Gold rallies".into()),
                sentiment_score: 0.8,
                ..Default::default()
            }],
        };
        let text = SentimentPanel(&report).to_string();
        assert!(text.contains("BULLISH"));
        assert!(text.contains("Gold rallies"));
    }
}
