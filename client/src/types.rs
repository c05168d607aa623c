//! Request and response types for the analysis service.
//!
//! The analytics payloads (quant, technical, fundamental, news bundles and
//! company profiles) are owned by the service and kept as JSON values; the
//! shapes the client acts on are typed.

use std::fmt;

use bandarscope::badge::{InstrumentKind, Sentiment, Urgency};
use bandarscope::{AccumulatedStock, BrokerSummary};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `{ "data": ... }` wrapper used by most endpoints.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub data: T,
}

/// Result of a broker-summary upload.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum AnalyzeData {
    /// Several brokers' summaries from one upload.
    Batch {
        broker_summaries: Vec<BrokerSummary>,
        #[serde(default)]
        total_entries: usize,
    },
    /// A single broker's summary.
    Single(BrokerSummary),
}

impl AnalyzeData {
    pub fn into_summaries(self) -> Vec<BrokerSummary> {
        match self {
            AnalyzeData::Batch {
                broker_summaries, ..
            } => broker_summaries,
            AnalyzeData::Single(summary) => vec![summary],
        }
    }

    /// Rows across every summary.
    pub fn total_entries(&self) -> usize {
        match self {
            AnalyzeData::Batch {
                broker_summaries,
                total_entries,
            } => {
                if *total_entries > 0 {
                    *total_entries
                } else {
                    broker_summaries.iter().map(|s| s.stocks.len()).sum()
                }
            }
            AnalyzeData::Single(summary) => summary.stocks.len(),
        }
    }
}

/// Per-stock analysis families, each behind its own endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnalysisKind {
    Quant,
    Technical,
    Fundamental,
    News,
}

impl AnalysisKind {
    pub const ALL: [AnalysisKind; 4] = [
        AnalysisKind::Quant,
        AnalysisKind::Technical,
        AnalysisKind::Fundamental,
        AnalysisKind::News,
    ];

    pub fn path_segment(self) -> &'static str {
        match self {
            AnalysisKind::Quant => "quant",
            AnalysisKind::Technical => "technical",
            AnalysisKind::Fundamental => "fundamental",
            AnalysisKind::News => "news",
        }
    }

    /// Message used when the service fails without a `detail`.
    pub fn fallback_error(self) -> &'static str {
        match self {
            AnalysisKind::Quant => "Failed to run quantitative analysis",
            AnalysisKind::Technical => "Failed to run technical analysis",
            AnalysisKind::Fundamental => "Failed to run fundamental analysis",
            AnalysisKind::News => "Failed to run news analysis",
        }
    }
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_segment())
    }
}

impl std::str::FromStr for AnalysisKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "quant" | "quantitative" => Ok(AnalysisKind::Quant),
            "technical" | "tech" => Ok(AnalysisKind::Technical),
            "fundamental" | "fund" => Ok(AnalysisKind::Fundamental),
            "news" => Ok(AnalysisKind::News),
            other => Err(format!("unknown analysis kind: {other}")),
        }
    }
}

/// Body of the per-stock analysis requests.
#[derive(Clone, Debug, Serialize)]
pub(crate) struct StocksRequest<'a> {
    pub stocks: Vec<&'a str>,
}

/// One stock's analysis result. The metrics themselves stay untyped.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct AnalysisBundle {
    #[serde(default, alias = "stock", alias = "symbol")]
    pub stock_code: Option<String>,
    #[serde(flatten)]
    pub fields: serde_json::Map<String, Value>,
}

impl AnalysisBundle {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

/// Company identity, shareholders and management, as the service returns them.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(transparent)]
pub struct CompanyProfile(pub Value);

impl CompanyProfile {
    /// The profile body, unwrapping a `data` envelope when there is one.
    pub fn body(&self) -> &Value {
        self.0.get("data").unwrap_or(&self.0)
    }

    pub fn company_name(&self) -> Option<&str> {
        let body = self.body();
        ["company_name", "name"]
            .iter()
            .find_map(|k| body.get(*k).and_then(Value::as_str))
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct AccumulationStocks {
    #[serde(default)]
    pub stocks: Vec<AccumulatedStock>,
}

/// Headline numbers for the accumulation page.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AccumulationSummary {
    pub total_brokers: usize,
    pub total_stocks: Option<usize>,
    pub total_accumulating: Option<usize>,
    pub total_distributing: Option<usize>,
    /// ISO-8601 timestamp of the last detection run.
    pub last_updated: Option<String>,
}

/// Master-data domains that can be reloaded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ReloadDomain {
    Technical,
    Fundamental,
}

impl ReloadDomain {
    pub fn path_segment(self) -> &'static str {
        match self {
            ReloadDomain::Technical => "technical",
            ReloadDomain::Fundamental => "fundamental",
        }
    }
}

impl fmt::Display for ReloadDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_segment())
    }
}

impl std::str::FromStr for ReloadDomain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "technical" | "tech" => Ok(ReloadDomain::Technical),
            "fundamental" | "fund" => Ok(ReloadDomain::Fundamental),
            other => Err(format!("unknown reload domain: {other}")),
        }
    }
}

/// Acknowledgement of a reload trigger.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ReloadStarted {
    pub estimated_time_minutes: Option<f64>,
    pub message: Option<String>,
}

/// Progress of one domain's reload job.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DomainProgress {
    pub is_running: bool,
    pub current: u64,
    pub total: u64,
    pub successful: u64,
    pub failed: u64,
    pub status: Option<String>,
}

impl DomainProgress {
    /// Completion in percent; zero until the total is known.
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.current as f64 / self.total as f64 * 100.0
        }
    }
}

/// Reload progress for every domain.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ReloadProgress {
    pub technical: DomainProgress,
    pub fundamental: DomainProgress,
}

impl ReloadProgress {
    /// The poll's terminal condition is `!any_running()`.
    pub fn any_running(&self) -> bool {
        self.technical.is_running || self.fundamental.is_running
    }

    pub fn domain(&self, domain: ReloadDomain) -> &DomainProgress {
        match domain {
            ReloadDomain::Technical => &self.technical,
            ReloadDomain::Fundamental => &self.fundamental,
        }
    }
}

/// Cache state of one master-data domain.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DomainStats {
    pub total_stocks: u64,
    pub is_stale: bool,
    /// Human-readable age as reported by the service.
    pub age: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MasterDataStats {
    pub technical: DomainStats,
    pub fundamental: DomainStats,
}

/// Filters for the news endpoints.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewsQuery {
    pub limit: u32,
    /// Instrument type, e.g. `forex` or `commodity`.
    pub kind: String,
}

impl Default for NewsQuery {
    fn default() -> Self {
        Self {
            limit: 20,
            kind: "forex".to_string(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Provider {
    pub name: String,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RelatedSymbol {
    pub symbol: String,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct NewsSentiment {
    pub label: String,
    pub score: f64,
    pub confidence: f64,
}

/// A forex/commodity headline.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct NewsItem {
    /// String or numeric, depending on the provider.
    pub id: Option<Value>,
    pub title: String,
    /// Unix seconds.
    pub published: i64,
    pub short_description: Option<String>,
    pub urgency: Option<i64>,
    pub importance_score: Option<f64>,
    pub link: Option<String>,
    pub provider: Option<Provider>,
    #[serde(alias = "relatedSymbols")]
    pub related_symbols: Vec<RelatedSymbol>,
    pub sentiment: Option<NewsSentiment>,
}

impl NewsItem {
    pub fn symbols(&self) -> Vec<&str> {
        self.related_symbols.iter().map(|s| s.symbol.as_str()).collect()
    }

    /// First related symbol without its exchange prefix (`FX:EURUSD` → `EURUSD`).
    pub fn display_symbol(&self) -> Option<&str> {
        let first = self.related_symbols.first()?;
        first.symbol.split(':').nth(1)
    }

    pub fn instrument(&self) -> InstrumentKind {
        InstrumentKind::classify(&self.symbols())
    }

    pub fn urgency(&self) -> Option<Urgency> {
        Urgency::from_level(self.urgency)
    }

    pub fn sentiment_label(&self) -> Sentiment {
        self.sentiment
            .as_ref()
            .map(|s| Sentiment::from(s.label.as_str()))
            .unwrap_or_default()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SentimentBreakdown {
    pub bullish: u32,
    pub bearish: u32,
    pub neutral: u32,
}

/// Aggregate sentiment over the analysed headlines.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MarketSentiment {
    pub overall_sentiment: Option<String>,
    pub weighted_score: f64,
    pub news_count: u32,
    pub breakdown: SentimentBreakdown,
}

impl MarketSentiment {
    pub fn sentiment(&self) -> Sentiment {
        self.overall_sentiment
            .as_deref()
            .map(Sentiment::from)
            .unwrap_or_default()
    }
}

/// A scored headline in the sentiment report.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ScoredNews {
    pub title: Option<String>,
    pub sentiment: Option<String>,
    pub sentiment_score: f64,
    pub sentiment_confidence: f64,
    pub importance_score: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SentimentReport {
    pub market_sentiment: MarketSentiment,
    pub top_news: Vec<ScoredNews>,
}
