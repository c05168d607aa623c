//! Mock analysis service for testing. Implements [`AnalysisApi`] with canned responses.
//!
//! Use this in tests and demos to exercise callers without a running service.
//!
//! ```
//! use bandarscope::StockPosition;
//! use bandarscope_client::mock::MockApi;
//! use bandarscope_client::{AnalysisApi, ReloadProgress};
//!
//! let api = MockApi::builder()
//!     .with_positions("YP", vec![StockPosition::new("BBCA", 5e9)])
//!     .with_progress(ReloadProgress::default())
//!     .build();
//!
//! let data = api.analyze(&serde_json::json!({})).unwrap();
//! assert_eq!(data.total_entries(), 1);
//! assert_eq!(api.calls(), vec!["analyze"]);
//! ```

use std::collections::VecDeque;
use std::sync::Mutex;

use bandarscope::{AccumulatedStock, BrokerInfo, BrokerSummary, StockCode, StockPosition};
use serde_json::Value;

use crate::AnalysisApi;
use crate::error::ApiError;
use crate::types::*;

/// One scripted answer to `reload_progress`.
#[derive(Clone, Debug)]
pub enum ProgressStep {
    Progress(ReloadProgress),
    /// The tick fails with a transport error carrying this message.
    Fail(String),
}

/// Builder for [`MockApi`].
pub struct MockApiBuilder {
    summaries: Vec<BrokerSummary>,
    bundles: Vec<(AnalysisKind, AnalysisBundle)>,
    profile: Value,
    accumulation: Vec<AccumulatedStock>,
    accumulation_summary: AccumulationSummary,
    progress: VecDeque<ProgressStep>,
    stats: MasterDataStats,
    news: Vec<NewsItem>,
    sentiment: SentimentReport,
    failure: Option<(u16, String)>,
}

impl MockApiBuilder {
    /// Add one broker's summary to the analyze response.
    pub fn with_positions(mut self, broker_code: &str, stocks: Vec<StockPosition>) -> Self {
        self.summaries.push(BrokerSummary {
            broker_info: Some(BrokerInfo {
                broker_code: broker_code.to_string(),
                ..Default::default()
            }),
            total_stocks: stocks.len(),
            stocks,
            summary: None,
        });
        self
    }

    pub fn with_summary(mut self, summary: BrokerSummary) -> Self {
        self.summaries.push(summary);
        self
    }

    pub fn with_bundle(mut self, kind: AnalysisKind, bundle: AnalysisBundle) -> Self {
        self.bundles.push((kind, bundle));
        self
    }

    pub fn with_profile(mut self, profile: Value) -> Self {
        self.profile = profile;
        self
    }

    pub fn with_accumulation(mut self, stocks: Vec<AccumulatedStock>) -> Self {
        self.accumulation = stocks;
        self
    }

    pub fn with_accumulation_summary(mut self, summary: AccumulationSummary) -> Self {
        self.accumulation_summary = summary;
        self
    }

    /// Queue a progress response. Once the queue is empty, nothing is running.
    pub fn with_progress(mut self, progress: ReloadProgress) -> Self {
        self.progress.push_back(ProgressStep::Progress(progress));
        self
    }

    /// Queue a failed progress tick.
    pub fn with_progress_failure(mut self, message: &str) -> Self {
        self.progress.push_back(ProgressStep::Fail(message.to_string()));
        self
    }

    pub fn with_stats(mut self, stats: MasterDataStats) -> Self {
        self.stats = stats;
        self
    }

    pub fn with_news(mut self, news: Vec<NewsItem>) -> Self {
        self.news = news;
        self
    }

    pub fn with_sentiment(mut self, report: SentimentReport) -> Self {
        self.sentiment = report;
        self
    }

    /// Every call fails with this status and detail.
    pub fn failing(mut self, status: u16, detail: &str) -> Self {
        self.failure = Some((status, detail.to_string()));
        self
    }

    pub fn build(self) -> MockApi {
        MockApi {
            summaries: self.summaries,
            bundles: self.bundles,
            profile: self.profile,
            accumulation: self.accumulation,
            accumulation_summary: self.accumulation_summary,
            progress: Mutex::new(self.progress),
            stats: self.stats,
            news: self.news,
            sentiment: self.sentiment,
            failure: self.failure,
            calls: Mutex::new(Vec::new()),
        }
    }
}

/// A mock service that records calls and returns configured responses.
pub struct MockApi {
    summaries: Vec<BrokerSummary>,
    bundles: Vec<(AnalysisKind, AnalysisBundle)>,
    profile: Value,
    accumulation: Vec<AccumulatedStock>,
    accumulation_summary: AccumulationSummary,
    progress: Mutex<VecDeque<ProgressStep>>,
    stats: MasterDataStats,
    news: Vec<NewsItem>,
    sentiment: SentimentReport,
    failure: Option<(u16, String)>,
    calls: Mutex<Vec<String>>,
}

impl MockApi {
    pub fn builder() -> MockApiBuilder {
        MockApiBuilder {
            summaries: Vec::new(),
            bundles: Vec::new(),
            profile: Value::Null,
            accumulation: Vec::new(),
            accumulation_summary: AccumulationSummary::default(),
            progress: VecDeque::new(),
            stats: MasterDataStats::default(),
            news: Vec::new(),
            sentiment: SentimentReport::default(),
            failure: None,
        }
    }

    /// Names of the operations called so far, in order (for assertion in tests).
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Count of calls to one operation.
    pub fn call_count(&self, name: &str) -> usize {
        self.calls().iter().filter(|c| c.as_str() == name).count()
    }

    fn record(&self, name: &str) -> Result<(), ApiError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(name.to_string());
        }
        match &self.failure {
            Some((status, detail)) => Err(ApiError::Status {
                status: *status,
                detail: detail.clone(),
            }),
            None => Ok(()),
        }
    }

    fn analyze_data(&self) -> AnalyzeData {
        match self.summaries.as_slice() {
            [single] => AnalyzeData::Single(single.clone()),
            many => AnalyzeData::Batch {
                broker_summaries: many.to_vec(),
                total_entries: many.iter().map(|s| s.stocks.len()).sum(),
            },
        }
    }
}

impl AnalysisApi for MockApi {
    fn analyze(&self, _payload: &Value) -> Result<AnalyzeData, ApiError> {
        self.record("analyze")?;
        Ok(self.analyze_data())
    }

    fn analyze_file(&self, _file_name: &str, _contents: Vec<u8>) -> Result<AnalyzeData, ApiError> {
        self.record("analyze_file")?;
        Ok(self.analyze_data())
    }

    fn analyze_stock(
        &self,
        kind: AnalysisKind,
        code: &StockCode,
    ) -> Result<Vec<AnalysisBundle>, ApiError> {
        self.record(&format!("analyze_{kind}"))?;
        Ok(self
            .bundles
            .iter()
            .filter(|(k, b)| {
                *k == kind && b.stock_code.as_deref().is_none_or(|c| c == code.as_str())
            })
            .map(|(_, b)| b.clone())
            .collect())
    }

    fn company_profile(&self, _code: &StockCode) -> Result<CompanyProfile, ApiError> {
        self.record("company_profile")?;
        Ok(CompanyProfile(self.profile.clone()))
    }

    fn import_recent_data(&self, payload: &Value) -> Result<Value, ApiError> {
        self.record("import_recent_data")?;
        let entries = payload.as_array().map_or(1, Vec::len);
        Ok(serde_json::json!({ "status": "success", "imported": entries }))
    }

    fn accumulation_stocks(&self) -> Result<Vec<AccumulatedStock>, ApiError> {
        self.record("accumulation_stocks")?;
        Ok(self.accumulation.clone())
    }

    fn accumulation_summary(&self) -> Result<AccumulationSummary, ApiError> {
        self.record("accumulation_summary")?;
        Ok(self.accumulation_summary.clone())
    }

    fn reload(&self, domain: ReloadDomain) -> Result<ReloadStarted, ApiError> {
        self.record(&format!("reload_{domain}"))?;
        Ok(ReloadStarted {
            estimated_time_minutes: Some(15.0),
            message: None,
        })
    }

    fn reload_progress(&self) -> Result<ReloadProgress, ApiError> {
        self.record("reload_progress")?;
        let step = self
            .progress
            .lock()
            .ok()
            .and_then(|mut queue| queue.pop_front());
        match step {
            Some(ProgressStep::Progress(p)) => Ok(p),
            Some(ProgressStep::Fail(msg)) => Err(ApiError::Transport(msg)),
            None => Ok(ReloadProgress::default()),
        }
    }

    fn master_data_stats(&self) -> Result<MasterDataStats, ApiError> {
        self.record("master_data_stats")?;
        Ok(self.stats.clone())
    }

    fn news(&self, _symbol: &str, query: &NewsQuery) -> Result<Vec<NewsItem>, ApiError> {
        self.record("news")?;
        Ok(self.news.iter().take(query.limit as usize).cloned().collect())
    }

    fn news_sentiment(&self, _symbol: &str, _query: &NewsQuery) -> Result<SentimentReport, ApiError> {
        self.record("news_sentiment")?;
        Ok(self.sentiment.clone())
    }
}
