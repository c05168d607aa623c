//! Client for the bandarmology analysis service.
//!
//! Provides the [`AnalysisApi`] trait covering every endpoint the dashboards
//! use, plus:
//!
//! - **HTTP** (feature `http`): blocking `reqwest` transport ([`http::HttpApi`])
//! - **Mock**: scripted responses for tests ([`mock::MockApi`])
//! - **Polling**: the master-data reload progress poller ([`poll::ReloadPoller`])
//!
//! There is no retry and no caching: each call is one request.

pub mod error;
pub mod mock;
pub mod poll;
pub mod routes;
pub mod types;

#[cfg(feature = "http")]
pub mod http;

pub use error::ApiError;
pub use routes::Namespace;
pub use types::*;

use bandarscope::{AccumulatedStock, StockCode, ValidationError};
use serde_json::Value;

/// Parse pasted text as JSON before it is sent anywhere.
pub fn parse_json_text(text: &str) -> Result<Value, ValidationError> {
    serde_json::from_str(text).map_err(|e| ValidationError::InvalidJson(e.to_string()))
}

/// Every operation the dashboards perform against the analysis service.
pub trait AnalysisApi {
    /// Analyze a broker summary sent as a JSON body.
    fn analyze(&self, payload: &Value) -> Result<AnalyzeData, ApiError>;

    /// Analyze a broker-summary file sent as a multipart upload.
    fn analyze_file(&self, file_name: &str, contents: Vec<u8>) -> Result<AnalyzeData, ApiError>;

    /// Run one analysis family for a single stock.
    fn analyze_stock(
        &self,
        kind: AnalysisKind,
        code: &StockCode,
    ) -> Result<Vec<AnalysisBundle>, ApiError>;

    fn company_profile(&self, code: &StockCode) -> Result<CompanyProfile, ApiError>;

    /// Import the most recent trading data. Returns the service's acknowledgement.
    fn import_recent_data(&self, payload: &Value) -> Result<Value, ApiError>;

    fn accumulation_stocks(&self) -> Result<Vec<AccumulatedStock>, ApiError>;

    fn accumulation_summary(&self) -> Result<AccumulationSummary, ApiError>;

    /// Start a long-running master-data reload.
    fn reload(&self, domain: ReloadDomain) -> Result<ReloadStarted, ApiError>;

    fn reload_progress(&self) -> Result<ReloadProgress, ApiError>;

    fn master_data_stats(&self) -> Result<MasterDataStats, ApiError>;

    fn news(&self, symbol: &str, query: &NewsQuery) -> Result<Vec<NewsItem>, ApiError>;

    fn news_sentiment(&self, symbol: &str, query: &NewsQuery) -> Result<SentimentReport, ApiError>;
}
