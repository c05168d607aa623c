//! Blocking HTTP transport.

use std::time::Duration;

use bandarscope::{AccumulatedStock, StockCode};
use log::debug;
use reqwest::blocking::{Client, RequestBuilder, Response, multipart};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;
use crate::routes::{self, Namespace};
use crate::types::*;
use crate::AnalysisApi;

/// Used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Blocking client for the analysis service.
pub struct HttpApi {
    client: Client,
    base_url: String,
    namespace: Namespace,
}

impl HttpApi {
    /// Client against `base_url` (trailing slashes are dropped), root namespace.
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            namespace: Namespace::Root,
        }
    }

    /// Set the route namespace for the analyze/import family.
    pub fn with_namespace(mut self, namespace: Namespace) -> Self {
        self.namespace = namespace;
        self
    }

    /// Per-request timeout, replacing the blocking client default of 30 s.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, ApiError> {
        self.client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Transport(format!("failed to build client: {e}")))?;
        Ok(self)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn namespace(&self) -> Namespace {
        self.namespace
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn send(&self, req: RequestBuilder, what: &str, fallback: &str) -> Result<Response, ApiError> {
        let resp = req
            .send()
            .map_err(|e| ApiError::Transport(format!("{what} request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().unwrap_or_default();
            debug!("{what} returned {status}: {body}");
            return Err(ApiError::from_body(status, &body, fallback));
        }
        Ok(resp)
    }

    fn decode<T: DeserializeOwned>(resp: Response, what: &str) -> Result<T, ApiError> {
        resp.json::<T>()
            .map_err(|e| ApiError::Decode(format!("failed to parse {what}: {e}")))
    }

    fn get<T: DeserializeOwned>(&self, path: &str, fallback: &str) -> Result<T, ApiError> {
        debug!("GET {path}");
        let resp = self.send(self.client.get(self.url(path)), path, fallback)?;
        Self::decode(resp, path)
    }

    fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        fallback: &str,
    ) -> Result<T, ApiError> {
        debug!("POST {path}");
        let resp = self.send(self.client.post(self.url(path)).json(body), path, fallback)?;
        Self::decode(resp, path)
    }
}

impl AnalysisApi for HttpApi {
    fn analyze(&self, payload: &Value) -> Result<AnalyzeData, ApiError> {
        let env: Envelope<AnalyzeData> = self.post(
            &routes::analyze(self.namespace),
            payload,
            "Failed to analyze data",
        )?;
        Ok(env.data)
    }

    fn analyze_file(&self, file_name: &str, contents: Vec<u8>) -> Result<AnalyzeData, ApiError> {
        let path = routes::analyze(Namespace::Stock);
        debug!("POST {path} (multipart {file_name}, {} bytes)", contents.len());
        let part = multipart::Part::bytes(contents)
            .file_name(file_name.to_string())
            .mime_str("application/json")
            .map_err(|e| ApiError::Transport(format!("invalid upload part: {e}")))?;
        let form = multipart::Form::new().part("file", part);
        let resp = self.send(
            self.client.post(self.url(&path)).multipart(form),
            &path,
            "Failed to upload file",
        )?;
        let env: Envelope<AnalyzeData> = Self::decode(resp, &path)?;
        Ok(env.data)
    }

    fn analyze_stock(
        &self,
        kind: AnalysisKind,
        code: &StockCode,
    ) -> Result<Vec<AnalysisBundle>, ApiError> {
        let body = StocksRequest {
            stocks: vec![code.as_str()],
        };
        let env: Envelope<Vec<AnalysisBundle>> = self.post(
            &routes::analyze_stock(self.namespace, kind),
            &body,
            kind.fallback_error(),
        )?;
        Ok(env.data)
    }

    fn company_profile(&self, code: &StockCode) -> Result<CompanyProfile, ApiError> {
        self.get(
            &routes::company_profile(code.as_str()),
            "Failed to load company profile",
        )
    }

    fn import_recent_data(&self, payload: &Value) -> Result<Value, ApiError> {
        self.post(
            &routes::import_recent_data(self.namespace),
            payload,
            "Failed to import data",
        )
    }

    fn accumulation_stocks(&self) -> Result<Vec<AccumulatedStock>, ApiError> {
        let resp: AccumulationStocks = self.get(
            routes::ACCUMULATION_STOCKS,
            "Failed to load accumulation stocks",
        )?;
        Ok(resp.stocks)
    }

    fn accumulation_summary(&self) -> Result<AccumulationSummary, ApiError> {
        let env: Envelope<AccumulationSummary> = self.get(
            routes::ACCUMULATION_SUMMARY,
            "Failed to load accumulation summary",
        )?;
        Ok(env.data)
    }

    fn reload(&self, domain: ReloadDomain) -> Result<ReloadStarted, ApiError> {
        let fallback = format!("Failed to start {domain} reload");
        let env: Envelope<ReloadStarted> =
            self.post(&routes::reload(domain), &serde_json::json!({}), &fallback)?;
        Ok(env.data)
    }

    fn reload_progress(&self) -> Result<ReloadProgress, ApiError> {
        let env: Envelope<ReloadProgress> =
            self.get(routes::RELOAD_PROGRESS, "Failed to load reload progress")?;
        Ok(env.data)
    }

    fn master_data_stats(&self) -> Result<MasterDataStats, ApiError> {
        let env: Envelope<MasterDataStats> =
            self.get(routes::MASTER_DATA_STATS, "Failed to load master data stats")?;
        Ok(env.data)
    }

    fn news(&self, symbol: &str, query: &NewsQuery) -> Result<Vec<NewsItem>, ApiError> {
        let path = routes::news(symbol);
        debug!("GET {path} limit={} type={}", query.limit, query.kind);
        let req = self
            .client
            .get(self.url(&path))
            .query(&[("limit", query.limit.to_string()), ("type", query.kind.clone())]);
        let resp = self.send(req, &path, "Failed to load news")?;
        let env: Envelope<Option<Vec<NewsItem>>> = Self::decode(resp, &path)?;
        Ok(env.data.unwrap_or_default())
    }

    fn news_sentiment(&self, symbol: &str, query: &NewsQuery) -> Result<SentimentReport, ApiError> {
        let path = routes::news_sentiment(symbol);
        debug!("GET {path} limit={} type={}", query.limit, query.kind);
        let req = self
            .client
            .get(self.url(&path))
            .query(&[("limit", query.limit.to_string()), ("type", query.kind.clone())]);
        let resp = self.send(req, &path, "Failed to load sentiment")?;
        Self::decode(resp, &path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_normalized() {
        let api = HttpApi::new("http://localhost:8000/");
        assert_eq!(api.base_url(), "http://localhost:8000");
        assert_eq!(api.url("/v1/analyze"), "http://localhost:8000/v1/analyze");
        assert_eq!(api.namespace(), Namespace::Root);
    }

    #[test]
    fn namespace_builder() {
        let api = HttpApi::new(DEFAULT_BASE_URL).with_namespace(Namespace::Stock);
        assert_eq!(api.namespace(), Namespace::Stock);
    }

    #[test]
    fn unreachable_host_is_transport_error() {
        // port 9 (discard) on localhost is not expected to accept HTTP
        let api = HttpApi::new("http://127.0.0.1:9")
            .with_timeout(Duration::from_millis(500))
            .unwrap();
        let err = api.master_data_stats().unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)), "got {err:?}");
    }
}
