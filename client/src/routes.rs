//! URL paths for each operation.
//!
//! The service exposes the analysis family under two prefixes: the root
//! `/v1/...` routes (JSON bodies) and the older `/v1/stock/...` routes
//! (multipart upload). [`Namespace`] picks one.

use std::fmt;

use crate::types::{AnalysisKind, ReloadDomain};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Namespace {
    #[default]
    Root,
    Stock,
}

impl Namespace {
    fn prefix(self) -> &'static str {
        match self {
            Namespace::Root => "/v1",
            Namespace::Stock => "/v1/stock",
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Namespace::Root => write!(f, "root"),
            Namespace::Stock => write!(f, "stock"),
        }
    }
}

impl std::str::FromStr for Namespace {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "root" | "v1" => Ok(Namespace::Root),
            "stock" => Ok(Namespace::Stock),
            other => Err(format!("unknown route namespace: {other} (expected root or stock)")),
        }
    }
}

pub fn analyze(ns: Namespace) -> String {
    format!("{}/analyze", ns.prefix())
}

pub fn analyze_stock(ns: Namespace, kind: AnalysisKind) -> String {
    format!("{}/analyze/{}", ns.prefix(), kind.path_segment())
}

pub fn import_recent_data(ns: Namespace) -> String {
    format!("{}/import-recent-data", ns.prefix())
}

pub fn company_profile(code: &str) -> String {
    format!("/v1/stock/company-profile/{code}")
}

pub const ACCUMULATION_STOCKS: &str = "/v1/accumulation/stocks";
pub const ACCUMULATION_SUMMARY: &str = "/v1/accumulation/summary";
pub const RELOAD_PROGRESS: &str = "/v1/master-data/reload/progress";
pub const MASTER_DATA_STATS: &str = "/v1/master-data/stats";

pub fn reload(domain: ReloadDomain) -> String {
    format!("/v1/master-data/reload/{}", domain.path_segment())
}

pub fn news(symbol: &str) -> String {
    format!("/v1/{symbol}/get-news")
}

pub fn news_sentiment(symbol: &str) -> String {
    format!("/v1/{symbol}/news-sentiment")
}
