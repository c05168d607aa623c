//! TOML configuration loading and validation.
//!
//! Every key has a default, so a missing `bandar.toml` is fine. The API base
//! URL can be overridden with `BANDAR_API_URL`.

use std::path::Path;
use std::time::Duration;

use bandarscope::table::ROWS_PER_PAGE_OPTIONS;
use bandarscope_client::{Namespace, NewsQuery};
use serde::Deserialize;

use crate::error::{Error, Result};

/// Environment variable overriding `api.base_url`.
pub const API_URL_ENV: &str = "BANDAR_API_URL";

/// Config file looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "bandar.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub table: TableConfig,
    pub poll: PollConfig,
    pub news: NewsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// `root` or `stock`.
    #[serde(default = "default_namespace")]
    pub namespace: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            namespace: default_namespace(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8000".into()
}
fn default_namespace() -> String {
    "root".into()
}
fn default_timeout() -> u64 {
    120
}

#[derive(Debug, Clone, Deserialize)]
pub struct TableConfig {
    #[serde(default = "default_rows_per_page")]
    pub rows_per_page: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            rows_per_page: default_rows_per_page(),
        }
    }
}

fn default_rows_per_page() -> usize {
    10
}

#[derive(Debug, Clone, Deserialize)]
pub struct PollConfig {
    #[serde(default = "default_interval")]
    pub interval_ms: u64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval(),
        }
    }
}

fn default_interval() -> u64 {
    2000
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewsConfig {
    #[serde(default = "default_news_limit")]
    pub limit: u32,
    #[serde(rename = "type", default = "default_news_type")]
    pub kind: String,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            limit: default_news_limit(),
            kind: default_news_type(),
        }
    }
}

fn default_news_limit() -> u32 {
    20
}
fn default_news_type() -> String {
    "forex".into()
}

impl Config {
    /// Load config from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::ConfigRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if given (it must exist), else `bandar.toml` if present, else defaults.
    /// Environment overrides are applied last.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::load(p)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::load(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        config.apply_env(std::env::var(API_URL_ENV).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply the base-URL override, ignoring blank values.
    pub fn apply_env(&mut self, api_url: Option<String>) {
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            self.api.base_url = url.trim().to_string();
        }
    }

    /// Validate config invariants.
    pub fn validate(&self) -> Result<()> {
        let url = &self.api.base_url;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(Error::Config(format!(
                "api.base_url must start with http:// or https:// (got {url:?})"
            )));
        }
        self.namespace()?;
        if !ROWS_PER_PAGE_OPTIONS.contains(&self.table.rows_per_page) {
            return Err(Error::Config(format!(
                "table.rows_per_page must be one of {ROWS_PER_PAGE_OPTIONS:?}"
            )));
        }
        if self.poll.interval_ms == 0 {
            return Err(Error::Config("poll.interval_ms must be > 0".into()));
        }
        if self.news.limit == 0 {
            return Err(Error::Config("news.limit must be > 0".into()));
        }
        Ok(())
    }

    pub fn namespace(&self) -> Result<Namespace> {
        self.api.namespace.parse().map_err(Error::Config)
    }

    /// Request timeout; zero disables it.
    pub fn timeout(&self) -> Option<Duration> {
        (self.api.timeout_secs > 0).then(|| Duration::from_secs(self.api.timeout_secs))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll.interval_ms)
    }

    pub fn news_query(&self) -> NewsQuery {
        NewsQuery {
            limit: self.news.limit,
            kind: self.news.kind.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example_toml() -> &'static str {
        r#"
[api]
base_url = "https://bandar.example.com"
namespace = "stock"
timeout_secs = 30

[table]
rows_per_page = 20

[poll]
interval_ms = 500

[news]
limit = 50
type = "commodity"
"#
    }

    #[test]
    fn parse_example_config() {
        let config: Config = toml::from_str(example_toml()).unwrap();
        assert_eq!(config.api.base_url, "https://bandar.example.com");
        assert_eq!(config.namespace().unwrap(), Namespace::Stock);
        assert_eq!(config.table.rows_per_page, 20);
        assert_eq!(config.poll_interval(), Duration::from_millis(500));
        assert_eq!(config.news_query().kind, "commodity");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_file_gives_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.api.base_url, "http://localhost:8000");
        assert_eq!(config.namespace().unwrap(), Namespace::Root);
        assert_eq!(config.table.rows_per_page, 10);
        assert_eq!(config.poll.interval_ms, 2000);
        assert_eq!(config.news.limit, 20);
        assert_eq!(config.timeout(), Some(Duration::from_secs(120)));
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let config: Config = toml::from_str("[api]\nnamespace = \"stock\"\n").unwrap();
        assert_eq!(config.api.base_url, "http://localhost:8000");
        assert_eq!(config.api.timeout_secs, 120);
    }

    #[test]
    fn env_override_wins() {
        let mut config = Config::default();
        config.apply_env(Some("http://10.0.0.5:9000".into()));
        assert_eq!(config.api.base_url, "http://10.0.0.5:9000");
        config.apply_env(Some("   ".into()));
        assert_eq!(config.api.base_url, "http://10.0.0.5:9000");
        config.apply_env(None);
        assert_eq!(config.api.base_url, "http://10.0.0.5:9000");
    }

    #[test]
    fn validate_catches_bad_rows_per_page() {
        let mut config = Config::default();
        config.table.rows_per_page = 25;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_catches_bad_namespace() {
        let mut config = Config::default();
        config.api.namespace = "legacy".into();
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn validate_catches_bad_url_and_interval() {
        let mut config = Config::default();
        config.api.base_url = "localhost:8000".into();
        assert!(config.validate().is_err());
        let mut config = Config::default();
        config.poll.interval_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_timeout_disables() {
        let mut config = Config::default();
        config.api.timeout_secs = 0;
        assert_eq!(config.timeout(), None);
    }
}
