//! Free-text inputs: stock codes and file sizes.

use std::fmt;

use crate::error::ValidationError;

/// Shortest and longest accepted stock code, after trimming.
pub const STOCK_CODE_LEN: std::ops::RangeInclusive<usize> = 2..=10;

/// A validated, upper-cased IDX ticker (e.g. `BBCA`, `GOTO-W`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct StockCode(String);

impl StockCode {
    /// Trim, upper-case, then check length and charset (`A-Z`, `0-9`, `-`).
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let code = input.trim().to_uppercase();
        if code.is_empty() {
            return Err(ValidationError::EmptyStockCode);
        }
        if !STOCK_CODE_LEN.contains(&code.chars().count()) {
            return Err(ValidationError::StockCodeLength);
        }
        if !code
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(ValidationError::StockCodeCharset);
        }
        Ok(Self(code))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StockCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for StockCode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for StockCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Parse a comma- or whitespace-separated list of codes, stopping at the first bad one.
pub fn parse_stock_codes(input: &str) -> Result<Vec<StockCode>, ValidationError> {
    let codes: Vec<StockCode> = input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(StockCode::parse)
        .collect::<Result<_, _>>()?;
    if codes.is_empty() {
        return Err(ValidationError::EmptyStockCode);
    }
    Ok(codes)
}

/// Human-readable size: `512 B`, `1.50 KB`, `2.00 MB`.
pub fn format_file_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * 1024;
    if bytes < KB {
        format!("{bytes} B")
    } else if bytes < MB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    }
}
