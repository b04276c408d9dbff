// In crates/core-types/src/types.rs

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;

use crate::lenient;
use crate::{Error, Result};

/// A wall street ticker symbol (e.g., "SPY").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ticker(pub String);

impl Ticker {
    pub fn new(symbol: impl Into<String>) -> Self {
        Ticker(symbol.into())
    }

    /// Validates a ticker coming from a client or a model response.
    ///
    /// Accepts letters, digits and `.`, `-`, `:` (e.g. `BRK.B`, `X:BTCUSD`),
    /// starting with a letter or digit, at most 16 characters after trimming.
    pub fn parse(raw: &str) -> Result<Self> {
        let symbol = raw.trim();
        if symbol.is_empty() {
            return Err(Error::validation("ticker is required"));
        }
        if symbol.len() > 16
            || !symbol.starts_with(|c: char| c.is_ascii_alphanumeric())
            || !symbol
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | ':'))
        {
            return Err(Error::validation(format!("'{}' is not a valid ticker", symbol)));
        }
        Ok(Ticker(symbol.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Ticker {
    fn from(symbol: &str) -> Self {
        Ticker(symbol.to_string())
    }
}

impl Borrow<str> for Ticker {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// --- Trend ---

/// The direction of a fitted moving-average line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trend {
    Declining,
    Parallel,
    Incline,
}

/// The outcome of classifying a moving-average series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendResult {
    pub trend: Trend,
    pub slope: f64,
    pub values: Vec<f64>,
}

// --- Portfolio ---

/// A single position in the client's current portfolio.
///
/// Only `currentValue`, `currentPrice` and `position` take part in any
/// arithmetic. Whatever else the client sends along (`avgBuy`, `unrealizedPL`,
/// ...) is kept in `extra` so it can be echoed back into prompts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticker: Option<Ticker>,
    #[serde(deserialize_with = "lenient::number")]
    pub current_value: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub current_price: f64,
    #[serde(deserialize_with = "lenient::whole_number")]
    pub position: u64,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl HoldingRecord {
    pub fn new(current_value: f64, current_price: f64, position: u64) -> Self {
        Self {
            ticker: None,
            current_value,
            current_price,
            position,
            extra: serde_json::Map::new(),
        }
    }
}

/// The client's holdings keyed by ticker. Ordered so that anything rendered
/// from it (prompts, logs) is deterministic.
pub type Holdings = BTreeMap<Ticker, HoldingRecord>;

/// One row of a target allocation as produced by the recommendation model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetAllocation {
    pub ticker: Ticker,
    #[serde(deserialize_with = "lenient::number")]
    pub percentage: f64,
}

/// The allocation recommendation returned by the language model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationRecommendation {
    pub analysis: String,
    pub portfolio: Vec<TargetAllocation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Buy,
    Sell,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Buy => f.write_str("buy"),
            Action::Sell => f.write_str("sell"),
        }
    }
}

/// What to do with one ticker of the target allocation.
///
/// `action` is absent and `current_price` is `null` when no price could be
/// found for a ticker the client does not hold yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationEntry {
    pub ticker: Ticker,
    pub desired_percentage: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<Action>,
    pub papers: u64,
    pub current_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_percentage: Option<f64>,
}

/// The response of the portfolio manipulation pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RebalanceRecommendation {
    pub analysis: String,
    pub portfolio: Vec<RecommendationEntry>,
}

// --- Risk ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiversificationStrategy {
    pub strategy: String,
    #[serde(default)]
    pub details: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RiskAssessment {
    #[serde(default)]
    pub assessment: String,
    #[serde(default)]
    pub diversify: Vec<DiversificationStrategy>,
}

// --- Trade ---

/// Entry, stop-loss and take-profit levels suggested for a ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradePlan {
    pub buy: f64,
    pub stop: f64,
    pub profit: f64,
    pub ticker: Ticker,
}
