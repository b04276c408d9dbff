// In crates/web-server/src/types.rs

use core_types::{Action, AllocationRecommendation, Ticker};
use engine::Timespan;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Query of `GET /build-portfolio`.
#[derive(Debug, Deserialize)]
pub struct BuildPortfolioParams {
    pub prompt: Option<String>,
}

/// Query of `GET /trade`.
#[derive(Debug, Deserialize)]
pub struct TickerParams {
    pub ticker: Option<String>,
}

/// Query of `GET /trade-plan`.
#[derive(Debug, Deserialize)]
pub struct TradePlanParams {
    pub ticker: Option<String>,
    pub count: Option<u32>,
    pub timespan: Option<Timespan>,
}

/// Query of `GET /tweet`.
#[derive(Debug, Deserialize)]
pub struct TweetParams {
    pub ticker: Option<String>,
    pub price: Option<f64>,
    pub operation: Option<Action>,
    pub papers: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct BuildPortfolioResponse {
    pub recommendation: AllocationRecommendation,
}

#[derive(Debug, Serialize)]
pub struct TweetResponse {
    pub response: String,
}

/// Returns the value of a required query parameter.
pub fn required<T>(value: Option<T>, name: &str) -> Result<T> {
    value.ok_or_else(|| Error::BadRequest(format!("missing query parameter '{}'", name)))
}

pub fn required_ticker(value: Option<String>) -> Result<Ticker> {
    let raw = required(value, "ticker")?;
    Ok(Ticker::parse(&raw)?)
}
