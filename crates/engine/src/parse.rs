// In crates/engine/src/parse.rs

use core_types::{Error, Result, Ticker, TradePlan};
use regex::Regex;
use serde::de::DeserializeOwned;
use std::sync::LazyLock;

static TRADE_PLAN_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*buy:\s*\$?(\d+(?:\.\d+)?)\s*,\s*stop:\s*\$?(\d+(?:\.\d+)?)\s*,\s*profit:\s*\$?(\d+(?:\.\d+)?)",
    )
    .expect("trade plan pattern is valid")
});

/// Parses a model response that was asked to be bare JSON.
///
/// A surrounding markdown code fence is tolerated. Anything that does not
/// match `T` is a validation error carrying the serde message.
pub fn parse_model_json<T: DeserializeOwned>(content: &str) -> Result<T> {
    serde_json::from_str(strip_code_fence(content)).map_err(|e| {
        Error::validation(format!("model response does not match the expected JSON shape: {}", e))
    })
}

fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    match trimmed.strip_prefix("```") {
        Some(rest) => {
            let rest = rest.strip_prefix("json").unwrap_or(rest);
            rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
        }
        None => trimmed,
    }
}

/// Reads `buy: x, stop: y, profit: z` from the first line of a model answer.
pub fn parse_trade_plan(content: &str, ticker: &Ticker) -> Result<TradePlan> {
    let first_line = content.trim_start().lines().next().unwrap_or_default();

    let caps = TRADE_PLAN_LINE.captures(first_line).ok_or_else(|| {
        Error::validation(format!(
            "could not read trade levels from model answer: '{}'",
            first_line
        ))
    })?;

    let level = |i: usize| -> Result<f64> {
        caps[i]
            .parse::<f64>()
            .map_err(|_| Error::validation(format!("'{}' is not a price", &caps[i])))
    };

    Ok(TradePlan {
        buy: level(1)?,
        stop: level(2)?,
        profit: level(3)?,
        ticker: ticker.clone(),
    })
}
