// In crates/engine/src/trade.rs

use api_client::{CompletionProvider, CompletionRequest, MarketData};
use app_config::{OpenAiSettings, PolygonSettings, PromptSettings};
use chrono::{Days, NaiveDate, Utc};
use core_types::{Action, Error, Result, Ticker, TradePlan, TrendResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::parse::parse_trade_plan;
use crate::prompts;

/// Size of one aggregate bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timespan {
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

impl Timespan {
    pub fn as_str(&self) -> &'static str {
        match self {
            Timespan::Minute => "minute",
            Timespan::Hour => "hour",
            Timespan::Day => "day",
            Timespan::Week => "week",
            Timespan::Month => "month",
            Timespan::Quarter => "quarter",
            Timespan::Year => "year",
        }
    }
}

impl fmt::Display for Timespan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A trade that someone made, to be announced in a tweet.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeDescription {
    pub ticker: Ticker,
    pub price: f64,
    pub operation: Action,
    pub papers: u64,
}

/// Market-data driven services for a single ticker.
pub struct TradeAnalyst {
    market: Arc<dyn MarketData>,
    completions: Arc<dyn CompletionProvider>,
    sma_window: u32,
    sma_limit: u32,
    history_days: u32,
    fast_model: String,
    temperature: f32,
    max_tokens: u32,
    prompts: PromptSettings,
}

impl TradeAnalyst {
    pub fn new(
        market: Arc<dyn MarketData>,
        completions: Arc<dyn CompletionProvider>,
        polygon: &PolygonSettings,
        openai: &OpenAiSettings,
        prompts: PromptSettings,
    ) -> Self {
        Self {
            market,
            completions,
            sma_window: polygon.sma_window,
            sma_limit: polygon.sma_limit,
            history_days: polygon.history_days,
            fast_model: openai.fast_model.clone(),
            temperature: openai.temperature,
            max_tokens: openai.max_tokens,
            prompts,
        }
    }

    /// Classifies the direction of the ticker's daily moving average.
    pub async fn analyze_trend(&self, ticker: &Ticker) -> Result<TrendResult> {
        let values = self
            .market
            .moving_average_series(ticker, self.sma_window, self.sma_limit)
            .await
            .map_err(|e| {
                tracing::error!(%ticker, error = %e, "Failed to fetch moving average.");
                e.into_upstream("polygon")
            })?;

        let result = analytics::classify_trend(&values)?;
        tracing::info!(%ticker, trend = ?result.trend, slope = result.slope, "Trend classified.");
        Ok(result)
    }

    /// Suggests entry, stop-loss and take-profit levels from recent bars.
    pub async fn trade_plan(
        &self,
        ticker: &Ticker,
        count: u32,
        timespan: Timespan,
    ) -> Result<TradePlan> {
        self.trade_plan_on(ticker, count, timespan, Utc::now().date_naive())
            .await
    }

    /// [`Self::trade_plan`] with the history window ending at `today`.
    pub async fn trade_plan_on(
        &self,
        ticker: &Ticker,
        count: u32,
        timespan: Timespan,
        today: NaiveDate,
    ) -> Result<TradePlan> {
        if count == 0 {
            return Err(Error::validation("count must be at least 1"));
        }
        let from = today
            .checked_sub_days(Days::new(u64::from(self.history_days)))
            .ok_or_else(|| Error::validation("history window starts before the calendar does"))?;

        let history = self
            .market
            .aggregates(ticker, timespan.as_str(), from, today)
            .await
            .map_err(|e| {
                tracing::error!(%ticker, error = %e, "Failed to fetch aggregates.");
                e.into_upstream("polygon")
            })?;

        let request = CompletionRequest {
            model: self.fast_model.clone(),
            system: self.prompts.trade_plan.clone(),
            user: prompts::trade_plan_prompt(count, timespan, &history),
            temperature: self.temperature,
            max_tokens: Some(self.max_tokens),
        };
        let content = self.complete(&request).await?;
        tracing::debug!(%ticker, %content, "Trade plan answer.");

        parse_trade_plan(&content, ticker)
    }

    /// Writes a short social-media post announcing a trade.
    pub async fn tweet(&self, trade: &TradeDescription) -> Result<String> {
        if !trade.price.is_finite() || trade.price <= 0.0 {
            return Err(Error::validation(format!("'{}' is not a valid price", trade.price)));
        }
        let request = CompletionRequest {
            model: self.fast_model.clone(),
            system: self.prompts.tweet.clone(),
            user: prompts::tweet_prompt(trade),
            temperature: self.temperature,
            max_tokens: Some(self.max_tokens),
        };
        let content = self.complete(&request).await?;
        Ok(content.trim().to_string())
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        self.completions.complete(request).await.map_err(|e| {
            tracing::error!(error = %e, "Completion request failed.");
            e.into_upstream("openai")
        })
    }
}
