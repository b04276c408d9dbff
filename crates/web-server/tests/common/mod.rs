// In crates/web-server/tests/common/mod.rs

#![allow(dead_code)]

use api_client::{CompletionProvider, CompletionRequest, Error, MarketData, PriceSource, Result};
use app_config::{OpenAiSettings, PolygonSettings, PromptSettings};
use async_trait::async_trait;
use axum::Router;
use chrono::NaiveDate;
use core_types::Ticker;
use engine::{PortfolioAdvisor, TradeAnalyst};
use std::collections::HashMap;
use std::sync::Arc;
use web_server::{AppState, create_router};

/// Picks the canned answer by looking at the system prompt, so one mock can
/// serve every route.
pub struct ScriptedCompletions {
    pub allocation: String,
    pub assessment: String,
    pub trade_plan: String,
    pub tweet: String,
    pub down: bool,
}

impl Default for ScriptedCompletions {
    fn default() -> Self {
        Self {
            allocation: r#"{"analysis": "Balanced.", "portfolio": [
                {"ticker": "SPY", "percentage": 50},
                {"ticker": "IBIT", "percentage": 25},
                {"ticker": "NVDA", "percentage": 25}
            ]}"#
            .into(),
            assessment: r#"{"assessment": "Moderate risk.",
                "diversify": [{"strategy": "Add bonds", "details": "BND"}]}"#
                .into(),
            trade_plan: "buy: 100, stop: 95, profit: 110".into(),
            tweet: "Bought 3 $SPY at 500".into(),
            down: false,
        }
    }
}

#[async_trait]
impl CompletionProvider for ScriptedCompletions {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        if self.down {
            return Err(Error::ApiError { status: 503, msg: "overloaded".into() });
        }
        let prompts = PromptSettings::default();
        let answer = if request.system == prompts.assessment {
            &self.assessment
        } else if request.system == prompts.trade_plan {
            &self.trade_plan
        } else if request.system == prompts.tweet {
            &self.tweet
        } else {
            &self.allocation
        };
        Ok(answer.clone())
    }
}

pub struct FixedPrices(pub HashMap<Ticker, f64>);

#[async_trait]
impl PriceSource for FixedPrices {
    async fn lookup_price(&self, ticker: &Ticker) -> Result<Option<f64>> {
        Ok(self.0.get(ticker).copied())
    }
}

pub struct FixedMarket(pub Vec<f64>);

#[async_trait]
impl MarketData for FixedMarket {
    async fn moving_average_series(
        &self,
        _ticker: &Ticker,
        _window: u32,
        _limit: u32,
    ) -> Result<Vec<f64>> {
        Ok(self.0.clone())
    }

    async fn aggregates(
        &self,
        _ticker: &Ticker,
        _timespan: &str,
        _from: NaiveDate,
        _to: NaiveDate,
    ) -> Result<serde_json::Value> {
        Ok(serde_json::json!({ "results": [{ "c": 100.0 }] }))
    }
}

fn openai() -> OpenAiSettings {
    OpenAiSettings {
        api_key: "test".into(),
        base_url: "http://localhost".into(),
        model: "gpt-4o".into(),
        fast_model: "gpt-4o-mini".into(),
        temperature: 0.8,
        max_tokens: 256,
        timeout_secs: 5,
    }
}

fn polygon() -> PolygonSettings {
    PolygonSettings {
        api_key: "test".into(),
        rest_base_url: "http://localhost".into(),
        sma_window: 150,
        sma_limit: 10,
        history_days: 43,
        timeout_secs: 5,
    }
}

pub fn test_app_with(completions: ScriptedCompletions, series: Vec<f64>) -> Router {
    let completions: Arc<dyn CompletionProvider> = Arc::new(completions);
    let prices = FixedPrices([(Ticker::from("IBIT"), 40.0)].into_iter().collect());

    let state = AppState {
        portfolio: Arc::new(PortfolioAdvisor::new(
            completions.clone(),
            Arc::new(prices),
            &openai(),
            PromptSettings::default(),
        )),
        trade: Arc::new(TradeAnalyst::new(
            Arc::new(FixedMarket(series)),
            completions,
            &polygon(),
            &openai(),
            PromptSettings::default(),
        )),
    };

    create_router(state, None)
}

pub fn test_app() -> Router {
    test_app_with(ScriptedCompletions::default(), vec![10.0, 11.0, 12.0, 13.0])
}
