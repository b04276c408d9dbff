// In crates/engine/tests/common/mod.rs

#![allow(dead_code)]

use api_client::{CompletionProvider, CompletionRequest, Error, MarketData, PriceSource, Result};
use app_config::{OpenAiSettings, PolygonSettings, PromptSettings};
use async_trait::async_trait;
use chrono::NaiveDate;
use core_types::Ticker;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Answers every completion with the same text and remembers the requests.
pub struct MockCompletions {
    answer: std::result::Result<String, u16>,
    pub requests: Mutex<Vec<CompletionRequest>>,
}

impl MockCompletions {
    pub fn answering(answer: &str) -> Arc<Self> {
        Arc::new(Self { answer: Ok(answer.to_string()), requests: Mutex::new(Vec::new()) })
    }

    pub fn failing(status: u16) -> Arc<Self> {
        Arc::new(Self { answer: Err(status), requests: Mutex::new(Vec::new()) })
    }

    pub fn last_request(&self) -> CompletionRequest {
        self.requests.lock().unwrap().last().cloned().expect("no completion was requested")
    }
}

#[async_trait]
impl CompletionProvider for MockCompletions {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.answer {
            Ok(answer) => Ok(answer.clone()),
            Err(status) => Err(Error::ApiError { status: *status, msg: "mock failure".into() }),
        }
    }
}

/// Canned prices. Tickers listed in `failing` return an error.
#[derive(Default)]
pub struct MockPrices {
    pub prices: HashMap<Ticker, f64>,
    pub failing: Vec<Ticker>,
    pub asked: Mutex<Vec<Ticker>>,
}

impl MockPrices {
    pub fn with(prices: &[(&str, f64)]) -> Self {
        Self {
            prices: prices.iter().map(|(t, p)| (Ticker::from(*t), *p)).collect(),
            ..Self::default()
        }
    }
}

#[async_trait]
impl PriceSource for MockPrices {
    async fn lookup_price(&self, ticker: &Ticker) -> Result<Option<f64>> {
        self.asked.lock().unwrap().push(ticker.clone());
        if self.failing.contains(ticker) {
            return Err(Error::AuthenticationFailed("mock".into()));
        }
        Ok(self.prices.get(ticker).copied())
    }
}

/// A fixed moving-average series and aggregate payload.
pub struct MockMarket {
    pub series: Vec<f64>,
    pub aggregates: serde_json::Value,
    pub fail: bool,
    pub aggregate_calls: Mutex<Vec<(String, NaiveDate, NaiveDate)>>,
}

impl MockMarket {
    pub fn with_series(series: Vec<f64>) -> Self {
        Self {
            series,
            aggregates: serde_json::json!({ "results": [] }),
            fail: false,
            aggregate_calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl MarketData for MockMarket {
    async fn moving_average_series(
        &self,
        _ticker: &Ticker,
        _window: u32,
        _limit: u32,
    ) -> Result<Vec<f64>> {
        if self.fail {
            return Err(Error::ApiError { status: 503, msg: "down".into() });
        }
        Ok(self.series.clone())
    }

    async fn aggregates(
        &self,
        _ticker: &Ticker,
        timespan: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<serde_json::Value> {
        if self.fail {
            return Err(Error::ApiError { status: 503, msg: "down".into() });
        }
        self.aggregate_calls.lock().unwrap().push((timespan.to_string(), from, to));
        Ok(self.aggregates.clone())
    }
}

pub fn openai_settings() -> OpenAiSettings {
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

pub fn polygon_settings() -> PolygonSettings {
    PolygonSettings {
        api_key: "test".into(),
        rest_base_url: "http://localhost".into(),
        sma_window: 150,
        sma_limit: 10,
        history_days: 43,
        timeout_secs: 5,
    }
}

pub fn prompts() -> PromptSettings {
    PromptSettings::default()
}
