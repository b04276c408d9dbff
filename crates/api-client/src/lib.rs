// In crates/api-client/src/lib.rs

use async_trait::async_trait;
use chrono::NaiveDate;
use core_types::Ticker;

pub mod error;
pub mod openai;
pub mod polygon;
pub mod pricing;
pub mod types;

// Re-export public types
pub use error::{Error, Result};
pub use openai::OpenAiClient;
pub use polygon::PolygonClient;
pub use pricing::PricingClient;
pub use types::CompletionRequest;

/// A language model that turns a system + user prompt into text.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Returns the content of the first completion choice.
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;
}

/// Historical market data for a ticker.
#[async_trait]
pub trait MarketData: Send + Sync {
    /// Daily simple moving average of the close, oldest point first.
    ///
    /// # Arguments
    ///
    /// * `ticker`: The ticker to fetch the series for.
    /// * `window`: The SMA window in days.
    /// * `limit`: The number of SMA points to return.
    async fn moving_average_series(
        &self,
        ticker: &Ticker,
        window: u32,
        limit: u32,
    ) -> Result<Vec<f64>>;

    /// Raw aggregate bars (`1 {timespan}` per bar) between two dates, as returned
    /// by the provider. The payload is only ever handed to a language model, so it
    /// is not mapped onto a typed struct.
    async fn aggregates(
        &self,
        ticker: &Ticker,
        timespan: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<serde_json::Value>;
}

/// The latest known price of a ticker.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// * `Ok(Some(price))`: a price is known.
    /// * `Ok(None)`: the service answered but has no price for the ticker.
    /// * `Err(_)`: the service could not be reached or refused the request.
    async fn lookup_price(&self, ticker: &Ticker) -> Result<Option<f64>>;
}
