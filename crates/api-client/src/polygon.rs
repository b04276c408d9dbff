// In crates/api-client/src/polygon.rs

use crate::error::error_message;
use crate::types::SmaResponse;
use crate::{Error, MarketData, Result};
use app_config::PolygonSettings;
use async_trait::async_trait;
use chrono::NaiveDate;
use core_types::Ticker;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

/// The client for the Polygon.io REST API.
#[derive(Debug, Clone)]
pub struct PolygonClient {
    http_client: Client,
    api_key: String,
    base_url: String,
}

impl PolygonClient {
    pub fn new(settings: &PolygonSettings) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| Error::ClientBuildError(e.to_string()))?;

        Ok(Self {
            http_client,
            api_key: settings.api_key.clone(),
            base_url: settings.rest_base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_text(&self, url: &str, query: &[(&str, String)]) -> Result<String> {
        let response = self
            .http_client
            .get(url)
            .query(query)
            .query(&[("apiKey", &self.api_key)])
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(Error::ApiError {
                status: status.as_u16(),
                msg: error_message(&text),
            });
        }
        Ok(text)
    }
}

#[async_trait]
impl MarketData for PolygonClient {
    /// Corresponds to `GET /v1/indicators/sma/{ticker}`.
    async fn moving_average_series(
        &self,
        ticker: &Ticker,
        window: u32,
        limit: u32,
    ) -> Result<Vec<f64>> {
        let url = format!("{}/v1/indicators/sma/{}", self.base_url, ticker);
        let query = [
            ("timespan", "day".to_string()),
            ("adjusted", "true".to_string()),
            ("window", window.to_string()),
            ("series_type", "close".to_string()),
            ("order", "asc".to_string()),
            ("limit", limit.to_string()),
        ];

        let body = self.get_text(&url, &query).await?;
        let values = parse_sma_values(&body)?;
        tracing::debug!(%ticker, points = values.len(), "Fetched SMA series.");
        Ok(values)
    }

    /// Corresponds to `GET /v2/aggs/ticker/{ticker}/range/1/{timespan}/{from}/{to}`.
    async fn aggregates(
        &self,
        ticker: &Ticker,
        timespan: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Value> {
        let url = format!(
            "{}/v2/aggs/ticker/{}/range/1/{}/{}/{}",
            self.base_url,
            ticker,
            timespan,
            from.format("%Y-%m-%d"),
            to.format("%Y-%m-%d")
        );
        let query = [("adjusted", "true".to_string()), ("sort", "asc".to_string())];

        let body = self.get_text(&url, &query).await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Reads `results.values[].value` from an SMA response, oldest point first.
///
/// A response without results yields an empty series; deciding whether that
/// is enough data is left to the caller.
pub(crate) fn parse_sma_values(body: &str) -> Result<Vec<f64>> {
    let response: SmaResponse = serde_json::from_str(body)?;
    let mut points = response.results.map(|r| r.values).unwrap_or_default();
    // Stable, so points without timestamps keep their relative order.
    points.sort_by_key(|p| p.timestamp.unwrap_or(i64::MIN));
    Ok(points.into_iter().map(|p| p.value).collect())
}
