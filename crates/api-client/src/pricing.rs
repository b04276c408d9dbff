// In crates/api-client/src/pricing.rs

use crate::error::error_message;
use crate::types::{AuthRequest, AuthResponse, PreviousClose};
use crate::{Error, PriceSource, Result};
use app_config::PricingSettings;
use async_trait::async_trait;
use core_types::Ticker;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tokio::sync::Mutex;

/// The client for the internal pricing service.
///
/// Requests are authenticated with a bearer token obtained from the
/// service's `/authentication` endpoint. The token is fetched on first use
/// and reused until the service answers `401`.
#[derive(Debug)]
pub struct PricingClient {
    http_client: Client,
    base_url: String,
    email: String,
    password: String,
    token: Mutex<Option<String>>,
}

impl PricingClient {
    pub fn new(settings: &PricingSettings) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| Error::ClientBuildError(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            email: settings.email.clone(),
            password: settings.password.clone(),
            token: Mutex::new(None),
        })
    }

    /// Exchanges the agent credentials for an access token.
    ///
    /// Corresponds to `POST /authentication`.
    pub async fn authenticate(&self) -> Result<String> {
        let url = format!("{}/authentication", self.base_url);
        let credentials = AuthRequest {
            strategy: "local",
            email: &self.email,
            password: &self.password,
        };

        let response = self.http_client.post(&url).json(&credentials).send().await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(Error::AuthenticationFailed(format!(
                "status {}: {}",
                status.as_u16(),
                error_message(&text)
            )));
        }

        parse_access_token(&text)
    }

    async fn token(&self) -> Result<String> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            return Ok(token.clone());
        }
        let token = self.authenticate().await?;
        tracing::info!("Obtained pricing service access token.");
        *cached = Some(token.clone());
        Ok(token)
    }

    async fn forget_token(&self) {
        *self.token.lock().await = None;
    }
}

#[async_trait]
impl PriceSource for PricingClient {
    /// Previous close of `ticker`.
    ///
    /// Corresponds to `GET /throttle?name=prev&ticker={ticker}`.
    async fn lookup_price(&self, ticker: &Ticker) -> Result<Option<f64>> {
        let token = self.token().await?;
        let url = format!("{}/throttle", self.base_url);

        let response = self
            .http_client
            .get(&url)
            .query(&[("name", "prev"), ("ticker", ticker.as_str())])
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if status == StatusCode::UNAUTHORIZED {
            self.forget_token().await;
            return Err(Error::AuthenticationFailed(error_message(&text)));
        }
        if !status.is_success() {
            return Err(Error::ApiError {
                status: status.as_u16(),
                msg: error_message(&text),
            });
        }

        tracing::debug!(%ticker, body = %text, "Pricing service response.");
        parse_close(&text)
    }
}

fn parse_access_token(body: &str) -> Result<String> {
    let auth: AuthResponse = serde_json::from_str(body)?;
    auth.access_token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| Error::AuthenticationFailed("token not found in response".into()))
}

fn parse_close(body: &str) -> Result<Option<f64>> {
    let prev: PreviousClose = serde_json::from_str(body)?;
    Ok(prev.close)
}
