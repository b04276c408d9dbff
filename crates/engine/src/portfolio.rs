// In crates/engine/src/portfolio.rs

use analytics::validate_portfolio;
use api_client::{CompletionProvider, CompletionRequest, PriceSource};
use app_config::{OpenAiSettings, PromptSettings};
use core_types::{
    AllocationRecommendation, Holdings, RebalanceRecommendation, Result, RiskAssessment, Ticker,
};
use futures::future;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::parse::parse_model_json;
use crate::prompts;

const ASSESSMENT_TEMPERATURE: f32 = 0.7;

/// The client's current portfolio as posted to the manipulation and
/// assessment endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioRequest {
    #[serde(deserialize_with = "core_types::lenient::number")]
    pub cash: f64,
    pub totals: Holdings,
    #[serde(default)]
    pub additional_info: String,
}

/// Builds, rebalances and assesses portfolios with the help of a language model.
pub struct PortfolioAdvisor {
    completions: Arc<dyn CompletionProvider>,
    prices: Arc<dyn PriceSource>,
    model: String,
    temperature: f32,
    prompts: PromptSettings,
}

impl PortfolioAdvisor {
    pub fn new(
        completions: Arc<dyn CompletionProvider>,
        prices: Arc<dyn PriceSource>,
        openai: &OpenAiSettings,
        prompts: PromptSettings,
    ) -> Self {
        Self {
            completions,
            prices,
            model: openai.model.clone(),
            temperature: openai.temperature,
            prompts,
        }
    }

    /// Asks the model for a fresh allocation from a free-form description.
    pub async fn build(&self, prompt: &str) -> Result<AllocationRecommendation> {
        let request = self.request(&self.prompts.portfolio, prompt.to_string(), self.temperature);
        let content = self.complete(&request).await?;
        parse_model_json(&content)
    }

    /// Asks the model how the portfolio should look today and turns the
    /// answer into concrete buy/sell orders.
    pub async fn manipulate(
        &self,
        portfolio: &PortfolioRequest,
    ) -> Result<RebalanceRecommendation> {
        // --- 1. Reject bad input before paying for a completion ---
        validate_portfolio(portfolio.cash, &portfolio.totals)?;

        // --- 2. Target allocation from the model ---
        let user = prompts::manipulation_prompt(
            portfolio.cash,
            &portfolio.totals,
            &portfolio.additional_info,
        )?;
        let request = self.request(&self.prompts.manipulation, user, self.temperature);
        let content = self.complete(&request).await?;
        let recommendation: AllocationRecommendation = parse_model_json(&content)?;
        tracing::info!(?recommendation, "AI-generated recommendation.");

        // --- 3. Prices for tickers the client does not hold yet ---
        let new_tickers = new_tickers(&portfolio.totals, &recommendation);
        let quotes = self.resolve_prices(new_tickers).await;

        // --- 4. Rebalance ---
        let entries = analytics::rebalance(
            portfolio.cash,
            &portfolio.totals,
            &recommendation.portfolio,
            &quotes,
        )?;

        Ok(RebalanceRecommendation {
            analysis: recommendation.analysis,
            portfolio: entries,
        })
    }

    /// Risk profile of the portfolio plus diversification ideas.
    pub async fn assess_risk(&self, portfolio: &PortfolioRequest) -> Result<RiskAssessment> {
        validate_portfolio(portfolio.cash, &portfolio.totals)?;

        let user = prompts::assessment_prompt(
            portfolio.cash,
            &portfolio.totals,
            &portfolio.additional_info,
        )?;
        let request = self.request(&self.prompts.assessment, user, ASSESSMENT_TEMPERATURE);
        let content = self.complete(&request).await?;
        let assessment: RiskAssessment = parse_model_json(&content)?;
        tracing::info!(?assessment, "AI-generated assessment and diversification recommendation.");

        Ok(assessment)
    }

    fn request(&self, system: &str, user: String, temperature: f32) -> CompletionRequest {
        CompletionRequest {
            model: self.model.clone(),
            system: system.to_string(),
            user,
            temperature,
            max_tokens: None,
        }
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        self.completions.complete(request).await.map_err(|e| {
            tracing::error!(error = %e, "Completion request failed.");
            e.into_upstream("openai")
        })
    }

    /// Looks up every ticker concurrently. Tickers without a usable answer
    /// are simply absent from the returned map.
    async fn resolve_prices(&self, tickers: Vec<Ticker>) -> HashMap<Ticker, f64> {
        let lookups = tickers.into_iter().map(|ticker| async move {
            let result = self.prices.lookup_price(&ticker).await;
            (ticker, result)
        });

        let mut quotes = HashMap::new();
        for (ticker, result) in future::join_all(lookups).await {
            match result {
                Ok(Some(price)) => {
                    tracing::info!(%ticker, price, "Fetched current price.");
                    quotes.insert(ticker, price);
                }
                Ok(None) => tracing::error!(%ticker, "'close' not found in pricing response."),
                Err(e) => tracing::error!(%ticker, error = %e, "Failed to fetch current price."),
            }
        }
        quotes
    }
}

/// Tickers of the recommendation that are not in `holdings`, first
/// occurrence order, without duplicates.
fn new_tickers(holdings: &Holdings, recommendation: &AllocationRecommendation) -> Vec<Ticker> {
    let mut seen = HashSet::new();
    recommendation
        .portfolio
        .iter()
        .map(|allocation| &allocation.ticker)
        .filter(|ticker| !holdings.contains_key(*ticker) && seen.insert(*ticker))
        .cloned()
        .collect()
}
