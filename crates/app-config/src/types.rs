// In crates/app-config/src/types.rs

use serde::Deserialize;

use crate::prompts;

#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    /// The application's general settings.
    pub app: AppSettings,
    pub server: ServerSettings,
    /// Settings for the OpenAI chat completions API.
    pub openai: OpenAiSettings,
    /// Settings for the Polygon.io market data API.
    pub polygon: PolygonSettings,
    /// Settings for the internal pricing service.
    pub pricing: PricingSettings,
    #[serde(default)]
    pub health_check: HealthCheckSettings,
    #[serde(default)]
    pub prompts: PromptSettings,
}

#[derive(Deserialize, Debug, Clone)]
pub struct AppSettings {
    /// The environment the application is running in (e.g., "development", "production").
    pub environment: String,
    /// The log level for the application.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// The only origin allowed by CORS. Any origin is allowed when unset.
    #[serde(default)]
    pub frontend_url: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct OpenAiSettings {
    pub api_key: String,
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,
    /// Model used for portfolio construction and risk assessment.
    #[serde(default = "default_model")]
    pub model: String,
    /// Cheaper model used for trade plans and tweets.
    #[serde(default = "default_fast_model")]
    pub fast_model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Token cap for the short-form answers produced with `fast_model`.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Deserialize, Debug, Clone)]
pub struct PolygonSettings {
    pub api_key: String,
    #[serde(default = "default_polygon_base_url")]
    pub rest_base_url: String,
    /// SMA window, in days.
    #[serde(default = "default_sma_window")]
    pub sma_window: u32,
    /// Number of SMA points fed to the trend fit.
    #[serde(default = "default_sma_limit")]
    pub sma_limit: u32,
    /// How far back the trade-plan history reaches, in days.
    #[serde(default = "default_history_days")]
    pub history_days: u32,
    #[serde(default = "default_client_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Deserialize, Debug, Clone)]
pub struct PricingSettings {
    /// Base URL of the pricing service; `/authentication` and `/throttle` live under it.
    pub base_url: String,
    pub email: String,
    pub password: String,
    /// A lookup that takes longer counts as a failed lookup.
    #[serde(default = "default_client_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Deserialize, Debug, Clone)]
pub struct HealthCheckSettings {
    /// URL pinged on every tick. The check is disabled when unset.
    pub url: Option<String>,
    #[serde(default = "default_health_interval")]
    pub interval_secs: u64,
    #[serde(default = "default_client_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for HealthCheckSettings {
    fn default() -> Self {
        Self {
            url: None,
            interval_secs: default_health_interval(),
            timeout_secs: default_client_timeout_secs(),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct PromptSettings {
    #[serde(default = "default_portfolio_prompt")]
    pub portfolio: String,
    #[serde(default = "default_manipulation_prompt")]
    pub manipulation: String,
    #[serde(default = "default_assessment_prompt")]
    pub assessment: String,
    #[serde(default = "default_trade_plan_prompt")]
    pub trade_plan: String,
    #[serde(default = "default_tweet_prompt")]
    pub tweet: String,
}

impl Default for PromptSettings {
    fn default() -> Self {
        Self {
            portfolio: default_portfolio_prompt(),
            manipulation: default_manipulation_prompt(),
            assessment: default_assessment_prompt(),
            trade_plan: default_trade_plan_prompt(),
            tweet: default_tweet_prompt(),
        }
    }
}

/// Helper functions for serde defaults
fn default_log_level() -> String { "info".into() }
fn default_openai_base_url() -> String { "https://api.openai.com/v1".into() }
fn default_model() -> String { "gpt-4o".into() }
fn default_fast_model() -> String { "gpt-4o-mini".into() }
fn default_temperature() -> f32 { 0.8 }
fn default_max_tokens() -> u32 { 256 }
fn default_timeout_secs() -> u64 { 60 }
fn default_client_timeout_secs() -> u64 { 10 }
fn default_polygon_base_url() -> String { "https://api.polygon.io".into() }
fn default_sma_window() -> u32 { 150 }
fn default_sma_limit() -> u32 { 10 }
fn default_history_days() -> u32 { 43 }
fn default_health_interval() -> u64 { 600 }
fn default_portfolio_prompt() -> String { prompts::PORTFOLIO_SYSTEM_PROMPT.into() }
fn default_manipulation_prompt() -> String { prompts::PORTFOLIO_MANIPULATION_PROMPT.into() }
fn default_assessment_prompt() -> String { prompts::ASSESSMENT_AND_DIVERSIFICATION_PROMPT.into() }
fn default_trade_plan_prompt() -> String { prompts::TRADE_PLAN_SYSTEM_PROMPT.into() }
fn default_tweet_prompt() -> String { prompts::TWEET_SYSTEM_PROMPT.into() }
