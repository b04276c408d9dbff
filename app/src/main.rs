// In app/src/main.rs

use anyhow::Result;
use api_client::{
    CompletionProvider, MarketData, OpenAiClient, PolygonClient, PriceSource, PricingClient,
};
use app_config::Settings;
use clap::{Parser, Subcommand};
use core_types::Ticker;
use engine::{PortfolioAdvisor, TradeAnalyst};
use std::fmt::Write;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::prelude::*;
use web_server::AppState;

mod health;

// --- Command-Line Interface Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    long_about = "An AI-assisted portfolio and trade advisory service."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Runs the HTTP server (the default).
    Serve,

    /// Classifies the moving-average trend of a ticker and prints it as JSON.
    Trend {
        /// The ticker to analyze (e.g., "SPY").
        #[arg(short, long)]
        ticker: String,
    },

    /// Loads the configuration and prints a summary without secrets.
    CheckConfig,
}

// --- Main Application Entry Point ---

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from a .env file, if it exists.
    dotenvy::dotenv().ok();

    // Parse command-line arguments.
    let cli = Cli::parse();

    let settings = app_config::load_settings()?;
    init_tracing(&settings.app.log_level);

    tracing::info!(environment = %settings.app.environment, "Starting advisory application");

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => run_server(settings).await?,
        Commands::Trend { ticker } => handle_trend(settings, &ticker).await?,
        Commands::CheckConfig => print!("{}", config_summary(&settings)),
    }

    Ok(())
}

fn init_tracing(log_level: &str) {
    let level = log_level.parse::<tracing::Level>().unwrap_or(tracing::Level::INFO);
    let fmt_layer = tracing_subscriber::fmt::layer().with_filter(
        tracing_subscriber::filter::Targets::new()
            .with_target("hyper", tracing::Level::WARN)
            .with_target("reqwest", tracing::Level::WARN)
            .with_default(level),
    );
    tracing_subscriber::registry().with(fmt_layer).init();
}

/// The advisory services wired to the real upstream clients.
fn build_state(settings: &Settings) -> Result<AppState> {
    let completions: Arc<dyn CompletionProvider> = Arc::new(OpenAiClient::new(&settings.openai)?);
    let market: Arc<dyn MarketData> = Arc::new(PolygonClient::new(&settings.polygon)?);
    let prices: Arc<dyn PriceSource> = Arc::new(PricingClient::new(&settings.pricing)?);

    let portfolio = PortfolioAdvisor::new(
        completions.clone(),
        prices,
        &settings.openai,
        settings.prompts.clone(),
    );
    let trade = TradeAnalyst::new(
        market,
        completions,
        &settings.polygon,
        &settings.openai,
        settings.prompts.clone(),
    );

    Ok(AppState {
        portfolio: Arc::new(portfolio),
        trade: Arc::new(trade),
    })
}

// --- "Serve" Subcommand Logic ---

/// Starts the optional health check and then serves HTTP until terminated.
async fn run_server(settings: Settings) -> Result<()> {
    let state = build_state(&settings)?;

    if let Some(url) = settings.health_check.url.clone() {
        let interval = Duration::from_secs(settings.health_check.interval_secs.max(1));
        let timeout = Duration::from_secs(settings.health_check.timeout_secs);
        let client = health::health_client(timeout)?;
        tracing::info!(%url, interval_secs = interval.as_secs(), "Health check enabled.");
        tokio::spawn(health::run_health_check(client, url, interval));
    }

    web_server::run(settings.server, state).await?;

    anyhow::bail!("The web server terminated unexpectedly.");
}

// --- "Trend" Subcommand Logic ---

async fn handle_trend(settings: Settings, ticker: &str) -> Result<()> {
    let ticker = Ticker::parse(ticker)?;
    let state = build_state(&settings)?;

    let result = state.trade.analyze_trend(&ticker).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}

// --- "CheckConfig" Subcommand Logic ---

/// Human readable overview of the loaded settings. Credentials are left out.
fn config_summary(settings: &Settings) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(out, "environment:   {}", settings.app.environment);
    let _ = writeln!(out, "log level:     {}", settings.app.log_level);
    let _ = writeln!(out, "listen:        {}:{}", settings.server.host, settings.server.port);
    let _ = writeln!(
        out,
        "cors origin:   {}",
        settings.server.frontend_url.as_deref().unwrap_or("any")
    );
    let _ = writeln!(
        out,
        "openai:        {} (model {}, fast model {})",
        settings.openai.base_url, settings.openai.model, settings.openai.fast_model
    );
    let _ = writeln!(
        out,
        "polygon:       {} (sma window {}, limit {})",
        settings.polygon.rest_base_url, settings.polygon.sma_window, settings.polygon.sma_limit
    );
    let _ = writeln!(out, "pricing:       {}", settings.pricing.base_url);
    let _ = match &settings.health_check.url {
        Some(url) => writeln!(
            out,
            "health check:  {} every {}s",
            url, settings.health_check.interval_secs
        ),
        None => writeln!(out, "health check:  disabled"),
    };
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use app_config::{
        AppSettings, HealthCheckSettings, OpenAiSettings, PolygonSettings, PricingSettings,
        PromptSettings, ServerSettings,
    };

    fn settings() -> Settings {
        Settings {
            app: AppSettings { environment: "production".into(), log_level: "warn".into() },
            server: ServerSettings { host: "0.0.0.0".into(), port: 5000, frontend_url: None },
            openai: OpenAiSettings {
                api_key: "sk-live-123".into(),
                base_url: "https://api.openai.com/v1".into(),
                model: "gpt-4o".into(),
                fast_model: "gpt-4o-mini".into(),
                temperature: 0.8,
                max_tokens: 256,
                timeout_secs: 60,
            },
            polygon: PolygonSettings {
                api_key: "pk-live-456".into(),
                rest_base_url: "https://api.polygon.io".into(),
                sma_window: 150,
                sma_limit: 10,
                history_days: 43,
                timeout_secs: 10,
            },
            pricing: PricingSettings {
                base_url: "http://localhost:3030".into(),
                email: "agent@example.com".into(),
                password: "hunter2".into(),
                timeout_secs: 10,
            },
            health_check: HealthCheckSettings {
                url: Some("https://example.com/health".into()),
                interval_secs: 600,
                timeout_secs: 10,
            },
            prompts: PromptSettings::default(),
        }
    }

    #[test]
    fn summary_lists_endpoints_and_models() {
        let summary = config_summary(&settings());
        assert!(summary.contains("environment:   production\n"));
        assert!(summary.contains("listen:        0.0.0.0:5000\n"));
        assert!(summary.contains("cors origin:   any\n"));
        assert!(summary.contains("(model gpt-4o, fast model gpt-4o-mini)"));
        assert!(summary.contains("(sma window 150, limit 10)"));
        assert!(summary.contains("health check:  https://example.com/health every 600s\n"));
    }

    #[test]
    fn summary_leaves_out_credentials() {
        let summary = config_summary(&settings());
        for secret in ["sk-live-123", "pk-live-456", "hunter2", "agent@example.com"] {
            assert!(!summary.contains(secret), "{secret} leaked into the summary");
        }
    }

    #[test]
    fn summary_marks_disabled_health_check() {
        let mut settings = settings();
        settings.health_check.url = None;
        settings.server.frontend_url = Some("http://localhost:3000".into());
        let summary = config_summary(&settings);
        assert!(summary.contains("health check:  disabled\n"));
        assert!(summary.contains("cors origin:   http://localhost:3000\n"));
    }
}
