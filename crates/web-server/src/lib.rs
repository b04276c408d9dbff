// In crates/web-server/src/lib.rs

use app_config::ServerSettings;
use axum::{
    Router,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{HeaderValue, Method, header},
    response::Json,
    routing::{get, post},
};
use core_types::{RebalanceRecommendation, RiskAssessment, TradePlan, TrendResult};
use engine::{PortfolioAdvisor, PortfolioRequest, TradeAnalyst, TradeDescription};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use types::{
    BuildPortfolioParams, BuildPortfolioResponse, TickerParams, TradePlanParams, TweetParams,
    TweetResponse, required, required_ticker,
};

pub mod error;
pub mod types;

// Re-export our custom error type for convenience.
pub use error::{Error, Result};

/// The shared application state that is available to all API handlers.
#[derive(Clone)]
pub struct AppState {
    pub portfolio: Arc<PortfolioAdvisor>,
    pub trade: Arc<TradeAnalyst>,
}

/// Creates the main application router with all routes and middleware.
///
/// # Arguments
///
/// * `app_state`: The advisory services shared by the handlers.
/// * `frontend_url`: The only origin allowed by CORS. Any origin when `None`.
pub fn create_router(app_state: AppState, frontend_url: Option<&str>) -> Router {
    Router::new()
        .route("/", get(hello_handler))
        .route("/health", get(health_check_handler))
        .route("/build-portfolio", get(build_portfolio_handler))
        .route("/manipulate-portfolio", post(manipulate_portfolio_handler))
        .route("/assess-risk-and-diversify", post(assess_risk_handler))
        .route("/trade", get(trend_handler))
        .route("/trade-plan", get(trade_plan_handler))
        .route("/tweet", get(tweet_handler))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .layer(cors_layer(frontend_url))
        .with_state(app_state)
}

fn cors_layer(frontend_url: Option<&str>) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    match frontend_url.map(HeaderValue::from_str) {
        Some(Ok(origin)) => cors.allow_origin(origin),
        Some(Err(_)) => {
            tracing::warn!(
                ?frontend_url,
                "frontend_url is not a valid origin, allowing any origin."
            );
            cors.allow_origin(Any)
        }
        None => cors.allow_origin(Any),
    }
}

async fn hello_handler() -> &'static str {
    "hello world"
}

/// A simple health check handler.
async fn health_check_handler() -> &'static str {
    "OK"
}

/// Handler for `GET /build-portfolio?prompt=...`
async fn build_portfolio_handler(
    State(state): State<AppState>,
    params: std::result::Result<Query<BuildPortfolioParams>, QueryRejection>,
) -> Result<Json<BuildPortfolioResponse>> {
    let Query(params) = params.map_err(|e| Error::BadRequest(e.body_text()))?;
    let prompt = required(params.prompt.filter(|p| !p.trim().is_empty()), "prompt")?;

    let recommendation = state.portfolio.build(&prompt).await?;
    Ok(Json(BuildPortfolioResponse { recommendation }))
}

/// Handler for `POST /manipulate-portfolio`
async fn manipulate_portfolio_handler(
    State(state): State<AppState>,
    body: std::result::Result<Json<PortfolioRequest>, JsonRejection>,
) -> Result<Json<RebalanceRecommendation>> {
    let Json(request) = body.map_err(|e| Error::BadRequest(e.body_text()))?;
    tracing::info!(holdings = request.totals.len(), cash = request.cash, "Manipulating portfolio.");

    let recommendation = state.portfolio.manipulate(&request).await?;
    Ok(Json(recommendation))
}

/// Handler for `POST /assess-risk-and-diversify`
async fn assess_risk_handler(
    State(state): State<AppState>,
    body: std::result::Result<Json<PortfolioRequest>, JsonRejection>,
) -> Result<Json<RiskAssessment>> {
    let Json(request) = body.map_err(|e| Error::BadRequest(e.body_text()))?;

    let assessment = state.portfolio.assess_risk(&request).await?;
    Ok(Json(assessment))
}

/// Handler for `GET /trade?ticker=...`
async fn trend_handler(
    State(state): State<AppState>,
    params: std::result::Result<Query<TickerParams>, QueryRejection>,
) -> Result<Json<TrendResult>> {
    let Query(params) = params.map_err(|e| Error::BadRequest(e.body_text()))?;
    let ticker = required_ticker(params.ticker)?;

    let result = state.trade.analyze_trend(&ticker).await?;
    Ok(Json(result))
}

/// Handler for `GET /trade-plan?ticker=...&count=...&timespan=...`
async fn trade_plan_handler(
    State(state): State<AppState>,
    params: std::result::Result<Query<TradePlanParams>, QueryRejection>,
) -> Result<Json<TradePlan>> {
    let Query(params) = params.map_err(|e| Error::BadRequest(e.body_text()))?;
    let ticker = required_ticker(params.ticker)?;
    let count = required(params.count, "count")?;
    let timespan = required(params.timespan, "timespan")?;

    let plan = state.trade.trade_plan(&ticker, count, timespan).await?;
    Ok(Json(plan))
}

/// Handler for `GET /tweet?ticker=...&price=...&operation=...&papers=...`
async fn tweet_handler(
    State(state): State<AppState>,
    params: std::result::Result<Query<TweetParams>, QueryRejection>,
) -> Result<Json<TweetResponse>> {
    let Query(params) = params.map_err(|e| Error::BadRequest(e.body_text()))?;
    let trade = TradeDescription {
        ticker: required_ticker(params.ticker)?,
        price: required(params.price, "price")?,
        operation: required(params.operation, "operation")?,
        papers: required(params.papers, "papers")?,
    };

    let response = state.trade.tweet(&trade).await?;
    Ok(Json(TweetResponse { response }))
}

/// The main entry point for running the web server.
///
/// This function sets up the TCP listener and serves the application router.
/// It will run forever until the process is terminated.
pub async fn run(settings: ServerSettings, app_state: AppState) -> Result<()> {
    let app = create_router(app_state, settings.frontend_url.as_deref());

    let address = format!("{}:{}", settings.host, settings.port);
    tracing::info!("Web server listening on {}", address);

    let listener = TcpListener::bind(&address).await.map_err(Error::ServerBindError)?;

    axum::serve(listener, app.into_make_service())
        .await
        .map_err(Error::ServeError)?;

    Ok(())
}
