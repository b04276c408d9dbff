// In crates/engine/src/prompts.rs

//! User-message templates. System prompts come from configuration.

use core_types::{Error, Holdings, Result};

use crate::trade::{Timespan, TradeDescription};

fn render_holdings(holdings: &Holdings) -> Result<String> {
    serde_json::to_string_pretty(holdings)
        .map_err(|e| Error::validation(format!("holdings cannot be rendered: {}", e)))
}

fn with_additional_info(mut prompt: String, additional_info: &str) -> String {
    let info = additional_info.trim();
    if !info.is_empty() {
        prompt.push_str(info);
        prompt.push('\n');
    }
    prompt
}

pub fn manipulation_prompt(
    cash: f64,
    holdings: &Holdings,
    additional_info: &str,
) -> Result<String> {
    let prompt = format!(
        "I want you to decide, after analyzing the market, if and how to change my portfolio.\n\
         This is my current portfolio:\n{}\n\
         I also have liquid cash: {}\n",
        render_holdings(holdings)?,
        cash
    );
    let mut prompt = with_additional_info(prompt, additional_info);
    prompt.push_str(
        "Your mission is to decide how my portfolio should look today after your analysis.",
    );
    Ok(prompt)
}

pub fn assessment_prompt(cash: f64, holdings: &Holdings, additional_info: &str) -> Result<String> {
    let prompt = format!(
        "Assess the risk profile of the following portfolio and suggest diversification strategies:\n\
         Current portfolio:\n{}\n\
         Available cash: {}\n",
        render_holdings(holdings)?,
        cash
    );
    let mut prompt = with_additional_info(prompt, additional_info);
    prompt.push_str(
        "Provide an assessment of the risk and recommendations for balancing the portfolio \
         across sectors, asset classes, and geographies.",
    );
    Ok(prompt)
}

pub fn trade_plan_prompt(count: u32, timespan: Timespan, history: &serde_json::Value) -> String {
    format!(
        "Tell me based on this information of the last {} {}s: {}",
        count, timespan, history
    )
}

pub fn tweet_prompt(trade: &TradeDescription) -> String {
    format!(
        "{} {} stocks of {} at {}",
        trade.operation, trade.papers, trade.ticker, trade.price
    )
}
