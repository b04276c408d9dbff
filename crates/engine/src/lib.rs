// In crates/engine/src/lib.rs

//! The advisory services behind the HTTP routes.
//!
//! Each service formats a prompt, calls the external collaborators through
//! the `api-client` traits, parses what comes back into typed values and
//! hands the numbers to `analytics`.

pub mod parse;
pub mod portfolio;
pub mod prompts;
pub mod trade;

pub use portfolio::{PortfolioAdvisor, PortfolioRequest};
pub use trade::{Timespan, TradeAnalyst, TradeDescription};
