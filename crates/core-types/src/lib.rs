// In crates/core-types/src/lib.rs

pub mod error;
pub mod lenient;
pub mod types;

// Re-export the most important types for easy access from other crates.
pub use error::{Error, Result};
pub use types::{
    Action, AllocationRecommendation, DiversificationStrategy, HoldingRecord, Holdings,
    RebalanceRecommendation, RecommendationEntry, RiskAssessment, TargetAllocation, Ticker,
    TradePlan, Trend, TrendResult,
};
