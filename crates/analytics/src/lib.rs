// In crates/analytics/src/lib.rs

//! Pure numeric transforms behind the advisory endpoints.
//!
//! Both entry points are synchronous and hold no state between calls; the
//! network collaborators that feed them live in `api-client`.

pub mod rebalance;
pub mod trend;

pub use rebalance::{PriceLookup, rebalance, total_value, validate_portfolio};
pub use trend::{TREND_EPSILON, classify_trend, linear_slope};
