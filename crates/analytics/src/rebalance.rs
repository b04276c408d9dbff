// In crates/analytics/src/rebalance.rs

use core_types::{
    Action, Error, HoldingRecord, Holdings, RecommendationEntry, Result, TargetAllocation, Ticker,
};
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

/// Price source for tickers the client does not hold yet.
///
/// `None` means no usable price is known. The rebalancer treats that as a
/// per-ticker problem and keeps going.
pub trait PriceLookup {
    fn lookup_price(&self, ticker: &Ticker) -> Option<f64>;
}

impl<S: BuildHasher> PriceLookup for HashMap<Ticker, f64, S> {
    fn lookup_price(&self, ticker: &Ticker) -> Option<f64> {
        self.get(ticker).copied()
    }
}

impl PriceLookup for BTreeMap<Ticker, f64> {
    fn lookup_price(&self, ticker: &Ticker) -> Option<f64> {
        self.get(ticker).copied()
    }
}

/// Cash plus the current value of every holding.
pub fn total_value(cash: f64, holdings: &Holdings) -> f64 {
    cash + holdings.values().map(|h| h.current_value).sum::<f64>()
}

/// Computes buy/sell actions that move `holdings` toward `target`.
///
/// Every target value is derived from one snapshot of the total portfolio
/// value taken before the first entry is processed; sells are not assumed to
/// free up cash for later buys. Entries come back in the order of `target`.
///
/// A held ticker whose desired value is below its current value is sold off
/// completely. Share counts are floored and the fractional residue is dropped.
pub fn rebalance<P>(
    cash: f64,
    holdings: &Holdings,
    target: &[TargetAllocation],
    prices: &P,
) -> Result<Vec<RecommendationEntry>>
where
    P: PriceLookup + ?Sized,
{
    validate(cash, holdings, target)?;

    // 1. Snapshot
    let total_value = total_value(cash, holdings);
    if !target.is_empty() && total_value <= 0.0 {
        return Err(Error::validation(format!(
            "total portfolio value must be positive, got {}",
            total_value
        )));
    }

    let mut recommendations = Vec::with_capacity(target.len());
    for allocation in target {
        // 2. Desired value for this ticker
        let desired_fraction = allocation.percentage / 100.0;
        let desired_value = total_value * desired_fraction;

        let entry = match holdings.get(&allocation.ticker) {
            // 3. Already held
            Some(holding) => rebalance_held(
                allocation,
                holding,
                desired_fraction,
                desired_value,
                total_value,
            )?,
            // 4. New ticker
            None => buy_new(allocation, desired_value, prices),
        };

        tracing::debug!(
            ticker = %entry.ticker,
            action = ?entry.action,
            papers = entry.papers,
            "Rebalance entry computed."
        );

        // 5. Keep input order
        recommendations.push(entry);
    }

    Ok(recommendations)
}

fn rebalance_held(
    allocation: &TargetAllocation,
    holding: &HoldingRecord,
    desired_fraction: f64,
    desired_value: f64,
    total_value: f64,
) -> Result<RecommendationEntry> {
    let current_value = holding.current_value;
    let current_price = holding.current_price;
    let current_percentage = current_value / total_value * 100.0;
    let difference = desired_value - current_value;

    let (action, papers) = if desired_fraction == 0.0 || desired_value < current_value {
        (Action::Sell, holding.position)
    } else {
        if current_price == 0.0 {
            return Err(Error::validation(format!(
                "currentPrice for {} is zero, cannot size the order",
                allocation.ticker
            )));
        }
        let action = if difference > 0.0 { Action::Buy } else { Action::Sell };
        (action, whole_shares(difference.abs(), current_price))
    };

    Ok(RecommendationEntry {
        ticker: allocation.ticker.clone(),
        desired_percentage: allocation.percentage,
        action: Some(action),
        papers,
        current_price: Some(current_price),
        current_percentage: Some(current_percentage),
    })
}

fn buy_new<P>(allocation: &TargetAllocation, desired_value: f64, prices: &P) -> RecommendationEntry
where
    P: PriceLookup + ?Sized,
{
    match prices.lookup_price(&allocation.ticker) {
        Some(price) if price.is_finite() && price > 0.0 => RecommendationEntry {
            ticker: allocation.ticker.clone(),
            desired_percentage: allocation.percentage,
            action: Some(Action::Buy),
            papers: whole_shares(desired_value, price),
            current_price: Some(price),
            current_percentage: Some(0.0),
        },
        other => {
            tracing::warn!(
                ticker = %allocation.ticker,
                price = ?other,
                "No usable price for new ticker."
            );
            RecommendationEntry {
                ticker: allocation.ticker.clone(),
                desired_percentage: allocation.percentage,
                action: None,
                papers: 0,
                current_price: None,
                current_percentage: None,
            }
        }
    }
}

fn whole_shares(value: f64, price: f64) -> u64 {
    (value / price).floor() as u64
}

/// Checks the client-supplied half of a rebalance (cash and holdings).
///
/// Callers that do expensive work before [`rebalance`] (asking a model for the
/// target allocation) run this first so bad input is rejected up front.
pub fn validate_portfolio(cash: f64, holdings: &Holdings) -> Result<()> {
    if !cash.is_finite() {
        return Err(Error::validation("cash must be a finite number"));
    }

    for (ticker, holding) in holdings {
        if !holding.current_value.is_finite() {
            return Err(Error::validation(format!(
                "currentValue for {} must be a finite number",
                ticker
            )));
        }
        if !holding.current_price.is_finite() || holding.current_price < 0.0 {
            return Err(Error::validation(format!(
                "currentPrice for {} must be a non-negative number",
                ticker
            )));
        }
    }

    Ok(())
}

fn validate(cash: f64, holdings: &Holdings, target: &[TargetAllocation]) -> Result<()> {
    validate_portfolio(cash, holdings)?;

    for allocation in target {
        if allocation.ticker.as_str().trim().is_empty() {
            return Err(Error::validation("target allocation has an empty ticker"));
        }
        if !allocation.percentage.is_finite() || !(0.0..=100.0).contains(&allocation.percentage) {
            return Err(Error::validation(format!(
                "percentage for {} must be between 0 and 100, got {}",
                allocation.ticker, allocation.percentage
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn target(ticker: &str, percentage: f64) -> TargetAllocation {
        TargetAllocation {
            ticker: Ticker::from(ticker),
            percentage,
        }
    }

    fn aaa_holdings() -> Holdings {
        let mut holdings = Holdings::new();
        holdings.insert(Ticker::from("AAA"), HoldingRecord::new(4000.0, 100.0, 40));
        holdings
    }

    fn no_prices() -> HashMap<Ticker, f64> {
        HashMap::new()
    }

    #[test]
    fn reduction_below_current_value_sells_everything() {
        let out = rebalance(1000.0, &aaa_holdings(), &[target("AAA", 50.0)], &no_prices()).unwrap();
        assert_eq!(out.len(), 1);
        let entry = &out[0];
        assert_eq!(entry.action, Some(Action::Sell));
        assert_eq!(entry.papers, 40);
        assert_eq!(entry.desired_percentage, 50.0);
        assert_eq!(entry.current_price, Some(100.0));
        assert_relative_eq!(entry.current_percentage.unwrap(), 80.0);
    }

    #[test]
    fn increase_buys_floored_shares() {
        let out = rebalance(1000.0, &aaa_holdings(), &[target("AAA", 90.0)], &no_prices()).unwrap();
        assert_eq!(out[0].action, Some(Action::Buy));
        assert_eq!(out[0].papers, 5);
    }

    #[test]
    fn zero_percentage_liquidates_position() {
        let out = rebalance(1000.0, &aaa_holdings(), &[target("AAA", 0.0)], &no_prices()).unwrap();
        assert_eq!(out[0].action, Some(Action::Sell));
        assert_eq!(out[0].papers, 40);
    }

    #[test]
    fn exact_match_is_a_zero_share_sell() {
        let mut holdings = Holdings::new();
        holdings.insert(Ticker::from("AAA"), HoldingRecord::new(2500.0, 100.0, 25));
        // desired 50% of 5000 == current 2500
        let out = rebalance(2500.0, &holdings, &[target("AAA", 50.0)], &no_prices()).unwrap();
        assert_eq!(out[0].action, Some(Action::Sell));
        assert_eq!(out[0].papers, 0);
    }

    #[test]
    fn new_ticker_is_bought_at_looked_up_price() {
        let prices = HashMap::from([(Ticker::from("BBB"), 50.0)]);
        let out = rebalance(1000.0, &aaa_holdings(), &[target("BBB", 20.0)], &prices).unwrap();
        let entry = &out[0];
        assert_eq!(entry.action, Some(Action::Buy));
        assert_eq!(entry.papers, 20);
        assert_eq!(entry.current_price, Some(50.0));
        assert_eq!(entry.current_percentage, Some(0.0));
    }

    #[test]
    fn missing_price_is_isolated_to_its_entry() {
        let prices = HashMap::from([(Ticker::from("CCC"), 10.0)]);
        let out = rebalance(
            1000.0,
            &aaa_holdings(),
            &[target("BBB", 10.0), target("CCC", 10.0), target("AAA", 80.0)],
            &prices,
        )
        .unwrap();

        assert_eq!(out.len(), 3);
        assert_eq!(out[0].ticker, Ticker::from("BBB"));
        assert_eq!(out[0].action, None);
        assert_eq!(out[0].papers, 0);
        assert_eq!(out[0].current_price, None);

        assert_eq!(out[1].action, Some(Action::Buy));
        assert_eq!(out[1].papers, 50);
        assert_eq!(out[2].ticker, Ticker::from("AAA"));
    }

    #[test]
    fn non_positive_looked_up_price_counts_as_missing() {
        let prices = HashMap::from([(Ticker::from("BBB"), 0.0)]);
        let out = rebalance(1000.0, &aaa_holdings(), &[target("BBB", 20.0)], &prices).unwrap();
        assert_eq!(out[0].current_price, None);
        assert_eq!(out[0].papers, 0);
    }

    #[test]
    fn output_follows_target_order() {
        let prices = BTreeMap::from([(Ticker::from("ZZZ"), 1.0), (Ticker::from("MMM"), 1.0)]);
        let out = rebalance(
            1000.0,
            &aaa_holdings(),
            &[target("ZZZ", 5.0), target("AAA", 90.0), target("MMM", 5.0)],
            &prices,
        )
        .unwrap();
        let order: Vec<&str> = out.iter().map(|e| e.ticker.as_str()).collect();
        assert_eq!(order, vec!["ZZZ", "AAA", "MMM"]);
    }

    #[test]
    fn every_entry_uses_the_same_total_snapshot() {
        // Selling AAA would free 4000, but BBB is still sized off 5000.
        let prices = HashMap::from([(Ticker::from("BBB"), 100.0)]);
        let out = rebalance(
            1000.0,
            &aaa_holdings(),
            &[target("AAA", 0.0), target("BBB", 100.0)],
            &prices,
        )
        .unwrap();
        assert_eq!(out[1].papers, 50);
    }

    #[test]
    fn zero_price_on_buy_path_is_a_validation_error() {
        let mut holdings = Holdings::new();
        holdings.insert(Ticker::from("AAA"), HoldingRecord::new(100.0, 0.0, 4));
        let err = rebalance(900.0, &holdings, &[target("AAA", 50.0)], &no_prices()).unwrap_err();
        assert!(matches!(err, Error::Validation(msg) if msg.contains("AAA")));
    }

    #[test]
    fn zero_price_on_full_exit_is_fine() {
        let mut holdings = Holdings::new();
        holdings.insert(Ticker::from("AAA"), HoldingRecord::new(100.0, 0.0, 4));
        let out = rebalance(0.0, &holdings, &[target("AAA", 10.0)], &no_prices()).unwrap();
        assert_eq!(out[0].papers, 4);
    }

    #[test]
    fn malformed_input_is_rejected_before_processing() {
        let out = rebalance(f64::NAN, &aaa_holdings(), &[target("AAA", 50.0)], &no_prices());
        assert!(out.is_err());
        assert!(rebalance(1000.0, &aaa_holdings(), &[target("AAA", 150.0)], &no_prices()).is_err());
        assert!(rebalance(1000.0, &aaa_holdings(), &[target("AAA", -1.0)], &no_prices()).is_err());
        assert!(rebalance(1000.0, &aaa_holdings(), &[target(" ", 10.0)], &no_prices()).is_err());
    }

    #[test]
    fn empty_portfolio_with_targets_is_rejected() {
        let err =
            rebalance(0.0, &Holdings::new(), &[target("AAA", 10.0)], &no_prices()).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn empty_target_yields_empty_plan() {
        let out = rebalance(0.0, &Holdings::new(), &[], &no_prices()).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn holdings_are_left_untouched_and_results_repeat() {
        let holdings = aaa_holdings();
        let before = holdings.clone();
        let prices = HashMap::from([(Ticker::from("BBB"), 50.0)]);
        let plan = [target("AAA", 60.0), target("BBB", 40.0)];

        let first = rebalance(1000.0, &holdings, &plan, &prices).unwrap();
        let second = rebalance(1000.0, &holdings, &plan, &prices).unwrap();

        assert_eq!(holdings, before);
        assert_eq!(first, second);
    }
}
