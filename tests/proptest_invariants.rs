//! Property-based tests for rebalance invariants.
//!
//! These tests use proptest to verify that key invariants hold
//! across randomly generated portfolios and allocations.

use driftplan::{Action, DEFAULT_PRICE, Error, Holding, Portfolio, Suggestion, drift};
use proptest::prelude::*;
use std::collections::HashSet;

const TICKERS: [&str; 8] = [
    "AAPL", "AMZN", "GOOGL", "META", "MSFT", "NFLX", "NVDA", "TSLA",
];

/// A random rebalance case: targets over a ticker subset, holdings over
/// a subset of those targets, so every held dollar is governed by some
/// weight. Weights are normalized to sum to 1.0.
fn rebalance_case() -> impl Strategy<Value = (Vec<(String, f64, f64)>, Vec<(String, f64)>)> {
    prop::sample::subsequence(TICKERS.to_vec(), 1..=TICKERS.len())
        .prop_flat_map(|targets| {
            let n = targets.len();
            (
                Just(targets.clone()),
                prop::collection::vec(0.05f64..1.0, n),
                prop::sample::subsequence(targets, 0..=n),
            )
        })
        .prop_flat_map(|(targets, raw, held)| {
            let k = held.len();
            (
                Just(targets),
                Just(raw),
                Just(held),
                prop::collection::vec((0.1f64..10_000.0, 1.0f64..5_000.0), k),
            )
        })
        .prop_map(|(targets, raw, held, lots)| {
            let sum: f64 = raw.iter().sum();
            let allocation: Vec<(String, f64)> = targets
                .iter()
                .zip(&raw)
                .map(|(t, &w)| (t.to_string(), w / sum))
                .collect();
            let holdings: Vec<(String, f64, f64)> = held
                .iter()
                .zip(lots)
                .map(|(t, (quantity, price))| (t.to_string(), quantity, price))
                .collect();
            (holdings, allocation)
        })
}

fn to_holdings(lots: &[(String, f64, f64)]) -> Vec<Holding> {
    lots.iter()
        .map(|(t, q, p)| Holding::new(t.clone(), *q, *p))
        .collect()
}

fn signed_shares(s: &Suggestion) -> f64 {
    match s.action {
        Action::Buy => s.shares,
        Action::Sell => -s.shares,
    }
}

/// Apply suggestions at unchanged prices. Brand-new positions open at the
/// default fallback price, which is what sized them.
fn apply(lots: &[(String, f64, f64)], suggestions: &[Suggestion]) -> Vec<(String, f64, f64)> {
    let mut applied = lots.to_vec();
    for s in suggestions {
        match applied.iter_mut().find(|(t, _, _)| *t == s.ticker) {
            Some((_, quantity, _)) => *quantity += signed_shares(s),
            None => applied.push((s.ticker.clone(), signed_shares(s), DEFAULT_PRICE)),
        }
    }
    applied
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    // ========================================================================
    // SUGGESTION SHAPE INVARIANTS
    // ========================================================================

    /// Suggested share counts are always positive and finite
    #[test]
    fn shares_positive_and_finite(case in rebalance_case()) {
        let (holdings, allocation) = case;
        let portfolio = Portfolio::new(to_holdings(&holdings), allocation).unwrap();

        for s in portfolio.rebalance().unwrap() {
            prop_assert!(s.shares > 0.0, "non-positive shares for {}: {}", s.ticker, s.shares);
            prop_assert!(s.shares.is_finite(), "non-finite shares for {}", s.ticker);
        }
    }

    /// Every suggestion names a target ticker, at most once, in order
    #[test]
    fn suggestions_stay_within_targets(case in rebalance_case()) {
        let (holdings, allocation) = case;
        let targets: HashSet<&str> = allocation.iter().map(|(t, _)| t.as_str()).collect();
        let portfolio = Portfolio::new(to_holdings(&holdings), allocation.clone()).unwrap();

        let suggestions = portfolio.rebalance().unwrap();
        for s in &suggestions {
            prop_assert!(targets.contains(s.ticker.as_str()),
                "suggestion for untargeted ticker {}", s.ticker);
        }
        for window in suggestions.windows(2) {
            prop_assert!(window[0].ticker < window[1].ticker,
                "suggestions out of order: {} before {}", window[0].ticker, window[1].ticker);
        }
    }

    // ========================================================================
    // DETERMINISM INVARIANTS
    // ========================================================================

    /// Two passes over unchanged holdings produce identical suggestions
    #[test]
    fn two_passes_agree(case in rebalance_case()) {
        let (holdings, allocation) = case;
        let portfolio = Portfolio::new(to_holdings(&holdings), allocation).unwrap();

        let first = portfolio.rebalance().unwrap();
        let second = portfolio.rebalance().unwrap();
        prop_assert_eq!(first, second, "same portfolio, different suggestions");
    }

    /// Input order of holdings cannot change what gets suggested
    #[test]
    fn holding_order_never_matters(case in rebalance_case()) {
        let (holdings, allocation) = case;
        let total: f64 = holdings.iter().map(|(_, q, p)| q * p).sum();

        let forward = Portfolio::new(to_holdings(&holdings), allocation.clone()).unwrap();
        let mut reversed_lots = holdings.clone();
        reversed_lots.reverse();
        let reversed = Portfolio::new(to_holdings(&reversed_lots), allocation).unwrap();

        let a = forward.rebalance().unwrap();
        let b = reversed.rebalance().unwrap();

        prop_assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            prop_assert_eq!(&x.ticker, &y.ticker);
            prop_assert_eq!(x.action, y.action, "action flipped for {}", x.ticker);
            // Summation order differs, so compare notionals with headroom
            let price = holdings
                .iter()
                .find(|(t, _, _)| *t == x.ticker)
                .map_or(DEFAULT_PRICE, |(_, _, p)| *p);
            prop_assert!((x.shares - y.shares).abs() * price <= total.abs() * 1e-9 + 1e-9,
                "shares diverge for {}: {} vs {}", x.ticker, x.shares, y.shares);
        }
    }

    // ========================================================================
    // SETTLEMENT INVARIANTS
    // ========================================================================

    /// Applying the suggestions at unchanged prices settles the portfolio
    #[test]
    fn applying_suggestions_settles(case in rebalance_case()) {
        let (holdings, allocation) = case;
        let portfolio = Portfolio::new(to_holdings(&holdings), allocation.clone()).unwrap();
        let suggestions = portfolio.rebalance().unwrap();

        let applied = apply(&holdings, &suggestions);
        let total: f64 = applied.iter().map(|(_, q, p)| q * p).sum();
        let settled = Portfolio::new(to_holdings(&applied), allocation).unwrap();

        for s in settled.rebalance().unwrap() {
            let price = applied
                .iter()
                .find(|(t, _, _)| *t == s.ticker)
                .map_or(DEFAULT_PRICE, |(_, _, p)| *p);
            let notional = s.shares * price;
            prop_assert!(
                notional <= total.abs() * 1e-9 + 1e-9,
                "{} still {} ${:.6} off target after settling (total ${:.2})",
                s.ticker, s.action, notional, total
            );
        }
    }

    /// Sells never exceed the held quantity
    #[test]
    fn sells_never_go_short(case in rebalance_case()) {
        let (holdings, allocation) = case;
        let portfolio = Portfolio::new(to_holdings(&holdings), allocation).unwrap();

        for s in portfolio.rebalance().unwrap() {
            if s.action == Action::Sell {
                let held = holdings
                    .iter()
                    .find(|(t, _, _)| *t == s.ticker)
                    .map_or(0.0, |(_, q, _)| *q);
                prop_assert!(
                    s.shares <= held * (1.0 + 1e-12),
                    "selling {} shares of {} but only {} held",
                    s.shares, s.ticker, held
                );
            }
        }
    }

    // ========================================================================
    // CONSTRUCTION INVARIANTS
    // ========================================================================

    /// Allocations scaled to sum inside the tolerance band construct
    #[test]
    fn in_band_sums_construct(case in rebalance_case(), sum in 0.991f64..1.009) {
        let (_, allocation) = case;
        let scaled: Vec<(String, f64)> = allocation
            .iter()
            .map(|(t, w)| (t.clone(), w * sum))
            .collect();
        prop_assert!(Portfolio::new(Vec::new(), scaled).is_ok());
    }

    /// Allocations scaled outside the band are rejected with the sum error
    #[test]
    fn out_of_band_sums_are_rejected(
        case in rebalance_case(),
        sum in prop_oneof![0.2f64..0.985, 1.015f64..2.0],
    ) {
        let (_, allocation) = case;
        let scaled: Vec<(String, f64)> = allocation
            .iter()
            .map(|(t, w)| (t.clone(), w * sum))
            .collect();
        prop_assert!(
            matches!(
                Portfolio::new(Vec::new(), scaled),
                Err(Error::AllocationSum { .. })
            ),
            "expected AllocationSum rejection"
        );
    }

    // ========================================================================
    // MEASUREMENT INVARIANTS
    // ========================================================================

    /// Current weights are normalized and sorted
    #[test]
    fn current_weights_normalized(case in rebalance_case()) {
        let (holdings, allocation) = case;
        let portfolio = Portfolio::new(to_holdings(&holdings), allocation).unwrap();

        let weights = portfolio.current_weights();
        if !weights.is_empty() {
            let sum: f64 = weights.iter().map(|(_, w)| w).sum();
            prop_assert!((sum - 1.0).abs() < 1e-9, "weights sum to {sum}");
        }
        for window in weights.windows(2) {
            prop_assert!(window[0].0 < window[1].0, "weights out of order");
        }
    }

    /// Tracking error is finite, non-negative, and reported per ticker in order
    #[test]
    fn drift_report_well_formed(case in rebalance_case()) {
        let (holdings, allocation) = case;
        let portfolio = Portfolio::new(to_holdings(&holdings), allocation).unwrap();

        let report = drift::measure(&portfolio);
        prop_assert!(report.tracking_error_pct >= 0.0);
        prop_assert!(report.tracking_error_pct.is_finite());
        for window in report.entries.windows(2) {
            prop_assert!(window[0].ticker < window[1].ticker, "drift entries out of order");
        }
    }
}

// ============================================================================
// REGRESSION TESTS (from proptest failures)
// ============================================================================

#[test]
fn regression_empty_book_suggests_nothing() {
    // Zero equity cannot be sized against: every delta is zero
    let portfolio = Portfolio::new(Vec::new(), vec![("AAPL".to_string(), 1.0)]).unwrap();
    assert!(portfolio.rebalance().unwrap().is_empty());
}

#[test]
fn regression_single_lot_on_target() {
    let holdings = vec![Holding::new("AAPL", 3.0, 333.33)];
    let portfolio = Portfolio::new(holdings, vec![("AAPL".to_string(), 1.0)]).unwrap();
    assert!(portfolio.rebalance().unwrap().is_empty());
}
