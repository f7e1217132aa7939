//! Portfolio construction, valuation, and the rebalance pass.

use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::holding::Holding;
use crate::price::{DefaultPriceProvider, PriceProvider};
use crate::suggestion::{Action, Suggestion};

/// Lowest acceptable allocation sum.
pub const MIN_ALLOCATION_SUM: f64 = 0.99;
/// Highest acceptable allocation sum.
pub const MAX_ALLOCATION_SUM: f64 = 1.01;

/// How target tickers with no real quote are priced during a rebalance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PricingMode {
    /// Unknown tickers price at the provider's fallback constant.
    #[default]
    Fallback,
    /// Unknown tickers fail the rebalance with
    /// [`Error::UnknownTicker`](crate::Error::UnknownTicker).
    Strict,
}

/// A set of holdings plus the target allocation to rebalance toward.
///
/// Construction validates the targets; afterwards the portfolio is
/// read-only except for swapping the price provider and pricing mode.
/// Not synchronized: concurrent use needs external locking.
pub struct Portfolio {
    holdings: FxHashMap<String, Holding>,
    allocation: FxHashMap<String, f64>,
    provider: Box<dyn PriceProvider>,
    mode: PricingMode,
}

impl Portfolio {
    /// Build a portfolio from holdings and a target allocation.
    ///
    /// Duplicate tickers in `holdings` keep the last entry. The target
    /// weights must sum to 1.0 within ±0.01; nothing else is validated
    /// here (plan files get stricter checks at load time). Starts with
    /// the default price provider installed.
    pub fn new(
        holdings: impl IntoIterator<Item = Holding>,
        allocation: impl IntoIterator<Item = (String, f64)>,
    ) -> Result<Self> {
        let holdings: FxHashMap<String, Holding> = holdings
            .into_iter()
            .map(|h| (h.ticker().to_string(), h))
            .collect();
        let allocation: FxHashMap<String, f64> = allocation.into_iter().collect();

        let sum: f64 = allocation.values().sum();
        if !(MIN_ALLOCATION_SUM..=MAX_ALLOCATION_SUM).contains(&sum) {
            return Err(Error::AllocationSum { sum });
        }

        Ok(Self {
            holdings,
            allocation,
            provider: Box::new(DefaultPriceProvider),
            mode: PricingMode::default(),
        })
    }

    /// Swap the portfolio-level price provider. No validation; callable
    /// any number of times.
    pub fn set_price_provider(&mut self, provider: impl PriceProvider + 'static) {
        self.provider = Box::new(provider);
    }

    /// Select how unquotable target tickers are handled.
    pub fn set_pricing_mode(&mut self, mode: PricingMode) {
        self.mode = mode;
    }

    // === Queries ===

    /// Get a holding by ticker, if held.
    pub fn holding(&self, ticker: &str) -> Option<&Holding> {
        self.holdings.get(ticker)
    }

    /// Iterator over all holdings.
    pub fn holdings(&self) -> impl Iterator<Item = &Holding> {
        self.holdings.values()
    }

    /// Iterator over (ticker, weight) targets.
    pub fn allocation(&self) -> impl Iterator<Item = (&str, f64)> {
        self.allocation.iter().map(|(t, &w)| (t.as_str(), w))
    }

    /// Total market value: Σ quantity × current price over holdings.
    ///
    /// Prices are sampled live on every call, so the result is only as
    /// fresh as each holding's source. `rebalance` takes its own one-shot
    /// snapshot instead of calling this repeatedly.
    pub fn total_value(&self) -> f64 {
        self.holdings.values().map(Holding::market_value).sum()
    }

    /// Current weights as (ticker, weight) pairs, sorted by ticker.
    ///
    /// Each holding's price is sampled exactly once. Empty when the
    /// portfolio holds nothing of value.
    pub fn current_weights(&self) -> Vec<(String, f64)> {
        let values: Vec<(String, f64)> = self
            .holdings
            .values()
            .map(|h| (h.ticker().to_string(), h.market_value()))
            .collect();

        let total: f64 = values.iter().map(|(_, v)| v).sum();
        if total <= 0.0 {
            return Vec::new();
        }

        let mut weights: Vec<(String, f64)> = values
            .into_iter()
            .map(|(ticker, value)| (ticker, value / total))
            .collect();
        weights.sort_by(|a, b| a.0.cmp(&b.0));
        weights
    }

    // === Rebalance ===

    /// Compute the trades that would bring the portfolio to its target
    /// allocation, sorted by ticker.
    ///
    /// Every held price is sampled exactly once; the baseline total value
    /// and all deltas come from that snapshot, so time-varying sources
    /// cannot skew targets against each other mid-pass. Tickers held but
    /// absent from the targets are left alone. A resolved price that is
    /// not finite and positive fails the whole call with
    /// [`Error::ZeroPrice`](crate::Error::ZeroPrice).
    pub fn rebalance(&self) -> Result<Vec<Suggestion>> {
        let mut held_prices: FxHashMap<&str, f64> = FxHashMap::default();
        let mut total = 0.0_f64;
        for holding in self.holdings.values() {
            let price = holding.current_price();
            total += holding.quantity() * price;
            held_prices.insert(holding.ticker(), price);
        }

        let mut targets: Vec<(&str, f64)> = self
            .allocation
            .iter()
            .map(|(t, &w)| (t.as_str(), w))
            .collect();
        targets.sort_by(|a, b| a.0.cmp(b.0));

        let mut suggestions = Vec::new();

        for (ticker, weight) in targets {
            let current_value = match (self.holdings.get(ticker), held_prices.get(ticker)) {
                (Some(holding), Some(&price)) => holding.quantity() * price,
                _ => 0.0,
            };

            let delta = total * weight - current_value;
            let action = match delta {
                d if d > 0.0 => Action::Buy,
                d if d < 0.0 => Action::Sell,
                // Exactly on target (or no measurable value at all).
                _ => continue,
            };

            let price = self.resolve_price(ticker, &held_prices)?;
            if !(price.is_finite() && price > 0.0) {
                return Err(Error::ZeroPrice {
                    ticker: ticker.to_string(),
                    price,
                });
            }

            suggestions.push(Suggestion {
                ticker: ticker.to_string(),
                action,
                shares: delta.abs() / price,
            });
        }

        Ok(suggestions)
    }

    /// Price used to size a suggestion: the held snapshot when held,
    /// otherwise the portfolio provider per the pricing mode.
    fn resolve_price(&self, ticker: &str, held_prices: &FxHashMap<&str, f64>) -> Result<f64> {
        if let Some(&price) = held_prices.get(ticker) {
            return Ok(price);
        }
        match self.mode {
            PricingMode::Fallback => Ok(self.provider.price(ticker)),
            PricingMode::Strict => {
                self.provider
                    .try_price(ticker)
                    .ok_or_else(|| Error::UnknownTicker {
                        ticker: ticker.to_string(),
                    })
            }
        }
    }
}

impl std::fmt::Debug for Portfolio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Portfolio")
            .field("holdings", &self.holdings)
            .field("allocation", &self.allocation)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}
