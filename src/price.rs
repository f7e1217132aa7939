//! Price resolution: pluggable sources of current prices.
//!
//! Pricing is a capability with swappable implementations, not a concrete
//! type. Holdings carry a [`PriceSource`] so each position can quote itself;
//! the portfolio carries a [`PriceProvider`] for tickers it does not hold.
//!
//! Providers never fail: an unknown ticker resolves to a fallback constant
//! (the original behavior, kept for compatibility). This can silently distort
//! share counts when real quotes are missing; callers who want a loud
//! failure instead should use strict pricing (see
//! [`PricingMode`](crate::PricingMode)), which consults
//! [`PriceProvider::try_price`].

use rustc_hash::FxHashMap;

/// Price assumed for a ticker nobody can quote.
pub const DEFAULT_PRICE: f64 = 100.0;

/// The current unit price of a single instrument.
///
/// Any closure returning `f64` works:
///
/// ```
/// use driftplan::PriceSource;
///
/// let quote = || 150.0;
/// assert_eq!(quote.current_price(), 150.0);
/// ```
pub trait PriceSource {
    fn current_price(&self) -> f64;
}

impl<F> PriceSource for F
where
    F: Fn() -> f64,
{
    fn current_price(&self) -> f64 {
        self()
    }
}

/// Portfolio-level price lookup by ticker.
pub trait PriceProvider {
    /// Current price for `ticker`; falls back to a constant when unknown.
    fn price(&self, ticker: &str) -> f64;

    /// Current price for `ticker`, or `None` when there is no real quote.
    ///
    /// The default implementation assumes every price is real. Providers
    /// that fall back to a constant override this to expose the difference.
    fn try_price(&self, ticker: &str) -> Option<f64> {
        Some(self.price(ticker))
    }
}

/// Provider with no data: every ticker prices at [`DEFAULT_PRICE`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPriceProvider;

impl PriceProvider for DefaultPriceProvider {
    fn price(&self, _ticker: &str) -> f64 {
        DEFAULT_PRICE
    }

    fn try_price(&self, _ticker: &str) -> Option<f64> {
        None
    }
}

/// Fixed ticker → price table with a fallback for unknown tickers.
#[derive(Debug, Clone)]
pub struct StaticPrices {
    prices: FxHashMap<String, f64>,
    fallback: f64,
}

impl StaticPrices {
    /// Build from (ticker, price) pairs with the standard fallback.
    pub fn new(prices: impl IntoIterator<Item = (String, f64)>) -> Self {
        Self::with_fallback(prices, DEFAULT_PRICE)
    }

    /// Build with an explicit fallback price for unknown tickers.
    pub fn with_fallback(prices: impl IntoIterator<Item = (String, f64)>, fallback: f64) -> Self {
        Self {
            prices: prices.into_iter().collect(),
            fallback,
        }
    }
}

impl PriceProvider for StaticPrices {
    fn price(&self, ticker: &str) -> f64 {
        self.prices.get(ticker).copied().unwrap_or(self.fallback)
    }

    fn try_price(&self, ticker: &str) -> Option<f64> {
        self.prices.get(ticker).copied()
    }
}
