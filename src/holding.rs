//! A single stock holding with its own price source.

use crate::price::PriceSource;

/// An owned position: ticker, share quantity, and a way to price itself.
///
/// Immutable after construction. Rebalancing never mutates a holding;
/// suggestions are advisory output only.
pub struct Holding {
    ticker: String,
    quantity: f64,
    source: Box<dyn PriceSource>,
}

impl Holding {
    /// A holding quoted at a fixed price.
    pub fn new(ticker: impl Into<String>, quantity: f64, price: f64) -> Self {
        Self::with_source(ticker, quantity, move || price)
    }

    /// A holding with a custom price source (a closure or any [`PriceSource`]).
    pub fn with_source(
        ticker: impl Into<String>,
        quantity: f64,
        source: impl PriceSource + 'static,
    ) -> Self {
        Self {
            ticker: ticker.into(),
            quantity,
            source: Box::new(source),
        }
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn quantity(&self) -> f64 {
        self.quantity
    }

    /// Sample the holding's current price.
    pub fn current_price(&self) -> f64 {
        self.source.current_price()
    }

    /// Quantity × current price, sampled now.
    pub fn market_value(&self) -> f64 {
        self.quantity * self.source.current_price()
    }
}

impl std::fmt::Debug for Holding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Holding")
            .field("ticker", &self.ticker)
            .field("quantity", &self.quantity)
            .field("current_price", &self.current_price())
            .finish()
    }
}
