//! # driftplan
//!
//! An advisory stock portfolio rebalancer: target weights in, buy/sell
//! suggestions out.
//!
//! Suggestions are advisory. Nothing here talks to a broker or places
//! orders.
//!
//! ## Features
//!
//! - **Holdings with live price sources**: each position carries its own quote source (fixed or closure)
//! - **Buy/sell suggestions**: fractional share counts, sized off a single price snapshot per pass
//! - **Pluggable price providers**: quote target tickers you do not hold yet
//! - **Drift reports**: per-ticker deviation from target plus tracking error
//! - **Plan files**: JSON holdings and targets in, human-readable or JSON output
//!
//! ## Quick Start
//!
//! ```
//! use driftplan::{Action, Holding, Portfolio};
//!
//! let holdings = vec![
//!     Holding::new("AAPL", 10.0, 150.0),
//!     Holding::new("META", 5.0, 300.0),
//! ];
//! let targets = vec![("AAPL".to_string(), 0.6), ("META".to_string(), 0.4)];
//!
//! let portfolio = Portfolio::new(holdings, targets).unwrap();
//! let suggestions = portfolio.rebalance().unwrap();
//!
//! assert_eq!(suggestions.len(), 2);
//! assert_eq!(suggestions[0].action, Action::Buy);   // AAPL is underweight
//! assert_eq!(suggestions[1].action, Action::Sell);  // META is overweight
//! assert_eq!(format!("{}", suggestions[0]), "buy 2.00 shares of AAPL");
//! ```
//!
//! ## Price Providers
//!
//! Target tickers not currently held are priced through the portfolio's
//! [`PriceProvider`]. The default provider quotes a flat
//! [`DEFAULT_PRICE`]; plug in your own to quote new positions properly:
//!
//! ```
//! use driftplan::{Holding, Portfolio, StaticPrices};
//!
//! let holdings = vec![Holding::new("AAPL", 10.0, 100.0)];
//! let targets = vec![("AAPL".to_string(), 0.5), ("GOOGL".to_string(), 0.5)];
//!
//! let mut portfolio = Portfolio::new(holdings, targets).unwrap();
//! portfolio.set_price_provider(StaticPrices::new([("GOOGL".to_string(), 125.0)]));
//!
//! let suggestions = portfolio.rebalance().unwrap();
//! assert_eq!(format!("{}", suggestions[1]), "buy 4.00 shares of GOOGL");
//! ```
//!
//! ## Live Price Sources
//!
//! A holding's price does not have to be fixed. Any closure returning
//! `f64` works as a price source:
//!
//! ```
//! use driftplan::Holding;
//!
//! let holding = Holding::with_source("AAPL", 10.0, || 150.0);
//! assert_eq!(holding.market_value(), 1500.0);
//! ```
//!
//! ## Plan Files
//!
//! The CLI reads plans as JSON: current holdings, target weights, and
//! optional quotes for tickers not yet held:
//!
//! ```
//! use driftplan::PlanSpec;
//!
//! let plan = PlanSpec::from_json(r#"{
//!     "holdings": [{ "ticker": "AAPL", "quantity": 10, "price": 150.0 }],
//!     "targets":  [{ "ticker": "AAPL", "weight": 1.0 }]
//! }"#).unwrap();
//! assert_eq!(plan.holdings.len(), 1);
//! ```

pub mod commands;
pub mod config;
pub mod drift;
mod error;
mod holding;
pub mod plan;
mod portfolio;
mod price;
mod suggestion;

// Re-export public API
pub use drift::{DriftEntry, DriftReport};
pub use error::{Error, Result};
pub use holding::Holding;
pub use plan::{HoldingSpec, PlanSpec, TargetWeight};
pub use portfolio::{MAX_ALLOCATION_SUM, MIN_ALLOCATION_SUM, Portfolio, PricingMode};
pub use price::{DEFAULT_PRICE, DefaultPriceProvider, PriceProvider, PriceSource, StaticPrices};
pub use suggestion::{Action, Suggestion};
