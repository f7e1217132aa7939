//! Portfolio plan (plan.json) loading and validation.

use std::path::Path;

use chrono::{DateTime, Utc};
use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::holding::Holding;

/// A portfolio plan file: current holdings plus the target allocation.
#[derive(Debug, Clone, Deserialize)]
pub struct PlanSpec {
    #[serde(default)]
    pub as_of: Option<DateTime<Utc>>,
    #[serde(default)]
    pub holdings: Vec<HoldingSpec>,
    pub targets: Vec<TargetWeight>,
    /// Quotes for tickers not held (ticker → price).
    #[serde(default)]
    pub prices: Option<FxHashMap<String, f64>>,
}

/// One held lot: ticker, quantity, and the price it carries.
#[derive(Debug, Clone, Deserialize)]
pub struct HoldingSpec {
    pub ticker: String,
    pub quantity: f64,
    pub price: f64,
}

/// A single target: ticker + weight.
#[derive(Debug, Clone, Deserialize)]
pub struct TargetWeight {
    pub ticker: String,
    pub weight: f64,
}

impl PlanSpec {
    /// Load and validate a plan.json file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::PlanRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let spec: PlanSpec = serde_json::from_str(&contents)?;
        spec.validate()?;
        Ok(spec)
    }

    /// Parse from a JSON string (useful for testing).
    pub fn from_json(json: &str) -> Result<Self> {
        let spec: PlanSpec = serde_json::from_str(json)?;
        spec.validate()?;
        Ok(spec)
    }

    /// Validate field-level constraints.
    ///
    /// The allocation sum is checked when the portfolio is built, not
    /// here. Duplicate holding tickers are allowed; the portfolio keeps
    /// the last entry.
    fn validate(&self) -> Result<()> {
        if self.targets.is_empty() {
            return Err(Error::Plan("targets list is empty".into()));
        }

        // Check for duplicate target tickers
        let mut seen = std::collections::HashSet::new();
        for t in &self.targets {
            if !seen.insert(&t.ticker) {
                return Err(Error::Plan(format!("duplicate target: {}", t.ticker)));
            }
        }

        for t in &self.targets {
            if t.ticker.is_empty() {
                return Err(Error::Plan("empty target ticker".into()));
            }
            // 0.0 is legal: liquidate, rather than leave alone
            if !(0.0..=1.0).contains(&t.weight) {
                return Err(Error::Plan(format!(
                    "weight for {} ({}) is outside [0.0, 1.0]",
                    t.ticker, t.weight
                )));
            }
        }

        for h in &self.holdings {
            if h.ticker.is_empty() {
                return Err(Error::Plan("empty holding ticker".into()));
            }
            if !(h.quantity.is_finite() && h.quantity >= 0.0) {
                return Err(Error::Plan(format!(
                    "quantity for {} ({}) must be finite and non-negative",
                    h.ticker, h.quantity
                )));
            }
            if !(h.price.is_finite() && h.price > 0.0) {
                return Err(Error::Plan(format!(
                    "price for {} ({}) must be positive",
                    h.ticker, h.price
                )));
            }
        }

        if let Some(prices) = &self.prices {
            for (ticker, &price) in prices {
                if !(price.is_finite() && price > 0.0) {
                    return Err(Error::Plan(format!(
                        "quote for {ticker} ({price}) must be positive"
                    )));
                }
            }
        }

        Ok(())
    }

    /// Build the holdings this plan describes.
    pub fn to_holdings(&self) -> Vec<Holding> {
        self.holdings
            .iter()
            .map(|h| Holding::new(h.ticker.clone(), h.quantity, h.price))
            .collect()
    }

    /// Get (ticker, weight) pairs for portfolio construction.
    pub fn as_target_pairs(&self) -> Vec<(String, f64)> {
        self.targets
            .iter()
            .map(|t| (t.ticker.clone(), t.weight))
            .collect()
    }

    /// Get the plan's quote overrides as owned pairs.
    pub fn price_overrides(&self) -> Vec<(String, f64)> {
        self.prices
            .iter()
            .flat_map(|m| m.iter().map(|(t, &p)| (t.clone(), p)))
            .collect()
    }
}
