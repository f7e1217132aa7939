//! TOML configuration loading and validation.

use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::portfolio::PricingMode;
use crate::price::DEFAULT_PRICE;

/// Top-level configuration.
///
/// Every field has a default, so running without a config file means
/// `Config::default()`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub pricing: PricingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PricingConfig {
    /// Price assumed for tickers nobody can quote.
    #[serde(default = "default_fallback_price")]
    pub fallback_price: f64,
    /// Fail the run on an unquotable ticker instead of falling back.
    #[serde(default)]
    pub strict: bool,
}

fn default_fallback_price() -> f64 {
    DEFAULT_PRICE
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            fallback_price: DEFAULT_PRICE,
            strict: false,
        }
    }
}

impl Config {
    /// Load config from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::ConfigRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate config invariants.
    fn validate(&self) -> Result<()> {
        if !(self.pricing.fallback_price.is_finite() && self.pricing.fallback_price > 0.0) {
            return Err(Error::Config("fallback_price must be > 0".into()));
        }
        Ok(())
    }

    /// Pricing mode selected by this config.
    pub fn pricing_mode(&self) -> PricingMode {
        if self.pricing.strict {
            PricingMode::Strict
        } else {
            PricingMode::Fallback
        }
    }
}
