//! Error types for portfolio construction and rebalancing.

use std::path::PathBuf;

/// All errors that can occur while building a portfolio or computing suggestions.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("allocations must sum to 1.0, got {sum:.3}")]
    AllocationSum { sum: f64 },

    #[error("price for {ticker} must be positive, got {price}")]
    ZeroPrice { ticker: String, price: f64 },

    #[error("no price available for {ticker}")]
    UnknownTicker { ticker: String },

    #[error("plan file error: {0}")]
    Plan(String),

    #[error("failed to read plan file {path}: {source}")]
    PlanRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("config error: {0}")]
    Config(String),

    #[error("failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
