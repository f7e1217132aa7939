//! Rebalance suggestions: the advisory output of the engine.

use serde::Serialize;

/// Trade direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Buy,
    Sell,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Buy => write!(f, "buy"),
            Action::Sell => write!(f, "sell"),
        }
    }
}

/// A single suggested trade.
///
/// `shares` is always positive; the direction lives in `action`. Nothing
/// executes these: they are advice, produced fresh on each rebalance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestion {
    pub ticker: String,
    pub action: Action,
    pub shares: f64,
}

impl std::fmt::Display for Suggestion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {:.2} shares of {}",
            self.action, self.shares, self.ticker
        )
    }
}
