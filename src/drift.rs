//! Drift measurement: how far current weights sit from the target.

use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::portfolio::Portfolio;

/// Drift report comparing current vs target weights.
#[derive(Debug, Clone, Serialize)]
pub struct DriftReport {
    pub entries: Vec<DriftEntry>,
    pub tracking_error_pct: f64,
}

/// One ticker's drift entry.
#[derive(Debug, Clone, Serialize)]
pub struct DriftEntry {
    pub ticker: String,
    pub target_weight: f64,
    pub current_weight: f64,
    pub drift: f64,
}

/// Measure how far the portfolio has drifted from its target allocation.
///
/// Weights come from one price sample per holding. Tickers present on
/// only one side (held but untargeted, or targeted but unheld) appear
/// with the missing side at zero. Tracking error is the root mean square
/// of per-ticker drift, in percent.
pub fn measure(portfolio: &Portfolio) -> DriftReport {
    let target_map: FxHashMap<&str, f64> = portfolio.allocation().collect();
    let current_map: FxHashMap<String, f64> = portfolio.current_weights().into_iter().collect();

    // Collect all tickers from both target and current
    let mut all_tickers: Vec<String> = target_map.keys().map(|t| t.to_string()).collect();
    for ticker in current_map.keys() {
        if !target_map.contains_key(ticker.as_str()) {
            all_tickers.push(ticker.clone());
        }
    }
    all_tickers.sort();
    all_tickers.dedup();

    let mut entries = Vec::new();
    let mut sum_sq_drift = 0.0_f64;

    for ticker in &all_tickers {
        let target_weight = target_map.get(ticker.as_str()).copied().unwrap_or(0.0);
        let current_weight = current_map.get(ticker).copied().unwrap_or(0.0);

        let drift = current_weight - target_weight;
        sum_sq_drift += drift * drift;

        entries.push(DriftEntry {
            ticker: ticker.clone(),
            target_weight,
            current_weight,
            drift,
        });
    }

    let tracking_error_pct = (sum_sq_drift / all_tickers.len().max(1) as f64).sqrt() * 100.0;

    DriftReport {
        entries,
        tracking_error_pct,
    }
}

impl std::fmt::Display for DriftReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "DRIFT:")?;
        writeln!(
            f,
            "  {:8} {:>10} {:>10} {:>10}",
            "Ticker", "Target%", "Current%", "Drift%"
        )?;
        for e in &self.entries {
            writeln!(
                f,
                "  {:8} {:>9.2}% {:>9.2}% {:>+9.2}%",
                e.ticker,
                e.target_weight * 100.0,
                e.current_weight * 100.0,
                e.drift * 100.0,
            )?;
        }
        writeln!(f, "\n  Tracking error: {:.3}%", self.tracking_error_pct)?;
        Ok(())
    }
}
