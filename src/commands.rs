//! Command orchestration: plan in, printed report out.

use log::{debug, info, warn};

use crate::config::Config;
use crate::drift;
use crate::error::Result;
use crate::holding::Holding;
use crate::plan::PlanSpec;
use crate::portfolio::Portfolio;
use crate::price::StaticPrices;
use crate::suggestion::Suggestion;

/// Build a portfolio from a plan and the active config.
///
/// The plan's quote overrides become the portfolio's price provider,
/// with the configured fallback price behind them.
pub fn build_portfolio(plan: &PlanSpec, config: &Config) -> Result<Portfolio> {
    let mut portfolio = Portfolio::new(plan.to_holdings(), plan.as_target_pairs())?;

    for h in &plan.holdings {
        if !plan.targets.iter().any(|t| t.ticker == h.ticker) {
            warn!("{} is held but not targeted; it will not be adjusted", h.ticker);
        }
    }

    let overrides = plan.price_overrides();
    if !overrides.is_empty() {
        info!("Using {} quote override(s) from the plan", overrides.len());
        for (ticker, price) in &overrides {
            debug!("Quote override: {ticker} @ ${price:.2}");
        }
    }
    portfolio.set_price_provider(StaticPrices::with_fallback(
        overrides,
        config.pricing.fallback_price,
    ));
    portfolio.set_pricing_mode(config.pricing_mode());

    Ok(portfolio)
}

/// Compute and print rebalance suggestions for a plan.
pub fn run_suggest(plan: &PlanSpec, config: &Config, json: bool) -> Result<()> {
    let portfolio = build_portfolio(plan, config)?;
    let suggestions = portfolio.rebalance()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&suggestions)?);
        return Ok(());
    }

    print_suggestions(&suggestions);
    Ok(())
}

/// Print the portfolio's holdings and total value.
pub fn show_value(plan: &PlanSpec, config: &Config, json: bool) -> Result<()> {
    let portfolio = build_portfolio(plan, config)?;
    let rows = holding_rows(&portfolio);
    let total: f64 = rows.iter().map(|(_, quantity, price)| quantity * price).sum();

    if json {
        let holdings: Vec<serde_json::Value> = rows
            .iter()
            .map(|(ticker, quantity, price)| {
                serde_json::json!({
                    "ticker": ticker,
                    "quantity": quantity,
                    "price": price,
                    "value": quantity * price,
                })
            })
            .collect();
        let out = serde_json::json!({ "total_value": total, "holdings": holdings });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!("No holdings.");
    } else {
        println!("HOLDINGS:");
        for (ticker, quantity, price) in &rows {
            let value = quantity * price;
            let weight = if total > 0.0 { value / total } else { 0.0 };
            println!(
                "  {:8} {:>10.2} @ ${:>8.2} = ${:>10.2}  ({:.1}%)",
                ticker,
                quantity,
                price,
                value,
                weight * 100.0,
            );
        }
    }
    println!("\nTotal value: ${total:.2}");
    Ok(())
}

/// Print the drift report for a plan.
pub fn show_drift(plan: &PlanSpec, config: &Config, json: bool) -> Result<()> {
    let portfolio = build_portfolio(plan, config)?;
    let report = drift::measure(&portfolio);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print!("{report}");
    Ok(())
}

/// Run the canonical two-stock walkthrough with no input file.
pub fn run_demo(config: &Config) -> Result<()> {
    let holdings = vec![
        Holding::with_source("AAPL", 10.0, || 150.0),
        Holding::with_source("META", 5.0, || 300.0),
    ];
    let allocation = vec![("AAPL".to_string(), 0.6), ("META".to_string(), 0.4)];

    let mut portfolio = Portfolio::new(holdings, allocation)?;
    portfolio.set_price_provider(StaticPrices::with_fallback(
        [
            ("AAPL".to_string(), 150.0),
            ("META".to_string(), 300.0),
            ("GOOGL".to_string(), 120.0),
        ],
        config.pricing.fallback_price,
    ));
    portfolio.set_pricing_mode(config.pricing_mode());

    let suggestions = portfolio.rebalance()?;
    print_suggestions(&suggestions);
    Ok(())
}

// === Helpers ===

fn print_suggestions(suggestions: &[Suggestion]) {
    if suggestions.is_empty() {
        println!("No rebalancing needed: portfolio matches target.");
        return;
    }
    for suggestion in suggestions {
        println!("{suggestion}");
    }
}

/// One price sample per holding, sorted by ticker.
fn holding_rows(portfolio: &Portfolio) -> Vec<(String, f64, f64)> {
    let mut rows: Vec<(String, f64, f64)> = portfolio
        .holdings()
        .map(|h| (h.ticker().to_string(), h.quantity(), h.current_price()))
        .collect();
    rows.sort_by(|a, b| a.0.cmp(&b.0));
    rows
}
