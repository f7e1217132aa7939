//! CLI entry point for driftplan.

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};

use driftplan::Error;
use driftplan::commands;
use driftplan::config::Config;
use driftplan::plan::PlanSpec;

#[derive(Parser)]
#[command(name = "driftplan")]
#[command(about = "Advisory portfolio rebalancer: target weights in, trade suggestions out")]
#[command(version)]
struct Cli {
    /// Path to config.toml (defaults apply when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compute buy/sell suggestions for a plan
    Suggest {
        /// Path to plan.json
        plan: PathBuf,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show holdings and total portfolio value
    Value {
        /// Path to plan.json
        plan: PathBuf,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show per-ticker drift from the target allocation
    Drift {
        /// Path to plan.json
        plan: PathBuf,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Run the built-in two-stock walkthrough
    Demo,
}

fn load_plan(path: &Path) -> PlanSpec {
    match PlanSpec::load(path) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error loading plan: {e}");
            process::exit(1);
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match Config::load(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config: {e}");
                process::exit(1);
            }
        },
        None => Config::default(),
    };

    let result = match cli.command {
        Command::Suggest { plan, json } => {
            let spec = load_plan(&plan);
            commands::run_suggest(&spec, &config, json)
        }
        Command::Value { plan, json } => {
            let spec = load_plan(&plan);
            commands::show_value(&spec, &config, json)
        }
        Command::Drift { plan, json } => {
            let spec = load_plan(&plan);
            commands::show_drift(&spec, &config, json)
        }
        Command::Demo => commands::run_demo(&config),
    };

    if let Err(e) = result {
        match &e {
            Error::ZeroPrice { .. } | Error::UnknownTicker { .. } => {
                eprintln!("\nAborted: {e}");
                process::exit(2);
            }
            _ => {
                eprintln!("Error: {e}");
                process::exit(1);
            }
        }
    }
}
