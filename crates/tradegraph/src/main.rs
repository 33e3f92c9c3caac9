use std::io::Read;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tradegraph_models::scenario::OptimizerMode;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "tradegraph",
    about = "Trading-agents orchestration core: graph routing and scenario position sizing"
)]
struct Cli {
    /// Path to configuration file (defaults are used if it does not exist)
    #[arg(short, long, default_value = "config/tradegraph.toml", global = true)]
    config: String,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Size a position from a JSON array of prices
    Optimize {
        /// Read the price array from a file instead of stdin
        #[arg(short, long)]
        input: Option<String>,

        /// Use the lightweight optimizer regardless of config
        #[arg(long)]
        lightweight: bool,

        /// Pretty-print the output JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Run one full session with the scripted offline collaborators
    Simulate {
        #[arg(short, long)]
        ticker: String,

        /// Trade date (YYYY-MM-DD)
        #[arg(short, long)]
        date: NaiveDate,

        /// JSON array of prices for the optimizer node (synthetic if omitted)
        #[arg(short, long)]
        input: Option<String>,

        /// Pretty-print the output JSON
        #[arg(long)]
        pretty: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing (respects RUST_LOG env var)
    if cli.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init();
    }

    let config = tradegraph::load_config(&cli.config)?;

    let output = match cli.command {
        Command::Optimize {
            input,
            lightweight,
            pretty,
        } => {
            let prices = read_prices(input.as_deref())?;
            let mode = if lightweight {
                OptimizerMode::Lightweight
            } else {
                config.graph.optimizer_mode()
            };
            let result = tradegraph::optimize(&prices, mode);
            to_json(serde_json::to_value(&result)?, pretty)?
        }
        Command::Simulate {
            ticker,
            date,
            input,
            pretty,
        } => {
            let prices = match input.as_deref() {
                Some(path) => Some(read_prices(Some(path))?),
                None => None,
            };
            let orchestrator = tradegraph::build_offline_orchestrator(&config, prices)
                .context("Failed to build orchestrator")?;
            let (state, ctx) = orchestrator
                .evaluate(&ticker, date)
                .await
                .map_err(|e| anyhow::anyhow!("Session failed: {e}"))?;
            to_json(serde_json::json!({ "state": state, "context": ctx }), pretty)?
        }
    };

    println!("{output}");
    Ok(())
}

fn read_prices(input: Option<&str>) -> Result<Vec<f64>> {
    let json = if let Some(path) = input {
        std::fs::read_to_string(path).with_context(|| format!("Failed to read input: {path}"))?
    } else {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read from stdin")?;
        buf
    };
    serde_json::from_str(&json).context("Failed to parse price array JSON")
}

fn to_json(value: serde_json::Value, pretty: bool) -> Result<String> {
    let output = if pretty {
        serde_json::to_string_pretty(&value)?
    } else {
        serde_json::to_string(&value)?
    };
    Ok(output)
}
