//! tradegraph - trading-agents orchestration core
//!
//! Routes a session through analyst, debate and risk phases and sizes a
//! position across six risk-preference profiles. Language-model calls, tool
//! execution and market data are supplied by the caller through the
//! collaborator traits in [`agents`].
//!
//! # Library Usage
//!
//! ```rust,no_run
//! use tradegraph::agents::{Orchestrator, AnalystRunner, ToolExecutor, PriceSource};
//! use tradegraph::models::{SessionState, TradegraphConfig};
//! use tradegraph::quant::ScenarioOptimizer;
//! ```

pub use tradegraph_agents as agents;
pub use tradegraph_models as models;
pub use tradegraph_quant as quant;

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tradegraph_agents::scripted::{EchoToolExecutor, ScriptedRunner, StaticPriceSource};
use tradegraph_agents::{AgentError, AnalystRunner, Orchestrator, PriceSource, ToolExecutor};
use tradegraph_models::config::TradegraphConfig;
use tradegraph_models::scenario::{OptimizationResult, OptimizerMode};
use tradegraph_quant::ScenarioOptimizer;

/// Load configuration from a TOML file. A missing file yields the defaults.
pub fn load_config(path: impl AsRef<Path>) -> Result<TradegraphConfig, anyhow::Error> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::info!(path = %path.display(), "Config file not found, using defaults");
        return Ok(TradegraphConfig::default());
    }

    let config_str = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    let config: TradegraphConfig =
        toml::from_str(&config_str).with_context(|| "Failed to parse config")?;
    config.validate().context("Invalid config")?;
    Ok(config)
}

/// Build an Orchestrator from configuration and the caller's collaborators.
pub fn build_orchestrator(
    config: &TradegraphConfig,
    runner: Arc<dyn AnalystRunner>,
    tools: Arc<dyn ToolExecutor>,
    prices: Arc<dyn PriceSource>,
) -> Result<Orchestrator, AgentError> {
    Orchestrator::new(runner, tools, prices, config.graph.clone())
}

/// Build an Orchestrator wired to the scripted offline collaborators.
///
/// `prices` feeds the optimizer node; `None` uses a synthetic series.
pub fn build_offline_orchestrator(
    config: &TradegraphConfig,
    prices: Option<Vec<f64>>,
) -> Result<Orchestrator, AgentError> {
    let source = match prices {
        Some(prices) => StaticPriceSource::from_prices(prices),
        None => StaticPriceSource::synthetic(252),
    };
    build_orchestrator(
        config,
        Arc::new(ScriptedRunner::default()),
        Arc::new(EchoToolExecutor),
        Arc::new(source),
    )
}

/// Size a position from a price series.
pub fn optimize(prices: &[f64], mode: OptimizerMode) -> OptimizationResult {
    ScenarioOptimizer::new(mode).optimize(prices)
}
