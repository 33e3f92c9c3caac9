use std::collections::BTreeMap;

use tracing::{debug, warn};
use tradegraph_models::scenario::{
    OptimizationResult, OptimizationStatus, OptimizerMode, RiskMetrics, RiskTolerance,
    ScenarioKind, ScenarioProfile, StockMetrics,
};

use crate::error::QuantError;
use crate::stats;

pub const TRADING_DAYS: f64 = 252.0;
pub const RISK_FREE_RATE: f64 = 0.025;
pub const MIN_OBSERVATIONS: usize = 50;
/// Observations kept by the lightweight variant (one trading year).
pub const LIGHTWEIGHT_WINDOW: usize = 252;
/// Volatility above which the volatility-focused profile scales up its risk aversion.
pub const HIGH_VOLATILITY: f64 = 0.40;

/// Mean-variance position sizing across the six fixed risk profiles.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScenarioOptimizer {
    mode: OptimizerMode,
}

impl ScenarioOptimizer {
    pub fn new(mode: OptimizerMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> OptimizerMode {
        self.mode
    }

    /// Size a position from a chronological price series.
    ///
    /// Never fails: short series and numeric faults come back as degraded
    /// results with a diagnostic.
    pub fn optimize(&self, prices: &[f64]) -> OptimizationResult {
        let observations = self.window(prices).len();
        match self.try_optimize(prices) {
            Ok(result) => result,
            Err(e) => {
                let status = match e {
                    QuantError::InsufficientData { .. } => OptimizationStatus::InsufficientData,
                    QuantError::ComputationFailure(_) => OptimizationStatus::ComputationFailure,
                };
                warn!(error = %e, observations, "Scenario optimization degraded");
                OptimizationResult::degraded(status, self.mode, observations, e.to_string())
            }
        }
    }

    pub fn try_optimize(&self, prices: &[f64]) -> Result<OptimizationResult, QuantError> {
        let prices = self.window(prices);
        if prices.len() < MIN_OBSERVATIONS {
            return Err(QuantError::InsufficientData {
                observations: prices.len(),
                required: MIN_OBSERVATIONS,
            });
        }
        if let Some(i) = prices.iter().position(|p| !p.is_finite() || *p <= 0.0) {
            return Err(QuantError::ComputationFailure(format!(
                "price at index {i} is not a positive finite number"
            )));
        }

        let returns = stats::simple_returns(prices);
        let expected_return = stats::mean(&returns) * TRADING_DAYS;
        let volatility = stats::sample_std(&returns) * TRADING_DAYS.sqrt();
        let sharpe_ratio = if volatility == 0.0 {
            0.0
        } else {
            (expected_return - RISK_FREE_RATE) / volatility
        };
        ensure_finite("expected return", expected_return)?;
        ensure_finite("volatility", volatility)?;
        ensure_finite("sharpe ratio", sharpe_ratio)?;

        let stock_metrics = StockMetrics {
            expected_return,
            volatility,
            sharpe_ratio,
            last_price: prices[prices.len() - 1],
        };

        let risk_metrics = match self.mode {
            OptimizerMode::Full => Some(risk_metrics(prices, &returns)?),
            OptimizerMode::Lightweight => None,
        };

        let mut profiles = BTreeMap::new();
        for kind in ScenarioKind::ALL {
            let gamma = risk_aversion(kind, volatility, sharpe_ratio);
            let weight = optimal_weight(expected_return, volatility, gamma)?;
            profiles.insert(
                kind,
                ScenarioProfile {
                    kind,
                    risk_aversion: gamma,
                    weight,
                    risk_tolerance: risk_tolerance(kind, gamma),
                    rationale: rationale(kind, gamma, volatility, sharpe_ratio),
                },
            );
        }

        let weights: Vec<f64> = profiles.values().map(|p| p.weight).collect();
        let consensus_weight = stats::median(&weights);
        let min = weights.iter().copied().fold(f64::INFINITY, f64::min);
        let max = weights.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        ensure_finite("consensus weight", consensus_weight)?;

        debug!(
            expected_return,
            volatility,
            sharpe_ratio,
            consensus_weight,
            observations = prices.len(),
            "Scenario optimization complete"
        );

        Ok(OptimizationResult {
            status: OptimizationStatus::Complete,
            mode: self.mode,
            observations: prices.len(),
            diagnostic: None,
            profiles,
            consensus_weight,
            weight_range: (min, max),
            stock_metrics: Some(stock_metrics),
            risk_metrics,
        })
    }

    fn window<'a>(&self, prices: &'a [f64]) -> &'a [f64] {
        match self.mode {
            OptimizerMode::Full => prices,
            OptimizerMode::Lightweight => {
                &prices[prices.len().saturating_sub(LIGHTWEIGHT_WINDOW)..]
            }
        }
    }
}

/// Single-period mean-variance optimum `(mu - rf) / (gamma * sigma^2)`, clamped to [0, 1].
///
/// With zero variance the weight saturates: 1 when the excess return is
/// positive, otherwise 0.
pub fn optimal_weight(
    expected_return: f64,
    volatility: f64,
    gamma: f64,
) -> Result<f64, QuantError> {
    let excess = expected_return - RISK_FREE_RATE;
    let variance = volatility * volatility;
    if variance == 0.0 {
        return Ok(if excess > 0.0 { 1.0 } else { 0.0 });
    }
    let raw = excess / (gamma * variance);
    ensure_finite("profile weight", raw)?;
    Ok(raw.clamp(0.0, 1.0))
}

/// Risk-aversion coefficient for a profile, after its modifier.
pub fn risk_aversion(kind: ScenarioKind, volatility: f64, sharpe_ratio: f64) -> f64 {
    match kind {
        ScenarioKind::Conservative => 15.0,
        ScenarioKind::Moderate => 10.0,
        ScenarioKind::Aggressive => 6.0,
        ScenarioKind::VolatilityFocused => {
            if volatility > HIGH_VOLATILITY {
                12.0 * 1.5
            } else {
                12.0
            }
        }
        ScenarioKind::ReturnFocused => 5.0,
        ScenarioKind::SharpeOptimized => {
            if sharpe_ratio > 1.5 {
                8.0
            } else if sharpe_ratio > 1.0 {
                10.0
            } else {
                12.0
            }
        }
    }
}

fn risk_tolerance(kind: ScenarioKind, gamma: f64) -> RiskTolerance {
    match kind {
        ScenarioKind::Conservative => RiskTolerance::Low,
        ScenarioKind::Moderate => RiskTolerance::Medium,
        ScenarioKind::Aggressive => RiskTolerance::High,
        ScenarioKind::VolatilityFocused => RiskTolerance::LowMedium,
        ScenarioKind::ReturnFocused => RiskTolerance::VeryHigh,
        ScenarioKind::SharpeOptimized => {
            if gamma <= 8.0 {
                RiskTolerance::High
            } else if gamma <= 10.0 {
                RiskTolerance::Medium
            } else {
                RiskTolerance::LowMedium
            }
        }
    }
}

fn rationale(kind: ScenarioKind, gamma: f64, volatility: f64, sharpe_ratio: f64) -> String {
    match kind {
        ScenarioKind::Conservative => {
            "High risk aversion; prioritizes capital preservation over upside".to_string()
        }
        ScenarioKind::Moderate => {
            "Balanced trade-off between expected return and variance".to_string()
        }
        ScenarioKind::Aggressive => {
            "Low risk aversion; accepts larger swings for higher expected return".to_string()
        }
        ScenarioKind::VolatilityFocused => {
            if volatility > HIGH_VOLATILITY {
                format!(
                    "Annualized volatility {:.1}% exceeds {:.0}%; risk aversion raised to {gamma:.0}",
                    volatility * 100.0,
                    HIGH_VOLATILITY * 100.0
                )
            } else {
                format!(
                    "Annualized volatility {:.1}% within tolerance; base risk aversion {gamma:.0}",
                    volatility * 100.0
                )
            }
        }
        ScenarioKind::ReturnFocused => {
            "Minimal risk aversion; sizes primarily on expected excess return".to_string()
        }
        ScenarioKind::SharpeOptimized => {
            format!("Sharpe ratio {sharpe_ratio:.2} selects risk aversion {gamma:.0}")
        }
    }
}

fn risk_metrics(prices: &[f64], returns: &[f64]) -> Result<RiskMetrics, QuantError> {
    let var = stats::percentile(returns, 5.0);
    let cvar = stats::tail_mean(returns, var);
    let metrics = RiskMetrics {
        var_95_pct: var * 100.0,
        cvar_95_pct: cvar * 100.0,
        max_drawdown: stats::max_drawdown(prices),
    };
    ensure_finite("VaR 95", metrics.var_95_pct)?;
    ensure_finite("CVaR 95", metrics.cvar_95_pct)?;
    ensure_finite("max drawdown", metrics.max_drawdown)?;
    Ok(metrics)
}

fn ensure_finite(what: &str, value: f64) -> Result<(), QuantError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(QuantError::ComputationFailure(format!(
            "{what} is not finite ({value})"
        )))
    }
}
