use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The fixed set of risk-preference profiles used to size a position.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKind {
    Conservative,
    Moderate,
    Aggressive,
    VolatilityFocused,
    ReturnFocused,
    SharpeOptimized,
}

impl ScenarioKind {
    pub const ALL: [ScenarioKind; 6] = [
        ScenarioKind::Conservative,
        ScenarioKind::Moderate,
        ScenarioKind::Aggressive,
        ScenarioKind::VolatilityFocused,
        ScenarioKind::ReturnFocused,
        ScenarioKind::SharpeOptimized,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Conservative => "conservative",
            Self::Moderate => "moderate",
            Self::Aggressive => "aggressive",
            Self::VolatilityFocused => "volatility_focused",
            Self::ReturnFocused => "return_focused",
            Self::SharpeOptimized => "sharpe_optimized",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RiskTolerance {
    Low,
    LowMedium,
    Medium,
    High,
    VeryHigh,
}

/// Sizing outcome for one profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScenarioProfile {
    pub kind: ScenarioKind,
    /// Risk-aversion coefficient actually used, after modifiers.
    pub risk_aversion: f64,
    /// Recommended position weight, 0.0 to 1.0.
    pub weight: f64,
    pub risk_tolerance: RiskTolerance,
    pub rationale: String,
}

/// Annualized return statistics of the underlying asset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StockMetrics {
    pub expected_return: f64,
    pub volatility: f64,
    pub sharpe_ratio: f64,
    pub last_price: f64,
}

/// Tail-risk statistics over simple period returns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RiskMetrics {
    /// 5th percentile period return, in percent.
    pub var_95_pct: f64,
    /// Mean of period returns at or below the 5th percentile, in percent.
    pub cvar_95_pct: f64,
    /// Worst peak-to-trough decline as a fraction (zero or negative).
    pub max_drawdown: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum OptimizerMode {
    #[default]
    Full,
    /// Most recent trading year only, no tail-risk metrics.
    Lightweight,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OptimizationStatus {
    Complete,
    InsufficientData,
    ComputationFailure,
}

/// Output of the scenario allocation optimizer.
///
/// Degraded results (`status != Complete`) carry no profiles, a zero
/// consensus and a diagnostic; downstream report assembly still proceeds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OptimizationResult {
    pub status: OptimizationStatus,
    pub mode: OptimizerMode,
    pub observations: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<String>,
    pub profiles: BTreeMap<ScenarioKind, ScenarioProfile>,
    pub consensus_weight: f64,
    pub weight_range: (f64, f64),
    pub stock_metrics: Option<StockMetrics>,
    pub risk_metrics: Option<RiskMetrics>,
}

impl OptimizationResult {
    pub fn degraded(
        status: OptimizationStatus,
        mode: OptimizerMode,
        observations: usize,
        diagnostic: impl Into<String>,
    ) -> Self {
        Self {
            status,
            mode,
            observations,
            diagnostic: Some(diagnostic.into()),
            profiles: BTreeMap::new(),
            consensus_weight: 0.0,
            weight_range: (0.0, 0.0),
            stock_metrics: None,
            risk_metrics: None,
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.status != OptimizationStatus::Complete
    }

    pub fn weights(&self) -> Vec<f64> {
        self.profiles.values().map(|p| p.weight).collect()
    }

    pub fn profile(&self, kind: ScenarioKind) -> Option<&ScenarioProfile> {
        self.profiles.get(&kind)
    }
}
