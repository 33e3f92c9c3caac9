use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::node::AnalystCategory;
use crate::scenario::OptimizerMode;

/// Top-level configuration for tradegraph.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TradegraphConfig {
    #[serde(default)]
    pub graph: GraphConfig,
}

impl TradegraphConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.graph.validate()
    }
}

/// Configuration for the orchestration graph.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GraphConfig {
    /// Bull/Bear rounds; the debate ends after `2 * max_debate_rounds` turns.
    #[serde(default = "default_rounds")]
    pub max_debate_rounds: u32,
    /// Risky/Safe/Neutral rounds; the discussion ends after `3 * max_risk_discuss_rounds` turns.
    #[serde(default = "default_rounds")]
    pub max_risk_discuss_rounds: u32,
    /// When false, analyst categories without an offline dataset are skipped.
    #[serde(default = "default_true")]
    pub online_tools: bool,
    /// Run the reduced scenario optimizer instead of the full one.
    #[serde(default)]
    pub lightweight_quantitative: bool,
    /// Analysts to run, in order.
    #[serde(default = "default_selected_analysts")]
    pub selected_analysts: Vec<AnalystCategory>,
    /// Upper bound on executed nodes for one session.
    #[serde(default = "default_max_steps")]
    pub max_steps: u32,
    /// Include the scenario optimizer node after the analysts.
    #[serde(default = "default_true")]
    pub scenario_analysis: bool,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            max_debate_rounds: default_rounds(),
            max_risk_discuss_rounds: default_rounds(),
            online_tools: true,
            lightweight_quantitative: false,
            selected_analysts: default_selected_analysts(),
            max_steps: default_max_steps(),
            scenario_analysis: true,
        }
    }
}

impl GraphConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_debate_rounds == 0 {
            return Err(ConfigError::invalid("max_debate_rounds", "must be at least 1"));
        }
        if self.max_risk_discuss_rounds == 0 {
            return Err(ConfigError::invalid(
                "max_risk_discuss_rounds",
                "must be at least 1",
            ));
        }
        if self.max_steps == 0 {
            return Err(ConfigError::invalid("max_steps", "must be at least 1"));
        }
        for (i, category) in self.selected_analysts.iter().enumerate() {
            if self.selected_analysts[..i].contains(category) {
                return Err(ConfigError::invalid(
                    "selected_analysts",
                    format!("{category} listed more than once"),
                ));
            }
        }
        if self.eligible_analysts().is_empty() {
            return Err(ConfigError::invalid(
                "selected_analysts",
                "no selected analyst can run with the current online_tools setting",
            ));
        }
        Ok(())
    }

    /// Selected analysts that can run given `online_tools`, in configured order.
    pub fn eligible_analysts(&self) -> Vec<AnalystCategory> {
        self.selected_analysts
            .iter()
            .copied()
            .filter(|c| self.online_tools || !c.requires_online_tools())
            .collect()
    }

    pub fn optimizer_mode(&self) -> OptimizerMode {
        if self.lightweight_quantitative {
            OptimizerMode::Lightweight
        } else {
            OptimizerMode::Full
        }
    }
}

fn default_rounds() -> u32 {
    1
}
fn default_true() -> bool {
    true
}
fn default_selected_analysts() -> Vec<AnalystCategory> {
    vec![
        AnalystCategory::Market,
        AnalystCategory::Social,
        AnalystCategory::News,
        AnalystCategory::Fundamentals,
    ]
}
fn default_max_steps() -> u32 {
    100
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let graph = GraphConfig::default();
        assert_eq!(graph.max_debate_rounds, 1);
        assert_eq!(graph.max_risk_discuss_rounds, 1);
        assert!(graph.online_tools);
        assert!(!graph.lightweight_quantitative);
        assert_eq!(graph.selected_analysts.len(), 4);
        assert_eq!(graph.optimizer_mode(), OptimizerMode::Full);
        assert!(graph.validate().is_ok());
    }

    #[test]
    fn config_from_toml() {
        let toml_str = r#"
[graph]
max_debate_rounds = 2
max_risk_discuss_rounds = 3
online_tools = false
lightweight_quantitative = true
selected_analysts = ["market", "macro", "news"]
"#;

        let config: TradegraphConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.graph.max_debate_rounds, 2);
        assert_eq!(config.graph.max_risk_discuss_rounds, 3);
        assert_eq!(config.graph.optimizer_mode(), OptimizerMode::Lightweight);
        assert_eq!(config.graph.max_steps, 100);
        // macro needs online tools
        assert_eq!(
            config.graph.eligible_analysts(),
            vec![AnalystCategory::Market, AnalystCategory::News]
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_toml_uses_defaults() {
        let config: TradegraphConfig = toml::from_str("").unwrap();
        assert_eq!(config, TradegraphConfig::default());
    }

    #[test]
    fn zero_rounds_rejected() {
        let graph = GraphConfig {
            max_debate_rounds: 0,
            ..GraphConfig::default()
        };
        let err = graph.validate().unwrap_err();
        assert!(err.to_string().contains("max_debate_rounds"));

        let graph = GraphConfig {
            max_risk_discuss_rounds: 0,
            ..GraphConfig::default()
        };
        assert!(graph.validate().is_err());
    }

    #[test]
    fn duplicate_analyst_rejected() {
        let graph = GraphConfig {
            selected_analysts: vec![AnalystCategory::Market, AnalystCategory::Market],
            ..GraphConfig::default()
        };
        assert!(graph.validate().is_err());
    }

    #[test]
    fn offline_only_online_analysts_rejected() {
        let graph = GraphConfig {
            online_tools: false,
            selected_analysts: vec![AnalystCategory::Options, AnalystCategory::Insider],
            ..GraphConfig::default()
        };
        assert!(graph.validate().is_err());
    }
}
