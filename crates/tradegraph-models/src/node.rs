use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

/// Analyst categories that contribute a report section before the debate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum AnalystCategory {
    Market,
    Social,
    News,
    Fundamentals,
    Macro,
    Sector,
    Options,
    Insider,
}

impl AnalystCategory {
    pub const ALL: [AnalystCategory; 8] = [
        AnalystCategory::Market,
        AnalystCategory::Social,
        AnalystCategory::News,
        AnalystCategory::Fundamentals,
        AnalystCategory::Macro,
        AnalystCategory::Sector,
        AnalystCategory::Options,
        AnalystCategory::Insider,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Market => "market",
            Self::Social => "social",
            Self::News => "news",
            Self::Fundamentals => "fundamentals",
            Self::Macro => "macro",
            Self::Sector => "sector",
            Self::Options => "options",
            Self::Insider => "insider",
        }
    }

    /// Title-cased label used in node names ("Market Analyst", "Msg Clear Market").
    pub fn label(&self) -> &'static str {
        match self {
            Self::Market => "Market",
            Self::Social => "Social",
            Self::News => "News",
            Self::Fundamentals => "Fundamentals",
            Self::Macro => "Macro",
            Self::Sector => "Sector",
            Self::Options => "Options",
            Self::Insider => "Insider",
        }
    }

    /// Categories whose tools have no offline dataset and only run with `online_tools`.
    pub fn requires_online_tools(&self) -> bool {
        matches!(self, Self::Macro | Self::Options | Self::Insider)
    }
}

impl fmt::Display for AnalystCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier of a node in the orchestration graph.
///
/// Serializes as its graph name, e.g. `"Market Analyst"`, `"tools_market"`,
/// `"Msg Clear Market"`, `"Bull Researcher"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeId {
    Analyst(AnalystCategory),
    Tools(AnalystCategory),
    MsgClear(AnalystCategory),
    ScenarioOptimizer,
    BullResearcher,
    BearResearcher,
    ResearchManager,
    Trader,
    RiskyAnalyst,
    SafeAnalyst,
    NeutralAnalyst,
    RiskJudge,
    End,
}

impl NodeId {
    pub fn category(&self) -> Option<AnalystCategory> {
        match self {
            Self::Analyst(c) | Self::Tools(c) | Self::MsgClear(c) => Some(*c),
            _ => None,
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Analyst(c) => write!(f, "{} Analyst", c.label()),
            Self::Tools(c) => write!(f, "tools_{}", c.as_str()),
            Self::MsgClear(c) => write!(f, "Msg Clear {}", c.label()),
            Self::ScenarioOptimizer => f.write_str("Scenario Optimizer"),
            Self::BullResearcher => f.write_str("Bull Researcher"),
            Self::BearResearcher => f.write_str("Bear Researcher"),
            Self::ResearchManager => f.write_str("Research Manager"),
            Self::Trader => f.write_str("Trader"),
            Self::RiskyAnalyst => f.write_str("Risky Analyst"),
            Self::SafeAnalyst => f.write_str("Safe Analyst"),
            Self::NeutralAnalyst => f.write_str("Neutral Analyst"),
            Self::RiskJudge => f.write_str("Risk Judge"),
            Self::End => f.write_str("END"),
        }
    }
}

impl Serialize for NodeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
