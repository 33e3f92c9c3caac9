use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::debate::{DebateSpeaker, DebateState, RiskSpeaker, RiskState};
use crate::node::AnalystCategory;
use crate::scenario::OptimizationResult;

/// Placeholder left behind when an analyst's working turns are cleared.
pub const CLEARED_TURN_PLACEHOLDER: &str = "Continue";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TurnRole {
    Human,
    Assistant,
    Tool,
}

/// A request for an external capability attached to an assistant turn.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolCallRequest {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub arguments: serde_json::Value,
}

impl ToolCallRequest {
    pub fn new(name: impl Into<String>, arguments: serde_json::Value) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            arguments,
        }
    }
}

/// One produced contribution in a session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TurnRecord {
    pub role: TurnRole,
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCallRequest>,
    /// Set on tool-result turns: the request this result answers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl TurnRecord {
    pub fn human(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Human,
            content: content.into(),
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            content: content.into(),
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }

    pub fn tool_result(call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Tool,
            content: content.into(),
            tool_calls: Vec::new(),
            tool_call_id: Some(call_id.into()),
        }
    }

    pub fn with_tool_calls(mut self, tool_calls: Vec<ToolCallRequest>) -> Self {
        self.tool_calls = tool_calls;
        self
    }

    pub fn requests_tools(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

/// Shared state for one (ticker, trade date) run.
///
/// Owned by exactly one orchestration session. Turn records are only ever
/// appended or cleared wholesale; debate and risk progress only move forward
/// through [`SessionState::record_debate_turn`] and
/// [`SessionState::record_risk_turn`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionState {
    pub session_id: Uuid,
    pub ticker: String,
    pub trade_date: NaiveDate,
    pub turns: Vec<TurnRecord>,
    pub debate: DebateState,
    pub risk: RiskState,
    pub reports: BTreeMap<AnalystCategory, String>,
    pub investment_plan: Option<String>,
    pub trader_plan: Option<String>,
    pub final_trade_decision: Option<String>,
    pub scenario_analysis: Option<OptimizationResult>,
}

impl SessionState {
    /// Fresh state seeded with the ticker as the opening human turn.
    pub fn new(ticker: impl Into<String>, trade_date: NaiveDate) -> Self {
        let ticker = ticker.into();
        Self {
            session_id: Uuid::new_v4(),
            turns: vec![TurnRecord::human(ticker.clone())],
            ticker,
            trade_date,
            debate: DebateState::default(),
            risk: RiskState::default(),
            reports: BTreeMap::new(),
            investment_plan: None,
            trader_plan: None,
            final_trade_decision: None,
            scenario_analysis: None,
        }
    }

    pub fn last_turn(&self) -> Option<&TurnRecord> {
        self.turns.last()
    }

    pub fn append_turn(&mut self, turn: TurnRecord) {
        self.turns.push(turn);
    }

    /// Drop an analyst's working turns, leaving a single placeholder so the
    /// next analyst starts from a non-empty sequence.
    pub fn clear_turns(&mut self) {
        self.turns.clear();
        self.turns.push(TurnRecord::human(CLEARED_TURN_PLACEHOLDER));
    }

    pub fn set_report(&mut self, category: AnalystCategory, report: impl Into<String>) {
        self.reports.insert(category, report.into());
    }

    pub fn report(&self, category: AnalystCategory) -> Option<&str> {
        self.reports.get(&category).map(String::as_str)
    }

    pub fn record_debate_turn(&mut self, speaker: DebateSpeaker, content: impl Into<String>) {
        self.debate.record_turn(speaker, content);
    }

    pub fn record_risk_turn(&mut self, speaker: RiskSpeaker, content: impl Into<String>) {
        self.risk.record_turn(speaker, content);
    }
}
