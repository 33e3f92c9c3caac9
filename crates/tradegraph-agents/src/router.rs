//! Conditional edges of the orchestration graph.
//!
//! The router is a pure function of the session state and two round limits.
//! It holds no state of its own and never inspects turn content beyond
//! whether the latest turn requested tools and which role spoke last.

use serde::Serialize;
use tradegraph_models::{
    AnalystCategory, DebateSpeaker, GraphConfig, NodeId, RiskSpeaker, SessionState,
};

use crate::error::RouteError;

/// What the tool-call gate decided for an analyst category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GateAction {
    /// The latest turn requested tools; run them before the analyst continues.
    ExecuteTools,
    /// The analyst is done; clear its working turns and move on.
    Finalize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GateTarget {
    pub category: AnalystCategory,
    pub action: GateAction,
}

impl GateTarget {
    pub fn node(&self) -> NodeId {
        match self.action {
            GateAction::ExecuteTools => NodeId::Tools(self.category),
            GateAction::Finalize => NodeId::MsgClear(self.category),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Router {
    max_debate_rounds: u32,
    max_risk_rounds: u32,
}

impl Router {
    pub fn new(max_debate_rounds: u32, max_risk_rounds: u32) -> Self {
        Self {
            max_debate_rounds,
            max_risk_rounds,
        }
    }

    pub fn from_config(config: &GraphConfig) -> Self {
        Self::new(config.max_debate_rounds, config.max_risk_discuss_rounds)
    }

    /// Debate turns allowed before the Research Manager takes over.
    pub fn debate_turn_limit(&self) -> u32 {
        self.max_debate_rounds.saturating_mul(2)
    }

    /// Risk turns allowed before the Risk Judge takes over.
    pub fn risk_turn_limit(&self) -> u32 {
        self.max_risk_rounds.saturating_mul(3)
    }

    /// Route an analyst to its tool node while its latest turn requests tools,
    /// otherwise to its clear node. Same rule for every category.
    pub fn tool_call_gate(
        &self,
        category: AnalystCategory,
        state: &SessionState,
    ) -> Result<GateTarget, RouteError> {
        let last = state
            .last_turn()
            .ok_or(RouteError::StateIncomplete { field: "turns" })?;
        let action = if last.requests_tools() {
            GateAction::ExecuteTools
        } else {
            GateAction::Finalize
        };
        Ok(GateTarget { category, action })
    }

    /// Two-state alternator: Bull, Bear, Bull, ... until the turn limit.
    ///
    /// Only a Bull turn leads to Bear; a Bear turn and the empty initial state
    /// both fall through to Bull, which is what makes Bull always open.
    pub fn debate_transition(&self, state: &SessionState) -> Result<NodeId, RouteError> {
        let debate = &state.debate;
        if debate.count >= self.debate_turn_limit() {
            return Ok(NodeId::ResearchManager);
        }

        let speaker = debate.current_speaker();
        match (debate.count, speaker) {
            (0, Some(s)) => Err(RouteError::InvalidInitialState {
                phase: "debate",
                detail: format!("count is 0 but a {s} response is already recorded"),
            }),
            (n, None) if n > 0 => Err(RouteError::StateIncomplete {
                field: "debate.current_response",
            }),
            (_, Some(DebateSpeaker::Bull)) => Ok(NodeId::BearResearcher),
            _ => Ok(NodeId::BullResearcher),
        }
    }

    /// Three-state round-robin: Risky, Safe, Neutral, Risky, ... until the turn limit.
    pub fn risk_transition(&self, state: &SessionState) -> Result<NodeId, RouteError> {
        let risk = &state.risk;
        if risk.count >= self.risk_turn_limit() {
            return Ok(NodeId::RiskJudge);
        }

        match (risk.count, risk.latest_speaker) {
            (0, Some(s)) => Err(RouteError::InvalidInitialState {
                phase: "risk",
                detail: format!("count is 0 but {s} is recorded as latest speaker"),
            }),
            (n, None) if n > 0 => Err(RouteError::StateIncomplete {
                field: "risk.latest_speaker",
            }),
            (_, Some(RiskSpeaker::Risky)) => Ok(NodeId::SafeAnalyst),
            (_, Some(RiskSpeaker::Safe)) => Ok(NodeId::NeutralAnalyst),
            _ => Ok(NodeId::RiskyAnalyst),
        }
    }
}
