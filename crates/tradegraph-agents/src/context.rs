use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tradegraph_models::{NodeId, SessionState};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeStatus {
    Pending,
    InProgress,
    Completed,
}

/// Progress of one orchestration session.
///
/// Created per session and passed into the orchestrator explicitly, so
/// concurrent sessions each report their own status.
#[derive(Debug, Clone, Serialize)]
pub struct SessionContext {
    pub session_id: Uuid,
    pub ticker: String,
    pub trade_date: NaiveDate,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub current_node: Option<NodeId>,
    pub steps: u32,
    /// Every executed node, in order.
    pub trace: Vec<NodeId>,
    pub statuses: BTreeMap<NodeId, NodeStatus>,
}

impl SessionContext {
    pub fn new(state: &SessionState, planned: &[NodeId]) -> Self {
        Self {
            session_id: state.session_id,
            ticker: state.ticker.clone(),
            trade_date: state.trade_date,
            started_at: Utc::now(),
            finished_at: None,
            current_node: None,
            steps: 0,
            trace: Vec::new(),
            statuses: planned.iter().map(|n| (*n, NodeStatus::Pending)).collect(),
        }
    }

    pub fn enter(&mut self, node: NodeId) {
        self.steps += 1;
        self.trace.push(node);
        self.current_node = Some(node);
        self.statuses.insert(node, NodeStatus::InProgress);
    }

    pub fn complete(&mut self, node: NodeId) {
        self.statuses.insert(node, NodeStatus::Completed);
    }

    pub fn finish(&mut self) {
        self.current_node = None;
        self.finished_at = Some(Utc::now());
    }

    pub fn is_finished(&self) -> bool {
        self.finished_at.is_some()
    }

    pub fn status(&self, node: NodeId) -> Option<NodeStatus> {
        self.statuses.get(&node).copied()
    }

    /// How many times `node` was executed.
    pub fn visits(&self, node: NodeId) -> usize {
        self.trace.iter().filter(|n| **n == node).count()
    }
}
