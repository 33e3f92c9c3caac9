use async_trait::async_trait;
use chrono::NaiveDate;
use tradegraph_models::{AnalystCategory, NodeId, SessionState, ToolCallRequest, TurnRecord};

use crate::error::AgentError;

/// What a node contributed: its turn and, for analysts, an updated report.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeOutput {
    pub turn: TurnRecord,
    pub report: Option<String>,
}

impl NodeOutput {
    pub fn turn(turn: TurnRecord) -> Self {
        Self { turn, report: None }
    }

    pub fn with_report(turn: TurnRecord, report: impl Into<String>) -> Self {
        Self {
            turn,
            report: Some(report.into()),
        }
    }
}

/// Produces the contribution for one analyst, researcher, manager or risk node.
/// Mockable for testing.
#[async_trait]
pub trait AnalystRunner: Send + Sync {
    async fn run(&self, node: NodeId, state: &SessionState) -> Result<NodeOutput, AgentError>;
}

/// Executes tool-call requests and returns their results as turn records.
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    async fn execute(
        &self,
        category: AnalystCategory,
        calls: &[ToolCallRequest],
        state: &SessionState,
    ) -> Result<Vec<TurnRecord>, AgentError>;
}

/// Supplies the chronological price series the scenario optimizer sizes from.
#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn prices(&self, ticker: &str, trade_date: NaiveDate) -> Result<Vec<f64>, AgentError>;
}
