//! Scripted offline collaborators.
//!
//! Deterministic stand-ins for the language-model runner, the tool executor
//! and the market-data fetch. They let a whole session run without network
//! access, for dry runs from the CLI and for tests. Content is placeholder
//! text; only the shape of each turn (tool requests or not) matters to routing.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use tradegraph_models::{
    AnalystCategory, NodeId, SessionState, ToolCallRequest, TurnRecord, TurnRole,
};

use crate::error::AgentError;
use crate::runner::{AnalystRunner, NodeOutput, PriceSource, ToolExecutor};

/// Runner that asks for tools a fixed number of times per analyst, then
/// reports, and answers every debate/risk node with a short canned turn.
#[derive(Debug, Clone)]
pub struct ScriptedRunner {
    tool_rounds: usize,
    fail_on: Option<NodeId>,
}

impl Default for ScriptedRunner {
    fn default() -> Self {
        Self {
            tool_rounds: 1,
            fail_on: None,
        }
    }
}

impl ScriptedRunner {
    pub fn with_tool_rounds(tool_rounds: usize) -> Self {
        Self {
            tool_rounds,
            fail_on: None,
        }
    }

    /// Fail whenever `node` runs.
    pub fn failing_on(mut self, node: NodeId) -> Self {
        self.fail_on = Some(node);
        self
    }

    fn analyst_turn(&self, category: AnalystCategory, state: &SessionState) -> NodeOutput {
        let tool_results = state
            .turns
            .iter()
            .filter(|t| t.role == TurnRole::Tool)
            .count();

        if tool_results < self.tool_rounds {
            let call = ToolCallRequest::new(
                format!("get_{category}_data"),
                serde_json::json!({
                    "ticker": state.ticker,
                    "date": state.trade_date.to_string(),
                }),
            );
            return NodeOutput::turn(TurnRecord::assistant("").with_tool_calls(vec![call]));
        }

        let report = format!(
            "{} report for {} on {} ({tool_results} tool results)",
            category.label(),
            state.ticker,
            state.trade_date
        );
        NodeOutput::with_report(TurnRecord::assistant(report.clone()), report)
    }
}

#[async_trait]
impl AnalystRunner for ScriptedRunner {
    async fn run(&self, node: NodeId, state: &SessionState) -> Result<NodeOutput, AgentError> {
        if self.fail_on == Some(node) {
            return Err(AgentError::Runner(format!("scripted failure at {node}")));
        }

        let ticker = &state.ticker;
        let content = match node {
            NodeId::Analyst(category) => return Ok(self.analyst_turn(category, state)),
            NodeId::BullResearcher => format!(
                "Argument {} in favour of buying {ticker}",
                state.debate.count + 1
            ),
            NodeId::BearResearcher => format!(
                "Argument {} against buying {ticker}",
                state.debate.count + 1
            ),
            NodeId::ResearchManager => format!(
                "Investment plan for {ticker}: HOLD after {} debate turns",
                state.debate.count
            ),
            NodeId::Trader => {
                let weight = state
                    .scenario_analysis
                    .as_ref()
                    .filter(|r| !r.is_degraded())
                    .map(|r| format!("{:.2}", r.consensus_weight))
                    .unwrap_or_else(|| "n/a".to_string());
                format!("FINAL TRANSACTION PROPOSAL: **HOLD** {ticker} (consensus weight {weight})")
            }
            NodeId::RiskyAnalyst => format!("Risky view {} on {ticker}", state.risk.count + 1),
            NodeId::SafeAnalyst => format!("Safe view {} on {ticker}", state.risk.count + 1),
            NodeId::NeutralAnalyst => format!("Neutral view {} on {ticker}", state.risk.count + 1),
            NodeId::RiskJudge => format!("Final decision for {ticker}: HOLD"),
            NodeId::Tools(_) | NodeId::MsgClear(_) | NodeId::ScenarioOptimizer | NodeId::End => {
                return Err(AgentError::Runner(format!("{node} is not an agent node")));
            }
        };
        Ok(NodeOutput::turn(TurnRecord::assistant(content)))
    }
}

/// Answers every tool call with a placeholder result.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoToolExecutor;

#[async_trait]
impl ToolExecutor for EchoToolExecutor {
    async fn execute(
        &self,
        _category: AnalystCategory,
        calls: &[ToolCallRequest],
        _state: &SessionState,
    ) -> Result<Vec<TurnRecord>, AgentError> {
        calls
            .iter()
            .map(|call| {
                let args = serde_json::to_string(&call.arguments)?;
                Ok(TurnRecord::tool_result(
                    call.id.clone(),
                    format!("{}({args}): no data offline", call.name),
                ))
            })
            .collect()
    }
}

/// Price series held in memory, per ticker with an optional fallback.
#[derive(Debug, Clone, Default)]
pub struct StaticPriceSource {
    series: HashMap<String, Vec<f64>>,
    fallback: Option<Vec<f64>>,
}

impl StaticPriceSource {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Same series for every ticker.
    pub fn from_prices(prices: Vec<f64>) -> Self {
        Self {
            series: HashMap::new(),
            fallback: Some(prices),
        }
    }

    /// Deterministic drifting series of `len` points for every ticker.
    pub fn synthetic(len: usize) -> Self {
        Self::from_prices(synthetic_prices(len, 100.0, 0.001, 0.01))
    }

    pub fn with_series(mut self, ticker: impl Into<String>, prices: Vec<f64>) -> Self {
        self.series.insert(ticker.into(), prices);
        self
    }
}

#[async_trait]
impl PriceSource for StaticPriceSource {
    async fn prices(&self, ticker: &str, _trade_date: NaiveDate) -> Result<Vec<f64>, AgentError> {
        self.series
            .get(ticker)
            .or(self.fallback.as_ref())
            .cloned()
            .ok_or_else(|| AgentError::PriceSource(format!("no price series for {ticker}")))
    }
}

/// Daily `drift` with alternating `+shock`/`-shock`, compounding from `start`.
pub fn synthetic_prices(len: usize, start: f64, drift: f64, shock: f64) -> Vec<f64> {
    let mut prices = Vec::with_capacity(len);
    let mut price = start;
    for i in 0..len {
        if i > 0 {
            let r = if i % 2 == 0 { drift + shock } else { drift - shock };
            price *= 1.0 + r;
        }
        prices.push(price);
    }
    prices
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> SessionState {
        SessionState::new("TSLA", NaiveDate::from_ymd_opt(2024, 2, 1).unwrap())
    }

    #[tokio::test]
    async fn analyst_requests_tools_then_reports() {
        let runner = ScriptedRunner::default();
        let node = NodeId::Analyst(AnalystCategory::Market);
        let mut s = state();

        let first = runner.run(node, &s).await.unwrap();
        assert!(first.turn.requests_tools());
        assert!(first.report.is_none());
        assert_eq!(first.turn.tool_calls[0].name, "get_market_data");

        let results = EchoToolExecutor
            .execute(AnalystCategory::Market, &first.turn.tool_calls, &s)
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(
            results[0].tool_call_id.as_deref(),
            Some(first.turn.tool_calls[0].id.as_str())
        );
        s.append_turn(first.turn);
        for turn in results {
            s.append_turn(turn);
        }

        let second = runner.run(node, &s).await.unwrap();
        assert!(!second.turn.requests_tools());
        assert!(second.report.unwrap().starts_with("Market report for TSLA"));
    }

    #[tokio::test]
    async fn zero_tool_rounds_reports_immediately() {
        let runner = ScriptedRunner::with_tool_rounds(0);
        let output = runner
            .run(NodeId::Analyst(AnalystCategory::News), &state())
            .await
            .unwrap();
        assert!(!output.turn.requests_tools());
        assert!(output.report.is_some());
    }

    #[tokio::test]
    async fn failing_on_node() {
        let runner = ScriptedRunner::default().failing_on(NodeId::Trader);
        assert!(runner.run(NodeId::Trader, &state()).await.is_err());
        assert!(runner.run(NodeId::RiskJudge, &state()).await.is_ok());
    }

    #[tokio::test]
    async fn non_agent_nodes_are_rejected() {
        let runner = ScriptedRunner::default();
        let err = runner
            .run(NodeId::MsgClear(AnalystCategory::Market), &state())
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::Runner(_)));
    }

    #[tokio::test]
    async fn price_source_prefers_ticker_series() {
        let source = StaticPriceSource::synthetic(60).with_series("TSLA", vec![1.0, 2.0]);
        let date = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        assert_eq!(source.prices("TSLA", date).await.unwrap(), vec![1.0, 2.0]);
        assert_eq!(source.prices("AAPL", date).await.unwrap().len(), 60);
        assert!(StaticPriceSource::empty().prices("AAPL", date).await.is_err());
    }

    #[test]
    fn synthetic_prices_start_at_start() {
        let prices = synthetic_prices(5, 100.0, 0.0, 0.01);
        assert_eq!(prices.len(), 5);
        assert_eq!(prices[0], 100.0);
        assert!((prices[1] - 99.0).abs() < 1e-9);
        assert!((prices[2] - 99.99).abs() < 1e-9);
    }
}
