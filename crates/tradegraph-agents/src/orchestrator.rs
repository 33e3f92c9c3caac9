use std::sync::Arc;
use std::time::Instant;

use chrono::NaiveDate;
use tradegraph_models::config::GraphConfig;
use tradegraph_models::scenario::{OptimizationResult, OptimizationStatus};
use tradegraph_models::{DebateSpeaker, NodeId, RiskSpeaker, SessionState};
use tradegraph_quant::ScenarioOptimizer;
use tracing::{debug, error, info, warn};

use crate::context::SessionContext;
use crate::error::{AgentError, RouteError};
use crate::graph::GraphPlan;
use crate::router::Router;
use crate::runner::{AnalystRunner, PriceSource, ToolExecutor};

/// Drives sessions through the graph: execute a node, route, repeat.
pub struct Orchestrator {
    runner: Arc<dyn AnalystRunner>,
    tools: Arc<dyn ToolExecutor>,
    prices: Arc<dyn PriceSource>,
    router: Router,
    plan: GraphPlan,
    optimizer: ScenarioOptimizer,
    config: GraphConfig,
}

/// Result of one session started by [`Orchestrator::run_sessions`].
#[derive(Debug)]
pub struct SessionOutcome {
    pub ticker: String,
    pub trade_date: NaiveDate,
    pub result: Result<(SessionState, SessionContext), AgentError>,
}

impl Orchestrator {
    pub fn new(
        runner: Arc<dyn AnalystRunner>,
        tools: Arc<dyn ToolExecutor>,
        prices: Arc<dyn PriceSource>,
        config: GraphConfig,
    ) -> Result<Self, AgentError> {
        config.validate()?;
        Ok(Self {
            runner,
            tools,
            prices,
            router: Router::from_config(&config),
            plan: GraphPlan::from_config(&config),
            optimizer: ScenarioOptimizer::new(config.optimizer_mode()),
            config,
        })
    }

    pub fn plan(&self) -> &GraphPlan {
        &self.plan
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Run a fresh session for one ticker and trade date.
    pub async fn evaluate(
        &self,
        ticker: &str,
        trade_date: NaiveDate,
    ) -> Result<(SessionState, SessionContext), AgentError> {
        let state = SessionState::new(ticker, trade_date);
        let mut ctx = SessionContext::new(&state, &self.plan.agent_nodes());
        let state = self.run(state, &mut ctx).await?;
        Ok((state, ctx))
    }

    /// Step `state` through the graph until END, recording progress in `ctx`.
    pub async fn run(
        &self,
        mut state: SessionState,
        ctx: &mut SessionContext,
    ) -> Result<SessionState, AgentError> {
        let start = Instant::now();
        info!(ticker = %state.ticker, date = %state.trade_date, session = %state.session_id, "Starting session");

        let mut node = self.plan.entry();
        while node != NodeId::End {
            if ctx.steps >= self.config.max_steps {
                error!(ticker = %state.ticker, steps = ctx.steps, node = %node, "Step limit exceeded");
                return Err(AgentError::StepLimitExceeded(self.config.max_steps));
            }

            ctx.enter(node);
            let node_start = Instant::now();
            self.execute(node, &mut state).await?;
            ctx.complete(node);
            debug!(node = %node, elapsed_ms = node_start.elapsed().as_millis(), "Node executed");

            let next = self.plan.next(node, &state, &self.router)?;
            debug!(from = %node, to = %next, "Routed");
            node = next;
        }
        ctx.finish();

        info!(
            ticker = %state.ticker,
            steps = ctx.steps,
            debate_turns = state.debate.count,
            risk_turns = state.risk.count,
            elapsed_ms = start.elapsed().as_millis(),
            "Session complete"
        );

        Ok(state)
    }

    /// Run independent sessions concurrently. Each owns its state and context;
    /// one failing does not affect the others.
    pub async fn run_sessions(
        self: &Arc<Self>,
        requests: Vec<(String, NaiveDate)>,
    ) -> Vec<SessionOutcome> {
        let mut handles = Vec::new();
        for (ticker, trade_date) in requests {
            let orchestrator = Arc::clone(self);
            let task_ticker = ticker.clone();
            let handle =
                tokio::spawn(async move { orchestrator.evaluate(&task_ticker, trade_date).await });
            handles.push((ticker, trade_date, handle));
        }

        let mut outcomes = Vec::new();
        for (ticker, trade_date, handle) in handles {
            let result = match handle.await {
                Ok(result) => result,
                Err(e) => {
                    error!(ticker = %ticker, error = %e, "Session task panicked");
                    Err(AgentError::Task(e.to_string()))
                }
            };
            if let Err(e) = &result {
                warn!(ticker = %ticker, error = %e, "Session failed");
            }
            outcomes.push(SessionOutcome {
                ticker,
                trade_date,
                result,
            });
        }
        outcomes
    }

    async fn execute(&self, node: NodeId, state: &mut SessionState) -> Result<(), AgentError> {
        match node {
            NodeId::Analyst(category) => {
                let output = self.runner.run(node, state).await?;
                state.append_turn(output.turn);
                if let Some(report) = output.report {
                    state.set_report(category, report);
                }
            }
            NodeId::Tools(category) => {
                let calls = state
                    .last_turn()
                    .map(|t| t.tool_calls.clone())
                    .ok_or(RouteError::StateIncomplete { field: "turns" })?;
                let results = self.tools.execute(category, &calls, state).await?;
                for turn in &results {
                    let answered = turn
                        .tool_call_id
                        .as_deref()
                        .is_some_and(|id| calls.iter().any(|call| call.id == id));
                    if !answered {
                        return Err(AgentError::Tool(format!(
                            "{category} tool result does not answer a requested call: {:?}",
                            turn.tool_call_id
                        )));
                    }
                }
                debug!(category = %category, calls = calls.len(), results = results.len(), "Tools executed");
                for turn in results {
                    state.append_turn(turn);
                }
            }
            NodeId::MsgClear(_) => state.clear_turns(),
            NodeId::ScenarioOptimizer => {
                state.scenario_analysis = Some(self.scenario_analysis(state).await);
            }
            NodeId::BullResearcher => {
                let output = self.runner.run(node, state).await?;
                state.record_debate_turn(DebateSpeaker::Bull, output.turn.content);
            }
            NodeId::BearResearcher => {
                let output = self.runner.run(node, state).await?;
                state.record_debate_turn(DebateSpeaker::Bear, output.turn.content);
            }
            NodeId::ResearchManager => {
                let output = self.runner.run(node, state).await?;
                state.debate.judge_decision = Some(output.turn.content.clone());
                state.investment_plan = Some(output.turn.content);
            }
            NodeId::Trader => {
                let output = self.runner.run(node, state).await?;
                state.trader_plan = Some(output.turn.content);
            }
            NodeId::RiskyAnalyst => {
                let output = self.runner.run(node, state).await?;
                state.record_risk_turn(RiskSpeaker::Risky, output.turn.content);
            }
            NodeId::SafeAnalyst => {
                let output = self.runner.run(node, state).await?;
                state.record_risk_turn(RiskSpeaker::Safe, output.turn.content);
            }
            NodeId::NeutralAnalyst => {
                let output = self.runner.run(node, state).await?;
                state.record_risk_turn(RiskSpeaker::Neutral, output.turn.content);
            }
            NodeId::RiskJudge => {
                let output = self.runner.run(node, state).await?;
                state.risk.judge_decision = Some(output.turn.content.clone());
                state.final_trade_decision = Some(output.turn.content);
            }
            NodeId::End => {}
        }
        Ok(())
    }

    /// Optimizer node. Price-source failures degrade like a short series so
    /// later nodes still run.
    async fn scenario_analysis(&self, state: &SessionState) -> OptimizationResult {
        match self.prices.prices(&state.ticker, state.trade_date).await {
            Ok(prices) => {
                let result = self.optimizer.optimize(&prices);
                info!(
                    ticker = %state.ticker,
                    status = ?result.status,
                    consensus = result.consensus_weight,
                    "Scenario analysis finished"
                );
                result
            }
            Err(e) => {
                warn!(ticker = %state.ticker, error = %e, "Price source failed");
                OptimizationResult::degraded(
                    OptimizationStatus::InsufficientData,
                    self.optimizer.mode(),
                    0,
                    format!("price series unavailable: {e}"),
                )
            }
        }
    }
}
