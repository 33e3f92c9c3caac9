//! End-to-end session runs with scripted collaborators.
//!
//! Each test drives the orchestrator from the first analyst to END and
//! checks the visited-node trace and the final session state.

use std::sync::Arc;

use chrono::NaiveDate;
use tradegraph_agents::scripted::{EchoToolExecutor, ScriptedRunner, StaticPriceSource};
use tradegraph_agents::{AgentError, NodeStatus, Orchestrator, RouteError};
use tradegraph_models::scenario::OptimizationStatus;
use tradegraph_models::{
    AnalystCategory, DebateSpeaker, GraphConfig, NodeId, RiskSpeaker, SessionState,
};

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 11, 4).unwrap()
}

fn build(config: GraphConfig) -> Orchestrator {
    Orchestrator::new(
        Arc::new(ScriptedRunner::default()),
        Arc::new(EchoToolExecutor),
        Arc::new(StaticPriceSource::synthetic(120)),
        config,
    )
    .unwrap()
}

#[tokio::test]
async fn default_session_visits_every_phase() {
    let orchestrator = build(GraphConfig::default());
    let (state, ctx) = orchestrator.evaluate("NVDA", date()).await.unwrap();

    for category in [
        AnalystCategory::Market,
        AnalystCategory::Social,
        AnalystCategory::News,
        AnalystCategory::Fundamentals,
    ] {
        assert_eq!(ctx.visits(NodeId::Analyst(category)), 2);
        assert_eq!(ctx.visits(NodeId::Tools(category)), 1);
        assert_eq!(ctx.visits(NodeId::MsgClear(category)), 1);
        assert!(state.report(category).is_some(), "missing {category} report");
    }

    assert_eq!(ctx.visits(NodeId::ScenarioOptimizer), 1);
    assert_eq!(state.debate.count, 2);
    assert_eq!(state.risk.count, 3);
    assert!(state.investment_plan.is_some());
    assert!(state.trader_plan.is_some());
    assert!(state.final_trade_decision.is_some());
    assert_eq!(
        state.scenario_analysis.as_ref().unwrap().status,
        OptimizationStatus::Complete
    );

    // every planned agent node ran to completion
    assert!(ctx
        .statuses
        .values()
        .all(|status| *status == NodeStatus::Completed));
    assert_eq!(ctx.trace.last(), Some(&NodeId::RiskJudge));
    assert!(ctx.is_finished());
}

#[tokio::test]
async fn debate_and_risk_respect_round_limits() {
    let config = GraphConfig {
        max_debate_rounds: 3,
        max_risk_discuss_rounds: 2,
        selected_analysts: vec![AnalystCategory::Market],
        ..GraphConfig::default()
    };
    let (state, ctx) = build(config).evaluate("AMZN", date()).await.unwrap();

    assert_eq!(state.debate.count, 6);
    let speakers: Vec<DebateSpeaker> = state.debate.history.iter().map(|r| r.speaker).collect();
    assert_eq!(
        speakers,
        vec![
            DebateSpeaker::Bull,
            DebateSpeaker::Bear,
            DebateSpeaker::Bull,
            DebateSpeaker::Bear,
            DebateSpeaker::Bull,
            DebateSpeaker::Bear,
        ]
    );

    assert_eq!(state.risk.count, 6);
    let risk_speakers: Vec<RiskSpeaker> = state.risk.history.iter().map(|r| r.speaker).collect();
    assert_eq!(
        risk_speakers,
        vec![
            RiskSpeaker::Risky,
            RiskSpeaker::Safe,
            RiskSpeaker::Neutral,
            RiskSpeaker::Risky,
            RiskSpeaker::Safe,
            RiskSpeaker::Neutral,
        ]
    );

    assert_eq!(ctx.visits(NodeId::ResearchManager), 1);
    assert_eq!(ctx.visits(NodeId::RiskJudge), 1);
}

#[tokio::test]
async fn offline_mode_skips_online_only_analysts() {
    let config = GraphConfig {
        online_tools: false,
        selected_analysts: vec![
            AnalystCategory::Options,
            AnalystCategory::Market,
            AnalystCategory::Insider,
        ],
        ..GraphConfig::default()
    };
    let (state, ctx) = build(config).evaluate("SPY", date()).await.unwrap();

    assert_eq!(ctx.trace[0], NodeId::Analyst(AnalystCategory::Market));
    assert_eq!(ctx.visits(NodeId::Analyst(AnalystCategory::Options)), 0);
    assert_eq!(state.reports.len(), 1);
}

#[tokio::test]
async fn lightweight_mode_reaches_report() {
    let config = GraphConfig {
        lightweight_quantitative: true,
        selected_analysts: vec![AnalystCategory::Fundamentals],
        ..GraphConfig::default()
    };
    let (state, _) = build(config).evaluate("IBM", date()).await.unwrap();
    let analysis = state.scenario_analysis.unwrap();
    assert_eq!(analysis.status, OptimizationStatus::Complete);
    assert!(analysis.risk_metrics.is_none());
    assert!(state.trader_plan.unwrap().contains("consensus weight"));
}

#[tokio::test]
async fn runner_failure_aborts_session() {
    let orchestrator = Orchestrator::new(
        Arc::new(ScriptedRunner::default().failing_on(NodeId::Trader)),
        Arc::new(EchoToolExecutor),
        Arc::new(StaticPriceSource::synthetic(120)),
        GraphConfig::default(),
    )
    .unwrap();

    let err = orchestrator.evaluate("NFLX", date()).await.unwrap_err();
    assert!(matches!(err, AgentError::Runner(_)));
}

#[test]
fn routing_refuses_inconsistent_resumed_state() {
    let orchestrator = build(GraphConfig::default());
    let mut state = SessionState::new("META", date());
    // count says a turn happened but nobody is recorded as speaking it
    state.debate.count = 1;

    let err = orchestrator
        .plan()
        .next(NodeId::BearResearcher, &state, orchestrator.router())
        .unwrap_err();
    assert_eq!(
        err,
        RouteError::StateIncomplete {
            field: "debate.current_response"
        }
    );
}

#[tokio::test]
async fn concurrent_sessions_are_independent() {
    let orchestrator = Arc::new(
        Orchestrator::new(
            Arc::new(ScriptedRunner::default()),
            Arc::new(EchoToolExecutor),
            Arc::new(
                StaticPriceSource::synthetic(120).with_series("SHORT", vec![10.0, 11.0, 12.0]),
            ),
            GraphConfig::default(),
        )
        .unwrap(),
    );

    let outcomes = orchestrator
        .run_sessions(vec![
            ("AAPL".to_string(), date()),
            ("MSFT".to_string(), date()),
            ("SHORT".to_string(), date()),
        ])
        .await;

    assert_eq!(outcomes.len(), 3);
    let mut ids = Vec::new();
    for outcome in &outcomes {
        let (state, ctx) = outcome.result.as_ref().unwrap();
        assert_eq!(state.ticker, outcome.ticker);
        assert_eq!(ctx.ticker, outcome.ticker);
        assert_eq!(ctx.session_id, state.session_id);
        assert_eq!(state.debate.count, 2);
        assert_eq!(state.risk.count, 3);
        ids.push(state.session_id);
    }
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 3);

    let short = outcomes.iter().find(|o| o.ticker == "SHORT").unwrap();
    let (state, _) = short.result.as_ref().unwrap();
    assert_eq!(
        state.scenario_analysis.as_ref().unwrap().status,
        OptimizationStatus::InsufficientData
    );
}

#[tokio::test]
async fn step_limit_applies_to_each_session() {
    let orchestrator = Arc::new(
        Orchestrator::new(
            Arc::new(ScriptedRunner::default()),
            Arc::new(EchoToolExecutor),
            Arc::new(StaticPriceSource::synthetic(120)),
            GraphConfig {
                max_steps: 5,
                ..GraphConfig::default()
            },
        )
        .unwrap(),
    );

    let outcomes = orchestrator
        .run_sessions(vec![("A".to_string(), date()), ("B".to_string(), date())])
        .await;
    assert!(outcomes
        .iter()
        .all(|o| matches!(o.result, Err(AgentError::StepLimitExceeded(5)))));
}
