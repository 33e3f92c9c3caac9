//! File-backed configuration loading and an offline session built from it.
//!
//! Run with:
//! ```bash
//! cargo test -p tradegraph --test config_loading
//! ```

use chrono::NaiveDate;
use tradegraph::models::scenario::{OptimizationStatus, OptimizerMode};
use tradegraph::models::{AnalystCategory, NodeId, TradegraphConfig};

fn write_config(dir: &tempfile::TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("tradegraph.toml");
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = tradegraph::load_config(dir.path().join("absent.toml")).unwrap();
    assert_eq!(config, TradegraphConfig::default());
}

#[test]
fn partial_file_fills_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        &dir,
        r#"
[graph]
max_debate_rounds = 2
selected_analysts = ["news", "macro"]
"#,
    );
    let config = tradegraph::load_config(&path).unwrap();
    assert_eq!(config.graph.max_debate_rounds, 2);
    assert_eq!(config.graph.max_risk_discuss_rounds, 1);
    assert_eq!(
        config.graph.selected_analysts,
        vec![AnalystCategory::News, AnalystCategory::Macro]
    );
    assert!(config.graph.online_tools);
}

#[test]
fn shipped_sample_config_is_valid() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../config/tradegraph.toml");
    let config = tradegraph::load_config(path).unwrap();
    assert_eq!(config, TradegraphConfig::default());
}

#[test]
fn invalid_values_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "[graph]\nmax_risk_discuss_rounds = 0\n");
    let err = tradegraph::load_config(&path).unwrap_err();
    assert!(format!("{err:#}").contains("max_risk_discuss_rounds"));
}

#[test]
fn malformed_toml_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "[graph\nmax_debate_rounds = ");
    assert!(tradegraph::load_config(&path).is_err());
}

#[test]
fn optimize_facade_degrades_short_series() {
    let result = tradegraph::optimize(&[10.0, 10.5, 10.2], OptimizerMode::Full);
    assert_eq!(result.status, OptimizationStatus::InsufficientData);
    assert!(result.profiles.is_empty());
}

#[tokio::test]
async fn offline_session_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        &dir,
        r#"
[graph]
max_debate_rounds = 2
selected_analysts = ["fundamentals"]
"#,
    );
    let config = tradegraph::load_config(&path).unwrap();
    let orchestrator = tradegraph::build_offline_orchestrator(&config, None).unwrap();

    let date = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
    let (state, ctx) = orchestrator.evaluate("GOOG", date).await.unwrap();

    assert_eq!(ctx.trace[0], NodeId::Analyst(AnalystCategory::Fundamentals));
    assert_eq!(state.debate.count, 4);
    assert_eq!(state.risk.count, 3);
    assert_eq!(
        state.scenario_analysis.unwrap().status,
        OptimizationStatus::Complete
    );
    assert!(ctx.is_finished());
}
