use thiserror::Error;
use tradegraph_models::{ConfigError, NodeId};

/// Routing failures. Never recovered by picking a default branch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    #[error("State incomplete: {field} is missing")]
    StateIncomplete { field: &'static str },

    #[error("Invalid initial {phase} state: {detail}")]
    InvalidInitialState { phase: &'static str, detail: String },

    #[error("Node is not part of the graph plan: {0}")]
    NotInPlan(NodeId),
}

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Routing error: {0}")]
    Route(#[from] RouteError),

    #[error("Analyst runner error: {0}")]
    Runner(String),

    #[error("Tool execution error: {0}")]
    Tool(String),

    #[error("Price source error: {0}")]
    PriceSource(String),

    #[error("Session exceeded {0} steps")]
    StepLimitExceeded(u32),

    #[error("Session task failed: {0}")]
    Task(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
