pub mod context;
pub mod error;
pub mod graph;
pub mod orchestrator;
pub mod router;
pub mod runner;
pub mod scripted;

pub use context::{NodeStatus, SessionContext};
pub use error::{AgentError, RouteError};
pub use graph::GraphPlan;
pub use orchestrator::{Orchestrator, SessionOutcome};
pub use router::{GateAction, GateTarget, Router};
pub use runner::{AnalystRunner, NodeOutput, PriceSource, ToolExecutor};
