pub mod config;
pub mod debate;
pub mod error;
pub mod node;
pub mod scenario;
pub mod session;

pub use config::{GraphConfig, TradegraphConfig};
pub use debate::{DebateSpeaker, DebateState, RiskSpeaker, RiskState, TaggedResponse};
pub use error::ConfigError;
pub use node::{AnalystCategory, NodeId};
pub use scenario::{
    OptimizationResult, OptimizationStatus, OptimizerMode, RiskMetrics, RiskTolerance,
    ScenarioKind, ScenarioProfile, StockMetrics,
};
pub use session::{SessionState, ToolCallRequest, TurnRecord, TurnRole};
