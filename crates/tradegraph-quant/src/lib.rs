pub mod error;
pub mod optimizer;
pub mod stats;

pub use error::QuantError;
pub use optimizer::{ScenarioOptimizer, MIN_OBSERVATIONS, RISK_FREE_RATE};
