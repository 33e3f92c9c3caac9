use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum QuantError {
    #[error("Insufficient data: need at least {required} observations, got {observations}")]
    InsufficientData {
        observations: usize,
        required: usize,
    },

    #[error("Computation failure: {0}")]
    ComputationFailure(String),
}
