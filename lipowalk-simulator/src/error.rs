use lipowalk_core::SimulationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimulatorError {
    #[error(transparent)]
    Simulation(#[from] SimulationError),

    #[error("Run digest mismatch: expected {expected}, got {actual}")]
    HashMismatch { expected: String, actual: String },
}
