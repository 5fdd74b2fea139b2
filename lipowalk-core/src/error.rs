use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Entropy source failure: {0}")]
    EntropySourceFailure(String),

    #[error("Shard worker failed: {0}")]
    Shard(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
