use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("No {kind} files for N={population} m={subdivisions} tmax={tmax} in {directory}")]
    NoRuns {
        kind: &'static str,
        population: usize,
        subdivisions: u64,
        tmax: u64,
        directory: PathBuf,
    },

    #[error("{path}:{line}: {message}")]
    Malformed {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("Inconsistent runs: {0}")]
    Inconsistent(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
