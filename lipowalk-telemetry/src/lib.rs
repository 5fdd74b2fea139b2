//! # lipowalk Telemetry
//!
//! Crate for logging and metrics of simulation runs.

pub mod logging;
pub mod metrics;

pub use logging::EventLogger;
pub use metrics::MetricsRecorder;
