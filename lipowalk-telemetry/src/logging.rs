//! ## lipowalk-telemetry::logging
//! **Structured logging with tracing**
//!
//! `RUST_LOG` takes precedence over the configured level.

use opentelemetry::KeyValue;
use tracing::info_span;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Clone)]
pub struct EventLogger;

impl EventLogger {
    /// Installs the global subscriber. Fails if one is already installed.
    pub fn init(level: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
            )
            .with_thread_names(true)
            .with_span_events(FmtSpan::CLOSE)
            .with_writer(std::io::stderr)
            .try_init()
    }

    /// Emits a run-level event with its metadata inside a dedicated span.
    #[inline]
    pub fn log_event(event_type: &str, metadata: Vec<KeyValue>) {
        let span = info_span!("run_event", event_type = event_type, otel.kind = "INTERNAL");
        let _entered = span.enter();
        tracing::info!(metadata = ?metadata, "Run event recorded");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[traced_test]
    #[test]
    fn test_logging() {
        EventLogger::log_event("run_complete", vec![KeyValue::new("seed", 42_i64)]);
        assert!(logs_contain("Run event recorded"));
        assert!(logs_contain("run_complete"));
    }
}
