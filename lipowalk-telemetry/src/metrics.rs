//! ## lipowalk-telemetry::metrics
//! **Prometheus counters for simulation runs**

use prometheus::{Encoder, Histogram, HistogramOpts, IntCounter, IntGauge, Registry, TextEncoder};

#[derive(Debug, Clone)]
pub struct MetricsRecorder {
    pub registry: Registry,
    pub runs: IntCounter,
    pub walker_steps: IntCounter,
    pub escapes: IntCounter,
    pub survivors: IntGauge,
    pub run_duration: Histogram,
}

impl MetricsRecorder {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let runs = IntCounter::new("lipowalk_runs_total", "Completed simulation runs")?;
        let walker_steps =
            IntCounter::new("lipowalk_walker_steps_total", "Walker steps performed")?;
        let escapes = IntCounter::new("lipowalk_escapes_total", "Walkers that left the liposome")?;
        let survivors = IntGauge::new(
            "lipowalk_survivors",
            "Walkers still inside at the end of the last run",
        )?;
        let run_duration = Histogram::with_opts(
            HistogramOpts::new("lipowalk_run_duration_seconds", "Wall time of a run")
                .buckets(vec![0.01, 0.1, 1.0, 10.0, 100.0, 1000.0]),
        )?;

        registry.register(Box::new(runs.clone()))?;
        registry.register(Box::new(walker_steps.clone()))?;
        registry.register(Box::new(escapes.clone()))?;
        registry.register(Box::new(survivors.clone()))?;
        registry.register(Box::new(run_duration.clone()))?;

        Ok(Self {
            registry,
            runs,
            walker_steps,
            escapes,
            survivors,
            run_duration,
        })
    }

    /// Records the totals of one finished run.
    pub fn record_run(&self, walker_steps: u64, escapes: u64, survivors: usize, seconds: f64) {
        self.runs.inc();
        self.walker_steps.inc_by(walker_steps);
        self.escapes.inc_by(escapes);
        self.survivors.set(survivors as i64);
        self.run_duration.observe(seconds);
    }

    pub fn gather_metrics(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::<u8>::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_run() {
        let metrics = MetricsRecorder::new().unwrap();
        metrics.record_run(120, 3, 7, 0.5);
        metrics.record_run(80, 2, 5, 0.25);

        assert_eq!(metrics.runs.get(), 2);
        assert_eq!(metrics.walker_steps.get(), 200);
        assert_eq!(metrics.escapes.get(), 5);
        assert_eq!(metrics.survivors.get(), 5);
        assert_eq!(metrics.run_duration.get_sample_count(), 2);
    }

    #[test]
    fn test_gather_metrics() {
        let metrics = MetricsRecorder::new().unwrap();
        metrics.record_run(10, 1, 9, 0.01);
        let text = metrics.gather_metrics().unwrap();
        assert!(text.contains("lipowalk_walker_steps_total 10"));
        assert!(text.contains("lipowalk_survivors 9"));
    }
}
