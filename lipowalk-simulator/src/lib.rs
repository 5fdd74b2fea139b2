/*!
# lipowalk Simulator

Runs the liposome escape simulation end to end: builds the run parameters
from configuration, advances the population, writes the two output datasets
and reports a BLAKE3 digest that identifies the run's results.

## Key Components:
- **Simulator:** one run from validated parameters.
- **Sweep:** the paired `(m, tmax)` runs, each with its own base seed.
- **Result Writer:** time series and final-position files.
- **Run Digest:** reproducibility check for seeded runs.
*/

use std::path::PathBuf;
use std::time::{Duration, Instant};

use opentelemetry::KeyValue;
use tracing::{info, instrument, warn};

use lipowalk_config::LipowalkConfig;
use lipowalk_core::config::RunConfig;
use lipowalk_core::engine::{Engine, SimulationOutcome, DEFAULT_PROGRESS_INTERVAL};
use lipowalk_core::rng;
use lipowalk_core::SimulationError;
use lipowalk_telemetry::{EventLogger, MetricsRecorder};

pub mod digest;
pub mod error;
pub mod output;
pub mod sweep;

pub use error::SimulatorError;
pub use output::{ResultWriter, RunFiles};
pub use sweep::Sweep;

/// Result of one completed run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub config: RunConfig,
    pub outcome: SimulationOutcome,
    pub files: RunFiles,
    pub digest: String,
    pub elapsed: Duration,
}

/// Runs one simulation and persists its datasets.
#[derive(Debug, Clone)]
pub struct Simulator {
    config: RunConfig,
    threads: usize,
    progress_interval: u64,
    writer: ResultWriter,
    metrics: Option<MetricsRecorder>,
}

impl Simulator {
    pub fn new<P: Into<PathBuf>>(config: RunConfig, output_directory: P) -> Self {
        Self {
            config,
            threads: 1,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            writer: ResultWriter::new(output_directory),
            metrics: None,
        }
    }

    /// Builds a simulator from loaded settings. The base seed is the
    /// configured one, or a fresh one from the OS entropy source.
    pub fn from_settings(settings: &LipowalkConfig) -> Result<Self, SimulatorError> {
        let simulation = &settings.simulation;
        let base_seed = match simulation.seed {
            Some(seed) => seed,
            None => rng::entropy_seed()?,
        };
        let config = RunConfig::new(
            simulation.population,
            simulation.subdivisions,
            simulation.tmax,
            base_seed,
        )?;

        Ok(Self::new(config, settings.output.directory.clone())
            .with_threads(simulation.threads)
            .with_progress_interval(simulation.progress_interval))
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads.max(1);
        self
    }

    pub fn with_progress_interval(mut self, rounds: u64) -> Self {
        self.progress_interval = rounds;
        self
    }

    pub fn with_metrics(mut self, metrics: MetricsRecorder) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Runs the simulation, writes both datasets and returns the report.
    #[instrument(skip(self), fields(seed = self.config.base_seed(), threads = self.threads))]
    pub fn run(&self) -> Result<RunReport, SimulatorError> {
        EventLogger::log_event("run_started", self.run_metadata());
        let started = Instant::now();

        let engine = Engine::new(self.config).with_progress_interval(self.progress_interval);
        let outcome = if self.threads > 1 {
            engine.run_sharded(self.threads)?
        } else {
            engine.run()
        };
        let elapsed = started.elapsed();

        let files = self
            .writer
            .write(&self.config, &outcome)
            .map_err(SimulationError::from)?;
        let digest = digest::run_digest(&self.config, &outcome);

        if let Some(metrics) = &self.metrics {
            metrics.record_run(
                outcome.walker_steps,
                outcome.escaped() as u64,
                outcome.survivors(),
                elapsed.as_secs_f64(),
            );
        }

        let mut metadata = self.run_metadata();
        metadata.push(KeyValue::new("survivors", outcome.survivors() as i64));
        metadata.push(KeyValue::new("digest", digest.clone()));
        EventLogger::log_event("run_complete", metadata);
        info!(
            survivors = outcome.survivors(),
            elapsed_ms = elapsed.as_millis() as u64,
            digest = %digest,
            "Simulation complete"
        );

        Ok(RunReport {
            config: self.config,
            outcome,
            files,
            digest,
            elapsed,
        })
    }

    /// Runs the simulation and compares its digest with an expected one.
    pub fn run_and_validate(&self, expected: Option<&str>) -> Result<RunReport, SimulatorError> {
        let report = self.run()?;
        if let Some(expected) = expected {
            if !report.digest.eq_ignore_ascii_case(expected) {
                warn!(expected, actual = %report.digest, "Run digest mismatch");
                return Err(SimulatorError::HashMismatch {
                    expected: expected.to_string(),
                    actual: report.digest,
                });
            }
            info!("Run digest validated");
        }
        Ok(report)
    }

    fn run_metadata(&self) -> Vec<KeyValue> {
        vec![
            KeyValue::new("population", self.config.population() as i64),
            KeyValue::new("subdivisions", self.config.subdivisions() as i64),
            KeyValue::new("tmax", self.config.tmax() as i64),
            KeyValue::new("seed", self.config.base_seed().to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lipowalk_config::Overrides;
    use std::fs;

    #[test]
    fn test_simulator_runs() {
        let dir = tempfile::tempdir().unwrap();
        let config = RunConfig::new(50, 10, 200, 42).unwrap();
        let report = Simulator::new(config, dir.path()).run().unwrap();

        assert_eq!(report.outcome.time_series.len(), 201);
        assert!(report.files.time_series.exists());
        assert!(report.files.final_positions.exists());

        let rows = fs::read_to_string(&report.files.final_positions).unwrap();
        assert_eq!(rows.lines().count(), report.outcome.survivors() + 1);
    }

    #[test]
    fn test_seeded_runs_write_identical_files() {
        let first_dir = tempfile::tempdir().unwrap();
        let second_dir = tempfile::tempdir().unwrap();
        let config = RunConfig::new(100, 20, 400, 7).unwrap();

        let first = Simulator::new(config, first_dir.path()).run().unwrap();
        let second = Simulator::new(config, second_dir.path())
            .with_threads(3)
            .run()
            .unwrap();

        assert_eq!(
            fs::read(&first.files.time_series).unwrap(),
            fs::read(&second.files.time_series).unwrap()
        );
        assert_eq!(first.digest, second.digest);
    }

    #[test]
    fn test_invalid_settings_write_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = LipowalkConfig::default();
        settings.output.directory = dir.path().join("out");
        settings.simulation.population = 0;
        settings.simulation.seed = Some(1);

        let result = Simulator::from_settings(&settings);
        assert!(matches!(
            result,
            Err(SimulatorError::Simulation(SimulationError::InvalidConfiguration(_)))
        ));
        assert!(!settings.output.directory.exists());

        settings.simulation.population = 10;
        settings.simulation.tmax = -1;
        assert!(Simulator::from_settings(&settings).is_err());
        assert!(!settings.output.directory.exists());
    }

    #[test]
    fn test_from_settings_uses_configured_seed() {
        let settings = LipowalkConfig::default()
            .with_overrides(&Overrides {
                population: Some(4),
                subdivisions: Some(2),
                tmax: Some(1),
                seed: Some(31),
                ..Overrides::default()
            })
            .unwrap();
        let simulator = Simulator::from_settings(&settings).unwrap();
        assert_eq!(simulator.config().base_seed(), 31);
        assert_eq!(simulator.config().step_length(), 0.5);
    }

    #[test]
    fn test_from_settings_draws_seed() {
        let mut settings = LipowalkConfig::default();
        settings.simulation.seed = None;
        let simulator = Simulator::from_settings(&settings).unwrap();
        assert!(simulator.config().base_seed() <= u64::from(u32::MAX));
    }

    #[test]
    fn test_unwritable_output_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let blocked = dir.path().join("not-a-directory");
        fs::write(&blocked, "").unwrap();
        let config = RunConfig::new(10, 5, 20, 8).unwrap();

        let result = Simulator::new(config, &blocked).run();
        assert!(matches!(
            result,
            Err(SimulatorError::Simulation(SimulationError::Io(_)))
        ));
    }

    #[test]
    fn test_hash_validation() {
        let dir = tempfile::tempdir().unwrap();
        let config = RunConfig::new(20, 5, 50, 3).unwrap();
        let simulator = Simulator::new(config, dir.path());

        let report = simulator.run_and_validate(None).unwrap();
        assert!(simulator.run_and_validate(Some(&report.digest)).is_ok());
        assert!(matches!(
            simulator.run_and_validate(Some("00")),
            Err(SimulatorError::HashMismatch { .. })
        ));
    }

    #[test]
    fn test_metrics_are_recorded() {
        let dir = tempfile::tempdir().unwrap();
        let metrics = MetricsRecorder::new().unwrap();
        let config = RunConfig::new(30, 5, 40, 12).unwrap();
        let report = Simulator::new(config, dir.path())
            .with_metrics(metrics.clone())
            .run()
            .unwrap();

        assert_eq!(metrics.runs.get(), 1);
        assert_eq!(metrics.walker_steps.get(), report.outcome.walker_steps);
        assert_eq!(metrics.survivors.get(), report.outcome.survivors() as i64);
    }
}
