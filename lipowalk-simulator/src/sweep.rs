//! Paired `(m, tmax)` sweep at a fixed population.
//!
//! Every pair gets its own base seed from the OS entropy source unless a
//! seed is configured, in which case all pairs share it. All run parameters
//! are validated before the first run starts.

use tracing::{info, instrument};

use lipowalk_config::LipowalkConfig;
use lipowalk_core::config::RunConfig;
use lipowalk_core::rng;
use lipowalk_core::SimulationError;
use lipowalk_telemetry::MetricsRecorder;

use crate::{RunReport, Simulator, SimulatorError};

#[derive(Debug, Clone)]
pub struct Sweep {
    runs: Vec<Simulator>,
}

impl Sweep {
    /// Plans one run per `(subdivisions, tmax)` pair.
    pub fn plan(
        settings: &LipowalkConfig,
        pairs: &[(i64, i64)],
        metrics: Option<MetricsRecorder>,
    ) -> Result<Self, SimulatorError> {
        if pairs.is_empty() {
            return Err(SimulationError::InvalidConfiguration(
                "sweep needs at least one (subdivisions, tmax) pair".into(),
            )
            .into());
        }

        let simulation = &settings.simulation;
        let mut runs = Vec::with_capacity(pairs.len());
        for &(subdivisions, tmax) in pairs {
            let base_seed = match simulation.seed {
                Some(seed) => seed,
                None => rng::entropy_seed()?,
            };
            let config = RunConfig::new(simulation.population, subdivisions, tmax, base_seed)?;
            let mut simulator = Simulator::new(config, settings.output.directory.clone())
                .with_threads(simulation.threads)
                .with_progress_interval(simulation.progress_interval);
            if let Some(metrics) = &metrics {
                simulator = simulator.with_metrics(metrics.clone());
            }
            runs.push(simulator);
        }
        Ok(Self { runs })
    }

    /// Pairs two equally long lists, rejecting a length mismatch.
    pub fn zip_pairs(subdivisions: &[i64], tmax: &[i64]) -> Result<Vec<(i64, i64)>, SimulatorError> {
        if subdivisions.len() != tmax.len() {
            return Err(SimulationError::InvalidConfiguration(format!(
                "{} subdivision values but {} tmax values",
                subdivisions.len(),
                tmax.len()
            ))
            .into());
        }
        Ok(subdivisions.iter().copied().zip(tmax.iter().copied()).collect())
    }

    pub fn runs(&self) -> &[Simulator] {
        &self.runs
    }

    /// Executes the planned runs in order.
    #[instrument(skip(self), fields(runs = self.runs.len()))]
    pub fn execute(&self) -> Result<Vec<RunReport>, SimulatorError> {
        let mut reports = Vec::with_capacity(self.runs.len());
        for simulator in &self.runs {
            info!(
                m = simulator.config().subdivisions(),
                tmax = simulator.config().tmax(),
                "Starting sweep run"
            );
            reports.push(simulator.run()?);
        }
        Ok(reports)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(dir: &std::path::Path) -> LipowalkConfig {
        let mut settings = LipowalkConfig::default();
        settings.simulation.population = 20;
        settings.simulation.threads = 1;
        settings.output.directory = dir.to_path_buf();
        settings
    }

    #[test]
    fn test_sweep_runs_each_pair() {
        let dir = tempfile::tempdir().unwrap();
        let pairs = Sweep::zip_pairs(&[5, 10], &[30, 60]).unwrap();
        let reports = Sweep::plan(&settings(dir.path()), &pairs, None)
            .unwrap()
            .execute()
            .unwrap();

        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].config.subdivisions(), 5);
        assert_eq!(reports[1].outcome.time_series.len(), 61);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 4);
    }

    #[test]
    fn test_invalid_pair_fails_before_any_run() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        let result = Sweep::plan(&settings(&out), &[(10, 100), (10, -1)], None);
        assert!(result.is_err());
        assert!(!out.exists());
    }

    #[test]
    fn test_mismatched_lists() {
        assert!(Sweep::zip_pairs(&[10, 100], &[1000]).is_err());
    }

    #[test]
    fn test_configured_seed_is_shared() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = settings(dir.path());
        settings.simulation.seed = Some(77);
        let sweep = Sweep::plan(&settings, &[(10, 10), (100, 10)], None).unwrap();
        assert!(sweep.runs().iter().all(|run| run.config().base_seed() == 77));
    }

    #[test]
    fn test_empty_plan_rejected() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Sweep::plan(&settings(dir.path()), &[], None).is_err());
    }
}
