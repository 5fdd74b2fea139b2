//! # lipowalk Analysis
//!
//! Aggregates the datasets written by independent runs that share `N`, `m`
//! and `tmax`: the mean population curve, its fitted decay time against the
//! theoretical `8 m^2 / pi^2`, and the density of final positions pooled over
//! all runs.

use std::path::Path;

use tracing::{info, instrument};

pub mod error;
pub mod files;
pub mod stats;

pub use error::AnalysisError;
pub use files::{discover, load_positions, load_time_series, RunFile, RunKind};
pub use stats::{fit_decay_time, mean_time_series, theoretical_decay_time, Histogram};

/// Aggregate view of all runs for one parameter set.
#[derive(Debug, Clone)]
pub struct Summary {
    pub population: usize,
    pub subdivisions: u64,
    pub tmax: u64,
    pub time_series_runs: usize,
    pub position_runs: usize,
    pub mean_counts: Vec<f64>,
    pub fitted_decay_time: Option<f64>,
    pub theoretical_decay_time: f64,
    pub histogram: Histogram,
}

/// Loads every matching dataset in `directory` and summarizes it.
#[instrument(skip(directory), fields(directory = %directory.display()))]
pub fn summarize(
    directory: &Path,
    population: usize,
    subdivisions: u64,
    tmax: u64,
    bins: usize,
) -> Result<Summary, AnalysisError> {
    let series_files = discover(directory, RunKind::TimeSeries, population, subdivisions, tmax)?;
    let position_files = discover(directory, RunKind::Positions, population, subdivisions, tmax)?;
    if series_files.is_empty() && position_files.is_empty() {
        return Err(AnalysisError::NoRuns {
            kind: "run",
            population,
            subdivisions,
            tmax,
            directory: directory.to_path_buf(),
        });
    }

    let series = series_files
        .iter()
        .map(|file| load_time_series(&file.path))
        .collect::<Result<Vec<_>, _>>()?;
    let mean_counts = mean_time_series(&series)?;

    let mut positions = Vec::new();
    for file in &position_files {
        positions.extend(load_positions(&file.path)?);
    }
    let histogram = Histogram::new(&positions, bins, 0.0, 1.0)?;

    let summary = Summary {
        population,
        subdivisions,
        tmax,
        time_series_runs: series.len(),
        position_runs: position_files.len(),
        fitted_decay_time: fit_decay_time(&mean_counts),
        theoretical_decay_time: theoretical_decay_time(subdivisions),
        mean_counts,
        histogram,
    };
    info!(
        time_series_runs = summary.time_series_runs,
        position_runs = summary.position_runs,
        fitted_tau = ?summary.fitted_decay_time,
        theoretical_tau = summary.theoretical_decay_time,
        "Runs summarized"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lipowalk_core::config::RunConfig;
    use lipowalk_simulator::Simulator;

    #[test]
    fn summarize_simulated_runs() {
        let dir = tempfile::tempdir().unwrap();
        for seed in [11, 12, 13] {
            let config = RunConfig::new(400, 10, 300, seed).unwrap();
            Simulator::new(config, dir.path()).run().unwrap();
        }
        // A run with other parameters must not be picked up.
        Simulator::new(RunConfig::new(400, 5, 300, 11).unwrap(), dir.path())
            .run()
            .unwrap();

        let summary = summarize(dir.path(), 400, 10, 300, 20).unwrap();
        assert_eq!(summary.time_series_runs, 3);
        assert_eq!(summary.position_runs, 3);
        assert_eq!(summary.mean_counts.len(), 301);
        assert_eq!(summary.mean_counts[0], 400.0);
        assert!(summary.mean_counts.windows(2).all(|w| w[1] <= w[0]));

        // Loose bound: the discrete walk only approaches the continuum decay
        // time for large m.
        let fitted = summary.fitted_decay_time.unwrap();
        let theory = summary.theoretical_decay_time;
        assert!(fitted > theory * 0.3 && fitted < theory * 3.0, "{fitted} vs {theory}");
    }

    #[test]
    fn summarize_without_runs() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            summarize(dir.path(), 10, 10, 10, 5),
            Err(AnalysisError::NoRuns { .. })
        ));
    }
}
