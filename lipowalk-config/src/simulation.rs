//! Simulation run parameters.
//!
//! Numeric fields are signed so that negative values coming from files or the
//! environment are reported as validation errors rather than parse errors.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Parameters of the random-walk runs.
#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq)]
pub struct SimulationConfig {
    /// Number of walkers `N`.
    #[validate(range(min = 1))]
    #[serde(default = "default_population")]
    pub population: i64,

    /// Interval subdivisions `m`; the step length is `1/m`.
    #[validate(range(min = 1))]
    #[serde(default = "default_subdivisions")]
    pub subdivisions: i64,

    /// Number of rounds.
    #[validate(range(min = 0))]
    #[serde(default = "default_tmax")]
    pub tmax: i64,

    /// Base seed. Drawn from OS entropy when absent.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Worker threads used to advance the population.
    #[validate(range(min = 1, max = 1024))]
    #[serde(default = "default_threads")]
    pub threads: usize,

    /// Rounds between progress log lines.
    #[validate(range(min = 1))]
    #[serde(default = "default_progress_interval")]
    pub progress_interval: u64,
}

fn default_population() -> i64 {
    10_000
}

fn default_subdivisions() -> i64 {
    10_000
}

fn default_tmax() -> i64 {
    200_000
}

fn default_threads() -> usize {
    num_cpus::get()
}

fn default_progress_interval() -> u64 {
    10_000
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            population: default_population(),
            subdivisions: default_subdivisions(),
            tmax: default_tmax(),
            seed: None,
            threads: default_threads(),
            progress_interval: default_progress_interval(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_default_simulation_config() {
        SimulationConfig::default()
            .validate()
            .expect("Default config should be valid");
    }

    #[test]
    fn invalid_population() {
        let mut config = SimulationConfig::default();
        config.population = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn invalid_tmax() {
        let mut config = SimulationConfig::default();
        config.tmax = -1;
        assert!(config.validate().is_err());
        config.tmax = 0;
        assert!(config.validate().is_ok());
    }
}
