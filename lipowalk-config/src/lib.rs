//! # lipowalk Configuration
//!
//! Layered configuration for simulation runs.
//!
//! ## Hierarchy
//! 1. Default values
//! 2. `lipowalk.yaml` in the working directory, if present
//! 3. `LIPOWALK_*` environment variables (`__` separates nested keys)
//! 4. Command-line overrides ([`Overrides`])

#![warn(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

mod error;
mod output;
mod simulation;
mod telemetry;
mod validation;

pub use error::ConfigError;
pub use output::OutputConfig;
pub use simulation::SimulationConfig;
pub use telemetry::TelemetryConfig;

/// Default configuration file looked up by [`LipowalkConfig::load`].
pub const DEFAULT_CONFIG_FILE: &str = "lipowalk.yaml";

/// Top-level configuration container.
#[derive(Debug, Serialize, Deserialize, Validate, Default, Clone, PartialEq)]
pub struct LipowalkConfig {
    /// Run parameters.
    #[validate(nested)]
    #[serde(default)]
    pub simulation: SimulationConfig,

    /// Output placement.
    #[validate(nested)]
    #[serde(default)]
    pub output: OutputConfig,

    /// Logging.
    #[validate(nested)]
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Values given explicitly on the command line.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub population: Option<i64>,
    pub subdivisions: Option<i64>,
    pub tmax: Option<i64>,
    pub seed: Option<u64>,
    pub threads: Option<usize>,
    pub output_directory: Option<PathBuf>,
    pub log_level: Option<String>,
}

impl LipowalkConfig {
    /// Load configuration from defaults, `lipowalk.yaml` and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(LipowalkConfig::default()));

        if Path::new(DEFAULT_CONFIG_FILE).exists() {
            figment = figment.merge(Yaml::file(DEFAULT_CONFIG_FILE));
        }

        Self::extract(figment.merge(Env::prefixed("LIPOWALK_").split("__")))
    }

    /// Load configuration from a specific file layered over the defaults.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        Self::extract(
            Figment::from(Serialized::defaults(LipowalkConfig::default()))
                .merge(Yaml::file(path))
                .merge(Env::prefixed("LIPOWALK_").split("__")),
        )
    }

    /// Applies command-line overrides and validates the result.
    pub fn with_overrides(mut self, overrides: &Overrides) -> Result<Self, ConfigError> {
        let simulation = &mut self.simulation;
        if let Some(population) = overrides.population {
            simulation.population = population;
        }
        if let Some(subdivisions) = overrides.subdivisions {
            simulation.subdivisions = subdivisions;
        }
        if let Some(tmax) = overrides.tmax {
            simulation.tmax = tmax;
        }
        if let Some(seed) = overrides.seed {
            simulation.seed = Some(seed);
        }
        if let Some(threads) = overrides.threads {
            simulation.threads = threads;
        }
        if let Some(directory) = &overrides.output_directory {
            self.output.directory = directory.clone();
        }
        if let Some(level) = &overrides.log_level {
            self.telemetry.log_level = level.clone();
        }

        self.validate()?;
        Ok(self)
    }

    fn extract(figment: Figment) -> Result<Self, ConfigError> {
        figment
            .extract()
            .map_err(ConfigError::from)
            .and_then(|config: Self| {
                config.validate()?;
                Ok(config)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn full_config_validation() {
        let config = LipowalkConfig::default();
        config.validate().expect("Default config should validate");
    }

    #[test]
    fn defaults_without_file() {
        Jail::expect_with(|_jail| {
            let config = LipowalkConfig::load().map_err(|e| e.to_string())?;
            assert_eq!(config.simulation.population, 10_000);
            assert_eq!(config.simulation.subdivisions, 10_000);
            assert_eq!(config.simulation.tmax, 200_000);
            assert_eq!(config.output.directory, PathBuf::from("files"));
            Ok(())
        });
    }

    #[test]
    fn file_and_environment_layering() {
        Jail::expect_with(|jail| {
            jail.create_file(
                DEFAULT_CONFIG_FILE,
                r#"
simulation:
  population: 500
  subdivisions: 100
  tmax: 30000
output:
  directory: runs
"#,
            )?;
            jail.set_env("LIPOWALK_SIMULATION__TMAX", "1000");

            let config = LipowalkConfig::load().map_err(|e| e.to_string())?;
            assert_eq!(config.simulation.population, 500);
            assert_eq!(config.simulation.subdivisions, 100);
            assert_eq!(config.simulation.tmax, 1000);
            assert_eq!(config.output.directory, PathBuf::from("runs"));
            Ok(())
        });
    }

    #[test]
    fn invalid_file_is_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file("bad.yaml", "simulation:\n  population: 0\n")?;
            let result = LipowalkConfig::load_from_path("bad.yaml");
            assert!(matches!(result, Err(ConfigError::Validation(_))));
            Ok(())
        });
    }

    #[test]
    fn missing_explicit_file() {
        let result = LipowalkConfig::load_from_path("/nonexistent/lipowalk.yaml");
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn overrides_take_precedence() {
        let overrides = Overrides {
            population: Some(4),
            subdivisions: Some(2),
            tmax: Some(1),
            seed: Some(99),
            ..Overrides::default()
        };
        let config = LipowalkConfig::default()
            .with_overrides(&overrides)
            .unwrap();
        assert_eq!(config.simulation.population, 4);
        assert_eq!(config.simulation.subdivisions, 2);
        assert_eq!(config.simulation.tmax, 1);
        assert_eq!(config.simulation.seed, Some(99));
    }

    #[test]
    fn invalid_override_is_rejected() {
        let overrides = Overrides {
            tmax: Some(-5),
            ..Overrides::default()
        };
        let result = LipowalkConfig::default().with_overrides(&overrides);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }
}
