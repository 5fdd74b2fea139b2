//! Immutable parameters of a single run.

use crate::SimulationError;

/// Largest `tmax` whose `tmax + 1` population counts still fit in one
/// allocation.
pub const MAX_ROUNDS: u64 = (isize::MAX as usize / std::mem::size_of::<usize>() - 1) as u64;

/// Validated run parameters: population size `N`, interval subdivisions `m`
/// (step length `1/m`), number of rounds `tmax` and the base seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunConfig {
    population: usize,
    subdivisions: u64,
    tmax: u64,
    base_seed: u64,
}

impl RunConfig {
    /// Builds a run configuration, rejecting a non-positive population or
    /// subdivision count and a negative number of rounds.
    pub fn new(
        population: i64,
        subdivisions: i64,
        tmax: i64,
        base_seed: u64,
    ) -> Result<Self, SimulationError> {
        if population <= 0 {
            return Err(SimulationError::InvalidConfiguration(format!(
                "population must be positive, got {population}"
            )));
        }
        if subdivisions <= 0 {
            return Err(SimulationError::InvalidConfiguration(format!(
                "interval subdivisions must be positive, got {subdivisions}"
            )));
        }
        if tmax < 0 {
            return Err(SimulationError::InvalidConfiguration(format!(
                "tmax must not be negative, got {tmax}"
            )));
        }
        if tmax as u64 > MAX_ROUNDS {
            return Err(SimulationError::InvalidConfiguration(format!(
                "tmax {tmax} exceeds the largest recordable run of {MAX_ROUNDS} rounds"
            )));
        }
        let population = usize::try_from(population).map_err(|_| {
            SimulationError::InvalidConfiguration(format!("population {population} is too large"))
        })?;

        Ok(Self {
            population,
            subdivisions: subdivisions as u64,
            tmax: tmax as u64,
            base_seed,
        })
    }

    pub fn population(&self) -> usize {
        self.population
    }

    pub fn subdivisions(&self) -> u64 {
        self.subdivisions
    }

    pub fn tmax(&self) -> u64 {
        self.tmax
    }

    pub fn base_seed(&self) -> u64 {
        self.base_seed
    }

    /// Distance covered by one step, `1/m`.
    pub fn step_length(&self) -> f64 {
        1.0 / self.subdivisions as f64
    }
}
