//! ## lipowalk-core::engine
//! **Round-by-round population driver**
//!
//! A round steps every walker that was inside at the start of the round
//! exactly once, then records how many are still inside. Escaped walkers are
//! swap-removed from the active set as soon as they are stepped, so removal
//! is O(1) and nothing is ever stepped twice or skipped.
//!
//! Walkers never share state, so the population can also be split into
//! shards that advance on separate threads. Summing the per-shard counts
//! round by round gives exactly the sequential time series.

use tracing::{debug, info, instrument, trace};

use crate::config::RunConfig;
use crate::records::{FinalPositions, TimeSeries};
use crate::rng::{self, UniformSource, WalkerRng};
use crate::walker::{Status, Walker};
use crate::SimulationError;

/// Rounds between two progress log lines.
pub const DEFAULT_PROGRESS_INTERVAL: u64 = 10_000;

/// Upper bound on the rounds reserved up front; longer series grow as they run.
const PREALLOCATED_ROUNDS: u64 = 1 << 20;

/// The active walkers of a run.
#[derive(Debug, Clone)]
pub struct Population<R = WalkerRng> {
    active: Vec<Walker<R>>,
}

impl Population<WalkerRng> {
    /// Creates the `N` walkers of a run, each seeded from the base seed and
    /// its index, at uniform initial positions.
    pub fn provision(config: &RunConfig) -> Self {
        let step_length = config.step_length();
        let active = rng::provision(config.base_seed(), config.population())
            .into_iter()
            .map(|stream| Walker::initialize(stream, step_length))
            .collect();
        Self { active }
    }
}

impl<R: UniformSource> Population<R> {
    /// Builds a population from prepared walkers. Walkers that are already
    /// escaped are dropped.
    pub fn from_walkers(walkers: Vec<Walker<R>>) -> Self {
        Self {
            active: walkers.into_iter().filter(Walker::is_inside).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn walkers(&self) -> &[Walker<R>] {
        &self.active
    }

    /// Runs one round and returns the number of walkers that escaped in it.
    pub fn advance(&mut self) -> usize {
        let mut escaped = 0;
        let mut index = 0;
        while index < self.active.len() {
            if self.active[index].step() == Status::Escaped {
                // The walker moved into `index` comes from the unvisited tail,
                // so the same slot is visited again.
                self.active.swap_remove(index);
                escaped += 1;
            } else {
                index += 1;
            }
        }
        escaped
    }

    pub fn into_final_positions(self) -> FinalPositions {
        FinalPositions::from_positions(self.active.iter().map(Walker::position).collect())
    }

    /// Splits the population into at most `shards` contiguous parts.
    fn split(self, shards: usize) -> Vec<Population<R>> {
        let chunk = self.active.len().div_ceil(shards.max(1)).max(1);
        let mut remaining = self.active.into_iter();
        let mut parts = Vec::with_capacity(shards);
        loop {
            let active: Vec<_> = remaining.by_ref().take(chunk).collect();
            if active.is_empty() {
                break;
            }
            parts.push(Population { active });
        }
        parts
    }
}

/// Everything a run produces.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationOutcome {
    pub time_series: TimeSeries,
    pub final_positions: FinalPositions,
    /// Total number of `Walker::step` calls on inside walkers.
    pub walker_steps: u64,
}

impl SimulationOutcome {
    pub fn survivors(&self) -> usize {
        self.final_positions.len()
    }

    pub fn escaped(&self) -> usize {
        self.time_series
            .counts()
            .first()
            .copied()
            .unwrap_or(0)
            .saturating_sub(self.survivors())
    }
}

/// Drives a population through `tmax` rounds.
#[derive(Debug, Clone)]
pub struct Engine {
    config: RunConfig,
    progress_interval: u64,
}

impl Engine {
    pub fn new(config: RunConfig) -> Self {
        Self {
            config,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }

    pub fn with_progress_interval(mut self, rounds: u64) -> Self {
        self.progress_interval = rounds.max(1);
        self
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Runs the configured population on the calling thread.
    #[instrument(skip_all, fields(
        n = self.config.population(),
        m = self.config.subdivisions(),
        tmax = self.config.tmax(),
        seed = self.config.base_seed()
    ))]
    pub fn run(&self) -> SimulationOutcome {
        info!("Starting sequential simulation");
        self.run_population(Population::provision(&self.config))
    }

    /// Runs a prepared population for the configured number of rounds.
    pub fn run_population<R: UniformSource>(&self, population: Population<R>) -> SimulationOutcome {
        drive(population, self.config.tmax(), self.progress_interval, 0)
    }

    /// Runs the configured population split across `shards` threads.
    #[instrument(skip_all, fields(
        n = self.config.population(),
        m = self.config.subdivisions(),
        tmax = self.config.tmax(),
        seed = self.config.base_seed(),
        shards = shards
    ))]
    pub fn run_sharded(&self, shards: usize) -> Result<SimulationOutcome, SimulationError> {
        info!("Starting sharded simulation");
        self.run_population_sharded(Population::provision(&self.config), shards)
    }

    /// Runs a prepared population split across `shards` threads.
    pub fn run_population_sharded<R: UniformSource + Send>(
        &self,
        population: Population<R>,
        shards: usize,
    ) -> Result<SimulationOutcome, SimulationError> {
        if shards <= 1 || population.len() <= 1 {
            return Ok(self.run_population(population));
        }

        let tmax = self.config.tmax();
        let interval = self.progress_interval;
        let parts = population.split(shards);
        debug!(parts = parts.len(), "Population split into shards");

        let results = crossbeam::thread::scope(|scope| {
            let handles: Vec<_> = parts
                .into_iter()
                .enumerate()
                .map(|(shard, part)| scope.spawn(move |_| drive(part, tmax, interval, shard)))
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join())
                .collect::<Result<Vec<_>, _>>()
        })
        .map_err(|_| SimulationError::Shard("shard scope panicked".into()))?
        .map_err(|_| SimulationError::Shard("shard worker panicked".into()))?;

        let mut outcomes = results.into_iter();
        let Some(mut combined) = outcomes.next() else {
            return Err(SimulationError::Shard("no shard produced an outcome".into()));
        };
        for outcome in outcomes {
            combined.time_series.accumulate(outcome.time_series.counts());
            combined.final_positions.extend(outcome.final_positions);
            combined.walker_steps += outcome.walker_steps;
        }
        Ok(combined)
    }
}

fn drive<R: UniformSource>(
    mut population: Population<R>,
    tmax: u64,
    progress_interval: u64,
    shard: usize,
) -> SimulationOutcome {
    let mut time_series = TimeSeries::with_capacity((tmax.min(PREALLOCATED_ROUNDS) + 1) as usize);
    time_series.push(population.len());
    let mut walker_steps = 0u64;

    for t in 1..=tmax {
        if !population.is_empty() {
            walker_steps += population.len() as u64;
            let escaped = population.advance();
            trace!(shard, t, escaped, inside = population.len(), "Round complete");
        }
        time_series.push(population.len());

        if t % progress_interval == 0 {
            debug!(shard, t, inside = population.len(), "Simulation progress");
        }
    }

    SimulationOutcome {
        time_series,
        final_positions: population.into_final_positions(),
        walker_steps,
    }
}
