//! BLAKE3 digest of a run, used to check that a seeded run reproduces.

use blake3::Hasher;

use lipowalk_core::config::RunConfig;
use lipowalk_core::engine::SimulationOutcome;

/// Hex digest over the run parameters, the time series and the final
/// positions in ascending order. Storage order of survivors does not matter,
/// so sequential and sharded runs of one seed agree.
pub fn run_digest(config: &RunConfig, outcome: &SimulationOutcome) -> String {
    let mut hasher = Hasher::new();
    hasher.update(&(config.population() as u64).to_le_bytes());
    hasher.update(&config.subdivisions().to_le_bytes());
    hasher.update(&config.tmax().to_le_bytes());
    hasher.update(&config.base_seed().to_le_bytes());

    for &count in outcome.time_series.counts() {
        hasher.update(&(count as u64).to_le_bytes());
    }
    for position in outcome.final_positions.sorted() {
        hasher.update(&position.to_bits().to_le_bytes());
    }

    hex::encode(hasher.finalize().as_bytes())
}
