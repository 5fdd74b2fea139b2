//! Result writer.
//!
//! Each run produces two whitespace-separated text files whose names encode
//! `N`, `m`, `tmax` and the base seed:
//! - `randw-number_N{N}_m{m}_t{tmax}_{seed}.dat`: `time  population` rows for
//!   `t = 0..=tmax`;
//! - `randw-position_N{N}_m{m}_t{tmax}_{seed}.dat`: `index  position` rows for
//!   the walkers still inside at `tmax`.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use lipowalk_core::config::RunConfig;
use lipowalk_core::engine::SimulationOutcome;
use lipowalk_core::records::{FinalPositions, TimeSeries};

pub const TIME_SERIES_PREFIX: &str = "randw-number";
pub const POSITIONS_PREFIX: &str = "randw-position";
pub const FILE_EXTENSION: &str = "dat";

/// Paths of the two files of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunFiles {
    pub time_series: PathBuf,
    pub final_positions: PathBuf,
}

impl RunFiles {
    pub fn for_run(directory: &Path, config: &RunConfig) -> Self {
        let stem = run_stem(config);
        Self {
            time_series: directory.join(format!("{TIME_SERIES_PREFIX}_{stem}.{FILE_EXTENSION}")),
            final_positions: directory.join(format!("{POSITIONS_PREFIX}_{stem}.{FILE_EXTENSION}")),
        }
    }
}

/// `N{N}_m{m}_t{tmax}_{seed}`
pub fn run_stem(config: &RunConfig) -> String {
    format!(
        "N{}_m{}_t{}_{}",
        config.population(),
        config.subdivisions(),
        config.tmax(),
        config.base_seed()
    )
}

pub fn write_time_series<W: Write>(mut out: W, series: &TimeSeries) -> io::Result<()> {
    writeln!(out, "# time    number of walkers")?;
    for (t, count) in series.iter() {
        writeln!(out, "{t}    {count}")?;
    }
    out.flush()
}

pub fn write_final_positions<W: Write>(mut out: W, positions: &FinalPositions) -> io::Result<()> {
    writeln!(out, "# walker    position")?;
    for (index, position) in positions.iter() {
        writeln!(out, "{index}    {position}")?;
    }
    out.flush()
}

/// Writes run datasets into one directory.
#[derive(Debug, Clone)]
pub struct ResultWriter {
    directory: PathBuf,
}

impl ResultWriter {
    pub fn new<P: Into<PathBuf>>(directory: P) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    #[instrument(skip_all, fields(directory = %self.directory.display()))]
    pub fn write(&self, config: &RunConfig, outcome: &SimulationOutcome) -> io::Result<RunFiles> {
        fs::create_dir_all(&self.directory)?;
        let files = RunFiles::for_run(&self.directory, config);

        write_time_series(
            BufWriter::new(File::create(&files.time_series)?),
            &outcome.time_series,
        )?;
        write_final_positions(
            BufWriter::new(File::create(&files.final_positions)?),
            &outcome.final_positions,
        )?;

        debug!(
            time_series = %files.time_series.display(),
            final_positions = %files.final_positions.display(),
            "Run datasets written"
        );
        Ok(files)
    }
}
