//! Discovery and parsing of run datasets.

use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use lipowalk_core::records::TimeSeries;

use crate::AnalysisError;

static RUN_FILE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^randw-(number|position)_N(\d+)_m(\d+)_t(\d+)_(\d+)\.dat$")
        .expect("run file pattern is a valid regex")
});

/// Which dataset a file holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunKind {
    TimeSeries,
    Positions,
}

impl RunKind {
    pub fn label(self) -> &'static str {
        match self {
            RunKind::TimeSeries => "time series",
            RunKind::Positions => "final position",
        }
    }
}

/// A run dataset identified by its file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunFile {
    pub kind: RunKind,
    pub population: usize,
    pub subdivisions: u64,
    pub tmax: u64,
    pub seed: u64,
    pub path: PathBuf,
}

impl RunFile {
    /// Parses a run file name; returns `None` for unrelated files.
    pub fn parse(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?;
        let captures = RUN_FILE.captures(name)?;
        let kind = match &captures[1] {
            "number" => RunKind::TimeSeries,
            _ => RunKind::Positions,
        };
        Some(Self {
            kind,
            population: captures[2].parse().ok()?,
            subdivisions: captures[3].parse().ok()?,
            tmax: captures[4].parse().ok()?,
            seed: captures[5].parse().ok()?,
            path: path.to_path_buf(),
        })
    }

    fn matches(&self, kind: RunKind, population: usize, subdivisions: u64, tmax: u64) -> bool {
        self.kind == kind
            && self.population == population
            && self.subdivisions == subdivisions
            && self.tmax == tmax
    }
}

/// Lists the files of one kind and parameter set in `directory`, ordered by
/// seed.
pub fn discover(
    directory: &Path,
    kind: RunKind,
    population: usize,
    subdivisions: u64,
    tmax: u64,
) -> Result<Vec<RunFile>, AnalysisError> {
    let mut found = Vec::new();
    for entry in fs::read_dir(directory)? {
        let path = entry?.path();
        if let Some(file) = RunFile::parse(&path) {
            if file.matches(kind, population, subdivisions, tmax) {
                found.push(file);
            }
        }
    }
    found.sort_by_key(|file| file.seed);
    debug!(kind = kind.label(), count = found.len(), "Run files discovered");
    Ok(found)
}

/// Reads `time  count` rows; the time column must count up from zero.
pub fn load_time_series(path: &Path) -> Result<TimeSeries, AnalysisError> {
    let mut counts: Vec<usize> = Vec::new();
    for_each_row(path, |line, columns| {
        let [time, count] = columns else {
            return Err(malformed(path, line, "expected two columns"));
        };
        let time: usize = time
            .parse()
            .map_err(|_| malformed(path, line, "time is not an integer"))?;
        if time != counts.len() {
            return Err(malformed(path, line, "time column is not consecutive"));
        }
        counts.push(
            count
                .parse()
                .map_err(|_| malformed(path, line, "count is not an integer"))?,
        );
        Ok(())
    })?;
    Ok(TimeSeries::from_counts(counts))
}

/// Reads the position column of `index  position` rows.
pub fn load_positions(path: &Path) -> Result<Vec<f64>, AnalysisError> {
    let mut positions: Vec<f64> = Vec::new();
    for_each_row(path, |line, columns| {
        let [_, position] = columns else {
            return Err(malformed(path, line, "expected two columns"));
        };
        positions.push(
            position
                .parse()
                .map_err(|_| malformed(path, line, "position is not a number"))?,
        );
        Ok(())
    })?;
    Ok(positions)
}

/// Calls `visit` with the 1-based line number and whitespace-separated
/// columns of every non-blank, non-comment row.
fn for_each_row<F>(path: &Path, mut visit: F) -> Result<(), AnalysisError>
where
    F: FnMut(usize, &[&str]) -> Result<(), AnalysisError>,
{
    let text = fs::read_to_string(path)?;
    for (index, row) in text.lines().enumerate() {
        let row = row.trim();
        if row.is_empty() || row.starts_with('#') {
            continue;
        }
        let columns: Vec<&str> = row.split_whitespace().collect();
        visit(index + 1, &columns)?;
    }
    Ok(())
}

fn malformed(path: &Path, line: usize, message: &str) -> AnalysisError {
    AnalysisError::Malformed {
        path: path.to_path_buf(),
        line,
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_time_series_name() {
        let file = RunFile::parse(Path::new("files/randw-number_N10000_m100_t30000_987.dat")).unwrap();
        assert_eq!(file.kind, RunKind::TimeSeries);
        assert_eq!(file.population, 10_000);
        assert_eq!(file.subdivisions, 100);
        assert_eq!(file.tmax, 30_000);
        assert_eq!(file.seed, 987);
    }

    #[test]
    fn parse_rejects_other_names() {
        assert!(RunFile::parse(Path::new("notes.txt")).is_none());
        assert!(RunFile::parse(Path::new("randw-number_N10_m1_t5.dat")).is_none());
        assert!(RunFile::parse(Path::new("randw-velocity_N1_m1_t1_1.dat")).is_none());
    }

    #[test]
    fn discover_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in [
            "randw-number_N10_m2_t5_9.dat",
            "randw-number_N10_m2_t5_3.dat",
            "randw-number_N10_m4_t5_1.dat",
            "randw-position_N10_m2_t5_3.dat",
            "readme.md",
        ] {
            fs::write(dir.path().join(name), "").unwrap();
        }
        let found = discover(dir.path(), RunKind::TimeSeries, 10, 2, 5).unwrap();
        let seeds: Vec<_> = found.iter().map(|file| file.seed).collect();
        assert_eq!(seeds, vec![3, 9]);
    }

    #[test]
    fn load_both_kinds() {
        let dir = tempfile::tempdir().unwrap();
        let series = dir.path().join("series.dat");
        fs::write(&series, "# time    number of walkers\n0    4\n1    3\n").unwrap();
        assert_eq!(load_time_series(&series).unwrap().counts(), &[4, 3]);

        let positions = dir.path().join("positions.dat");
        fs::write(&positions, "# walker    position\n0    0.6\n1    0.1\n").unwrap();
        assert_eq!(load_positions(&positions).unwrap(), vec![0.6, 0.1]);
    }

    #[test]
    fn malformed_rows_report_line() {
        let dir = tempfile::tempdir().unwrap();
        let series = dir.path().join("series.dat");
        fs::write(&series, "# header\n0    4\n2    3\n").unwrap();
        match load_time_series(&series) {
            Err(AnalysisError::Malformed { line, .. }) => assert_eq!(line, 3),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
