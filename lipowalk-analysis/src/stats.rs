//! Population-decay and spatial-density statistics.

use std::f64::consts::PI;

use lipowalk_core::records::TimeSeries;

use crate::AnalysisError;

/// Decay time of the slowest diffusion mode, `8 m^2 / pi^2` rounds.
pub fn theoretical_decay_time(subdivisions: u64) -> f64 {
    let m = subdivisions as f64;
    8.0 * m * m / (PI * PI)
}

/// Pointwise mean of several runs of equal length.
pub fn mean_time_series(series: &[TimeSeries]) -> Result<Vec<f64>, AnalysisError> {
    let Some(first) = series.first() else {
        return Ok(Vec::new());
    };
    if let Some(other) = series.iter().find(|s| s.len() != first.len()) {
        return Err(AnalysisError::Inconsistent(format!(
            "time series lengths differ ({} and {})",
            first.len(),
            other.len()
        )));
    }

    let mut sums = vec![0.0; first.len()];
    for run in series {
        for (sum, &count) in sums.iter_mut().zip(run.counts()) {
            *sum += count as f64;
        }
    }
    let runs = series.len() as f64;
    Ok(sums.into_iter().map(|sum| sum / runs).collect())
}

/// Least-squares fit of `ln N(t) = a - t / tau`. Entries with a zero count
/// are skipped. Returns `None` without two usable points or without decay.
pub fn fit_decay_time(counts: &[f64]) -> Option<f64> {
    let points: Vec<(f64, f64)> = counts
        .iter()
        .enumerate()
        .filter(|(_, &count)| count > 0.0)
        .map(|(t, &count)| (t as f64, count.ln()))
        .collect();
    if points.len() < 2 {
        return None;
    }

    let n = points.len() as f64;
    let mean_t = points.iter().map(|(t, _)| t).sum::<f64>() / n;
    let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / n;
    let (covariance, variance) = points.iter().fold((0.0, 0.0), |(cov, var), (t, y)| {
        let dt = t - mean_t;
        (cov + dt * (y - mean_y), var + dt * dt)
    });

    let slope = covariance / variance;
    (slope < 0.0).then(|| -1.0 / slope)
}

/// Normalized density histogram over `[low, high]`. The upper edge belongs
/// to the last bin, and values outside the range are ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    low: f64,
    high: f64,
    counts: Vec<u64>,
}

impl Histogram {
    pub fn new(values: &[f64], bins: usize, low: f64, high: f64) -> Result<Self, AnalysisError> {
        if bins == 0 || high <= low {
            return Err(AnalysisError::Inconsistent(format!(
                "cannot build {bins} bins over [{low}, {high}]"
            )));
        }

        let width = (high - low) / bins as f64;
        let mut counts = vec![0u64; bins];
        for &value in values {
            if !(low..=high).contains(&value) {
                continue;
            }
            let bin = (((value - low) / width) as usize).min(bins - 1);
            counts[bin] += 1;
        }
        Ok(Self { low, high, counts })
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    pub fn bin_width(&self) -> f64 {
        (self.high - self.low) / self.counts.len() as f64
    }

    /// Total number of values that fell inside the range.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// `(bin_center, density)` rows; densities integrate to one.
    pub fn density(&self) -> Vec<(f64, f64)> {
        let width = self.bin_width();
        let total = self.total();
        self.counts
            .iter()
            .enumerate()
            .map(|(bin, &count)| {
                let center = self.low + (bin as f64 + 0.5) * width;
                let density = if total == 0 {
                    0.0
                } else {
                    count as f64 / (total as f64 * width)
                };
                (center, density)
            })
            .collect()
    }
}
