//! Datasets produced by a run.

/// Population size per round. Entry `t` is the number of walkers inside after
/// round `t`; entry 0 is the initial population.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TimeSeries {
    counts: Vec<usize>,
}

impl TimeSeries {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            counts: Vec::with_capacity(capacity),
        }
    }

    pub fn from_counts(counts: Vec<usize>) -> Self {
        Self { counts }
    }

    pub fn push(&mut self, count: usize) {
        self.counts.push(count);
    }

    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterates `(time, population)` pairs in time order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, usize)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .map(|(t, &count)| (t as u64, count))
    }

    pub fn last(&self) -> Option<usize> {
        self.counts.last().copied()
    }

    pub fn is_non_increasing(&self) -> bool {
        self.counts.windows(2).all(|w| w[1] <= w[0])
    }

    /// Adds another series of the same length entry by entry.
    pub(crate) fn accumulate(&mut self, other: &[usize]) {
        debug_assert_eq!(self.counts.len(), other.len());
        for (total, count) in self.counts.iter_mut().zip(other) {
            *total += count;
        }
    }
}

/// Positions of the walkers still inside at the end of a run. Indices are
/// assigned in storage order, which carries no meaning.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FinalPositions {
    positions: Vec<f64>,
}

impl FinalPositions {
    pub fn from_positions(positions: Vec<f64>) -> Self {
        Self { positions }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[f64] {
        &self.positions
    }

    /// Iterates `(index, position)` rows.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.positions.iter().copied().enumerate()
    }

    /// Positions in ascending order, for order-insensitive comparison.
    pub fn sorted(&self) -> Vec<f64> {
        let mut sorted = self.positions.clone();
        sorted.sort_by(f64::total_cmp);
        sorted
    }

    pub(crate) fn extend(&mut self, other: FinalPositions) {
        self.positions.extend(other.positions);
    }
}
