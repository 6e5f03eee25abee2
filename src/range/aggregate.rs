//! Per-label duration totals and percentages.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::range::types::{Interval, Label};

/// Total time spent in one label across an interval set.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AggregateRow {
    pub label: Label,
    pub total_duration: f64,
    /// Share of all aggregated time; `None` when the set holds no time at all.
    pub percent: Option<f64>,
}

/// Running per-label sums. Merging is commutative and associative.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LabelTotals {
    durations: [f64; 4],
}

impl LabelTotals {
    pub fn add(mut self, interval: &Interval) -> Self {
        self.durations[interval.label.index()] += interval.duration;
        self
    }

    /// Add an interval counted `weight` times.
    pub fn add_weighted(mut self, interval: &Interval, weight: f64) -> Self {
        self.durations[interval.label.index()] += interval.duration * weight;
        self
    }

    pub fn merge(mut self, other: Self) -> Self {
        for (mine, theirs) in self.durations.iter_mut().zip(other.durations) {
            *mine += theirs;
        }
        self
    }

    pub fn total(&self) -> f64 {
        self.durations.iter().sum()
    }

    pub fn duration(&self, label: Label) -> f64 {
        self.durations[label.index()]
    }

    /// One row per label in [`Label::ALL`] order.
    pub fn into_rows(self) -> Vec<AggregateRow> {
        let total = self.total();
        Label::ALL
            .iter()
            .map(|&label| {
                let total_duration = self.duration(label);
                AggregateRow {
                    label,
                    total_duration,
                    percent: (total > 0.0).then(|| total_duration / total),
                }
            })
            .collect()
    }
}

/// Aggregate any collection of intervals into per-label rows.
pub fn aggregate<'a, I>(intervals: I) -> Vec<AggregateRow>
where
    I: IntoIterator<Item = &'a Interval>,
{
    intervals
        .into_iter()
        .fold(LabelTotals::default(), LabelTotals::add)
        .into_rows()
}

/// Same as [`aggregate`], with partial sums computed on the rayon pool.
pub fn aggregate_parallel(intervals: &[Interval]) -> Vec<AggregateRow> {
    intervals
        .par_iter()
        .fold(LabelTotals::default, LabelTotals::add)
        .reduce(LabelTotals::default, LabelTotals::merge)
        .into_rows()
}

/// Look up the row for `label`.
pub fn row_for(rows: &[AggregateRow], label: Label) -> Option<&AggregateRow> {
    rows.iter().find(|row| row.label == label)
}
