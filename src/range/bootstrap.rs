//! Patient-level bootstrap resampling of aggregate time in range.

use indexmap::IndexMap;
use rand::{rngs::StdRng, Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::range::aggregate::{AggregateRow, LabelTotals};
use crate::range::types::Interval;

/// How repeated draws of the same patient count toward a resample.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Resampling {
    /// A patient drawn one or more times contributes its intervals once.
    #[default]
    Membership,
    /// A patient drawn `k` times contributes its intervals `k` times.
    Multiplicity,
}

/// Bootstrap run parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootstrapConfig {
    pub iterations: usize,
    pub seed: u64,
    pub resampling: Resampling,
}

/// One resample's aggregate rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BootstrapSample {
    pub iteration: usize,
    pub rows: Vec<AggregateRow>,
}

/// Intervals indexed by patient, in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct PatientIntervals {
    by_patient: IndexMap<String, Vec<Interval>>,
}

impl PatientIntervals {
    pub fn from_intervals(intervals: &[Interval]) -> Self {
        let mut by_patient: IndexMap<String, Vec<Interval>> = IndexMap::new();
        for interval in intervals {
            by_patient
                .entry(interval.patient_id.clone())
                .or_default()
                .push(interval.clone());
        }
        Self { by_patient }
    }

    pub fn patient_count(&self) -> usize {
        self.by_patient.len()
    }

    /// Intervals for `patient_id`; empty for an unknown patient.
    pub fn get(&self, patient_id: &str) -> &[Interval] {
        self.by_patient
            .get(patient_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Aggregate the intervals selected by a draw of patient ids. Unknown ids contribute nothing.
    pub fn resample(&self, drawn_ids: &[&str], resampling: Resampling) -> Vec<AggregateRow> {
        let drawn: Vec<usize> = drawn_ids
            .iter()
            .filter_map(|id| self.by_patient.get_index_of(*id))
            .collect();
        self.resample_indices(&drawn, resampling)
    }

    fn resample_indices(&self, drawn: &[usize], resampling: Resampling) -> Vec<AggregateRow> {
        let mut counts = vec![0usize; self.by_patient.len()];
        for &idx in drawn {
            counts[idx] += 1;
        }
        self.by_patient
            .values()
            .zip(counts)
            .fold(LabelTotals::default(), |totals, (intervals, count)| {
                accumulate(totals, intervals, count, resampling)
            })
            .into_rows()
    }
}

fn accumulate(
    totals: LabelTotals,
    intervals: &[Interval],
    count: usize,
    resampling: Resampling,
) -> LabelTotals {
    let weight = match (resampling, count) {
        (_, 0) => return totals,
        (Resampling::Membership, _) => 1.0,
        (Resampling::Multiplicity, k) => k as f64,
    };
    intervals
        .iter()
        .fold(totals, |acc, interval| acc.add_weighted(interval, weight))
}

/// Run `config.iterations` independent resamples of the patient population.
///
/// Iteration `i` draws from its own generator seeded by `(config.seed, i)`, so the output is the
/// same for any thread count.
pub fn bootstrap(population: &PatientIntervals, config: BootstrapConfig) -> Vec<BootstrapSample> {
    let n = population.patient_count();
    info!(
        iterations = config.iterations,
        patients = n,
        seed = config.seed,
        resampling = ?config.resampling,
        "starting bootstrap"
    );

    let samples: Vec<BootstrapSample> = (0..config.iterations)
        .into_par_iter()
        .map(|iteration| {
            let mut rng = iteration_rng(config.seed, iteration);
            let drawn: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
            BootstrapSample {
                iteration,
                rows: population.resample_indices(&drawn, config.resampling),
            }
        })
        .collect();

    debug!(samples = samples.len(), "bootstrap finished");
    samples
}

/// Generator for one iteration, derived from the run seed with a splitmix64 finaliser.
pub fn iteration_rng(seed: u64, iteration: usize) -> StdRng {
    let mut z = seed ^ (iteration as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    StdRng::seed_from_u64(z ^ (z >> 31))
}
