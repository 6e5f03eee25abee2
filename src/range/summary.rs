//! Bootstrap distribution summaries per label.

use ndarray::Array1;
use serde::Serialize;

use crate::range::bootstrap::BootstrapSample;
use crate::range::types::Label;

/// Two-sided coverage of the percentile interval.
const COVERAGE: f64 = 0.95;

/// Spread of one label's percent across bootstrap iterations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelSummary {
    pub label: Label,
    /// Iterations with a defined percent.
    pub iterations: usize,
    /// Iterations whose resample held no time.
    pub undefined: usize,
    pub mean: Option<f64>,
    /// Sample standard deviation (n - 1).
    pub std_dev: Option<f64>,
    pub ci_low: Option<f64>,
    pub ci_high: Option<f64>,
}

/// Summarise bootstrap percents for every label.
pub fn summarize(samples: &[BootstrapSample]) -> Vec<LabelSummary> {
    Label::ALL
        .iter()
        .map(|&label| summarize_label(samples, label))
        .collect()
}

fn summarize_label(samples: &[BootstrapSample], label: Label) -> LabelSummary {
    let percents: Vec<Option<f64>> = samples
        .iter()
        .map(|sample| {
            sample
                .rows
                .iter()
                .find(|row| row.label == label)
                .and_then(|row| row.percent)
        })
        .collect();
    let mut defined: Vec<f64> = percents.iter().flatten().copied().collect();
    let undefined = percents.len() - defined.len();

    let values = Array1::from_vec(defined.clone());
    let mean = values.mean();
    let std_dev = (values.len() > 1).then(|| values.std(1.0));

    defined.sort_by(f64::total_cmp);
    let tail = (1.0 - COVERAGE) / 2.0;
    LabelSummary {
        label,
        iterations: defined.len(),
        undefined,
        mean,
        std_dev,
        ci_low: percentile(&defined, tail),
        ci_high: percentile(&defined, 1.0 - tail),
    }
}

/// Linear-interpolated percentile of already sorted values; `q` in `[0, 1]`.
pub fn percentile(sorted: &[f64], q: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let rank = q.clamp(0.0, 1.0) * last as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let fraction = rank - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}
