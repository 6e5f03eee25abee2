//! Per-patient segmentation into above/target/below/missing intervals.

use indexmap::IndexMap;
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::error::{RangeError, Result};
use crate::range::types::{Interval, Label, Measurement, Policy, Source, TargetRange};

/// Slack allowed before negative missing time is treated as a defect.
const MISSING_TOLERANCE: f64 = 1e-9;

/// A point on a patient's interpolated trajectory.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub time: f64,
    pub value: f64,
    /// True for inserted band crossings, false for real measurements.
    pub synthetic: bool,
}

/// What a batch does when one patient cannot be segmented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    #[default]
    Abort,
    Skip,
}

/// Segment one patient's series into time-ordered intervals followed by a single missing interval.
///
/// Input order does not matter; ties on timestamp keep their input order. An empty series yields
/// no intervals.
pub fn segment(
    measurements: &[Measurement],
    range: &TargetRange,
    policy: &Policy,
) -> Result<Vec<Interval>> {
    let Some(head) = measurements.first() else {
        return Ok(Vec::new());
    };
    let patient_id = head.patient_id.as_str();
    validate_series(patient_id, measurements)?;

    let mut series: Vec<&Measurement> = measurements.iter().collect();
    series.sort_by_key(|m| m.timestamp);

    let carry_forward = policy.carry_forward();
    let mut intervals = Vec::with_capacity(series.len() * 2 + 1);
    let mut accounted = 0.0;

    for pair in series.windows(2) {
        let (start, end) = (pair[0], pair[1]);
        let gap = (end.timestamp - start.timestamp) as f64;
        if policy.interpolates(gap) {
            for piece in gap_points(start, end, range).windows(2) {
                let duration = piece[1].time - piece[0].time;
                accounted += duration;
                intervals.push(Interval::new(
                    patient_id,
                    range.classify_pair(piece[0].value, piece[1].value),
                    Source::Interpolated,
                    duration,
                ));
            }
        } else {
            // never carry past the next real measurement
            let duration = carry_forward.min(gap);
            accounted += duration;
            intervals.push(Interval::new(
                patient_id,
                range.classify(start.value),
                Source::CarriedForward,
                duration,
            ));
        }
    }

    let first = series[0];
    let last = series[series.len() - 1];
    accounted += carry_forward;
    intervals.push(Interval::new(
        patient_id,
        range.classify(last.value),
        Source::CarriedForward,
        carry_forward,
    ));

    let span = (last.timestamp - first.timestamp) as f64 + carry_forward;
    let missing = span - accounted;
    if missing < -MISSING_TOLERANCE {
        return Err(RangeError::NegativeMissing {
            patient_id: patient_id.to_string(),
            missing,
        });
    }
    intervals.push(Interval::new(
        patient_id,
        Label::Missing,
        Source::Unobserved,
        missing.max(0.0),
    ));

    debug!(
        patient_id,
        measurements = series.len(),
        intervals = intervals.len(),
        span,
        missing,
        "segmented patient"
    );
    Ok(intervals)
}

/// Points of an interpolable gap: both endpoints plus every band crossing in time order.
///
/// Crossings are solved against the gap's straight line, so a gap that jumps across the whole
/// band gets both its `low` and `high` crossings.
pub fn gap_points(start: &Measurement, end: &Measurement, range: &TargetRange) -> Vec<Point> {
    let (t0, v0) = (start.timestamp as f64, start.value);
    let (t1, v1) = (end.timestamp as f64, end.value);

    let mut points = vec![Point {
        time: t0,
        value: v0,
        synthetic: false,
    }];
    let mut crossings: Vec<Point> = [range.low(), range.high()]
        .into_iter()
        .filter(|&y| (v0 < y && v1 > y) || (v0 > y && v1 < y))
        .map(|y| Point {
            time: (t0 + (t1 - t0) * (y - v0) / (v1 - v0)).clamp(t0, t1),
            value: y,
            synthetic: true,
        })
        .collect();
    // equal times only occur for zero-length gaps or a zero-width band; break ties along the
    // direction of travel so the walk stays monotone
    crossings.sort_by(|a, b| {
        let along = if v1 > v0 {
            a.value.total_cmp(&b.value)
        } else {
            b.value.total_cmp(&a.value)
        };
        a.time.total_cmp(&b.time).then(along)
    });
    points.extend(crossings);
    points.push(Point {
        time: t1,
        value: v1,
        synthetic: false,
    });
    points
}

/// Segment every patient in `measurements`, concatenating results in first-seen patient order.
pub fn segment_population(
    measurements: &[Measurement],
    range: &TargetRange,
    policy: &Policy,
    on_failure: FailurePolicy,
) -> Result<Vec<Interval>> {
    let patients: Vec<(&str, Vec<Measurement>)> =
        group_by_patient(measurements).into_iter().collect();

    let outcomes: Vec<(&str, Result<Vec<Interval>>)> = patients
        .par_iter()
        .map(|(patient_id, series)| (*patient_id, segment(series, range, policy)))
        .collect();

    let mut intervals = Vec::new();
    let mut skipped = 0usize;
    for (patient_id, outcome) in outcomes {
        match outcome {
            Ok(patient_intervals) => intervals.extend(patient_intervals),
            Err(err) => match on_failure {
                FailurePolicy::Abort => return Err(RangeError::for_patient(patient_id, err)),
                FailurePolicy::Skip => {
                    warn!(patient_id, %err, "skipping patient");
                    skipped += 1;
                }
            },
        }
    }
    debug!(
        patients = patients.len(),
        skipped,
        intervals = intervals.len(),
        "segmented population"
    );
    Ok(intervals)
}

fn group_by_patient(measurements: &[Measurement]) -> IndexMap<&str, Vec<Measurement>> {
    let mut grouped: IndexMap<&str, Vec<Measurement>> = IndexMap::new();
    for measurement in measurements {
        grouped
            .entry(measurement.patient_id.as_str())
            .or_default()
            .push(measurement.clone());
    }
    grouped
}

fn validate_series(patient_id: &str, measurements: &[Measurement]) -> Result<()> {
    let (mut first, mut last) = (i64::MAX, i64::MIN);
    for measurement in measurements {
        first = first.min(measurement.timestamp);
        last = last.max(measurement.timestamp);
        if measurement.patient_id != patient_id {
            return Err(RangeError::MixedPatients {
                expected: patient_id.to_string(),
                found: measurement.patient_id.clone(),
            });
        }
        if !measurement.value.is_finite() {
            return Err(RangeError::InvalidMeasurement {
                patient_id: patient_id.to_string(),
                timestamp: measurement.timestamp,
            });
        }
    }
    // consecutive gaps never exceed last - first
    if last.checked_sub(first).is_none() {
        return Err(RangeError::TimestampSpan {
            patient_id: patient_id.to_string(),
            first,
            last,
        });
    }
    Ok(())
}
