//! Staged batch pipeline: synthesise → segment → aggregate → bootstrap.
//!
//! Each stage reads the previous stage's artefact from `DATA_DIR`/`OUTPUTS_DIR` and persists
//! its own, so stages can be rerun independently.

use std::{fs::File, path::PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rand::{rngs::StdRng, SeedableRng};
use serde::Serialize;
use tracing::{info, warn};

use crate::{
    config::Settings,
    data::{self, synthetic::SyntheticConfig},
    range::{
        self, AggregateRow, BootstrapConfig, BootstrapSample, FailurePolicy, LabelSummary,
        PatientIntervals, Policy, TargetRange,
    },
};

pub const SYNTHETIC_CSV: &str = "raw/synthetic.csv";
pub const INTERVALS_CSV: &str = "clean/intervals.csv";
pub const AGGREGATE_CSV: &str = "aggregate.csv";
pub const BOOTSTRAP_CSV: &str = "bootstrap.csv";
pub const SUMMARY_JSON: &str = "bootstrap_summary.json";

/// Options for the segmentation stage, already validated.
#[derive(Debug, Clone)]
pub struct SegmentOptions {
    pub input: PathBuf,
    pub range: TargetRange,
    pub policy: Policy,
    pub on_failure: FailurePolicy,
}

/// Generate a seeded synthetic cohort into `data/raw/synthetic.csv`.
pub fn synthesise(
    settings: &Settings,
    config: &SyntheticConfig,
    seed: u64,
    start: NaiveDate,
) -> Result<PathBuf> {
    let mut rng = StdRng::seed_from_u64(seed);
    let measurements = data::synthetic::generate(config, &mut rng);
    let path = settings.join_data(SYNTHETIC_CSV);
    data::measurements::write(&path, &measurements, &settings.value_column, start)?;
    Ok(path)
}

/// Segment every patient in the input and persist the concatenated intervals.
pub fn segment_cohort(settings: &Settings, options: &SegmentOptions) -> Result<()> {
    let measurements = data::measurements::load(&options.input, &settings.value_column)?;
    // an empty cohort still replaces the artefact so later stages report undefined totals
    if measurements.is_empty() {
        warn!(input = %options.input.display(), "no measurements to segment");
    }

    let intervals = range::segment_population(
        &measurements,
        &options.range,
        &options.policy,
        options.on_failure,
    )?;
    for row in range::aggregate_parallel(&intervals) {
        info!(label = %row.label, days = row.total_duration, percent = ?row.percent, "cohort total");
    }
    data::intervals::write(&settings.join_data(INTERVALS_CSV), &intervals)
}

/// Aggregate persisted intervals into whole-population rows.
pub fn aggregate_cohort(settings: &Settings) -> Result<Option<Vec<AggregateRow>>> {
    let Some(intervals) = load_intervals(settings)? else {
        return Ok(None);
    };
    let rows = range::aggregate_parallel(&intervals);

    let out_path = settings.join_output(AGGREGATE_CSV);
    write_rows(&out_path, &rows)?;
    info!(path = %out_path.display(), rows = rows.len(), "wrote aggregate");
    Ok(Some(rows))
}

/// Resample persisted intervals and write per-iteration rows plus a per-label summary.
pub fn bootstrap_cohort(
    settings: &Settings,
    config: BootstrapConfig,
) -> Result<Option<Vec<LabelSummary>>> {
    let Some(intervals) = load_intervals(settings)? else {
        return Ok(None);
    };
    let population = PatientIntervals::from_intervals(&intervals);
    let samples = range::bootstrap(&population, config);
    let summary = range::summarize(&samples);

    let samples_path = settings.join_output(BOOTSTRAP_CSV);
    write_samples(&samples_path, &samples)?;
    info!(path = %samples_path.display(), iterations = samples.len(), "wrote bootstrap samples");

    let summary_path = settings.join_output(SUMMARY_JSON);
    let report = SummaryReport {
        iterations: config.iterations,
        seed: config.seed,
        resampling: config.resampling,
        patients: population.patient_count(),
        labels: &summary,
    };
    let file = File::create(&summary_path)
        .with_context(|| format!("create {}", summary_path.display()))?;
    serde_json::to_writer_pretty(file, &report)?;
    info!(path = %summary_path.display(), "wrote bootstrap summary");
    Ok(Some(summary))
}

#[derive(Debug, Serialize)]
struct SummaryReport<'a> {
    iterations: usize,
    seed: u64,
    resampling: range::Resampling,
    patients: usize,
    labels: &'a [LabelSummary],
}

fn load_intervals(settings: &Settings) -> Result<Option<Vec<range::Interval>>> {
    let path = settings.join_data(INTERVALS_CSV);
    if !path.exists() {
        warn!("intervals.csv missing; run segment first");
        return Ok(None);
    }
    data::intervals::read(&path).map(Some)
}

fn write_rows(path: &std::path::Path, rows: &[AggregateRow]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_samples(path: &std::path::Path, samples: &[BootstrapSample]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["iteration", "label", "total_duration", "percent"])?;
    for sample in samples {
        for row in &sample.rows {
            let percent = row.percent.map(|p| p.to_string()).unwrap_or_default();
            writer.write_record([
                sample.iteration.to_string(),
                row.label.to_string(),
                row.total_duration.to_string(),
                percent,
            ])?;
        }
    }
    writer.flush()?;
    Ok(())
}
