//! CSV ingestion of `patient_id,date,<value>` measurement files.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use chrono::{Datelike, Duration, NaiveDate};
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::range::Measurement;

const PATIENT_HEADER: &str = "patient_id";
const DATE_HEADER: &str = "date";

/// Load measurements from a CSV file or every `.csv` below a directory.
pub fn load(path: &Path, value_column: &str) -> Result<Vec<Measurement>> {
    let files = csv_files(path)?;
    if files.is_empty() {
        warn!(path = %path.display(), "no csv files found");
    }

    let mut measurements = Vec::new();
    let mut dropped = 0usize;
    for file in &files {
        dropped += read_file(file, value_column, &mut measurements)
            .with_context(|| format!("reading {}", file.display()))?;
    }
    if dropped > 0 {
        warn!(dropped, "skipped rows without a value");
    }
    info!(
        files = files.len(),
        rows = measurements.len(),
        "loaded measurements"
    );
    Ok(measurements)
}

/// Write measurements in the loader's schema, rendering day counts as dates from `start`.
pub fn write(
    path: &Path,
    measurements: &[Measurement],
    value_column: &str,
    start: NaiveDate,
) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([PATIENT_HEADER, DATE_HEADER, value_column])?;
    for m in measurements {
        let date = (start + Duration::days(m.timestamp))
            .format("%Y-%m-%d")
            .to_string();
        let value = format!("{:.1}", m.value);
        writer.write_record([m.patient_id.as_str(), date.as_str(), value.as_str()])?;
    }
    writer.flush()?;
    info!(path = %path.display(), rows = measurements.len(), "wrote measurements");
    Ok(())
}

/// Parse a day count or an ISO date into days from the common era.
pub fn parse_day(raw: &str) -> Result<i64> {
    let raw = raw.trim();
    if let Ok(day) = raw.parse::<i64>() {
        return Ok(day);
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|err| anyhow!("invalid date {raw:?}: {err}"))?;
    Ok(i64::from(date.num_days_from_ce()))
}

fn csv_files(path: &Path) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if !path.exists() {
        bail!("input path {} does not exist", path.display());
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(path).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file()
            && entry.path().extension().and_then(|s| s.to_str()) == Some("csv")
        {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn read_file(path: &Path, value_column: &str, sink: &mut Vec<Measurement>) -> Result<usize> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)?;
    let headers = reader.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .ok_or_else(|| anyhow!("missing column {name}"))
    };
    let patient_idx = column(PATIENT_HEADER)?;
    let date_idx = column(DATE_HEADER)?;
    let value_idx = column(value_column)?;

    let mut dropped = 0usize;
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        // header is line 1
        let line = row + 2;
        let field = |idx: usize| record.get(idx).unwrap_or("");

        let value = field(value_idx);
        if value.is_empty() || value.eq_ignore_ascii_case("na") {
            dropped += 1;
            continue;
        }
        let value: f64 = value
            .parse()
            .with_context(|| format!("line {line}: invalid {value_column} {value:?}"))?;
        if !value.is_finite() {
            bail!("line {line}: non-finite {value_column}");
        }
        let patient_id = field(patient_idx);
        if patient_id.is_empty() {
            bail!("line {line}: empty {PATIENT_HEADER}");
        }
        let timestamp = parse_day(field(date_idx)).with_context(|| format!("line {line}"))?;
        sink.push(Measurement::new(patient_id, timestamp, value));
    }
    Ok(dropped)
}
