//! CSV persistence of segmented intervals between pipeline stages.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::range::Interval;

/// Persist intervals with a `patient_id,label,source,duration` header.
pub fn write(path: &Path, intervals: &[Interval]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("create {}", path.display()))?;
    for interval in intervals {
        writer.serialize(interval)?;
    }
    writer.flush()?;
    info!(path = %path.display(), rows = intervals.len(), "wrote intervals");
    Ok(())
}

pub fn read(path: &Path) -> Result<Vec<Interval>> {
    let mut reader =
        csv::Reader::from_path(path).with_context(|| format!("open {}", path.display()))?;
    let mut intervals = Vec::new();
    for result in reader.deserialize() {
        let interval: Interval = result.with_context(|| format!("parse {}", path.display()))?;
        intervals.push(interval);
    }
    info!(path = %path.display(), rows = intervals.len(), "loaded intervals");
    Ok(intervals)
}
