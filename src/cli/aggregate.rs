//! CLI entry-point for whole-cohort aggregation.

use anyhow::Result;
use time_in_range::{config::Settings, pipeline};
use tracing::instrument;

#[instrument(skip(settings))]
pub async fn run(settings: Settings) -> Result<()> {
    let Some(rows) = pipeline::aggregate_cohort(&settings)? else {
        return Ok(());
    };
    println!("{:<8} {:>14} {:>9}", "label", "days", "percent");
    for row in rows {
        let percent = row
            .percent
            .map(|p| format!("{:.2}%", p * 100.0))
            .unwrap_or_else(|| "n/a".to_string());
        println!("{:<8} {:>14.2} {:>9}", row.label.as_str(), row.total_duration, percent);
    }
    Ok(())
}
