//! CLI entry-point for generating a synthetic cohort.

use anyhow::Result;
use chrono::NaiveDate;
use clap::Args as ClapArgs;
use time_in_range::{config::Settings, data::synthetic::SyntheticConfig, pipeline};
use tracing::{info, instrument};

/// Args for the `synth` sub-command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Number of patients to generate.
    #[arg(long, default_value_t = 100)]
    pub patients: usize,
    /// Seed for the generator (defaults to TIR_SEED).
    #[arg(long)]
    pub seed: Option<u64>,
    /// Calendar date of day zero in the written CSV.
    #[arg(long, default_value = "2020-01-01")]
    pub start: NaiveDate,
    /// Largest gap between visits, in days.
    #[arg(long, default_value_t = 28)]
    pub max_gap_days: i64,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let config = SyntheticConfig {
        patients: args.patients,
        max_gap_days: args.max_gap_days,
        ..SyntheticConfig::default()
    };
    let seed = args.seed.unwrap_or(settings.seed);
    let path = pipeline::synthesise(&settings, &config, seed, args.start)?;
    info!(path = %path.display(), seed, "synthetic cohort ready");
    Ok(())
}
