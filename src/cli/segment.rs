//! CLI entry-point for per-patient segmentation.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args as ClapArgs;
use time_in_range::{
    config::Settings,
    pipeline::{self, SegmentOptions},
    range::FailurePolicy,
};
use tracing::instrument;

/// Args for the `segment` sub-command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// CSV file or directory of CSVs (defaults to DATA_DIR/raw).
    #[arg(long)]
    pub input: Option<PathBuf>,
    /// Override the lower target bound.
    #[arg(long)]
    pub low: Option<f64>,
    /// Override the upper target bound.
    #[arg(long)]
    pub high: Option<f64>,
    /// Override the interpolation limit, in days.
    #[arg(long)]
    pub interp_limit: Option<f64>,
    /// Override the carry-forward window, in days.
    #[arg(long)]
    pub carry_forward: Option<f64>,
    /// Log and drop patients that fail instead of aborting.
    #[arg(long)]
    pub skip_invalid: bool,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, mut settings: Settings) -> Result<()> {
    settings.target_low = args.low.unwrap_or(settings.target_low);
    settings.target_high = args.high.unwrap_or(settings.target_high);
    settings.interp_limit_days = args.interp_limit.unwrap_or(settings.interp_limit_days);
    settings.carry_forward_days = args.carry_forward.unwrap_or(settings.carry_forward_days);

    // configuration errors surface here, before any patient is read
    let options = SegmentOptions {
        input: args.input.unwrap_or_else(|| settings.join_data("raw")),
        range: settings.target_range()?,
        policy: settings.policy()?,
        on_failure: if args.skip_invalid {
            FailurePolicy::Skip
        } else {
            FailurePolicy::Abort
        },
    };

    tokio::task::spawn_blocking(move || pipeline::segment_cohort(&settings, &options)).await?
}
