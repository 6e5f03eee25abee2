//! CLI entry-point for bootstrap resampling.

use anyhow::Result;
use clap::Args as ClapArgs;
use time_in_range::{config::Settings, pipeline, range::BootstrapConfig};
use tracing::{info, instrument};

use crate::cli::ResamplingMode;

/// Args for the `bootstrap` sub-command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Number of resamples (defaults to TIR_BOOTSTRAP_ITERATIONS).
    #[arg(long)]
    pub iterations: Option<usize>,
    /// Seed for the resampling streams (defaults to TIR_SEED).
    #[arg(long)]
    pub seed: Option<u64>,
    /// How repeated draws of a patient count.
    #[arg(long, default_value = "membership", value_enum)]
    pub resampling: ResamplingMode,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let config = BootstrapConfig {
        iterations: args.iterations.unwrap_or(settings.bootstrap_iterations),
        seed: args.seed.unwrap_or(settings.seed),
        resampling: args.resampling.into(),
    };
    let summary =
        tokio::task::spawn_blocking(move || pipeline::bootstrap_cohort(&settings, config))
            .await??;
    for label in summary.iter().flatten() {
        info!(
            label = %label.label,
            mean = ?label.mean,
            std_dev = ?label.std_dev,
            ci_low = ?label.ci_low,
            ci_high = ?label.ci_high,
            "bootstrap percent"
        );
    }
    Ok(())
}
