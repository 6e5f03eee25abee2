//! Command-line interface wiring for time-in-range.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use time_in_range::{config::Settings, range::Resampling};

pub mod aggregate;
pub mod bootstrap;
pub mod segment;
pub mod synth;

/// Top-level CLI definition.
#[derive(Debug, Parser)]
#[command(author, version, about = "Time-in-range accounting for clinical series", long_about = None)]
pub struct Cli {
    /// Worker threads for parallel stages (defaults to TIR_THREADS, then all cores).
    #[arg(long, global = true)]
    threads: Option<usize>,
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Parse CLI arguments from the environment.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Dispatch the selected sub-command.
    pub async fn dispatch(self, settings: Settings) -> Result<()> {
        if let Some(threads) = self.threads.or(settings.threads) {
            rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build_global()
                .context("configuring worker pool")?;
        }
        match self.command {
            Commands::Synth(args) => synth::run(args, settings).await,
            Commands::Segment(args) => segment::run(args, settings).await,
            Commands::Aggregate => aggregate::run(settings).await,
            Commands::Bootstrap(args) => bootstrap::run(args, settings).await,
        }
    }
}

/// Supported sub-commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate a seeded synthetic cohort.
    Synth(synth::Args),
    /// Split each patient's series into labelled intervals.
    Segment(segment::Args),
    /// Total time per label across the cohort.
    Aggregate,
    /// Resample patients to estimate variability of time in range.
    Bootstrap(bootstrap::Args),
}

/// Treatment of repeated draws of a patient during bootstrap.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ResamplingMode {
    /// A patient drawn several times counts once.
    Membership,
    /// A patient drawn k times counts k times.
    Multiplicity,
}

impl From<ResamplingMode> for Resampling {
    fn from(mode: ResamplingMode) -> Self {
        match mode {
            ResamplingMode::Membership => Resampling::Membership,
            ResamplingMode::Multiplicity => Resampling::Multiplicity,
        }
    }
}
