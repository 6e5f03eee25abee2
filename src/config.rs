//! Runtime configuration utilities for time-in-range.

use std::{
    env,
    path::{Path, PathBuf},
    str::FromStr,
};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::range::{Policy, TargetRange};

/// Application configuration resolved from `.env` and defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Root folder for raw and segmented data.
    pub data_dir: PathBuf,
    /// Root folder for analytic outputs.
    pub outputs_dir: PathBuf,
    /// Lower bound of the target band.
    pub target_low: f64,
    /// Upper bound of the target band.
    pub target_high: f64,
    /// Gaps shorter than this many days are interpolated.
    pub interp_limit_days: f64,
    /// Days a value is carried past a long gap or the final visit.
    pub carry_forward_days: f64,
    /// CSV column holding the measured value.
    pub value_column: String,
    pub bootstrap_iterations: usize,
    pub seed: u64,
    /// Worker threads for parallel stages; `None` uses every core.
    pub threads: Option<usize>,
}

impl Settings {
    /// Load configuration from environment with reasonable defaults.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        let data_dir = env::var("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data"));
        let outputs_dir = env::var("OUTPUTS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./outputs"));

        std::fs::create_dir_all(&data_dir).context("creating data dir")?;
        std::fs::create_dir_all(&outputs_dir).context("creating outputs dir")?;

        Ok(Self {
            data_dir,
            outputs_dir,
            target_low: env_or("TIR_LOW", 30.0)?,
            target_high: env_or("TIR_HIGH", 36.0)?,
            interp_limit_days: env_or("TIR_INTERP_LIMIT_DAYS", 14.0)?,
            carry_forward_days: env_or("TIR_CARRY_FORWARD_DAYS", 14.0)?,
            value_column: env::var("TIR_VALUE_COLUMN").unwrap_or_else(|_| "hct".to_string()),
            bootstrap_iterations: env_or("TIR_BOOTSTRAP_ITERATIONS", 1000)?,
            seed: env_or("TIR_SEED", 42)?,
            threads: env_opt("TIR_THREADS")?,
        })
    }

    /// Validated target band from the configured bounds.
    pub fn target_range(&self) -> Result<TargetRange> {
        Ok(TargetRange::new(self.target_low, self.target_high)?)
    }

    /// Validated interpolation/carry policy from the configured windows.
    pub fn policy(&self) -> Result<Policy> {
        Ok(Policy::new(self.interp_limit_days, self.carry_forward_days)?)
    }

    /// Convenience helper for derived path segments.
    pub fn join_data<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        self.data_dir.join(path)
    }

    /// Convenience helper for derived output path segments.
    pub fn join_output<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        self.outputs_dir.join(path)
    }
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    Ok(env_opt(key)?.unwrap_or(default))
}

fn env_opt<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("invalid {key}={raw:?}")),
        _ => Ok(None),
    }
}
