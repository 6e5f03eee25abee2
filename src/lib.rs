//! Time-in-range accounting for irregularly sampled clinical measurement series.
//!
//! [`range`] holds the pure core (segmentation, aggregation, bootstrap, summaries); the
//! remaining modules load data, configure runs and persist stage artefacts.

pub mod config;
pub mod data;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod range;
