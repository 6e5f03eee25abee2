//! Time-in-range computation: segmentation, aggregation and bootstrap resampling.

pub mod aggregate;
pub mod bootstrap;
pub mod segment;
pub mod summary;
pub mod types;

pub use aggregate::{aggregate, aggregate_parallel, AggregateRow, LabelTotals};
pub use bootstrap::{bootstrap, BootstrapConfig, BootstrapSample, PatientIntervals, Resampling};
pub use segment::{gap_points, segment, segment_population, FailurePolicy, Point};
pub use summary::{summarize, LabelSummary};
pub use types::{Interval, Label, Measurement, Policy, Source, TargetRange};

pub use crate::error::{RangeError, Result};
