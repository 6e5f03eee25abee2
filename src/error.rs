//! Error types for the time-in-range core.

use thiserror::Error;

/// Result type for core segmentation and resampling operations.
pub type Result<T> = std::result::Result<T, RangeError>;

/// Failures raised by the core. Configuration variants are fatal before any patient is processed.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum RangeError {
    /// Interpolation/carry policy is unusable.
    #[error("invalid policy (interp_limit={interp_limit}, carry_forward={carry_forward}): {reason}")]
    InvalidPolicy {
        interp_limit: f64,
        carry_forward: f64,
        reason: &'static str,
    },

    /// Target band is unusable.
    #[error("invalid target range [{low}, {high}]: {reason}")]
    InvalidRange {
        low: f64,
        high: f64,
        reason: &'static str,
    },

    /// A single-patient series contained another patient's measurement.
    #[error("series for patient {expected} contains a measurement for {found}")]
    MixedPatients { expected: String, found: String },

    /// Measurement value is NaN or infinite.
    #[error("patient {patient_id} has a non-finite value at day {timestamp}")]
    InvalidMeasurement { patient_id: String, timestamp: i64 },

    /// Day counts are too far apart to measure the gap between them.
    #[error("patient {patient_id} spans days {first}..{last}, which overflows a day count")]
    TimestampSpan {
        patient_id: String,
        first: i64,
        last: i64,
    },

    /// Time accounting went negative; always a segmentation defect.
    #[error("patient {patient_id} accounted {missing} days of negative missing time")]
    NegativeMissing { patient_id: String, missing: f64 },

    /// Wraps a per-patient failure so a batch abort names the patient.
    #[error("segmenting patient {patient_id}: {source}")]
    Patient {
        patient_id: String,
        #[source]
        source: Box<RangeError>,
    },
}

impl RangeError {
    /// Attach a patient id to a failure raised inside a batch.
    pub fn for_patient(patient_id: impl Into<String>, source: RangeError) -> Self {
        RangeError::Patient {
            patient_id: patient_id.into(),
            source: Box::new(source),
        }
    }
}
