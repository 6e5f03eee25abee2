//! Core data model: measurements, target band, policy and labelled intervals.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{RangeError, Result};

/// One value for one patient on one day.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Measurement {
    pub patient_id: String,
    /// Day count; only differences between timestamps matter.
    pub timestamp: i64,
    pub value: f64,
}

impl Measurement {
    pub fn new(patient_id: impl Into<String>, timestamp: i64, value: f64) -> Self {
        Self {
            patient_id: patient_id.into(),
            timestamp,
            value,
        }
    }
}

/// Classification of a span of patient time.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Above,
    Target,
    Below,
    Missing,
}

impl Label {
    /// Every label, in reporting order.
    pub const ALL: [Label; 4] = [Label::Above, Label::Target, Label::Below, Label::Missing];

    pub(crate) fn index(self) -> usize {
        match self {
            Label::Above => 0,
            Label::Target => 1,
            Label::Below => 2,
            Label::Missing => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Label::Above => "above",
            Label::Target => "target",
            Label::Below => "below",
            Label::Missing => "missing",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How an interval's duration was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Interpolated,
    CarriedForward,
    Unobserved,
}

/// Inclusive target band `[low, high]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TargetRange {
    low: f64,
    high: f64,
}

impl TargetRange {
    pub fn new(low: f64, high: f64) -> Result<Self> {
        let invalid = |reason| RangeError::InvalidRange { low, high, reason };
        if !low.is_finite() || !high.is_finite() {
            return Err(invalid("bounds must be finite"));
        }
        if low > high {
            return Err(invalid("low must not exceed high"));
        }
        Ok(Self { low, high })
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    /// Label a single value.
    pub fn classify(&self, value: f64) -> Label {
        if value > self.high {
            Label::Above
        } else if value < self.low {
            Label::Below
        } else {
            Label::Target
        }
    }

    /// Label the straight line between two values, with precedence above > target > below.
    ///
    /// Only unambiguous once every crossing of the line has been inserted as a point.
    pub fn classify_pair(&self, a: f64, b: f64) -> Label {
        if a > self.high || b > self.high {
            Label::Above
        } else if self.contains(a) && self.contains(b) {
            Label::Target
        } else {
            Label::Below
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.low && value <= self.high
    }
}

/// Interpolation and carry-forward windows, in days.
///
/// A `Policy` only exists once validated, so batches never re-check it per patient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Policy {
    interp_limit: f64,
    carry_forward: f64,
}

impl Policy {
    /// Build a policy, requiring `carry_forward >= interp_limit`.
    pub fn new(interp_limit: f64, carry_forward: f64) -> Result<Self> {
        let invalid = |reason| RangeError::InvalidPolicy {
            interp_limit,
            carry_forward,
            reason,
        };
        if !interp_limit.is_finite() || !carry_forward.is_finite() {
            return Err(invalid("windows must be finite"));
        }
        if interp_limit < 0.0 {
            return Err(invalid("interp_limit must be non-negative"));
        }
        if carry_forward < interp_limit {
            return Err(invalid("carry_forward must be at least interp_limit"));
        }
        Ok(Self {
            interp_limit,
            carry_forward,
        })
    }

    pub fn interp_limit(&self) -> f64 {
        self.interp_limit
    }

    pub fn carry_forward(&self) -> f64 {
        self.carry_forward
    }

    /// Gaps strictly shorter than the limit are interpolated.
    pub fn interpolates(&self, gap: f64) -> bool {
        gap < self.interp_limit
    }
}

/// A labelled stretch of one patient's time.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Interval {
    pub patient_id: String,
    pub label: Label,
    pub source: Source,
    /// Days; never negative.
    pub duration: f64,
}

impl Interval {
    pub fn new(patient_id: impl Into<String>, label: Label, source: Source, duration: f64) -> Self {
        Self {
            patient_id: patient_id.into(),
            label,
            source,
            duration,
        }
    }
}
