//! Seeded synthetic cohorts for demos and tests.

use rand::Rng;
use tracing::info;

use crate::range::Measurement;

/// Shape of a generated cohort.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticConfig {
    pub patients: usize,
    pub min_visits: usize,
    pub max_visits: usize,
    /// Largest gap between consecutive visits, in days.
    pub max_gap_days: i64,
    /// Value the random walk starts near.
    pub center: f64,
    /// Largest change between consecutive visits.
    pub step: f64,
    pub floor: f64,
    pub ceiling: f64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            patients: 100,
            min_visits: 4,
            max_visits: 24,
            max_gap_days: 28,
            center: 33.0,
            step: 2.5,
            floor: 18.0,
            ceiling: 48.0,
        }
    }
}

/// Generate a cohort, drawing everything from `rng`.
pub fn generate<R: Rng + ?Sized>(config: &SyntheticConfig, rng: &mut R) -> Vec<Measurement> {
    let min_visits = config.min_visits.max(1);
    let max_visits = config.max_visits.max(min_visits);
    let max_gap = config.max_gap_days.max(1);

    let mut measurements = Vec::new();
    for patient in 0..config.patients {
        let patient_id = format!("P{:04}", patient + 1);
        let visits = rng.gen_range(min_visits..=max_visits);
        let mut day = rng.gen_range(0..30);
        let mut value = config.center + rng.gen_range(-config.step..=config.step);
        for visit in 0..visits {
            if visit > 0 {
                day += rng.gen_range(1..=max_gap);
                value += rng.gen_range(-config.step..=config.step);
            }
            value = value.clamp(config.floor, config.ceiling);
            let rounded = (value * 10.0).round() / 10.0;
            measurements.push(Measurement::new(patient_id.clone(), day, rounded));
        }
    }
    info!(
        patients = config.patients,
        rows = measurements.len(),
        "generated synthetic cohort"
    );
    measurements
}
