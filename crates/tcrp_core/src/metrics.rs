//! Run diagnostics
//!
//! Conditions that are absorbed into missing values (empty draws, locations
//! without qualifying exposure, implausible estimates) never abort a run, so
//! they are counted here for reporting instead.

use serde::{Deserialize, Serialize};

use crate::sampler::ResampledClimatology;

/// Counters collected over one iteration or a whole run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunDiagnostics {
    /// Completed iterations
    pub iterations: u64,
    /// `(member, year)` pairs drawn
    pub draws: u64,
    /// Draws that held no storms
    pub empty_draws: u64,
    /// Storm occurrences pooled, repeats included
    pub pooled_storms: u64,
    /// Storms counted once per iteration however often their year was drawn
    pub distinct_storms: u64,
    /// Estimated equivalent years, one entry per iteration
    pub estimated_years: Vec<f64>,
    /// Location-iterations that produced a curve
    pub curves: u64,
    /// Location-iterations with no qualifying exposure
    pub empty_exposures: u64,
    /// Per-iteration values discarded as implausible during aggregation
    pub implausible_clamped: u64,
    /// Locations that never produced a curve
    pub unexposed_locations: Vec<String>,
}

impl RunDiagnostics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of one resampling pass
    pub fn record_sample(&mut self, sample: &ResampledClimatology<'_>) {
        self.iterations += 1;
        self.draws += sample.draws.len() as u64;
        self.empty_draws += sample.empty_draws as u64;
        self.pooled_storms += sample.storms.len() as u64;
        self.distinct_storms += sample.distinct_storms as u64;
        self.estimated_years.push(sample.estimated_years);
    }

    pub fn record_curve(&mut self) {
        self.curves += 1;
    }

    pub fn record_empty_exposure(&mut self) {
        self.empty_exposures += 1;
    }

    pub fn record_clamped(&mut self, count: usize) {
        self.implausible_clamped += count as u64;
    }

    /// Fold another set of counters into this one
    pub fn merge(&mut self, other: &RunDiagnostics) {
        self.iterations += other.iterations;
        self.draws += other.draws;
        self.empty_draws += other.empty_draws;
        self.pooled_storms += other.pooled_storms;
        self.distinct_storms += other.distinct_storms;
        self.estimated_years
            .extend_from_slice(&other.estimated_years);
        self.curves += other.curves;
        self.empty_exposures += other.empty_exposures;
        self.implausible_clamped += other.implausible_clamped;
        self.unexposed_locations
            .extend(other.unexposed_locations.iter().cloned());
    }

    /// Average estimated equivalent years across iterations
    #[must_use]
    pub fn mean_estimated_years(&self) -> Option<f64> {
        if self.estimated_years.is_empty() {
            None
        } else {
            Some(self.estimated_years.iter().sum::<f64>() / self.estimated_years.len() as f64)
        }
    }
}
