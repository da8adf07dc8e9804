//! Aggregation of per-iteration return periods into a climatology
//!
//! The empirical method cannot say much beyond the length of the record it
//! is calibrated against, so per-iteration values above the plausibility
//! ceiling are discarded before averaging. Aggregation is a pure function of
//! the table: running it again on the same input gives the same output.

use crate::config::EngineConfig;
use crate::model::{ClimatologyResult, ClimatologyRow, ReturnPeriodTable};

/// Mean and sample standard deviation (`n - 1` denominator).
///
/// The mean needs one value and the deviation two; otherwise `None`.
fn mean_and_std(values: &[f64]) -> (Option<f64>, Option<f64>) {
    let n = values.len();
    if n == 0 {
        return (None, None);
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    if n < 2 {
        return (Some(mean), None);
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    (Some(mean), Some(variance.sqrt()))
}

/// Non-negative bound or missing
fn non_negative(value: f64) -> Option<f64> {
    (value >= 0.0).then_some(value)
}

#[derive(Debug, Clone, Copy)]
pub struct ClimatologyAggregator {
    ceiling: f64,
}

impl ClimatologyAggregator {
    #[must_use]
    pub fn new(config: &EngineConfig) -> Self {
        Self::with_ceiling(config.plausibility_ceiling())
    }

    #[must_use]
    pub fn with_ceiling(ceiling: f64) -> Self {
        Self { ceiling }
    }

    #[must_use]
    pub fn ceiling(&self) -> f64 {
        self.ceiling
    }

    /// Drop values above the ceiling (and anything non-finite).
    #[inline]
    #[must_use]
    pub fn clamp(&self, value: Option<f64>) -> Option<f64> {
        value.filter(|v| v.is_finite() && *v <= self.ceiling)
    }

    /// Copy of `table` with implausible values replaced by `None`
    #[must_use]
    pub fn clamp_table(&self, table: &ReturnPeriodTable) -> ReturnPeriodTable {
        ReturnPeriodTable {
            wind_bins: table.wind_bins.clone(),
            runs: table
                .runs
                .iter()
                .map(|run| run.iter().map(|&v| self.clamp(v)).collect())
                .collect(),
        }
    }

    /// Mean, spread and bands per wind-speed bin.
    #[must_use]
    pub fn aggregate(&self, table: &ReturnPeriodTable) -> ClimatologyResult {
        let mut clamped = 0;
        let rows = table
            .wind_bins
            .iter()
            .enumerate()
            .map(|(bin, &wind_speed)| {
                let mut kept = Vec::with_capacity(table.iterations());
                for value in table.row(bin) {
                    match self.clamp(value) {
                        Some(v) => kept.push(v),
                        None if value.is_some() => clamped += 1,
                        None => {}
                    }
                }

                let (mean, std) = mean_and_std(&kept);
                let (Some(mean), Some(std)) = (mean, std) else {
                    return ClimatologyRow {
                        mean,
                        std,
                        ..ClimatologyRow::missing(wind_speed)
                    };
                };

                ClimatologyRow {
                    wind_speed,
                    mean: Some(mean),
                    std: Some(std),
                    band_low: non_negative(mean - std),
                    band_high: non_negative(mean + std),
                }
            })
            .collect();

        ClimatologyResult { rows, clamped }
    }
}
