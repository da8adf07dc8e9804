//! Return-period curves and the tables they accumulate into
//!
//! Missing estimates are always `None`. No result type ever uses zero or NaN
//! to mean "no estimate".

use serde::{Deserialize, Serialize};

use super::location::Location;

/// Return period at each reporting wind-speed bin for one location and one
/// iteration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnPeriodCurve {
    /// `(wind_speed_bin, return_period_years)` in bin order
    pub values: Vec<(f64, f64)>,
}

impl ReturnPeriodCurve {
    pub fn wind_bins(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().map(|&(w, _)| w)
    }

    pub fn return_periods(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().map(|&(_, t)| t)
    }

    /// Return period at the bin closest to `wind_speed`
    #[must_use]
    pub fn nearest_bin(&self, wind_speed: f64) -> Option<(f64, f64)> {
        self.values.iter().copied().min_by(|a, b| {
            (a.0 - wind_speed)
                .abs()
                .total_cmp(&(b.0 - wind_speed).abs())
        })
    }
}

/// Per-iteration return periods for one location: one column per iteration,
/// one row per wind-speed bin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnPeriodTable {
    pub wind_bins: Vec<f64>,
    /// `runs[iteration][bin]`; a run with no curve is all `None`
    pub runs: Vec<Vec<Option<f64>>>,
}

impl ReturnPeriodTable {
    #[must_use]
    pub fn new(wind_bins: Vec<f64>) -> Self {
        Self {
            wind_bins,
            runs: Vec::new(),
        }
    }

    /// Append one iteration's curve, or an empty column when the location had
    /// no qualifying exposure in that iteration.
    pub fn push_curve(&mut self, curve: Option<&ReturnPeriodCurve>) {
        let column = match curve {
            Some(curve) => {
                debug_assert_eq!(curve.values.len(), self.wind_bins.len());
                curve.return_periods().map(Some).collect()
            }
            None => vec![None; self.wind_bins.len()],
        };
        self.runs.push(column);
    }

    #[must_use]
    pub fn iterations(&self) -> usize {
        self.runs.len()
    }

    /// Values across iterations for the bin at `bin_index`
    pub fn row(&self, bin_index: usize) -> impl Iterator<Item = Option<f64>> + '_ {
        self.runs
            .iter()
            .map(move |run| run.get(bin_index).copied().flatten())
    }

    /// Number of iterations that produced a curve
    #[must_use]
    pub fn curve_count(&self) -> usize {
        self.runs
            .iter()
            .filter(|run| run.iter().any(Option::is_some))
            .count()
    }
}

/// Aggregated statistics for one wind-speed bin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClimatologyRow {
    pub wind_speed: f64,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub band_low: Option<f64>,
    pub band_high: Option<f64>,
}

impl ClimatologyRow {
    #[must_use]
    pub fn missing(wind_speed: f64) -> Self {
        Self {
            wind_speed,
            mean: None,
            std: None,
            band_low: None,
            band_high: None,
        }
    }
}

/// Mean return-period curve with uncertainty bands for one location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClimatologyResult {
    pub rows: Vec<ClimatologyRow>,
    /// Per-iteration values discarded as implausible
    pub clamped: usize,
}

impl ClimatologyResult {
    #[must_use]
    pub fn row(&self, wind_speed: f64) -> Option<&ClimatologyRow> {
        self.rows.iter().find(|r| r.wind_speed == wind_speed)
    }
}

/// Final output for one location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationReturnPeriods {
    pub location: Location,
    pub table: ReturnPeriodTable,
    pub climatology: ClimatologyResult,
}
