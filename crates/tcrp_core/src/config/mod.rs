//! Engine configuration
//!
//! The main configuration type is [`EngineConfig`], which is passed explicitly
//! to every component. Nothing in the engine reads global state.
//!
//! # Builder
//!
//! ```ignore
//! use tcrp_core::config::EngineConfigBuilder;
//! use tcrp_core::model::Basin;
//!
//! let config = EngineConfigBuilder::new(Basin::NorthAtlantic, 11.3)
//!     .n_years(2000)
//!     .iterations(10)
//!     .reference_years(1980, 2021)
//!     .seed(42)
//!     .build()?;
//! ```

use std::ops::RangeInclusive;

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::model::Basin;

pub mod builder;

pub use builder::EngineConfigBuilder;

/// Storm-maximum winds below this are not counted as exposure (m/s)
pub const TROPICAL_STORM_WIND: f64 = 17.0;

/// Roughly one degree of arc at the equator
pub const DEFAULT_RADIUS_KM: f64 = 111.0;

/// Saffir-Simpson style reporting bins for 1-minute sustained winds (m/s)
pub const DEFAULT_WIND_BINS: [f64; 17] = [
    20.0, 25.0, 30.0, 33.0, 35.0, 40.0, 42.0, 45.0, 50.0, 55.0, 58.0, 60.0, 65.0, 70.0, 75.0,
    80.0, 85.0,
];

fn default_radius_km() -> f64 {
    DEFAULT_RADIUS_KM
}

fn default_min_wind() -> f64 {
    TROPICAL_STORM_WIND
}

fn default_n_years() -> usize {
    2000
}

fn default_iterations() -> usize {
    10
}

fn default_wind_bins() -> Vec<f64> {
    DEFAULT_WIND_BINS.to_vec()
}

/// Empirical exceedance-probability estimator for ranked observations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlottingPosition {
    /// `k / (n + 1)`; never yields a probability of exactly zero or one
    #[default]
    Weibull,
}

impl PlottingPosition {
    /// Exceedance probability of the observation at 1-based `rank` among `n`
    #[inline]
    #[must_use]
    pub fn exceedance_probability(&self, rank: f64, n: usize) -> f64 {
        match self {
            Self::Weibull => rank / (n as f64 + 1.0),
        }
    }
}

/// The historical record the synthetic ensemble is calibrated against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferencePeriod {
    pub start: Date,
    pub end: Date,
}

impl Default for ReferencePeriod {
    fn default() -> Self {
        Self {
            start: jiff::civil::date(1980, 1, 1),
            end: jiff::civil::date(2021, 12, 31),
        }
    }
}

impl ReferencePeriod {
    /// Period from the first month of `start_year` to the last of `end_year`
    pub fn years(start_year: i16, end_year: i16) -> Result<Self, ConfigError> {
        Self::months(start_year, 1, end_year, 12)
    }

    /// Period from the first day of the start month to the last day of the
    /// end month
    pub fn months(
        start_year: i16,
        start_month: i8,
        end_year: i16,
        end_month: i8,
    ) -> Result<Self, ConfigError> {
        let invalid = |_| ConfigError::InvalidValue {
            field: "reference_period",
            reason: "not a valid calendar month",
        };
        let start = Date::new(start_year, start_month, 1).map_err(invalid)?;
        let end = Date::new(end_year, end_month, 1)
            .map_err(invalid)?
            .last_of_month();
        let period = Self { start, end };
        period.validate()?;
        Ok(period)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.end < self.start {
            return Err(ConfigError::InvertedReferencePeriod);
        }
        Ok(())
    }

    /// Calendar years covered, counting partial years as whole
    #[must_use]
    pub fn length_years(&self) -> u32 {
        (i32::from(self.end.year()) - i32::from(self.start.year()) + 1).max(0) as u32
    }

    /// Storm years that may be drawn when resampling
    #[must_use]
    pub fn year_range(&self) -> RangeInclusive<i16> {
        self.start.year()..=self.end.year()
    }

    /// `YYYYMM_YYYYMM` label used in output names
    #[must_use]
    pub fn label(&self) -> String {
        format!(
            "{}{:02}_{}{:02}",
            self.start.year(),
            self.start.month(),
            self.end.year(),
            self.end.month()
        )
    }
}

/// Complete configuration for a return-period run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Basin whose storms and locations are analyzed
    pub basin: Basin,

    /// Search radius around each location (km)
    #[serde(default = "default_radius_km")]
    pub radius_km: f64,

    /// Minimum storm-maximum wind that counts as exposure
    #[serde(default = "default_min_wind")]
    pub min_wind: f64,

    #[serde(default)]
    pub plotting_position: PlottingPosition,

    /// Number of `(member, year)` draws per iteration, i.e. the synthetic
    /// climatology length used to convert counts into annual rates
    #[serde(default = "default_n_years")]
    pub n_years: usize,

    /// Number of independent resampling iterations
    #[serde(default = "default_iterations")]
    pub iterations: usize,

    /// Reporting wind speeds, strictly ascending
    #[serde(default = "default_wind_bins")]
    pub wind_bins: Vec<f64>,

    /// Observed mean annual storm count for the basin
    pub storms_per_year: f64,

    #[serde(default)]
    pub reference_period: ReferencePeriod,

    /// Master seed; a fresh one is drawn from OS entropy when absent
    #[serde(default)]
    pub seed: Option<u64>,
}

impl EngineConfig {
    /// Configuration with defaults for everything but the basin and its rate
    #[must_use]
    pub fn new(basin: Basin, storms_per_year: f64) -> Self {
        Self {
            basin,
            radius_km: default_radius_km(),
            min_wind: default_min_wind(),
            plotting_position: PlottingPosition::default(),
            n_years: default_n_years(),
            iterations: default_iterations(),
            wind_bins: default_wind_bins(),
            storms_per_year,
            reference_period: ReferencePeriod::default(),
            seed: None,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.radius_km.is_finite() && self.radius_km > 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "radius_km",
                reason: "must be a positive distance",
            });
        }
        if !self.min_wind.is_finite() {
            return Err(ConfigError::InvalidValue {
                field: "min_wind",
                reason: "must be finite",
            });
        }
        if self.n_years == 0 {
            return Err(ConfigError::InvalidValue {
                field: "n_years",
                reason: "must be at least one year",
            });
        }
        if self.iterations == 0 {
            return Err(ConfigError::InvalidValue {
                field: "iterations",
                reason: "must be at least one",
            });
        }
        if !(self.storms_per_year.is_finite() && self.storms_per_year > 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "storms_per_year",
                reason: "must be a positive rate",
            });
        }
        if self.wind_bins.is_empty() {
            return Err(ConfigError::EmptyWindBins);
        }
        let ascending = self.wind_bins.iter().all(|w| w.is_finite())
            && self.wind_bins.windows(2).all(|pair| pair[0] < pair[1]);
        if !ascending {
            return Err(ConfigError::UnsortedWindBins);
        }
        self.reference_period.validate()
    }

    /// Per-iteration return periods above this many years are discarded
    #[must_use]
    pub fn plausibility_ceiling(&self) -> f64 {
        f64::from(self.reference_period.length_years())
    }
}
