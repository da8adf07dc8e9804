//! Fluent construction of [`EngineConfig`]

use super::{EngineConfig, PlottingPosition, ReferencePeriod};
use crate::error::ConfigError;
use crate::model::Basin;

/// Builder for [`EngineConfig`]; validation runs once in [`build`](Self::build)
#[derive(Debug, Clone)]
pub struct EngineConfigBuilder {
    config: EngineConfig,
    period_error: Option<ConfigError>,
}

impl EngineConfigBuilder {
    #[must_use]
    pub fn new(basin: Basin, storms_per_year: f64) -> Self {
        Self {
            config: EngineConfig::new(basin, storms_per_year),
            period_error: None,
        }
    }

    #[must_use]
    pub fn radius_km(mut self, radius_km: f64) -> Self {
        self.config.radius_km = radius_km;
        self
    }

    #[must_use]
    pub fn min_wind(mut self, min_wind: f64) -> Self {
        self.config.min_wind = min_wind;
        self
    }

    #[must_use]
    pub fn plotting_position(mut self, plotting_position: PlottingPosition) -> Self {
        self.config.plotting_position = plotting_position;
        self
    }

    #[must_use]
    pub fn n_years(mut self, n_years: usize) -> Self {
        self.config.n_years = n_years;
        self
    }

    #[must_use]
    pub fn iterations(mut self, iterations: usize) -> Self {
        self.config.iterations = iterations;
        self
    }

    #[must_use]
    pub fn wind_bins(mut self, wind_bins: impl Into<Vec<f64>>) -> Self {
        self.config.wind_bins = wind_bins.into();
        self
    }

    #[must_use]
    pub fn reference_period(mut self, period: ReferencePeriod) -> Self {
        self.config.reference_period = period;
        self
    }

    /// Whole calendar years, `start_year` through `end_year` inclusive
    #[must_use]
    pub fn reference_years(mut self, start_year: i16, end_year: i16) -> Self {
        match ReferencePeriod::years(start_year, end_year) {
            Ok(period) => self.config.reference_period = period,
            Err(e) => self.period_error = Some(e),
        }
        self
    }

    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    pub fn build(self) -> Result<EngineConfig, ConfigError> {
        if let Some(err) = self.period_error {
            return Err(err);
        }
        self.config.validate()?;
        Ok(self.config)
    }
}
