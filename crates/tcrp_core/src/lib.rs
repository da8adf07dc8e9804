//! Tropical-cyclone return-period estimation
//!
//! This crate estimates how often tropical-cyclone winds of a given strength
//! recur at a set of locations, using an ensemble of synthetic storm tracks.
//! A run consists of:
//! - Monte Carlo resampling of `(member, year)` pairs into a synthetic
//!   climatology of a target length
//! - A spatial join between the pooled tracks and in-basin locations
//! - Rank-based (Weibull plotting position) return-period curves per location
//! - Aggregation of the iterations into a mean curve with uncertainty bands
//!
//! ```ignore
//! use tcrp_core::config::EngineConfigBuilder;
//! use tcrp_core::model::Basin;
//! use tcrp_core::simulation::ReturnPeriodEngine;
//!
//! let config = EngineConfigBuilder::new(Basin::NorthAtlantic, 11.3)
//!     .iterations(10)
//!     .seed(42)
//!     .build()?;
//! let engine = ReturnPeriodEngine::new(&config, &ensemble, &locations)?;
//! let result = engine.run();
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod climatology;
pub mod error;
pub mod exposure;
pub mod extreme_value;
pub mod geo;
pub mod metrics;
pub mod sampler;
pub mod simulation;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod config;
pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use config::{EngineConfig, EngineConfigBuilder, ReferencePeriod};
pub use error::{ConfigError, DataError, EngineError};
pub use simulation::{ReturnPeriodEngine, RunResult, estimate_return_periods};
