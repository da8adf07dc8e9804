//! Spatial join between pooled storm tracks and target locations
//!
//! A storm exposes a location when any of its track points falls within the
//! search radius. Each exposing storm contributes exactly one observation per
//! location: the highest wind among its points inside the radius, provided
//! that wind reaches the qualifying threshold.

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::geo::{haversine_km, meridional_distance_km};
use crate::model::{Basin, Location, Storm};

/// Storm-maximum winds observed at one location during one iteration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindObservationSet {
    /// Position of the location in the input location list
    pub location_index: usize,
    pub winds: Vec<f64>,
}

impl WindObservationSet {
    #[must_use]
    pub fn len(&self) -> usize {
        self.winds.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.winds.is_empty()
    }
}

#[derive(Debug, Clone, Copy)]
struct Target {
    location_index: usize,
    longitude: f64,
    latitude: f64,
}

/// Associates storms with the in-basin locations they pass near
#[derive(Debug, Clone)]
pub struct SpatialExposureFilter {
    targets: Vec<Target>,
    radius_km: f64,
    min_wind: f64,
}

impl SpatialExposureFilter {
    /// Keep only locations in `basin`, with longitudes moved onto the track
    /// convention. Locations in other basins never reach a distance test.
    #[must_use]
    pub fn new(locations: &[Location], basin: Basin, config: &EngineConfig) -> Self {
        let targets = locations
            .iter()
            .enumerate()
            .filter(|(_, loc)| loc.basin == basin)
            .map(|(location_index, loc)| Target {
                location_index,
                longitude: loc.normalized_longitude(),
                latitude: loc.latitude,
            })
            .collect();

        Self {
            targets,
            radius_km: config.radius_km,
            min_wind: config.min_wind,
        }
    }

    /// Indices (into the input location list) of the locations evaluated
    pub fn target_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.targets.iter().map(|t| t.location_index)
    }

    #[must_use]
    pub fn target_count(&self) -> usize {
        self.targets.len()
    }

    /// Highest wind among the storm's points within the radius of the
    /// target, or `None` when the track never comes close enough.
    fn max_wind_near(&self, storm: &Storm, target: &Target) -> Option<f64> {
        storm
            .points
            .iter()
            .filter(|p| meridional_distance_km(p.latitude, target.latitude) <= self.radius_km)
            .filter(|p| {
                haversine_km(p.longitude, p.latitude, target.longitude, target.latitude)
                    <= self.radius_km
            })
            .map(|p| p.max_sustained_wind)
            .reduce(f64::max)
    }

    /// Qualifying storm-maximum wind for one storm at one target location
    fn qualifying_wind(&self, storm: &Storm, target: &Target) -> Option<f64> {
        self.max_wind_near(storm, target)
            .filter(|&w| w >= self.min_wind)
    }

    /// Build one observation set per in-basin location, in input order.
    pub fn observe<'s>(&self, storms: impl IntoIterator<Item = &'s Storm>) -> Vec<WindObservationSet> {
        let mut sets: Vec<WindObservationSet> = self
            .targets
            .iter()
            .map(|t| WindObservationSet {
                location_index: t.location_index,
                winds: Vec::new(),
            })
            .collect();

        for storm in storms {
            for (target, set) in self.targets.iter().zip(sets.iter_mut()) {
                if let Some(wind) = self.qualifying_wind(storm, target) {
                    set.winds.push(wind);
                }
            }
        }

        sets
    }
}
