//! Storm tracks and the ensemble of simulated climates they belong to
//!
//! Tracks arrive as a flat sequence of [`TrackPoint`]s. A storm starts at
//! every point whose `sequence_index` is zero and runs until the next such
//! point, so storms are contiguous in the input and ordered by time step.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::ids::{MemberIndex, StormId, StormKey};
use super::location::Basin;
use crate::error::DataError;
use crate::geo::normalize_longitude;

/// One time step of one storm
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackPoint {
    pub storm_id: StormId,
    /// Time step within the storm; zero marks the first point of a storm
    pub sequence_index: u32,
    pub year: i16,
    pub month: u8,
    /// Degrees east in `[0, 360)`
    pub longitude: f64,
    pub latitude: f64,
    pub max_sustained_wind: f64,
}

impl TrackPoint {
    /// Returns true if this point opens a new storm.
    #[inline]
    #[must_use]
    pub fn starts_storm(&self) -> bool {
        self.sequence_index == 0
    }

    /// False for padding steps whose coordinates are missing
    #[inline]
    #[must_use]
    pub fn has_position(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

/// A single storm: its ordered track points plus the year and month it formed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Storm {
    pub id: StormId,
    pub year: i16,
    pub month: u8,
    pub points: Vec<TrackPoint>,
}

impl Storm {
    fn open(first: &TrackPoint) -> Self {
        Self {
            id: first.storm_id,
            year: first.year,
            month: first.month,
            points: Vec::new(),
        }
    }

    /// Highest wind anywhere along the track
    #[must_use]
    pub fn peak_wind(&self) -> Option<f64> {
        self.points
            .iter()
            .map(|p| p.max_sustained_wind)
            .reduce(f64::max)
    }
}

/// One independent simulated-climate realization
#[derive(Debug, Clone)]
pub struct EnsembleMember {
    pub index: MemberIndex,
    storms: Vec<Storm>,
    /// Storm positions in `storms`, keyed by storm year
    by_year: FxHashMap<i16, Vec<usize>>,
}

impl EnsembleMember {
    /// Split a flat, ordered point sequence into storms.
    ///
    /// Storms are split where `sequence_index` resets to zero, before points
    /// without a position are discarded, so a start marker with missing
    /// coordinates still opens its storm. Storms left with no positioned
    /// point are dropped. Longitudes are normalized to `[0, 360)`. Points
    /// that precede the first storm start cannot be attributed to any storm
    /// and are rejected.
    pub fn from_points(
        index: MemberIndex,
        points: impl IntoIterator<Item = TrackPoint>,
    ) -> Result<Self, DataError> {
        let mut storms: Vec<Storm> = Vec::new();
        let mut orphans = 0usize;

        for mut point in points {
            if point.starts_storm() {
                storms.push(Storm::open(&point));
            }
            let Some(current) = storms.last_mut() else {
                orphans += 1;
                continue;
            };
            if point.has_position() {
                point.longitude = normalize_longitude(point.longitude);
                current.points.push(point);
            }
        }
        storms.retain(|storm| !storm.points.is_empty());

        if orphans > 0 {
            return Err(DataError::OrphanTrackPoints {
                member: index,
                count: orphans,
            });
        }

        Ok(Self::from_storms(index, storms))
    }

    /// Build a member from already-segmented storms.
    #[must_use]
    pub fn from_storms(index: MemberIndex, storms: Vec<Storm>) -> Self {
        let mut by_year: FxHashMap<i16, Vec<usize>> = FxHashMap::default();
        for (pos, storm) in storms.iter().enumerate() {
            by_year.entry(storm.year).or_default().push(pos);
        }
        Self {
            index,
            storms,
            by_year,
        }
    }

    #[must_use]
    pub fn storms(&self) -> &[Storm] {
        &self.storms
    }

    /// Storms that formed in `year`, in input order.
    pub fn storms_in_year(&self, year: i16) -> impl Iterator<Item = &Storm> {
        self.by_year
            .get(&year)
            .into_iter()
            .flatten()
            .map(|&pos| &self.storms[pos])
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.storms.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.storms.is_empty()
    }

    #[must_use]
    pub fn storm_key(&self, storm: &Storm) -> StormKey {
        StormKey {
            member: self.index,
            year: storm.year,
            storm: storm.id,
        }
    }
}

/// All ensemble members for one basin, immutable for the duration of a run
#[derive(Debug, Clone)]
pub struct TrackEnsemble {
    pub basin: Basin,
    members: Vec<EnsembleMember>,
}

impl TrackEnsemble {
    pub fn new(basin: Basin, members: Vec<EnsembleMember>) -> Result<Self, DataError> {
        if members.is_empty() {
            return Err(DataError::EmptyEnsemble);
        }
        Ok(Self { basin, members })
    }

    #[must_use]
    pub fn members(&self) -> &[EnsembleMember] {
        &self.members
    }

    #[must_use]
    pub fn member(&self, index: MemberIndex) -> Option<&EnsembleMember> {
        self.members.get(index.0)
    }

    #[must_use]
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Total storms across all members
    #[must_use]
    pub fn storm_count(&self) -> usize {
        self.members.iter().map(EnsembleMember::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(storm: u32, seq: u32, year: i16, lon: f64, wind: f64) -> TrackPoint {
        TrackPoint {
            storm_id: StormId(storm),
            sequence_index: seq,
            year,
            month: 9,
            longitude: lon,
            latitude: 20.0,
            max_sustained_wind: wind,
        }
    }

    #[test]
    fn test_storm_boundaries_at_sequence_reset() {
        let points = vec![
            point(0, 0, 1990, 280.0, 20.0),
            point(0, 1, 1990, 281.0, 30.0),
            point(0, 2, 1990, 282.0, 25.0),
            point(1, 0, 1991, 300.0, 18.0),
            point(2, 0, 1991, 310.0, 40.0),
            point(2, 1, 1991, 311.0, 45.0),
        ];

        let member = EnsembleMember::from_points(MemberIndex(0), points).unwrap();

        assert_eq!(member.len(), 3);
        assert_eq!(member.storms()[0].points.len(), 3);
        assert_eq!(member.storms()[1].points.len(), 1);
        assert_eq!(member.storms()[2].points.len(), 2);
        assert_eq!(member.storms()[2].peak_wind(), Some(45.0));
    }

    #[test]
    fn test_storms_indexed_by_year() {
        let points = vec![
            point(0, 0, 1990, 280.0, 20.0),
            point(1, 0, 1991, 300.0, 18.0),
            point(2, 0, 1991, 310.0, 40.0),
        ];
        let member = EnsembleMember::from_points(MemberIndex(0), points).unwrap();

        let ids: Vec<_> = member.storms_in_year(1991).map(|s| s.id).collect();
        assert_eq!(ids, vec![StormId(1), StormId(2)]);
        assert_eq!(member.storms_in_year(2005).count(), 0);
    }

    #[test]
    fn test_orphan_points_rejected() {
        let points = vec![
            point(0, 3, 1990, 280.0, 20.0),
            point(0, 4, 1990, 281.0, 30.0),
            point(1, 0, 1990, 282.0, 25.0),
        ];

        let err = EnsembleMember::from_points(MemberIndex(4), points).unwrap_err();
        assert_eq!(
            err,
            DataError::OrphanTrackPoints {
                member: MemberIndex(4),
                count: 2
            }
        );
    }

    #[test]
    fn test_unpositioned_start_still_opens_storm() {
        let points = vec![
            point(0, 0, 1980, 300.0, 20.0),
            point(0, 1, 1980, 301.0, 30.0),
            point(1, 0, 1981, f64::NAN, f64::NAN),
            point(1, 1, 1981, 280.0, 50.0),
        ];

        let member = EnsembleMember::from_points(MemberIndex(0), points).unwrap();

        assert_eq!(member.len(), 2);
        assert_eq!(member.storms()[0].peak_wind(), Some(30.0));
        let later: Vec<_> = member.storms_in_year(1981).collect();
        assert_eq!(later.len(), 1);
        assert_eq!(later[0].id, StormId(1));
        assert_eq!(later[0].points.len(), 1);
        assert_eq!(later[0].peak_wind(), Some(50.0));
    }

    #[test]
    fn test_unpositioned_first_start_is_not_orphaned() {
        let points = vec![
            point(0, 0, 1981, f64::NAN, f64::NAN),
            point(0, 1, 1981, 280.0, 50.0),
            point(0, 2, 1981, f64::NAN, f64::NAN),
        ];

        let member = EnsembleMember::from_points(MemberIndex(0), points).unwrap();
        assert_eq!(member.len(), 1);
        assert_eq!(member.storms()[0].points.len(), 1);
    }

    #[test]
    fn test_storm_without_positions_dropped() {
        let points = vec![
            point(0, 0, 1980, 300.0, 20.0),
            point(1, 0, 1980, f64::NAN, f64::NAN),
            point(1, 1, 1980, f64::NAN, f64::NAN),
        ];

        let member = EnsembleMember::from_points(MemberIndex(0), points).unwrap();
        assert_eq!(member.len(), 1);
        assert_eq!(member.storms()[0].id, StormId(0));
    }

    #[test]
    fn test_longitudes_normalized() {
        let points = vec![point(0, 0, 1990, -80.0, 20.0)];
        let member = EnsembleMember::from_points(MemberIndex(0), points).unwrap();
        assert_eq!(member.storms()[0].points[0].longitude, 280.0);
    }

    #[test]
    fn test_empty_ensemble_rejected() {
        let err = TrackEnsemble::new(Basin::NorthAtlantic, vec![]).unwrap_err();
        assert_eq!(err, DataError::EmptyEnsemble);
    }
}
