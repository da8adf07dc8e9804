//! Scenario tests for the return-period pipeline
//!
//! Tests are organized by topic:
//! - `end_to_end` - Full runs over small hand-built ensembles
//! - `reproducibility` - Seeding and iteration independence

mod end_to_end;
mod reproducibility;

use crate::model::{EnsembleMember, MemberIndex, StormId, TrackPoint};

/// Track point helper: `(lon, lat, wind)` at step `seq` of `storm`
pub(crate) fn track_point(storm: u32, seq: u32, year: i16, lon: f64, lat: f64, wind: f64) -> TrackPoint {
    TrackPoint {
        storm_id: StormId(storm),
        sequence_index: seq,
        year,
        month: 9,
        longitude: lon,
        latitude: lat,
        max_sustained_wind: wind,
    }
}

/// Member whose every storm is a straight pass over `(lon, lat)` with the
/// given peak winds, one storm per entry of `storms` as `(year, wind)`
pub(crate) fn member_passing_over(
    index: usize,
    lon: f64,
    lat: f64,
    storms: &[(i16, f64)],
) -> EnsembleMember {
    let points = storms
        .iter()
        .enumerate()
        .flat_map(|(id, &(year, wind))| {
            let id = id as u32;
            [
                track_point(id, 0, year, lon - 3.0, lat, wind * 0.5),
                track_point(id, 1, year, lon, lat, wind),
                track_point(id, 2, year, lon + 3.0, lat, wind * 0.8),
            ]
        });
    EnsembleMember::from_points(MemberIndex(index), points).unwrap()
}
