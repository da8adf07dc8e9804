//! Great-circle geometry on a spherical Earth

/// Mean Earth radius in kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance in kilometers between two `(lon, lat)` points given
/// in decimal degrees, using the haversine formula.
///
/// The formula does not care which longitude convention is used, but both
/// points must use the same one when the result is compared across datasets.
#[must_use]
pub fn haversine_km(lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    // Rounding can push `a` a hair above 1 for antipodal points
    let c = 2.0 * a.sqrt().min(1.0).asin();

    EARTH_RADIUS_KM * c
}

/// Map a longitude onto the `[0, 360)` convention used by track data.
#[must_use]
pub fn normalize_longitude(lon: f64) -> f64 {
    let wrapped = lon.rem_euclid(360.0);
    // rem_euclid can return exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Lower bound on the great-circle distance implied by a latitude gap alone.
///
/// Any path between two points spans at least their meridional separation, so
/// a point whose bound already exceeds the search radius can be skipped
/// without evaluating the full formula.
#[inline]
#[must_use]
pub fn meridional_distance_km(lat1: f64, lat2: f64) -> f64 {
    EARTH_RADIUS_KM * (lat2 - lat1).abs().to_radians()
}
