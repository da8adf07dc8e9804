//! Target locations and the ocean basins they are grouped by

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::geo::normalize_longitude;

/// Ocean basin in which storms form and locations are analyzed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Basin {
    #[serde(rename = "NA")]
    NorthAtlantic,
    #[serde(rename = "EP")]
    EasternPacific,
    #[serde(rename = "WP")]
    WesternPacific,
    #[serde(rename = "NI")]
    NorthIndian,
    #[serde(rename = "SI")]
    SouthIndian,
    #[serde(rename = "AU")]
    Australian,
    #[serde(rename = "SP")]
    SouthPacific,
    #[serde(rename = "SH")]
    SouthernHemisphere,
}

impl Basin {
    pub const ALL: [Basin; 8] = [
        Basin::NorthAtlantic,
        Basin::EasternPacific,
        Basin::WesternPacific,
        Basin::NorthIndian,
        Basin::SouthIndian,
        Basin::Australian,
        Basin::SouthPacific,
        Basin::SouthernHemisphere,
    ];

    /// Two-letter basin code used in file names and location tables
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::NorthAtlantic => "NA",
            Self::EasternPacific => "EP",
            Self::WesternPacific => "WP",
            Self::NorthIndian => "NI",
            Self::SouthIndian => "SI",
            Self::Australian => "AU",
            Self::SouthPacific => "SP",
            Self::SouthernHemisphere => "SH",
        }
    }
}

impl fmt::Display for Basin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error returned when a basin code is not recognized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownBasin(pub String);

impl fmt::Display for UnknownBasin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown basin code `{}`", self.0)
    }
}

impl std::error::Error for UnknownBasin {}

impl FromStr for Basin {
    type Err = UnknownBasin;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        Basin::ALL
            .into_iter()
            .find(|b| b.code().eq_ignore_ascii_case(code))
            .ok_or_else(|| UnknownBasin(code.to_string()))
    }
}

/// A place for which return periods are estimated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    /// Country, city or any grouping label carried through to the output
    #[serde(default, alias = "city", alias = "country")]
    pub category: String,
    pub basin: Basin,
    /// Degrees east, in either the `[-180, 180)` or `[0, 360)` convention
    pub longitude: f64,
    pub latitude: f64,
}

impl Location {
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        basin: Basin,
        longitude: f64,
        latitude: f64,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            basin,
            longitude,
            latitude,
        }
    }

    /// Longitude in the `[0, 360)` convention of the track data
    #[must_use]
    pub fn normalized_longitude(&self) -> f64 {
        normalize_longitude(self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basin_codes_round_trip() {
        for basin in Basin::ALL {
            assert_eq!(basin.code().parse::<Basin>(), Ok(basin));
        }
        assert_eq!(" na ".parse::<Basin>(), Ok(Basin::NorthAtlantic));
        assert_eq!(
            "ATL".parse::<Basin>(),
            Err(UnknownBasin("ATL".to_string()))
        );
    }

    #[test]
    fn test_normalized_longitude() {
        let miami = Location::new("Miami", "USA", Basin::NorthAtlantic, -80.19, 25.76);
        assert!((miami.normalized_longitude() - 279.81).abs() < 1e-9);
        assert_eq!(miami.longitude, -80.19);
    }
}
