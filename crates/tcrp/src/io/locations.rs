//! Location tables
//!
//! CSV tables need a header naming at least `NAME`, `CITY`, `BASIN`,
//! `LATITUDE` and `LONGITUDE` (any order, any case, extra columns ignored).
//! Files ending in `.yaml` or `.yml` hold a list of locations instead.

use std::path::Path;

use tcrp_core::DataError;
use tcrp_core::model::{Basin, Location};

use super::{data_lines, split_record};

const REQUIRED: [&str; 5] = ["NAME", "CITY", "BASIN", "LATITUDE", "LONGITUDE"];

/// Column positions of the required fields, in `REQUIRED` order
fn column_positions(header: &[String]) -> Result<[usize; 5], DataError> {
    let mut positions = [0; 5];
    for (slot, name) in positions.iter_mut().zip(REQUIRED) {
        *slot = header
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .ok_or_else(|| DataError::LocationsUnavailable(format!("missing column {name}")))?;
    }
    Ok(positions)
}

pub fn parse_locations_csv(text: &str, source_name: &str) -> Result<Vec<Location>, DataError> {
    let mut lines = data_lines(text);
    let Some((_, header)) = lines.next() else {
        return Err(DataError::LocationsUnavailable(format!(
            "{source_name} is empty"
        )));
    };
    let [name, city, basin, lat, lon] = column_positions(&split_record(header))?;
    let width = [name, city, basin, lat, lon].into_iter().max().unwrap_or(0) + 1;

    lines
        .map(|(line, record)| {
            let malformed = |reason: String| DataError::MalformedRecord {
                source_name: source_name.to_string(),
                line,
                reason,
            };
            let fields = split_record(record);
            if fields.len() < width {
                return Err(malformed(format!(
                    "expected at least {width} columns, found {}",
                    fields.len()
                )));
            }
            let coordinate = |column: usize, label: &str| {
                fields[column]
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| malformed(format!("{label} `{}` is not a number", fields[column])))
            };

            Ok(Location::new(
                fields[name].clone(),
                fields[city].clone(),
                fields[basin]
                    .parse::<Basin>()
                    .map_err(|e| malformed(e.to_string()))?,
                coordinate(lon, "longitude")?,
                coordinate(lat, "latitude")?,
            ))
        })
        .collect()
}

pub fn parse_locations_yaml(text: &str) -> Result<Vec<Location>, DataError> {
    serde_saphyr::from_str(text).map_err(|e| DataError::LocationsUnavailable(e.to_string()))
}

/// Read the location table, choosing the format by file extension.
pub fn read_locations(path: &Path) -> Result<Vec<Location>, DataError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| DataError::LocationsUnavailable(format!("{}: {e}", path.display())))?;

    let is_yaml = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));
    let locations = if is_yaml {
        parse_locations_yaml(&text)?
    } else {
        parse_locations_csv(&text, &path.display().to_string())?
    };

    tracing::info!(count = locations.len(), path = %path.display(), "Loaded locations");
    Ok(locations)
}
