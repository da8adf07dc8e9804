//! Synthetic track files
//!
//! One file per ensemble member, one track point per line:
//!
//! ```text
//! year, month, storm_id, time_index, basin_id, latitude, longitude, wind_speed[, ...]
//! ```
//!
//! Numbers may be written as floats (`1.980000e+03`). Columns past the eighth
//! are ignored. A leading header line and `#` comments are allowed. Rows with
//! a missing (NaN) coordinate carry no position; they still mark storm
//! boundaries but are dropped once storms are split.

use std::path::{Path, PathBuf};

use tcrp_core::DataError;
use tcrp_core::model::{Basin, EnsembleMember, MemberIndex, StormId, TrackEnsemble, TrackPoint};

use super::{data_lines, split_record};

const COLUMNS: [&str; 8] = [
    "year",
    "month",
    "storm_id",
    "time_index",
    "basin_id",
    "latitude",
    "longitude",
    "wind_speed",
];

struct RecordContext<'a> {
    source_name: &'a str,
    line: usize,
}

impl RecordContext<'_> {
    fn malformed(&self, reason: impl Into<String>) -> DataError {
        DataError::MalformedRecord {
            source_name: self.source_name.to_string(),
            line: self.line,
            reason: reason.into(),
        }
    }

    fn number(&self, fields: &[String], column: usize) -> Result<f64, DataError> {
        let raw = &fields[column];
        raw.parse::<f64>()
            .map_err(|_| self.malformed(format!("{} `{raw}` is not a number", COLUMNS[column])))
    }

    /// Whole number in the range of `T`
    fn integer<T: TryFrom<i64>>(&self, fields: &[String], column: usize) -> Result<T, DataError> {
        let value = self.number(fields, column)?;
        if value.fract() != 0.0 || !value.is_finite() {
            return Err(self.malformed(format!("{} {value} is not a whole number", COLUMNS[column])));
        }
        T::try_from(value as i64)
            .map_err(|_| self.malformed(format!("{} {value} is out of range", COLUMNS[column])))
    }
}

fn parse_record(
    fields: &[String],
    ctx: &RecordContext<'_>,
    wind_factor: f64,
) -> Result<TrackPoint, DataError> {
    if fields.len() < COLUMNS.len() {
        return Err(ctx.malformed(format!(
            "expected {} columns, found {}",
            COLUMNS.len(),
            fields.len()
        )));
    }

    Ok(TrackPoint {
        year: ctx.integer(fields, 0)?,
        month: ctx.integer(fields, 1)?,
        storm_id: StormId(ctx.integer(fields, 2)?),
        sequence_index: ctx.integer(fields, 3)?,
        latitude: ctx.number(fields, 5)?,
        longitude: ctx.number(fields, 6)?,
        max_sustained_wind: ctx.number(fields, 7)? * wind_factor,
    })
}

pub fn parse_member(
    text: &str,
    source_name: &str,
    member: MemberIndex,
    wind_factor: f64,
) -> Result<EnsembleMember, DataError> {
    let mut points = Vec::new();
    let mut dropped = 0usize;

    for (position, (line, record)) in data_lines(text).enumerate() {
        let fields = split_record(record);
        // A header is only allowed as the first record
        if position == 0 && fields.first().is_some_and(|f| f.parse::<f64>().is_err()) {
            continue;
        }
        let ctx = RecordContext { source_name, line };
        let point = parse_record(&fields, &ctx, wind_factor)?;
        if !point.has_position() {
            dropped += 1;
        }
        points.push(point);
    }

    let member = EnsembleMember::from_points(member, points)?;
    tracing::debug!(
        source = source_name,
        storms = member.len(),
        dropped,
        "Loaded ensemble member"
    );
    Ok(member)
}

/// Read one member's track file.
pub fn read_member(
    path: &Path,
    member: MemberIndex,
    wind_factor: f64,
) -> Result<EnsembleMember, DataError> {
    let text = std::fs::read_to_string(path).map_err(|e| DataError::MemberUnavailable {
        member,
        reason: format!("{}: {e}", path.display()),
    })?;
    parse_member(&text, &path.display().to_string(), member, wind_factor)
}

/// Read every member; any unreadable member aborts the whole ensemble.
pub fn read_ensemble(
    paths: &[PathBuf],
    basin: Basin,
    wind_factor: f64,
) -> Result<TrackEnsemble, DataError> {
    let members = paths
        .iter()
        .enumerate()
        .map(|(i, path)| read_member(path, MemberIndex(i), wind_factor))
        .collect::<Result<Vec<_>, _>>()?;
    let ensemble = TrackEnsemble::new(basin, members)?;
    tracing::info!(
        members = ensemble.member_count(),
        storms = ensemble.storm_count(),
        %basin,
        "Loaded track ensemble"
    );
    Ok(ensemble)
}
