//! Return-period output tables
//!
//! One CSV per location with a `Wind_speed` column, one `RP_<i>` column per
//! iteration and, once aggregated, `RPmean`, `RPstd`, `RPband_low` and
//! `RPband_high`. Missing estimates are written as `NaN`.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tcrp_core::DataError;
use tcrp_core::EngineConfig;
use tcrp_core::metrics::RunDiagnostics;
use tcrp_core::model::{ClimatologyResult, LocationReturnPeriods, ReturnPeriodTable};

use super::{data_lines, split_record};
use crate::util::atomic_write;

pub const WIND_SPEED_COLUMN: &str = "Wind_speed";
pub const RUN_COLUMN_PREFIX: &str = "RP_";
pub const CLIMATOLOGY_COLUMNS: [&str; 4] = ["RPmean", "RPstd", "RPband_low", "RPband_high"];
pub const SUMMARY_FILE_NAME: &str = "run_summary.json";

/// Replace every run of non-word characters with a single `_`
fn sanitize(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_run = false;
    for c in name.chars() {
        if c.is_alphanumeric() || c == '_' {
            out.push(c);
            in_run = false;
        } else if !in_run {
            out.push('_');
            in_run = true;
        }
    }
    out
}

/// `<sanitized name>_<period label>.csv`
#[must_use]
pub fn output_file_name(location_name: &str, period_label: &str) -> String {
    format!("{}_{period_label}.csv", sanitize(location_name))
}

fn format_value(value: Option<f64>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "NaN".to_string(),
    }
}

/// Render the per-iteration table, followed by the climatology columns when
/// given.
#[must_use]
pub fn render_table(table: &ReturnPeriodTable, climatology: Option<&ClimatologyResult>) -> String {
    let mut out = String::from(WIND_SPEED_COLUMN);
    for i in 0..table.iterations() {
        let _ = write!(out, ",{RUN_COLUMN_PREFIX}{i}");
    }
    if climatology.is_some() {
        for column in CLIMATOLOGY_COLUMNS {
            let _ = write!(out, ",{column}");
        }
    }
    out.push('\n');

    for (bin, wind_speed) in table.wind_bins.iter().enumerate() {
        out.push_str(&wind_speed.to_string());
        for value in table.row(bin) {
            out.push(',');
            out.push_str(&format_value(value));
        }
        if let Some(row) = climatology.and_then(|c| c.rows.get(bin)) {
            for value in [row.mean, row.std, row.band_low, row.band_high] {
                out.push(',');
                out.push_str(&format_value(value));
            }
        }
        out.push('\n');
    }
    out
}

/// Write one location's tables into `dir`.
pub fn write_location(
    dir: &Path,
    result: &LocationReturnPeriods,
    period_label: &str,
) -> std::io::Result<PathBuf> {
    let path = dir.join(output_file_name(&result.location.name, period_label));
    atomic_write(&path, &render_table(&result.table, Some(&result.climatology)))?;
    tracing::debug!(location = %result.location.name, path = %path.display(), "Wrote table");
    Ok(path)
}

/// Read the `Wind_speed` and `RP_*` columns of a written table. Any other
/// columns, including earlier climatology columns, are ignored.
pub fn parse_table(text: &str, source_name: &str) -> Result<ReturnPeriodTable, DataError> {
    let malformed = |line: usize, reason: String| DataError::MalformedRecord {
        source_name: source_name.to_string(),
        line,
        reason,
    };

    let mut lines = data_lines(text);
    let Some((header_line, header)) = lines.next() else {
        return Err(malformed(1, "table is empty".to_string()));
    };
    let header = split_record(header);
    let wind_column = header
        .iter()
        .position(|h| h == WIND_SPEED_COLUMN)
        .ok_or_else(|| malformed(header_line, format!("missing column {WIND_SPEED_COLUMN}")))?;
    let run_columns: Vec<usize> = header
        .iter()
        .enumerate()
        .filter(|(_, h)| {
            h.strip_prefix(RUN_COLUMN_PREFIX)
                .is_some_and(|i| i.parse::<usize>().is_ok())
        })
        .map(|(i, _)| i)
        .collect();

    let mut wind_bins = Vec::new();
    // Row-major while reading; transposed into runs at the end
    let mut rows: Vec<Vec<Option<f64>>> = Vec::new();
    for (line, record) in lines {
        let fields = split_record(record);
        let number = |column: usize| -> Result<f64, DataError> {
            let raw = fields
                .get(column)
                .ok_or_else(|| malformed(line, format!("missing column {}", header[column])))?;
            raw.parse::<f64>()
                .map_err(|_| malformed(line, format!("`{raw}` is not a number")))
        };

        wind_bins.push(number(wind_column)?);
        rows.push(
            run_columns
                .iter()
                .map(|&c| number(c).map(|v| v.is_finite().then_some(v)))
                .collect::<Result<_, _>>()?,
        );
    }

    let runs = (0..run_columns.len())
        .map(|run| rows.iter().map(|row| row[run]).collect())
        .collect();
    Ok(ReturnPeriodTable { wind_bins, runs })
}

pub fn read_table(path: &Path) -> Result<ReturnPeriodTable, DataError> {
    let text = std::fs::read_to_string(path).map_err(|e| DataError::MalformedRecord {
        source_name: path.display().to_string(),
        line: 0,
        reason: e.to_string(),
    })?;
    parse_table(&text, &path.display().to_string())
}

/// Machine-readable record of a run
#[derive(Debug, Serialize)]
pub struct RunSummary<'a> {
    pub finished_at: jiff::Timestamp,
    pub seed: u64,
    pub config: &'a EngineConfig,
    pub diagnostics: &'a RunDiagnostics,
    pub outputs: Vec<PathBuf>,
}

pub fn write_run_summary(dir: &Path, summary: &RunSummary<'_>) -> color_eyre::Result<PathBuf> {
    let path = dir.join(SUMMARY_FILE_NAME);
    let json = serde_json::to_string_pretty(summary)?;
    atomic_write(&path, &json)?;
    Ok(path)
}
