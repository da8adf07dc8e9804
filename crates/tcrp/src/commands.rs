//! The `run` and `aggregate` sub-commands

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use color_eyre::eyre::{WrapErr, bail};
use tcrp_core::climatology::ClimatologyAggregator;
use tcrp_core::metrics::RunDiagnostics;
use tcrp_core::model::ClimatologyResult;
use tcrp_core::{ReferencePeriod, ReturnPeriodEngine};

use crate::io::tables::{output_file_name, render_table};
use crate::io::{RunSummary, read_ensemble, read_locations, read_table, write_location, write_run_summary};
use crate::settings::Settings;
use crate::util::atomic_write;

/// What a completed run left on disk
#[derive(Debug, Clone)]
pub struct RunReport {
    pub seed: u64,
    pub outputs: Vec<PathBuf>,
    pub summary: PathBuf,
    pub diagnostics: RunDiagnostics,
}

/// Load every input, run the engine and write one table per exposed
/// location plus the run summary.
pub fn run(settings: &Settings) -> color_eyre::Result<RunReport> {
    settings.validate().wrap_err("Invalid settings")?;

    let locations = read_locations(&settings.locations).wrap_err("Failed to load locations")?;
    let ensemble = read_ensemble(&settings.tracks, settings.engine.basin, settings.wind_factor)
        .wrap_err("Failed to load track ensemble")?;

    let engine = ReturnPeriodEngine::new(&settings.engine, &ensemble, &locations)?;
    let result = engine.run();

    let label = settings.engine.reference_period.label();
    let mut claimed: HashMap<String, &str> = HashMap::new();
    for location in &result.locations {
        let name = location.location.name.as_str();
        let file = output_file_name(name, &label);
        if let Some(previous) = claimed.insert(file.clone(), name) {
            bail!("Locations `{previous}` and `{name}` would both be written to {file}");
        }
    }

    let dir = &settings.output_dir;
    std::fs::create_dir_all(dir)
        .wrap_err_with(|| format!("Failed to create output directory {}", dir.display()))?;

    let outputs = result
        .locations
        .iter()
        .map(|location| {
            write_location(dir, location, &label).wrap_err_with(|| {
                format!("Failed to write table for {}", location.location.name)
            })
        })
        .collect::<color_eyre::Result<Vec<_>>>()?;

    let summary = write_run_summary(
        dir,
        &RunSummary {
            finished_at: jiff::Timestamp::now(),
            seed: result.seed,
            config: &settings.engine,
            diagnostics: &result.diagnostics,
            outputs: outputs.clone(),
        },
    )?;

    for name in &result.diagnostics.unexposed_locations {
        tracing::warn!(location = %name, "No table written: location never exposed");
    }
    tracing::info!(
        seed = result.seed,
        tables = outputs.len(),
        dir = %dir.display(),
        "Run finished"
    );

    Ok(RunReport {
        seed: result.seed,
        outputs,
        summary,
        diagnostics: result.diagnostics,
    })
}

/// Recompute the climatology columns of a written table.
///
/// Only the raw `RP_*` columns are read, so aggregating an already
/// aggregated table reproduces it.
pub fn aggregate(
    input: &Path,
    output: &Path,
    period: &ReferencePeriod,
) -> color_eyre::Result<ClimatologyResult> {
    let table = read_table(input)
        .wrap_err_with(|| format!("Failed to read table {}", input.display()))?;
    let aggregator = ClimatologyAggregator::with_ceiling(f64::from(period.length_years()));
    let climatology = aggregator.aggregate(&table);

    atomic_write(output, &render_table(&table, Some(&climatology)))
        .wrap_err_with(|| format!("Failed to write {}", output.display()))?;

    tracing::info!(
        input = %input.display(),
        output = %output.display(),
        iterations = table.iterations(),
        clamped = climatology.clamped,
        "Aggregated table"
    );
    Ok(climatology)
}
