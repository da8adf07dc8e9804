use rand::{RngCore, SeedableRng};
#[cfg(feature = "parallel")]
use rayon::iter::{IndexedParallelIterator, IntoParallelIterator, ParallelIterator};

use crate::climatology::ClimatologyAggregator;
use crate::config::EngineConfig;
use crate::error::{ConfigError, Result};
use crate::exposure::SpatialExposureFilter;
use crate::extreme_value::ExtremeValueEstimator;
use crate::metrics::RunDiagnostics;
use crate::model::{
    Location, LocationReturnPeriods, ReturnPeriodCurve, ReturnPeriodTable, TrackEnsemble,
};
use crate::sampler::{ResampledClimatology, TrackEnsembleSampler};

/// Everything one iteration produced. Built in full before it is merged into
/// the run, so an interrupted iteration leaves no trace in the aggregate.
#[derive(Debug, Clone)]
pub struct IterationResult {
    pub iteration: usize,
    /// `(location_index, curve)` for every in-basin location
    pub curves: Vec<(usize, Option<ReturnPeriodCurve>)>,
    pub diagnostics: RunDiagnostics,
}

/// Output of a complete run
#[derive(Debug, Clone)]
pub struct RunResult {
    /// Master seed the iteration seeds were derived from
    pub seed: u64,
    /// Locations with at least one curve, in input order
    pub locations: Vec<LocationReturnPeriods>,
    pub diagnostics: RunDiagnostics,
}

/// Derive one independent seed per iteration from the master seed.
///
/// Seeds depend only on the master seed and the iteration index, so a run
/// reproduces exactly whether iterations execute in sequence or in parallel.
#[must_use]
pub fn iteration_seeds(master_seed: u64, iterations: usize) -> Vec<u64> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(master_seed);
    (0..iterations).map(|_| rng.next_u64()).collect()
}

/// The sample → filter → estimate → aggregate pipeline over a loaded ensemble
#[derive(Debug, Clone)]
pub struct ReturnPeriodEngine<'a> {
    config: &'a EngineConfig,
    locations: &'a [Location],
    sampler: TrackEnsembleSampler<'a>,
    filter: SpatialExposureFilter,
    estimator: ExtremeValueEstimator,
    aggregator: ClimatologyAggregator,
}

impl<'a> ReturnPeriodEngine<'a> {
    pub fn new(
        config: &'a EngineConfig,
        ensemble: &'a TrackEnsemble,
        locations: &'a [Location],
    ) -> Result<Self> {
        config.validate()?;
        if ensemble.basin != config.basin {
            return Err(ConfigError::InvalidValue {
                field: "basin",
                reason: "ensemble tracks belong to a different basin",
            }
            .into());
        }

        let filter = SpatialExposureFilter::new(locations, config.basin, config);
        tracing::debug!(
            members = ensemble.member_count(),
            storms = ensemble.storm_count(),
            locations = filter.target_count(),
            basin = %config.basin,
            "Engine ready"
        );

        Ok(Self {
            config,
            locations,
            sampler: TrackEnsembleSampler::new(ensemble, config),
            filter,
            estimator: ExtremeValueEstimator::new(config),
            aggregator: ClimatologyAggregator::new(config),
        })
    }

    #[must_use]
    pub fn sampler(&self) -> &TrackEnsembleSampler<'a> {
        &self.sampler
    }

    /// Run a single resampling iteration with its own seed.
    #[must_use]
    pub fn run_iteration(&self, iteration: usize, seed: u64) -> IterationResult {
        let sample = self.sampler.sample_seeded(seed);
        self.evaluate_sample(iteration, &sample)
    }

    /// Filter and estimate over an already-drawn climatology.
    #[must_use]
    pub fn evaluate_sample(
        &self,
        iteration: usize,
        sample: &ResampledClimatology<'_>,
    ) -> IterationResult {
        let mut diagnostics = RunDiagnostics::new();
        diagnostics.record_sample(sample);
        tracing::debug!(
            iteration,
            draws = sample.draws.len(),
            pooled = sample.storms.len(),
            distinct = sample.distinct_storms,
            estimated_years = sample.estimated_years,
            "Resampled climatology"
        );

        let observations = self.filter.observe(sample.storms.iter().map(|s| s.storm));

        let curves = observations
            .into_iter()
            .map(|set| {
                let curve = self.estimator.estimate(&set.winds, &self.config.wind_bins);
                if curve.is_some() {
                    diagnostics.record_curve();
                } else {
                    diagnostics.record_empty_exposure();
                    tracing::debug!(
                        iteration,
                        location = %self.locations[set.location_index].name,
                        "No qualifying exposure"
                    );
                }
                (set.location_index, curve)
            })
            .collect();

        IterationResult {
            iteration,
            curves,
            diagnostics,
        }
    }

    fn run_iterations(&self, seeds: &[u64]) -> Vec<IterationResult> {
        #[cfg(feature = "parallel")]
        {
            seeds
                .to_vec()
                .into_par_iter()
                .enumerate()
                .map(|(i, seed)| self.run_iteration(i, seed))
                .collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            seeds
                .iter()
                .enumerate()
                .map(|(i, &seed)| self.run_iteration(i, seed))
                .collect()
        }
    }

    /// Run all iterations using the configured seed, or a fresh one.
    #[must_use]
    pub fn run(&self) -> RunResult {
        let seed = self.config.seed.unwrap_or_else(rand::random);
        self.run_with_seed(seed)
    }

    /// Run all iterations deriving their seeds from `master_seed`.
    #[must_use]
    pub fn run_with_seed(&self, master_seed: u64) -> RunResult {
        tracing::info!(
            seed = master_seed,
            iterations = self.config.iterations,
            n_years = self.config.n_years,
            "Starting return-period run"
        );

        let seeds = iteration_seeds(master_seed, self.config.iterations);
        let iterations = self.run_iterations(&seeds);

        let mut diagnostics = RunDiagnostics::new();
        let mut tables: Vec<(usize, ReturnPeriodTable)> = self
            .filter
            .target_indices()
            .map(|idx| (idx, ReturnPeriodTable::new(self.config.wind_bins.clone())))
            .collect();

        for result in &iterations {
            for ((idx, table), (curve_idx, curve)) in tables.iter_mut().zip(&result.curves) {
                debug_assert_eq!(*idx, *curve_idx);
                table.push_curve(curve.as_ref());
            }
            diagnostics.merge(&result.diagnostics);
        }

        let mut locations = Vec::with_capacity(tables.len());
        for (idx, table) in tables {
            let location = &self.locations[idx];
            if table.curve_count() == 0 {
                tracing::warn!(location = %location.name, "No qualifying exposure in any iteration");
                diagnostics.unexposed_locations.push(location.name.clone());
                continue;
            }
            let climatology = self.aggregator.aggregate(&table);
            diagnostics.record_clamped(climatology.clamped);
            locations.push(LocationReturnPeriods {
                location: location.clone(),
                table,
                climatology,
            });
        }

        tracing::info!(
            locations = locations.len(),
            curves = diagnostics.curves,
            empty_exposures = diagnostics.empty_exposures,
            clamped = diagnostics.implausible_clamped,
            mean_estimated_years = diagnostics.mean_estimated_years().unwrap_or(0.0),
            "Return-period run complete"
        );

        RunResult {
            seed: master_seed,
            locations,
            diagnostics,
        }
    }
}

/// Validate inputs and run the full pipeline in one call.
pub fn estimate_return_periods(
    config: &EngineConfig,
    ensemble: &TrackEnsemble,
    locations: &[Location],
) -> Result<RunResult> {
    Ok(ReturnPeriodEngine::new(config, ensemble, locations)?.run())
}
