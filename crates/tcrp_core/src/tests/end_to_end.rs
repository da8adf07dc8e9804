//! Full pipeline runs over small hand-built ensembles

use super::member_passing_over;
use crate::config::{EngineConfig, EngineConfigBuilder};
use crate::error::{ConfigError, EngineError};
use crate::model::{Basin, Location, MemberIndex, TrackEnsemble};
use crate::sampler::Draw;
use crate::simulation::ReturnPeriodEngine;

fn target() -> Location {
    Location::new("Target", "Test", Basin::NorthAtlantic, -75.0, 20.0)
}

/// Three members, one storm per year over `target()`, every storm with its
/// own peak wind between 20 and 57.5
fn yearly_ensemble() -> TrackEnsemble {
    let members = (0..3)
        .map(|m| {
            let storms: Vec<(i16, f64)> = (1980..=2021)
                .map(|y: i16| (y, 20.0 + f64::from(y - 1980) * 0.9 + m as f64 * 0.3))
                .collect();
            member_passing_over(m, 285.0, 20.0, &storms)
        })
        .collect();
    TrackEnsemble::new(Basin::NorthAtlantic, members).unwrap()
}

fn config(n_years: usize, iterations: usize, seed: u64) -> EngineConfig {
    EngineConfigBuilder::new(Basin::NorthAtlantic, 1.0)
        .n_years(n_years)
        .iterations(iterations)
        .reference_years(1980, 2021)
        .seed(seed)
        .build()
        .unwrap()
}

#[test]
fn test_single_storm_single_observation() {
    let member = member_passing_over(0, 285.0, 20.0, &[(2000, 40.0)]);
    let ensemble = TrackEnsemble::new(Basin::NorthAtlantic, vec![member]).unwrap();
    let locations = vec![target()];
    let config = config(2000, 1, 0);
    let engine = ReturnPeriodEngine::new(&config, &ensemble, &locations).unwrap();

    // The storm year is drawn once; every other draw lands on an empty year
    let mut draws = vec![Draw {
        member: MemberIndex(0),
        year: 2000,
    }];
    draws.extend(std::iter::repeat_n(
        Draw {
            member: MemberIndex(0),
            year: 1999,
        },
        1999,
    ));
    let sample = engine.sampler().pool(draws);
    assert_eq!(sample.storms.len(), 1);

    let result = engine.evaluate_sample(0, &sample);
    let (location_index, curve) = &result.curves[0];
    assert_eq!(*location_index, 0);

    let curve = curve.as_ref().expect("storm passes over the target");
    let (bin, years) = curve.nearest_bin(40.0).unwrap();
    assert_eq!(bin, 40.0);
    assert_eq!(years, 4000.0);
}

#[test]
fn test_full_run_shapes_and_bands() {
    let ensemble = yearly_ensemble();
    let locations = vec![
        target(),
        Location::new("Lisbon", "PRT", Basin::NorthAtlantic, -9.14, 38.72),
        Location::new("Manila", "PHL", Basin::WesternPacific, 120.98, 14.6),
    ];
    let config = config(20, 8, 3);
    let engine = ReturnPeriodEngine::new(&config, &ensemble, &locations).unwrap();

    let result = engine.run();
    assert_eq!(result.seed, 3);
    assert_eq!(result.locations.len(), 1);

    let target = &result.locations[0];
    assert_eq!(target.location.name, "Target");
    assert_eq!(target.table.wind_bins, config.wind_bins);
    assert_eq!(target.table.iterations(), 8);
    assert_eq!(target.table.curve_count(), 8);
    assert_eq!(target.climatology.rows.len(), config.wind_bins.len());

    for row in &target.climatology.rows {
        let mean = row.mean.expect("every bin is estimable");
        assert!(mean > 0.0 && mean <= 42.0, "bin {}: mean {mean}", row.wind_speed);
        if let Some(low) = row.band_low {
            assert!(low <= mean);
        }
        if let Some(high) = row.band_high {
            assert!(high >= mean);
        }
    }

    let diag = &result.diagnostics;
    assert_eq!(diag.iterations, 8);
    assert_eq!(diag.draws, 160);
    assert_eq!(diag.pooled_storms, 160);
    assert!(diag.distinct_storms <= diag.pooled_storms);
    assert_eq!(diag.curves, 8);
    assert_eq!(diag.empty_exposures, 8);
    assert_eq!(diag.implausible_clamped, 0);
    assert_eq!(diag.unexposed_locations, vec!["Lisbon".to_string()]);
    assert_eq!(diag.estimated_years.len(), 8);
}

#[test]
fn test_long_climatology_clamps_rare_bins() {
    let ensemble = yearly_ensemble();
    let locations = vec![target()];
    let config = config(2000, 3, 5);
    let engine = ReturnPeriodEngine::new(&config, &ensemble, &locations).unwrap();

    let result = engine.run();
    let climatology = &result.locations[0].climatology;

    // Beyond the strongest wind every iteration reports hundreds of years
    let rare = climatology.row(85.0).unwrap();
    assert_eq!(rare.mean, None);
    assert_eq!(rare.std, None);
    assert_eq!(rare.band_low, None);
    assert_eq!(rare.band_high, None);

    let common = climatology.row(20.0).unwrap();
    assert!(common.mean.is_some());
    assert!(result.diagnostics.implausible_clamped > 0);
}

#[test]
fn test_iterations_without_exposure_leave_empty_columns() {
    // Storms exist in 1980 only, so many iterations never draw them
    let member = member_passing_over(0, 285.0, 20.0, &[(1980, 30.0), (1980, 45.0)]);
    let ensemble = TrackEnsemble::new(Basin::NorthAtlantic, vec![member]).unwrap();
    let locations = vec![target()];
    let config = config(40, 12, 99);
    let engine = ReturnPeriodEngine::new(&config, &ensemble, &locations).unwrap();

    let result = engine.run();
    let diag = &result.diagnostics;
    assert_eq!(diag.curves + diag.empty_exposures, 12);

    if let Some(target) = result.locations.first() {
        let mut empty_columns = 0;
        for run in &target.table.runs {
            let present = run.iter().filter(|v| v.is_some()).count();
            assert!(present == 0 || present == run.len());
            if present == 0 {
                empty_columns += 1;
            }
        }
        assert_eq!(empty_columns as u64, diag.empty_exposures);
    } else {
        assert_eq!(diag.unexposed_locations, vec!["Target".to_string()]);
    }
}

#[test]
fn test_basin_mismatch_rejected() {
    let ensemble = yearly_ensemble();
    let locations = vec![target()];
    let config = EngineConfigBuilder::new(Basin::WesternPacific, 26.0)
        .build()
        .unwrap();

    let err = ReturnPeriodEngine::new(&config, &ensemble, &locations).unwrap_err();
    assert!(matches!(
        err,
        EngineError::Config(ConfigError::InvalidValue { field: "basin", .. })
    ));
}
