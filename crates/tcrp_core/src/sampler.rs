//! Monte Carlo resampling of storm years from the ensemble
//!
//! Each iteration draws `n_years` independent `(member, year)` pairs with
//! replacement and pools every storm of every drawn pair. A pair drawn twice
//! contributes its storms twice: the pool is a sample of `n_years` synthetic
//! years, and repeated years are part of that sample.

use std::ops::RangeInclusive;

use rand::{Rng, SeedableRng};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::model::{MemberIndex, Storm, StormKey, TrackEnsemble};

/// One drawn synthetic year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Draw {
    pub member: MemberIndex,
    pub year: i16,
}

/// A pooled storm occurrence, borrowed from the ensemble
#[derive(Debug, Clone, Copy)]
pub struct SampledStorm<'a> {
    pub key: StormKey,
    pub storm: &'a Storm,
}

/// Result of one resampling pass
#[derive(Debug, Clone)]
pub struct ResampledClimatology<'a> {
    /// Drawn pairs in draw order
    pub draws: Vec<Draw>,
    /// Every storm occurrence in draw order
    pub storms: Vec<SampledStorm<'a>>,
    /// Storms counted once regardless of how often their year was drawn
    pub distinct_storms: usize,
    /// `distinct_storms / storms_per_year`
    pub estimated_years: f64,
    /// Draws whose `(member, year)` held no storms
    pub empty_draws: usize,
}

/// Draws synthetic climatologies from an immutable ensemble
#[derive(Debug, Clone)]
pub struct TrackEnsembleSampler<'a> {
    ensemble: &'a TrackEnsemble,
    years: RangeInclusive<i16>,
    n_years: usize,
    storms_per_year: f64,
}

impl<'a> TrackEnsembleSampler<'a> {
    #[must_use]
    pub fn new(ensemble: &'a TrackEnsemble, config: &EngineConfig) -> Self {
        Self {
            ensemble,
            years: config.reference_period.year_range(),
            n_years: config.n_years,
            storms_per_year: config.storms_per_year,
        }
    }

    /// Draw `n` pairs uniformly at random, with replacement.
    pub fn draw_pairs<R: Rng + ?Sized>(&self, rng: &mut R, n: usize) -> Vec<Draw> {
        let members = self.ensemble.member_count();
        (0..n)
            .map(|_| Draw {
                member: MemberIndex(rng.random_range(0..members)),
                year: rng.random_range(self.years.clone()),
            })
            .collect()
    }

    /// Draw a full climatology of `n_years` pairs.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> ResampledClimatology<'a> {
        let draws = self.draw_pairs(rng, self.n_years);
        self.pool(draws)
    }

    /// Reproducible variant of [`sample`](Self::sample).
    #[must_use]
    pub fn sample_seeded(&self, seed: u64) -> ResampledClimatology<'a> {
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        self.sample(&mut rng)
    }

    /// Collect the storms of already-drawn pairs.
    #[must_use]
    pub fn pool(&self, draws: Vec<Draw>) -> ResampledClimatology<'a> {
        let mut storms = Vec::new();
        let mut distinct: FxHashSet<StormKey> = FxHashSet::default();
        let mut empty_draws = 0;

        for draw in &draws {
            let Some(member) = self.ensemble.member(draw.member) else {
                empty_draws += 1;
                continue;
            };
            let before = storms.len();
            for storm in member.storms_in_year(draw.year) {
                let key = member.storm_key(storm);
                distinct.insert(key);
                storms.push(SampledStorm { key, storm });
            }
            if storms.len() == before {
                empty_draws += 1;
            }
        }

        let distinct_storms = distinct.len();
        ResampledClimatology {
            draws,
            storms,
            distinct_storms,
            estimated_years: distinct_storms as f64 / self.storms_per_year,
            empty_draws,
        }
    }
}
