//! Empirical return periods from ranked storm-maximum winds
//!
//! For `n` observations over a climatology of `n_years`, the `k`-th highest
//! wind has exceedance probability `p_k` from the plotting position, an
//! annual exceedance rate `r_k = p_k * n / n_years`, and a return period
//! `T_k = 1 / r_k`. Reporting bins are read off the resulting table by linear
//! interpolation, clamped to the end values outside the observed range.

use serde::{Deserialize, Serialize};

use crate::config::{EngineConfig, PlottingPosition};
use crate::model::ReturnPeriodCurve;

/// `(wind_speed, return_period)` pairs sorted by ascending wind speed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmpiricalCurve {
    points: Vec<(f64, f64)>,
}

impl EmpiricalCurve {
    #[must_use]
    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    /// Linear interpolation of the return period at `wind_speed`.
    ///
    /// Below the weakest observation the weakest return period is used, and
    /// above the strongest the strongest; there is no extrapolation.
    #[must_use]
    pub fn interpolate(&self, wind_speed: f64) -> f64 {
        let points = &self.points;
        let (first_w, first_t) = points[0];
        let (last_w, last_t) = points[points.len() - 1];

        if wind_speed <= first_w {
            return first_t;
        }
        if wind_speed >= last_w {
            return last_t;
        }

        // First point strictly above `wind_speed`; the one before it is <=
        let upper = points.partition_point(|&(w, _)| w <= wind_speed);
        let (w0, t0) = points[upper - 1];
        let (w1, t1) = points[upper];
        t0 + (t1 - t0) * (wind_speed - w0) / (w1 - w0)
    }
}

/// 1-based ranks of values already sorted in descending order. Tied values
/// all receive the mean of the positions they occupy.
fn descending_ranks(sorted_desc: &[f64]) -> Vec<f64> {
    let mut ranks = Vec::with_capacity(sorted_desc.len());
    let mut start = 0;
    while start < sorted_desc.len() {
        let mut end = start + 1;
        while end < sorted_desc.len() && sorted_desc[end] == sorted_desc[start] {
            end += 1;
        }
        // Mean of positions start+1 ..= end
        let rank = (start + 1 + end) as f64 / 2.0;
        ranks.extend(std::iter::repeat_n(rank, end - start));
        start = end;
    }
    ranks
}

/// Rank-based return-period estimator
#[derive(Debug, Clone, Copy)]
pub struct ExtremeValueEstimator {
    n_years: f64,
    plotting_position: PlottingPosition,
}

impl ExtremeValueEstimator {
    #[must_use]
    pub fn new(config: &EngineConfig) -> Self {
        Self::with_length(config.n_years, config.plotting_position)
    }

    #[must_use]
    pub fn with_length(n_years: usize, plotting_position: PlottingPosition) -> Self {
        Self {
            n_years: n_years as f64,
            plotting_position,
        }
    }

    /// Empirical return-period table, or `None` when there is nothing to
    /// rank.
    #[must_use]
    pub fn empirical_curve(&self, winds: &[f64]) -> Option<EmpiricalCurve> {
        let mut sorted: Vec<f64> = winds.iter().copied().filter(|w| w.is_finite()).collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(|a, b| b.total_cmp(a));

        let n = sorted.len();
        let ranks = descending_ranks(&sorted);

        let mut points: Vec<(f64, f64)> = sorted
            .iter()
            .zip(ranks)
            .map(|(&wind, rank)| {
                let p = self.plotting_position.exceedance_probability(rank, n);
                // 1 / r_k with r_k = p * n / n_years
                (wind, self.n_years / (p * n as f64))
            })
            .collect();
        points.reverse();

        Some(EmpiricalCurve { points })
    }

    /// Return period at every bin in `wind_bins`, or `None` when there are no
    /// observations to estimate from.
    #[must_use]
    pub fn estimate(&self, winds: &[f64], wind_bins: &[f64]) -> Option<ReturnPeriodCurve> {
        let curve = self.empirical_curve(winds)?;
        Some(ReturnPeriodCurve {
            values: wind_bins
                .iter()
                .map(|&w| (w, curve.interpolate(w)))
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_WIND_BINS;

    fn estimator(n_years: usize) -> ExtremeValueEstimator {
        ExtremeValueEstimator::with_length(n_years, PlottingPosition::Weibull)
    }

    #[test]
    fn test_single_observation_is_twice_the_length() {
        let est = estimator(2000);
        let curve = est.empirical_curve(&[40.0]).unwrap();
        assert_eq!(curve.points(), &[(40.0, 4000.0)]);

        let binned = est.estimate(&[40.0], &DEFAULT_WIND_BINS).unwrap();
        assert!(binned.return_periods().all(|t| t == 4000.0));
    }

    #[test]
    fn test_known_ranks() {
        // n = 3 over 30 years: T_k = 30 * 4 / (3k)
        let curve = estimator(30).empirical_curve(&[25.0, 45.0, 35.0]).unwrap();
        let expected = [(25.0, 40.0 / 3.0), (35.0, 20.0), (45.0, 40.0)];
        for ((w, t), (ew, et)) in curve.points().iter().zip(expected) {
            assert_eq!(*w, ew);
            assert!((t - et).abs() < 1e-9, "wind {w}: expected {et}, got {t}");
        }
    }

    #[test]
    fn test_ties_share_rank() {
        assert_eq!(descending_ranks(&[50.0, 40.0, 40.0, 30.0]), vec![1.0, 2.5, 2.5, 4.0]);
        assert_eq!(descending_ranks(&[20.0, 20.0, 20.0]), vec![2.0, 2.0, 2.0]);

        let curve = estimator(100).empirical_curve(&[40.0, 50.0, 40.0]).unwrap();
        let tied: Vec<f64> = curve
            .points()
            .iter()
            .filter(|(w, _)| *w == 40.0)
            .map(|(_, t)| *t)
            .collect();
        assert_eq!(tied.len(), 2);
        assert_eq!(tied[0], tied[1]);
    }

    #[test]
    fn test_table_sorted_and_monotone() {
        let winds = [33.0, 18.5, 61.2, 27.0, 27.0, 45.3, 19.9, 52.8, 33.0, 70.1];
        let curve = estimator(2000).empirical_curve(&winds).unwrap();
        let points = curve.points();

        assert_eq!(points.len(), winds.len());
        for pair in points.windows(2) {
            assert!(pair[0].0 <= pair[1].0, "winds not ascending: {pair:?}");
            assert!(pair[0].1 <= pair[1].1, "return periods decrease: {pair:?}");
        }
    }

    #[test]
    fn test_interpolated_values_positive() {
        let winds = [21.0, 24.5, 30.0, 38.0, 38.0, 55.0];
        let curve = estimator(500).estimate(&winds, &DEFAULT_WIND_BINS).unwrap();

        assert_eq!(curve.values.len(), DEFAULT_WIND_BINS.len());
        assert!(curve.return_periods().all(|t| t > 0.0 && t.is_finite()));
    }

    #[test]
    fn test_interpolation_clamps_and_blends() {
        let curve = estimator(30).empirical_curve(&[25.0, 45.0, 35.0]).unwrap();

        assert!((curve.interpolate(10.0) - 40.0 / 3.0).abs() < 1e-9);
        assert_eq!(curve.interpolate(99.0), 40.0);
        assert_eq!(curve.interpolate(35.0), 20.0);
        // Halfway between 35 (20 yr) and 45 (40 yr)
        assert!((curve.interpolate(40.0) - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_observations() {
        let est = estimator(2000);
        assert!(est.empirical_curve(&[]).is_none());
        assert!(est.estimate(&[], &DEFAULT_WIND_BINS).is_none());
    }
}
