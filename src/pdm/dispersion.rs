//! Binned phase-dispersion statistic Φ.
//!
//! For one trial period P:
//!
//! ```text
//! sj²_j = (1/n_j) Σ (x_i − mean_j)²                 per phase bin
//! s²(P) = Σ_j (n_j − 1)·sj²_j / (Σ_j n_j − M)       M = occupied bins
//! σ²    = (1/N) Σ (x_i − mean)²                      unfolded flux
//! Φ(P)  = s²(P) / σ²
//! ```
//!
//! Φ is undefined (`None`) when the pooled denominator is ≤ 0 or the flux has
//! zero total variance.

use serde::{Deserialize, Serialize};

use crate::error::PeriodError;
use crate::math::{mean, population_variance, variance_about};
use crate::pdm::phase::fold;

/// Summary of one phase bin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseBin {
    pub count: usize,
    /// Mean flux in the bin (`None` for an empty bin).
    pub mean: Option<f64>,
    /// Population variance about the bin mean (0 for bins with < 2 points).
    pub variance: f64,
}

/// Equal-width partition of `[0, 1)` with per-bin flux statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseBinning {
    /// `nbins + 1` bin edges from 0 to 1.
    pub edges: Vec<f64>,
    pub bins: Vec<PhaseBin>,
}

impl PhaseBinning {
    pub fn nbins(&self) -> usize {
        self.bins.len()
    }

    /// Number of bins holding at least one point.
    pub fn occupied(&self) -> usize {
        self.bins.iter().filter(|b| b.count > 0).count()
    }

    pub fn total_count(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }

    /// Bin centers (for plotting a binned phase curve).
    pub fn centers(&self) -> Vec<f64> {
        self.edges.windows(2).map(|w| 0.5 * (w[0] + w[1])).collect()
    }

    /// Pooled within-bin variance `s²`; `None` when undefined.
    pub fn pooled_variance(&self) -> Option<f64> {
        let numer: f64 = self
            .bins
            .iter()
            .filter(|b| b.count >= 2)
            .map(|b| (b.count - 1) as f64 * b.variance)
            .sum();
        let denom = self.total_count() as f64 - self.occupied() as f64;
        if denom <= 0.0 {
            return None;
        }
        Some(numer / denom)
    }
}

/// Bin `flux` by `phases` into `nbins` equal-width bins.
pub fn phase_bins(nbins: usize, phases: &[f64], flux: &[f64]) -> Result<PhaseBinning, PeriodError> {
    if nbins < 2 {
        return Err(PeriodError::TooFewBins(nbins));
    }
    if phases.len() != flux.len() {
        return Err(PeriodError::LengthMismatch {
            what: "flux",
            expected: phases.len(),
            got: flux.len(),
        });
    }

    let mut grouped: Vec<Vec<f64>> = vec![Vec::new(); nbins];
    for (&phase, &x) in phases.iter().zip(flux.iter()) {
        let j = ((phase * nbins as f64).floor() as usize).min(nbins - 1);
        grouped[j].push(x);
    }

    let bins = grouped
        .iter()
        .map(|values| {
            let mean = mean(values);
            PhaseBin {
                count: values.len(),
                mean,
                variance: mean.map_or(0.0, |m| variance_about(values, m)),
            }
        })
        .collect();

    let edges = (0..=nbins).map(|j| j as f64 / nbins as f64).collect();

    Ok(PhaseBinning { edges, bins })
}

/// Φ statistic for one trial period.
///
/// Returns `Ok(None)` when Φ is undefined at this period.
pub fn phi(nbins: usize, period: f64, time: &[f64], flux: &[f64]) -> Result<Option<f64>, PeriodError> {
    if let Some(index) = time.iter().position(|t| !t.is_finite()) {
        return Err(PeriodError::NonFiniteTime { index });
    }
    if let Some(index) = flux.iter().position(|x| !x.is_finite()) {
        return Err(PeriodError::NonFiniteFlux { index });
    }
    let total_variance = population_variance(flux);
    phi_with_total(nbins, period, time, flux, total_variance)
}

/// Φ with a precomputed total variance (shared across a grid search).
pub(crate) fn phi_with_total(
    nbins: usize,
    period: f64,
    time: &[f64],
    flux: &[f64],
    total_variance: f64,
) -> Result<Option<f64>, PeriodError> {
    let phases = fold(time, period)?;
    let binning = phase_bins(nbins, &phases, flux)?;
    if total_variance <= 0.0 {
        return Ok(None);
    }
    Ok(binning.pooled_variance().map(|s2| s2 / total_variance))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rand_distr::{Distribution, Normal};
    use std::f64::consts::PI;

    fn sinusoid(period: f64, noise: f64, seed: u64) -> (Vec<f64>, Vec<f64>) {
        let mut rng = StdRng::seed_from_u64(seed);
        let normal = Normal::new(0.0, 1.0).unwrap();
        let t: Vec<f64> = (0..1000).map(|i| 100.0 * i as f64 / 999.0).collect();
        let x = t
            .iter()
            .map(|&ti| (2.0 * PI * ti / period).sin() + noise * normal.sample(&mut rng))
            .collect();
        (t, x)
    }

    #[test]
    fn pooled_variance_of_noise_bins_is_one() {
        let mut rng = StdRng::seed_from_u64(42);
        let n = 10_000;
        let bins: Vec<PhaseBin> = (0..10)
            .map(|_| {
                let x: Vec<f64> = (0..n).map(|_| rand_distr::StandardNormal.sample(&mut rng)).collect();
                PhaseBin {
                    count: n,
                    mean: Some(0.0),
                    variance: variance_about(&x, 0.0),
                }
            })
            .collect();
        let binning = PhaseBinning {
            edges: (0..=10).map(|j| j as f64 / 10.0).collect(),
            bins,
        };
        assert_abs_diff_eq!(binning.pooled_variance().unwrap(), 1.0, epsilon = 0.01);
    }

    #[test]
    fn single_point_and_empty_bins_add_no_dispersion() {
        // Bin 0: {1, 3}, bin 1: {5}, bins 2-3 empty.
        let binning = phase_bins(4, &[0.1, 0.2, 0.3], &[1.0, 3.0, 5.0]).unwrap();
        assert_eq!(binning.occupied(), 2);
        assert_eq!(binning.bins[1].variance, 0.0);
        assert_eq!(binning.bins[2].mean, None);
        // (2 - 1) * 1.0 / (3 - 2)
        assert_abs_diff_eq!(binning.pooled_variance().unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn one_point_per_bin_is_undefined() {
        let binning = phase_bins(4, &[0.1, 0.3, 0.6, 0.9], &[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(binning.pooled_variance(), None);
        let value = phi(4, 1.0, &[0.1, 0.3, 0.6, 0.9], &[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(value, None);
    }

    #[test]
    fn constant_flux_is_undefined() {
        let t: Vec<f64> = (0..50).map(|i| i as f64).collect();
        let x = vec![1.0; 50];
        assert_eq!(phi(5, 7.0, &t, &x).unwrap(), None);
    }

    #[test]
    fn rejects_bad_inputs() {
        assert_eq!(phi(1, 2.0, &[0.0, 1.0], &[1.0, 2.0]), Err(PeriodError::TooFewBins(1)));
        assert_eq!(phi(4, 0.0, &[0.0, 1.0], &[1.0, 2.0]), Err(PeriodError::InvalidPeriod(0.0)));
        assert_eq!(
            phi(4, 2.0, &[0.0, 1.0], &[1.0, f64::INFINITY]),
            Err(PeriodError::NonFiniteFlux { index: 1 })
        );
    }

    #[test]
    fn nan_time_is_rejected_not_binned() {
        assert_eq!(
            phi(4, 2.0, &[0.0, f64::NAN, 2.0], &[1.0, 2.0, 3.0]),
            Err(PeriodError::NonFiniteTime { index: 1 })
        );
    }

    #[test]
    fn true_period_beats_harmonics() {
        let (t, x) = sinusoid(10.0, 1e-2, 7);
        let phi = |p| phi(10, p, &t, &x).unwrap().unwrap();
        let phi10 = phi(10.0);
        assert!(phi10 < phi(5.0));
        assert!(phi10 < phi(2.5));
        assert!(phi10 < phi(25.0));
        assert!(phi10 < 0.05, "phi(10) = {phi10}");
    }

    #[test]
    fn phi_matches_step_by_step_ratio() {
        let (t, x) = sinusoid(10.0, 1e-2, 11);
        for &p in &[2.5, 5.0, 10.0] {
            let phases = fold(&t, p).unwrap();
            let binning = phase_bins(10, &phases, &x).unwrap();
            let expected = binning.pooled_variance().unwrap() / population_variance(&x);
            assert_eq!(phi(10, p, &t, &x).unwrap(), Some(expected));
        }
    }

    #[test]
    fn folded_sinusoid_bin_means_reach_amplitude() {
        let (t, x) = sinusoid(10.0, 1e-2, 3);
        let phases = fold(&t, 10.0).unwrap();
        let binning = phase_bins(10, &phases, &x).unwrap();
        let max_mean = binning
            .bins
            .iter()
            .filter_map(|b| b.mean)
            .fold(f64::NEG_INFINITY, f64::max);
        assert_abs_diff_eq!(max_mean, 1.0, epsilon = 0.06);
    }
}
