//! Autocorrelation of an irregularly sampled light curve.
//!
//! Steps:
//! 1. place the mean-subtracted flux on a regular grid of spacing `interval`
//!    (cells with no observation stay at zero, so gaps contribute nothing)
//! 2. normalized autocorrelation, lag 0 = 1
//! 3. truncated Gaussian smoothing with width `smooth` (in samples)

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{LightCurve, SampledCurve};
use crate::error::PeriodError;
use crate::math::mean;

/// Kepler/K2 long cadence in days.
pub const KEPLER_CADENCE: f64 = 0.02043365;
/// TESS 2-minute cadence in days.
pub const TESS_CADENCE: f64 = 0.00138889;

/// Refuse regular grids larger than this many cells.
const MAX_GRID_LEN: usize = 50_000_000;

/// Gaussian kernel half-width in units of its standard deviation.
const KERNEL_TRUNCATE: f64 = 4.0;

/// Settings for the autocorrelation estimator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcfConfig {
    /// Spacing of the regular grid (days).
    pub interval: f64,
    /// Gaussian smoothing width in samples (0 disables smoothing).
    pub smooth: f64,
    /// Peaks at lags `<= cutoff` (days) are ignored.
    pub cutoff: f64,
    /// Longest lag to compute (days). Defaults to half the baseline.
    pub max_lag: Option<f64>,
}

impl Default for AcfConfig {
    fn default() -> Self {
        Self::kepler()
    }
}

impl AcfConfig {
    pub fn kepler() -> Self {
        Self {
            interval: KEPLER_CADENCE,
            smooth: 9.0,
            cutoff: 0.0,
            max_lag: None,
        }
    }

    pub fn tess() -> Self {
        Self {
            interval: TESS_CADENCE,
            ..Self::kepler()
        }
    }

    pub fn validate(&self) -> Result<(), PeriodError> {
        if !(self.interval.is_finite() && self.interval > 0.0) {
            return Err(PeriodError::InvalidConfig(format!(
                "ACF interval must be finite and > 0 (got {})",
                self.interval
            )));
        }
        if !(self.smooth.is_finite() && self.smooth >= 0.0) {
            return Err(PeriodError::InvalidConfig(format!(
                "ACF smoothing width must be finite and >= 0 (got {})",
                self.smooth
            )));
        }
        if !self.cutoff.is_finite() {
            return Err(PeriodError::InvalidConfig("ACF cutoff must be finite".to_string()));
        }
        if let Some(max_lag) = self.max_lag {
            if !(max_lag.is_finite() && max_lag > 0.0) {
                return Err(PeriodError::InvalidConfig(format!(
                    "ACF max_lag must be finite and > 0 (got {max_lag})"
                )));
            }
        }
        Ok(())
    }
}

/// Smoothed autocorrelation curve `(lag, correlation)` of `lc`.
pub fn autocorrelation(lc: &LightCurve, config: &AcfConfig) -> Result<SampledCurve, PeriodError> {
    config.validate()?;

    let regular = regularize(lc, config.interval)?;
    let n = regular.len();
    let max_lag_samples = config
        .max_lag
        .map(|lag| (lag / config.interval).round() as usize)
        .unwrap_or(n / 2)
        .min(n - 1);

    let mut acf = correlate(&regular, max_lag_samples);
    if config.smooth > 0.0 {
        acf = gaussian_smooth(&acf, config.smooth);
    }

    let lags = (0..acf.len()).map(|k| k as f64 * config.interval).collect();
    debug!(grid_len = n, lags = acf.len(), "autocorrelation computed");
    SampledCurve::new(lags, acf)
}

/// Mean-subtracted flux on a regular grid; cells with several observations hold their average.
fn regularize(lc: &LightCurve, interval: f64) -> Result<Vec<f64>, PeriodError> {
    let time = lc.time();
    let flux = lc.flux();
    let t0 = time[0];
    let cells = (lc.baseline() / interval).round();
    if !(cells.is_finite() && cells < MAX_GRID_LEN as f64) {
        return Err(PeriodError::InvalidConfig(format!(
            "ACF interval {interval} is too fine for a {} day baseline",
            lc.baseline()
        )));
    }
    let n = cells as usize + 1;
    let mu = mean(flux).unwrap_or(0.0);

    let mut sum = vec![0.0; n];
    let mut count = vec![0usize; n];
    for (&t, &x) in time.iter().zip(flux.iter()) {
        let idx = (((t - t0) / interval).round() as usize).min(n - 1);
        sum[idx] += x - mu;
        count[idx] += 1;
    }

    Ok(sum
        .iter()
        .zip(count.iter())
        .map(|(&s, &c)| if c > 0 { s / c as f64 } else { 0.0 })
        .collect())
}

/// Normalized autocorrelation for lags `0..=max_lag`. All zeros when the series has no power.
fn correlate(y: &[f64], max_lag: usize) -> Vec<f64> {
    let n = y.len();
    let power: f64 = y.iter().map(|v| v * v).sum();
    if power <= 0.0 {
        return vec![0.0; max_lag + 1];
    }
    (0..=max_lag)
        .into_par_iter()
        .map(|lag| {
            let c: f64 = y[..n - lag].iter().zip(&y[lag..]).map(|(a, b)| a * b).sum();
            c / power
        })
        .collect()
}

/// Gaussian filter with reflected edges.
fn gaussian_smooth(y: &[f64], sigma: f64) -> Vec<f64> {
    let radius = (KERNEL_TRUNCATE * sigma).ceil() as isize;
    let kernel: Vec<f64> = (-radius..=radius)
        .map(|k| (-0.5 * (k as f64 / sigma).powi(2)).exp())
        .collect();
    let norm: f64 = kernel.iter().sum();

    let n = y.len() as isize;
    (0..n)
        .map(|i| {
            let acc: f64 = kernel
                .iter()
                .enumerate()
                .map(|(k, w)| w * y[reflect(i + k as isize - radius, n)])
                .sum();
            acc / norm
        })
        .collect()
}

/// Mirror an out-of-range index back into `0..n` (`d c b a | a b c d | d c b a`).
fn reflect(mut i: isize, n: isize) -> usize {
    let period = 2 * n;
    i = i.rem_euclid(period);
    if i >= n {
        i = period - 1 - i;
    }
    i as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn zero_lag_is_one_without_smoothing() {
        let t: Vec<f64> = (0..200).map(|i| i as f64 * 0.1).collect();
        let x = t.iter().map(|&ti| (2.0 * PI * ti / 3.0).sin()).collect();
        let lc = LightCurve::without_errors(t, x).unwrap();
        let config = AcfConfig {
            interval: 0.1,
            smooth: 0.0,
            cutoff: 0.0,
            max_lag: Some(8.0),
        };
        let curve = autocorrelation(&lc, &config).unwrap();
        assert!((curve.y[0] - 1.0).abs() < 1e-12);
        assert_eq!(curve.len(), 81);
        assert!((curve.x[30] - 3.0).abs() < 1e-9);
        // One full period later the correlation is strongly positive again.
        assert!(curve.y[30] > 0.8);
        assert!(curve.y[15] < -0.8);
    }

    #[test]
    fn smoothing_preserves_constant_series() {
        let smoothed = gaussian_smooth(&[2.0; 25], 3.0);
        assert!(smoothed.iter().all(|v| (v - 2.0).abs() < 1e-12));
    }

    #[test]
    fn reflect_mirrors_edges() {
        assert_eq!(reflect(-1, 5), 0);
        assert_eq!(reflect(-2, 5), 1);
        assert_eq!(reflect(5, 5), 4);
        assert_eq!(reflect(6, 5), 3);
        assert_eq!(reflect(2, 5), 2);
    }

    #[test]
    fn gaps_are_zero_filled() {
        let lc = LightCurve::without_errors(vec![0.0, 1.0, 4.0], vec![1.0, 2.0, 3.0]).unwrap();
        let regular = regularize(&lc, 1.0).unwrap();
        assert_eq!(regular, vec![-1.0, 0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn invalid_interval_is_rejected() {
        let lc = LightCurve::without_errors(vec![0.0, 1.0, 2.0], vec![1.0, 2.0, 3.0]).unwrap();
        let config = AcfConfig {
            interval: 0.0,
            ..AcfConfig::kepler()
        };
        assert!(matches!(autocorrelation(&lc, &config), Err(PeriodError::InvalidConfig(_))));
    }
}
