//! Synthetic sinusoidal light curves.
//!
//! Used by `spot demo` and by the regression tests. Generation is seeded, so
//! the same config always yields the same light curve.

use std::f64::consts::PI;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::domain::LightCurve;
use crate::error::PeriodError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntheticConfig {
    /// Rotation period (days).
    pub period: f64,
    pub amplitude: f64,
    /// Standard deviation of the white noise added to the flux.
    pub noise: f64,
    pub n_points: usize,
    /// Observations are evenly spaced on `[0, t_max]` (days).
    pub t_max: f64,
    pub seed: u64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            period: 10.0,
            amplitude: 1.0,
            noise: 1e-2,
            n_points: 1000,
            t_max: 100.0,
            seed: 42,
        }
    }
}

/// `amplitude · sin(2πt / period) + noise`, sampled evenly on `[0, t_max]`.
///
/// Flux uncertainties are set to the noise level.
pub fn generate_light_curve(config: &SyntheticConfig) -> Result<LightCurve, PeriodError> {
    if !(config.period.is_finite() && config.period > 0.0) {
        return Err(PeriodError::InvalidPeriod(config.period));
    }
    if config.n_points < 2 {
        return Err(PeriodError::InvalidConfig("synthetic light curve needs >= 2 points".to_string()));
    }
    if !(config.t_max.is_finite() && config.t_max > 0.0) {
        return Err(PeriodError::InvalidConfig(format!(
            "synthetic t_max must be finite and > 0 (got {})",
            config.t_max
        )));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let normal = Normal::new(0.0, config.noise.abs())
        .map_err(|e| PeriodError::InvalidConfig(format!("noise distribution error: {e}")))?;

    let step = config.t_max / (config.n_points as f64 - 1.0);
    let time: Vec<f64> = (0..config.n_points).map(|i| i as f64 * step).collect();
    let flux = time
        .iter()
        .map(|&t| config.amplitude * (2.0 * PI * t / config.period).sin() + normal.sample(&mut rng))
        .collect();
    let flux_err = vec![config.noise.abs(); config.n_points];

    LightCurve::new(time, flux, flux_err)
}
