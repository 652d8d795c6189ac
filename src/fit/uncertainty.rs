//! Period uncertainty from a Gaussian fit to the dispersion profile.
//!
//! The grid minimum of Φ is resolution-limited. We fit
//!
//! ```text
//! Φ̂(P) = b + a·exp(−(P − μ)² / (2σ²))      (a < 0 for a dip)
//! ```
//!
//! by Levenberg–Marquardt and report `μ ± |σ|`.
//!
//! By default the whole defined profile is used, not just the points around
//! the minimum. `FitOptions::window` restricts the fit to a neighbourhood of
//! the grid minimum instead.
//!
//! When the solver fails the estimate is downgraded to the grid minimum with
//! an infinite error bar rather than failing the whole PDM run.

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::{
    DispersionProfile, EstimateQuality, GaussianParams, Method, PeriodEstimate, SampledCurve,
};
use crate::error::PeriodError;
use crate::math::{median_mut, solve_least_squares};
use crate::models::{PARAM_LEN, evaluate, fill_jacobian_row};

/// Need more points than parameters for a meaningful fit.
const MIN_POINTS: usize = PARAM_LEN + 1;

const LAMBDA_INIT: f64 = 1e-3;
const LAMBDA_MIN: f64 = 1e-12;
/// Beyond this damping no step can lower the cost: we are at a stationary point.
const LAMBDA_MAX: f64 = 1e16;

/// Floor for Jacobian column scales so zero columns stay solvable.
const SCALE_FLOOR: f64 = 1e-12;

/// A fitted dip shallower than this fraction of the baseline `|b|` is flat.
const MIN_RELATIVE_DEPTH: f64 = 1e-4;

/// Solver settings for the Gaussian profile fit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitOptions {
    /// Upper bound on accepted Levenberg–Marquardt steps.
    pub max_iterations: usize,
    /// Converged once an accepted step lowers the SSE by less than this
    /// fraction of the current SSE.
    pub tolerance: f64,
    /// Restrict the fit to periods within `window × (grid span)` of the grid
    /// minimum. `None` fits the whole profile.
    pub window: Option<f64>,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            max_iterations: 200,
            tolerance: 1e-10,
            window: None,
        }
    }
}

impl FitOptions {
    pub fn validate(&self) -> Result<(), PeriodError> {
        if self.max_iterations == 0 {
            return Err(PeriodError::InvalidConfig(
                "fit max_iterations must be >= 1".to_string(),
            ));
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(PeriodError::InvalidConfig(format!(
                "fit tolerance must be finite and > 0 (got {})",
                self.tolerance
            )));
        }
        if let Some(w) = self.window {
            if !(w.is_finite() && w > 0.0) {
                return Err(PeriodError::InvalidConfig(format!(
                    "fit window must be finite and > 0 (got {w})"
                )));
            }
        }
        Ok(())
    }
}

/// Converged Gaussian fit.
#[derive(Debug, Clone, PartialEq)]
pub struct GaussianFit {
    pub params: GaussianParams,
    pub iterations: usize,
    pub sse: f64,
}

/// Fit the inverted Gaussian to `curve`, starting from a dip at `center`.
pub fn fit_inverted_gaussian(
    curve: &SampledCurve,
    center: f64,
    opts: &FitOptions,
) -> Result<GaussianFit, PeriodError> {
    opts.validate()?;

    let (x, y) = select_points(curve, center, opts.window);
    if x.len() < MIN_POINTS {
        return Err(PeriodError::CurveTooShort {
            min: MIN_POINTS,
            got: x.len(),
        });
    }
    let n = x.len();

    let mut params = initial_guess(&x, &y, center);
    let mut cost = sse(&params, &x, &y);
    if !cost.is_finite() {
        return Err(PeriodError::FitDidNotConverge { iterations: 0 });
    }

    // Augmented system [J; √λ·D] δ = [r; 0]. The bottom rows are rewritten
    // for every damping trial.
    let mut jac = DMatrix::<f64>::zeros(n + PARAM_LEN, PARAM_LEN);
    let mut rhs = DVector::<f64>::zeros(n + PARAM_LEN);
    let mut row = [0.0; PARAM_LEN];
    let mut lambda = LAMBDA_INIT;
    let mut accepted = 0usize;

    for iter in 1..=opts.max_iterations {
        let mut scale = [0.0; PARAM_LEN];
        for i in 0..n {
            fill_jacobian_row(&params, x[i], &mut row);
            for k in 0..PARAM_LEN {
                jac[(i, k)] = row[k];
                scale[k] += row[k] * row[k];
            }
            rhs[i] = y[i] - evaluate(&params, x[i]);
        }
        let scale = scale.map(|s| s.sqrt().max(SCALE_FLOOR));

        loop {
            let root = lambda.sqrt();
            for k in 0..PARAM_LEN {
                jac[(n + k, k)] = root * scale[k];
            }

            let trial = solve_least_squares(&jac, &rhs)
                .map(|step| {
                    let mut p = params.to_array();
                    for k in 0..PARAM_LEN {
                        p[k] += step[k];
                    }
                    GaussianParams::from_array(&p)
                })
                .filter(|p| p.is_finite() && p.sigma != 0.0)
                .map(|p| (p, sse(&p, &x, &y)))
                .filter(|(_, c)| c.is_finite() && *c < cost);

            match trial {
                Some((p, c)) => {
                    let reduction = cost - c;
                    accepted += 1;
                    params = p;
                    cost = c;
                    lambda = (lambda / 10.0).max(LAMBDA_MIN);
                    if reduction <= opts.tolerance * cost {
                        return Ok(finish(params, iter, cost));
                    }
                    break;
                }
                None => {
                    lambda *= 10.0;
                    if lambda > LAMBDA_MAX {
                        // Stuck at the initial guess: nothing was fitted.
                        if accepted == 0 {
                            return Err(PeriodError::FitDidNotConverge { iterations: iter });
                        }
                        return Ok(finish(params, iter, cost));
                    }
                }
            }
        }
    }

    Err(PeriodError::FitDidNotConverge {
        iterations: opts.max_iterations,
    })
}

fn finish(params: GaussianParams, iterations: usize, sse: f64) -> GaussianFit {
    debug!(
        mu = params.mu,
        sigma = params.sigma,
        a = params.a,
        b = params.b,
        iterations,
        sse,
        "gaussian profile fit converged"
    );
    GaussianFit {
        params,
        iterations,
        sse,
    }
}

/// Turn the grid minimum of `profile` into a PDM period estimate.
///
/// Returns `Ok(None)` when the profile has no defined value at all. Solver
/// failures are not errors: the estimate falls back to the grid minimum with
/// an infinite uncertainty and `EstimateQuality::GridResolution`.
pub fn estimate_period(
    profile: &DispersionProfile,
    opts: &FitOptions,
) -> Result<Option<PeriodEstimate>, PeriodError> {
    opts.validate()?;
    let Some(grid_period) = profile.best_period() else {
        return Ok(None);
    };

    let curve = profile.defined_curve();
    let fitted = fit_inverted_gaussian(&curve, grid_period, opts)
        .and_then(|fit| check_dip(&curve, grid_period, opts.window, fit));
    let estimate = match fitted {
        Ok(fit) => {
            let err = fit.params.sigma.abs();
            PeriodEstimate {
                method: Method::Pdm,
                period: fit.params.mu,
                lower_error: Some(err),
                upper_error: Some(err),
                quality: EstimateQuality::Fitted {
                    params: fit.params,
                    iterations: fit.iterations,
                    sse: fit.sse,
                },
            }
        }
        Err(e) => {
            warn!(grid_period, error = %e, "uncertainty fit failed; using grid minimum");
            PeriodEstimate {
                method: Method::Pdm,
                period: grid_period,
                lower_error: Some(f64::INFINITY),
                upper_error: Some(f64::INFINITY),
                quality: EstimateQuality::GridResolution {
                    grid_period,
                    reason: e.to_string(),
                },
            }
        }
    };

    Ok(Some(estimate))
}

/// Reject fits that are not a dip inside the fitted period range.
fn check_dip(
    curve: &SampledCurve,
    center: f64,
    window: Option<f64>,
    fit: GaussianFit,
) -> Result<GaussianFit, PeriodError> {
    let GaussianParams { a, b, mu, .. } = fit.params;
    if a >= -MIN_RELATIVE_DEPTH * b.abs().max(f64::MIN_POSITIVE) {
        return Err(PeriodError::NoDip(format!("amplitude a = {a:.3e} is not a dip below b = {b:.3e}")));
    }

    let (x, _) = select_points(curve, center, window);
    let (lo, hi) = x
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    if !(lo..=hi).contains(&mu) {
        return Err(PeriodError::NoDip(format!("centre {mu:.4} outside fitted range [{lo:.4}, {hi:.4}]")));
    }
    Ok(fit)
}

fn select_points(curve: &SampledCurve, center: f64, window: Option<f64>) -> (Vec<f64>, Vec<f64>) {
    let Some(frac) = window else {
        return (curve.x.clone(), curve.y.clone());
    };
    let (lo, hi) = curve
        .x
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    let half = frac * (hi - lo);
    curve
        .x
        .iter()
        .zip(curve.y.iter())
        .filter(|(x, _)| (**x - center).abs() <= half)
        .map(|(x, y)| (*x, *y))
        .unzip()
}

/// Starting point: dip depth from the median level, width from the half-depth crossing.
fn initial_guess(x: &[f64], y: &[f64], center: f64) -> GaussianParams {
    let i0 = x
        .iter()
        .enumerate()
        .min_by(|a, b| (a.1 - center).abs().total_cmp(&(b.1 - center).abs()))
        .map(|(i, _)| i)
        .unwrap_or(0);

    let mut sorted = y.to_vec();
    let b = median_mut(&mut sorted).unwrap_or(y[i0]);
    let mut a = y[i0] - b;
    if a >= 0.0 {
        a = -1e-6;
    }

    let level = b + 0.5 * a;
    let left = (0..i0).rev().find(|&j| y[j] >= level).map(|j| x[i0] - x[j]);
    let right = ((i0 + 1)..x.len()).find(|&j| y[j] >= level).map(|j| x[j] - x[i0]);
    let span = x[x.len() - 1] - x[0];
    let half_width = match (left, right) {
        (Some(l), Some(r)) => 0.5 * (l + r),
        (Some(w), None) | (None, Some(w)) => w,
        (None, None) => 0.25 * span.abs(),
    };
    let hwhm_to_sigma = (2.0 * std::f64::consts::LN_2).sqrt();
    let mut sigma = half_width.abs() / hwhm_to_sigma;
    if !(sigma.is_finite() && sigma > 0.0) {
        sigma = 1.0;
    }

    GaussianParams {
        a,
        b,
        mu: x[i0],
        sigma,
    }
}

fn sse(p: &GaussianParams, x: &[f64], y: &[f64]) -> f64 {
    x.iter()
        .zip(y.iter())
        .map(|(&xi, &yi)| {
            let r = yi - evaluate(p, xi);
            r * r
        })
        .sum()
}
