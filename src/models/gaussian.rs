//! Gaussian bump model used to describe the dip of a dispersion profile.
//!
//! ```text
//! f(P) = b + a·exp(−(P − μ)² / (2σ²))
//! ```
//!
//! Sign convention: the model is fit to Φ directly, so a dip has `a < 0`.
//!
//! The fitter relies on two primitive operations, mirroring the linear
//! models: evaluate `f(P)` and fill the Jacobian row `∂f/∂(a, b, μ, σ)`.

use crate::domain::GaussianParams;

/// Number of free parameters `(a, b, μ, σ)`.
pub const PARAM_LEN: usize = 4;

impl GaussianParams {
    pub fn from_array(p: &[f64; PARAM_LEN]) -> Self {
        Self {
            a: p[0],
            b: p[1],
            mu: p[2],
            sigma: p[3],
        }
    }

    pub fn to_array(self) -> [f64; PARAM_LEN] {
        [self.a, self.b, self.mu, self.sigma]
    }

    pub fn is_finite(&self) -> bool {
        self.to_array().iter().all(|v| v.is_finite())
    }
}

/// Evaluate the model at `x`.
pub fn evaluate(p: &GaussianParams, x: f64) -> f64 {
    let z = (x - p.mu) / p.sigma;
    p.b + p.a * (-0.5 * z * z).exp()
}

/// Fill `∂f/∂(a, b, μ, σ)` at `x`.
pub fn fill_jacobian_row(p: &GaussianParams, x: f64, out: &mut [f64; PARAM_LEN]) {
    let d = x - p.mu;
    let s2 = p.sigma * p.sigma;
    let e = (-0.5 * d * d / s2).exp();
    out[0] = e;
    out[1] = 1.0;
    out[2] = p.a * e * d / s2;
    out[3] = p.a * e * d * d / (s2 * p.sigma);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluate_has_dip_at_center() {
        let p = GaussianParams { a: -0.8, b: 1.0, mu: 10.0, sigma: 0.5 };
        assert!((evaluate(&p, 10.0) - 0.2).abs() < 1e-12);
        assert!((evaluate(&p, 100.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn jacobian_matches_finite_differences() {
        let p = GaussianParams { a: -0.7, b: 0.9, mu: 3.0, sigma: 1.3 };
        let x = 3.8;
        let mut row = [0.0; PARAM_LEN];
        fill_jacobian_row(&p, x, &mut row);

        let h = 1e-6;
        for k in 0..PARAM_LEN {
            let mut hi = p.to_array();
            let mut lo = p.to_array();
            hi[k] += h;
            lo[k] -= h;
            let numeric = (evaluate(&GaussianParams::from_array(&hi), x)
                - evaluate(&GaussianParams::from_array(&lo), x))
                / (2.0 * h);
            assert!((numeric - row[k]).abs() < 1e-6, "param {k}: {numeric} vs {}", row[k]);
        }
    }

    #[test]
    fn array_round_trip_keeps_parameter_order() {
        let p = GaussianParams::from_array(&[-0.5, 1.0, 7.0, 2.0]);
        assert_eq!((p.a, p.b, p.mu, p.sigma), (-0.5, 1.0, 7.0, 2.0));
        assert_eq!(p.to_array(), [-0.5, 1.0, 7.0, 2.0]);
    }
}
