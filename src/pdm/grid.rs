//! Trial-period grid generation.
//!
//! The search itself accepts any strictly positive grid; these helpers build
//! the two spacings used in practice.

use crate::error::PeriodError;

fn validate_range(min: f64, max: f64, steps: usize) -> Result<(), PeriodError> {
    if !(min.is_finite() && max.is_finite() && min > 0.0 && max > min) {
        return Err(PeriodError::InvalidConfig(format!(
            "invalid period range: min={min}, max={max} (must be finite, >0, and max>min)"
        )));
    }
    if steps < 2 {
        return Err(PeriodError::InvalidConfig("period grid steps must be >= 2".to_string()));
    }
    Ok(())
}

/// `steps` evenly spaced periods between `min` and `max` (inclusive).
pub fn linear_grid(min: f64, max: f64, steps: usize) -> Result<Vec<f64>, PeriodError> {
    validate_range(min, max, steps)?;
    let step = (max - min) / (steps as f64 - 1.0);
    Ok((0..steps).map(|i| min + step * i as f64).collect())
}

/// `steps` log-spaced periods between `min` and `max` (inclusive).
pub fn log_grid(min: f64, max: f64, steps: usize) -> Result<Vec<f64>, PeriodError> {
    validate_range(min, max, steps)?;

    let ln_min = min.ln();
    let ln_max = max.ln();
    let step = (ln_max - ln_min) / (steps as f64 - 1.0);

    let mut out = Vec::with_capacity(steps);
    for i in 0..steps {
        out.push((ln_min + step * i as f64).exp());
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_grid_includes_endpoints() {
        let v = log_grid(1.0, 200.0, 5).unwrap();
        assert!((v[0] - 1.0).abs() < 1e-12);
        assert!((v[v.len() - 1] - 200.0).abs() < 1e-9);
        assert!(v.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn linear_grid_is_evenly_spaced() {
        let v = linear_grid(1.0, 20.0, 200).unwrap();
        assert_eq!(v.len(), 200);
        assert!((v[199] - 20.0).abs() < 1e-12);
        let step = v[1] - v[0];
        assert!(v.windows(2).all(|w| ((w[1] - w[0]) - step).abs() < 1e-12));
    }

    #[test]
    fn rejects_bad_ranges() {
        assert!(linear_grid(0.0, 10.0, 10).is_err());
        assert!(log_grid(5.0, 1.0, 10).is_err());
        assert!(linear_grid(1.0, 10.0, 1).is_err());
    }
}
