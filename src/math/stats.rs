//! Small descriptive statistics used by the estimators.
//!
//! Variances here use **population** normalization (`1/N`), not the unbiased
//! `1/(N-1)` form. The dispersion statistic depends on this exact choice.

/// Arithmetic mean (`None` for an empty slice).
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population variance of `values` about a given center: `Σ (x - center)² / N`.
///
/// Returns `0.0` for an empty slice.
pub fn variance_about(values: &[f64], center: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let ss: f64 = values.iter().map(|x| (x - center) * (x - center)).sum();
    ss / values.len() as f64
}

/// Population variance about the sample's own mean.
pub fn population_variance(values: &[f64]) -> f64 {
    match mean(values) {
        Some(m) => variance_about(values, m),
        None => 0.0,
    }
}

/// Median, sorting the slice in place.
pub fn median_mut(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        Some(values[mid])
    } else {
        Some((values[mid - 1] + values[mid]) / 2.0)
    }
}

/// Percentile `q ∈ [0, 100]` of an ascending-sorted slice, linearly
/// interpolated between the closest ranks.
///
/// Returns NaN for an empty slice.
pub fn percentile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let q = q.clamp(0.0, 100.0);
    let rank = q / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rand_distr::{Distribution, StandardNormal};

    #[test]
    fn unit_normal_variance_is_one() {
        let mut rng = StdRng::seed_from_u64(42);
        let x: Vec<f64> = (0..10_000).map(|_| StandardNormal.sample(&mut rng)).collect();
        assert_abs_diff_eq!(variance_about(&x, 0.0), 1.0, epsilon = 0.01);
    }

    #[test]
    fn variance_uses_population_normalization() {
        // Σ (x - 2)² = 2 over N = 3.
        assert_abs_diff_eq!(population_variance(&[1.0, 2.0, 3.0]), 2.0 / 3.0, epsilon = 1e-12);
        assert_eq!(population_variance(&[5.0]), 0.0);
        assert_eq!(population_variance(&[]), 0.0);
    }

    #[test]
    fn percentile_interpolates() {
        let v = [1.0, 2.0, 3.0, 4.0];
        assert_abs_diff_eq!(percentile(&v, 50.0), 2.5, epsilon = 1e-12);
        assert_abs_diff_eq!(percentile(&v, 0.0), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(percentile(&v, 100.0), 4.0, epsilon = 1e-12);
        assert!(percentile(&[], 50.0).is_nan());
    }

    #[test]
    fn median_even_and_odd() {
        assert_eq!(median_mut(&mut [3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median_mut(&mut [4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median_mut(&mut []), None);
    }
}
