//! Phase folding.

use crate::error::PeriodError;

/// Map each time stamp to its phase in `[0, 1)` for a trial `period`,
/// measured from the first time stamp.
pub fn fold(times: &[f64], period: f64) -> Result<Vec<f64>, PeriodError> {
    if !(period.is_finite() && period > 0.0) {
        return Err(PeriodError::InvalidPeriod(period));
    }
    let Some(&t0) = times.first() else {
        return Ok(Vec::new());
    };

    Ok(times
        .iter()
        .map(|&t| {
            let phase = ((t - t0) / period).rem_euclid(1.0);
            // rem_euclid can round up to exactly 1.0 for tiny negative inputs.
            if phase >= 1.0 { 0.0 } else { phase }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fold_wraps_into_unit_interval() {
        let phases = fold(&[10.0, 12.5, 15.0, 17.5, 20.0], 5.0).unwrap();
        let expected = [0.0, 0.5, 0.0, 0.5, 0.0];
        for (p, e) in phases.iter().zip(expected.iter()) {
            assert!((p - e).abs() < 1e-12, "got {p}, expected {e}");
        }
    }

    #[test]
    fn fold_stays_in_range_for_unsorted_times() {
        let phases = fold(&[3.0, 1.0, -7.3, 100.1], 2.2).unwrap();
        assert!(phases.iter().all(|p| (0.0..1.0).contains(p)));
    }

    #[test]
    fn fold_rejects_non_positive_period() {
        assert_eq!(fold(&[0.0, 1.0], 0.0), Err(PeriodError::InvalidPeriod(0.0)));
        assert_eq!(fold(&[0.0, 1.0], -2.0), Err(PeriodError::InvalidPeriod(-2.0)));
        assert!(fold(&[0.0, 1.0], f64::NAN).is_err());
    }

    #[test]
    fn fold_of_empty_input_is_empty() {
        assert!(fold(&[], 1.0).unwrap().is_empty());
    }
}
