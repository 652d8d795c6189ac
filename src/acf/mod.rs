//! Autocorrelation period estimator.
//!
//! - smoothed autocorrelation curve (`correlation`)
//! - period = lag of the highest ACF peak beyond a cutoff lag

pub mod correlation;

pub use correlation::*;

use tracing::warn;

use crate::domain::{EstimateQuality, Method, PeakRanking, PeakSet, PeriodEstimate, SampledCurve};
use crate::error::PeriodError;
use crate::peaks::find_peaks;

/// Height-ranked ACF peaks at lags strictly above `cutoff`, and the period
/// estimate from the highest of them.
///
/// Fewer than three lags beyond the cutoff, or no peak among them, yields no
/// estimate.
pub fn acf_period(
    curve: &SampledCurve,
    cutoff: f64,
) -> Result<(PeakSet, Option<PeriodEstimate>), PeriodError> {
    if curve.x.len() != curve.y.len() {
        return Err(PeriodError::LengthMismatch {
            what: "correlation",
            expected: curve.x.len(),
            got: curve.y.len(),
        });
    }

    let beyond = curve.filter_x(|lag| lag > cutoff);
    if beyond.len() < 3 {
        warn!(cutoff, remaining = beyond.len(), "too few lags beyond cutoff for ACF peaks");
        let empty = PeakSet {
            ranking: PeakRanking::Height,
            peaks: Vec::new(),
        };
        return Ok((empty, None));
    }

    let peaks = find_peaks(&beyond, PeakRanking::Height)?;
    let estimate = peaks.best().map(|p| PeriodEstimate {
        method: Method::Acf,
        period: p.x,
        lower_error: None,
        upper_error: None,
        quality: EstimateQuality::Peak { height: p.y },
    });
    if estimate.is_none() {
        warn!(cutoff, "no ACF peak found");
    }

    Ok((peaks, estimate))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cutoff_excludes_low_lag_peaks() {
        let lags: Vec<f64> = (0..9).map(|i| i as f64).collect();
        let acf = vec![1.0, 0.2, 0.9, 0.1, 0.0, 0.5, 0.0, 0.3, 0.1];
        let curve = SampledCurve::new(lags, acf).unwrap();

        let (peaks, est) = acf_period(&curve, 0.0).unwrap();
        assert_eq!(est.unwrap().period, 2.0);
        assert_eq!(peaks.len(), 3);

        let (_, est) = acf_period(&curve, 3.0).unwrap();
        assert_eq!(est.unwrap().period, 5.0);
    }

    #[test]
    fn no_peak_is_not_an_error() {
        let curve = SampledCurve::new(vec![0.0, 1.0, 2.0, 3.0], vec![1.0, 0.5, 0.2, 0.1]).unwrap();
        let (peaks, est) = acf_period(&curve, 0.0).unwrap();
        assert!(peaks.is_empty());
        assert!(est.is_none());
    }
}
