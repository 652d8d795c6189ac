//! Strict local-maximum detection on a sampled curve.
//!
//! A sample is a peak when it is strictly greater than both neighbours.
//! Flat plateaus and the two boundary samples never qualify.

use crate::domain::{Peak, PeakRanking, PeakSet, SampledCurve};
use crate::error::PeriodError;

/// Minimum curve length with at least one interior sample.
const MIN_LEN: usize = 3;

/// Find the strict local maxima of `curve`, ordered by `ranking`.
///
/// An empty `PeakSet` is a valid "no peak found" outcome.
pub fn find_peaks(curve: &SampledCurve, ranking: PeakRanking) -> Result<PeakSet, PeriodError> {
    if curve.x.len() != curve.y.len() {
        return Err(PeriodError::LengthMismatch {
            what: "y",
            expected: curve.x.len(),
            got: curve.y.len(),
        });
    }
    if curve.len() < MIN_LEN {
        return Err(PeriodError::CurveTooShort {
            min: MIN_LEN,
            got: curve.len(),
        });
    }

    let y = &curve.y;
    let mut peaks: Vec<Peak> = (1..y.len() - 1)
        .filter(|&i| y[i - 1] < y[i] && y[i + 1] < y[i])
        .map(|i| Peak {
            index: i,
            x: curve.x[i],
            y: y[i],
        })
        .collect();

    match ranking {
        PeakRanking::Position => {
            peaks.sort_by(|a, b| a.x.total_cmp(&b.x));
        }
        PeakRanking::Height => {
            peaks.sort_by(|a, b| b.y.total_cmp(&a.y).then(a.x.total_cmp(&b.x)));
        }
    }

    Ok(PeakSet { ranking, peaks })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn curve(y: &[f64]) -> SampledCurve {
        let x = (0..y.len()).map(|i| i as f64).collect();
        SampledCurve::new(x, y.to_vec()).unwrap()
    }

    #[test]
    fn single_hump_has_one_peak_at_maximum() {
        let set = find_peaks(&curve(&[0.0, 1.0, 3.0, 5.0, 2.0, 1.0]), PeakRanking::Height).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.peaks[0].index, 3);
        assert_eq!(set.peaks[0].y, 5.0);
    }

    #[test]
    fn monotonic_curve_has_no_peaks() {
        let set = find_peaks(&curve(&[0.0, 1.0, 2.0, 3.0, 4.0]), PeakRanking::Height).unwrap();
        assert!(set.is_empty());
        let set = find_peaks(&curve(&[4.0, 3.0, 2.0, 1.0]), PeakRanking::Height).unwrap();
        assert!(set.best().is_none());
    }

    #[test]
    fn plateaus_are_not_peaks() {
        let set = find_peaks(&curve(&[0.0, 2.0, 2.0, 0.0, 1.0, 0.0]), PeakRanking::Position).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.peaks[0].index, 4);
    }

    #[test]
    fn height_ranking_breaks_ties_by_x() {
        let set = find_peaks(
            &curve(&[0.0, 3.0, 0.0, 5.0, 0.0, 3.0, 0.0]),
            PeakRanking::Height,
        )
        .unwrap();
        let order: Vec<usize> = set.peaks.iter().map(|p| p.index).collect();
        assert_eq!(order, vec![3, 1, 5]);

        let set = find_peaks(
            &curve(&[0.0, 3.0, 0.0, 5.0, 0.0, 3.0, 0.0]),
            PeakRanking::Position,
        )
        .unwrap();
        let order: Vec<usize> = set.peaks.iter().map(|p| p.index).collect();
        assert_eq!(order, vec![1, 3, 5]);
    }

    #[test]
    fn short_curve_is_rejected() {
        let err = find_peaks(&curve(&[0.0, 1.0]), PeakRanking::Height).unwrap_err();
        assert_eq!(err, PeriodError::CurveTooShort { min: 3, got: 2 });
    }
}
