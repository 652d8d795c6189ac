//! Periodogram-based period estimate.
//!
//! Power computation is supplied from outside through [`Periodogram`]; this
//! module only picks the period from a `(frequency, power)` curve.

use tracing::warn;

use crate::domain::{
    EstimateQuality, LightCurve, Method, PeakRanking, PeakSet, PeriodEstimate, SampledCurve,
};
use crate::error::PeriodError;
use crate::peaks::find_peaks;

/// A spectral power estimator (e.g. Lomb–Scargle).
pub trait Periodogram {
    /// Power at each frequency in `frequency`.
    fn power(&self, lc: &LightCurve, frequency: &[f64]) -> Vec<f64>;
}

/// `n` evenly spaced frequencies between `1/max_period` and `1/min_period`.
pub fn frequency_grid(min_period: f64, max_period: f64, n: usize) -> Result<Vec<f64>, PeriodError> {
    crate::pdm::linear_grid(1.0 / max_period, 1.0 / min_period, n).map_err(|_| {
        PeriodError::InvalidConfig(format!(
            "invalid periodogram range: min_period={min_period}, max_period={max_period}, n={n}"
        ))
    })
}

/// Strict power peaks ranked by height, and the period of the highest one.
pub fn ls_period(spectrum: &SampledCurve) -> Result<(PeakSet, Option<PeriodEstimate>), PeriodError> {
    if let Some(&bad) = spectrum.x.iter().find(|f| !(f.is_finite() && **f > 0.0)) {
        return Err(PeriodError::InvalidConfig(format!(
            "periodogram frequencies must be finite and > 0 (got {bad})"
        )));
    }

    let peaks = find_peaks(spectrum, PeakRanking::Height)?;
    let estimate = peaks.best().map(|p| PeriodEstimate {
        method: Method::Ls,
        period: 1.0 / p.x,
        lower_error: None,
        upper_error: None,
        quality: EstimateQuality::Peak { height: p.y },
    });
    if estimate.is_none() {
        warn!(n = spectrum.len(), "periodogram has no peak");
    }
    Ok((peaks, estimate))
}
