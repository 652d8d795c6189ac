//! Rotation-period orchestration.
//!
//! `RotationModel` owns one light curve and runs each estimator on it:
//!
//! - PDM: grid search + Gaussian uncertainty fit
//! - ACF: autocorrelation curve + highest peak beyond a cutoff
//! - LS: highest peak of a supplied periodogram
//! - GP: summary of externally sampled posterior periods
//!
//! Every method returns its own result value; nothing is cached between calls.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::acf::{AcfConfig, acf_period, autocorrelation};
use crate::domain::{DispersionProfile, LightCurve, PeakSet, PeriodEstimate, SampledCurve};
use crate::error::PeriodError;
use crate::fit::{FitOptions, estimate_period};
use crate::pdm::{PhaseBinning, fold, phase_bins, search_periods};
use crate::posterior::PosteriorSummary;
use crate::spectral::{Periodogram, ls_period};

/// Settings for a PDM run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PdmConfig {
    /// Number of phase bins.
    pub nbins: usize,
    pub fit: FitOptions,
}

impl Default for PdmConfig {
    fn default() -> Self {
        Self {
            nbins: 10,
            fit: FitOptions::default(),
        }
    }
}

/// PDM output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PdmResult {
    pub nbins: usize,
    pub profile: DispersionProfile,
    /// `None` when no trial period could be evaluated.
    pub estimate: Option<PeriodEstimate>,
    /// Phase binning at the grid optimum (for plotting layers).
    pub binning: Option<PhaseBinning>,
}

impl PdmResult {
    /// Raw grid optimum, independent of the uncertainty fit.
    pub fn grid_period(&self) -> Option<f64> {
        self.profile.best_period()
    }
}

/// Curve-plus-peaks output shared by the ACF and LS methods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeakResult {
    pub curve: SampledCurve,
    pub peaks: PeakSet,
    /// `None` when the curve has no qualifying peak.
    pub estimate: Option<PeriodEstimate>,
}

#[derive(Debug, Clone)]
pub struct RotationModel {
    lc: LightCurve,
}

impl RotationModel {
    pub fn new(lc: LightCurve) -> Self {
        Self { lc }
    }

    pub fn light_curve(&self) -> &LightCurve {
        &self.lc
    }

    /// Variability amplitude (5th–95th percentile flux range).
    pub fn rvar(&self) -> f64 {
        self.lc.rvar()
    }

    /// Phase dispersion minimization over `grid`.
    pub fn pdm_rotation(&self, grid: &[f64], config: &PdmConfig) -> Result<PdmResult, PeriodError> {
        config.fit.validate()?;
        let profile = search_periods(&self.lc, grid, config.nbins)?;
        let estimate = estimate_period(&profile, &config.fit)?;

        let binning = match profile.best_period() {
            Some(p) => {
                let phases = fold(self.lc.time(), p)?;
                Some(phase_bins(config.nbins, &phases, self.lc.flux())?)
            }
            None => None,
        };

        if let Some(est) = &estimate {
            info!(
                period = est.period,
                error = ?est.symmetric_error(),
                grid_period = ?profile.best_period(),
                "PDM period"
            );
        }

        Ok(PdmResult {
            nbins: config.nbins,
            profile,
            estimate,
            binning,
        })
    }

    /// Autocorrelation period from the light curve.
    pub fn acf_rotation(&self, config: &AcfConfig) -> Result<PeakResult, PeriodError> {
        let curve = autocorrelation(&self.lc, config)?;
        Self::acf_rotation_from_curve(curve, config.cutoff)
    }

    /// Autocorrelation period from an externally computed `(lag, correlation)` curve.
    pub fn acf_rotation_from_curve(curve: SampledCurve, cutoff: f64) -> Result<PeakResult, PeriodError> {
        let (peaks, estimate) = acf_period(&curve, cutoff)?;
        if let Some(est) = &estimate {
            info!(period = est.period, "ACF period");
        }
        let curve = curve.filter_x(|lag| lag > cutoff);
        Ok(PeakResult {
            curve,
            peaks,
            estimate,
        })
    }

    /// Periodogram period using an external power estimator.
    pub fn ls_rotation(
        &self,
        periodogram: &dyn Periodogram,
        frequency: &[f64],
    ) -> Result<PeakResult, PeriodError> {
        let power = periodogram.power(&self.lc, frequency);
        let spectrum = SampledCurve::new(frequency.to_vec(), power)?;
        Self::ls_rotation_from_spectrum(spectrum)
    }

    /// Periodogram period from a precomputed `(frequency, power)` curve.
    pub fn ls_rotation_from_spectrum(spectrum: SampledCurve) -> Result<PeakResult, PeriodError> {
        let (peaks, estimate) = ls_period(&spectrum)?;
        if let Some(est) = &estimate {
            info!(period = est.period, "LS period");
        }
        Ok(PeakResult {
            curve: spectrum,
            peaks,
            estimate,
        })
    }

    /// Summarize posterior period samples from an external GP fit.
    pub fn gp_rotation(samples: &[f64]) -> Result<PeriodEstimate, PeriodError> {
        let summary = PosteriorSummary::from_samples(samples)?;
        Ok(summary.to_estimate())
    }
}
