//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - passed between estimators in-memory
//! - exported to JSON/CSV
//! - consumed by downstream reporting or plotting layers
//!
//! Result values carry no behavior beyond small accessors.

use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::acf::AcfConfig;
use crate::error::PeriodError;
use crate::math::percentile;
use crate::pdm::{linear_grid, log_grid};
use crate::rotation::PdmConfig;

/// A measured light curve: `(time, flux, flux_err)` triples.
///
/// Construction validates the invariants every estimator relies on, so the
/// estimators themselves never see NaNs or unordered time stamps.
/// Deserialization goes through the same checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLightCurve")]
pub struct LightCurve {
    time: Vec<f64>,
    flux: Vec<f64>,
    flux_err: Vec<f64>,
}

impl LightCurve {
    pub fn new(time: Vec<f64>, flux: Vec<f64>, flux_err: Vec<f64>) -> Result<Self, PeriodError> {
        if time.is_empty() {
            return Err(PeriodError::EmptyLightCurve);
        }
        if flux.len() != time.len() {
            return Err(PeriodError::LengthMismatch {
                what: "flux",
                expected: time.len(),
                got: flux.len(),
            });
        }
        if flux_err.len() != time.len() {
            return Err(PeriodError::LengthMismatch {
                what: "flux_err",
                expected: time.len(),
                got: flux_err.len(),
            });
        }
        if let Some(index) = time.iter().position(|t| !t.is_finite()) {
            return Err(PeriodError::NonFiniteTime { index });
        }
        if let Some(index) = flux.iter().position(|x| !x.is_finite()) {
            return Err(PeriodError::NonFiniteFlux { index });
        }
        if let Some(i) = time.windows(2).position(|w| w[1] <= w[0]) {
            return Err(PeriodError::TimeNotIncreasing { index: i + 1 });
        }

        Ok(Self {
            time,
            flux,
            flux_err,
        })
    }

    /// Build a light curve with zero flux uncertainties.
    pub fn without_errors(time: Vec<f64>, flux: Vec<f64>) -> Result<Self, PeriodError> {
        let flux_err = vec![0.0; flux.len()];
        Self::new(time, flux, flux_err)
    }

    pub fn time(&self) -> &[f64] {
        &self.time
    }

    pub fn flux(&self) -> &[f64] {
        &self.flux
    }

    pub fn flux_err(&self) -> &[f64] {
        &self.flux_err
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Time span covered by the observations.
    pub fn baseline(&self) -> f64 {
        self.time[self.time.len() - 1] - self.time[0]
    }

    /// Median spacing between consecutive observations (`None` for a single point).
    pub fn median_cadence(&self) -> Option<f64> {
        let mut dt: Vec<f64> = self.time.windows(2).map(|w| w[1] - w[0]).collect();
        crate::math::median_mut(&mut dt)
    }

    /// Variability amplitude: the 5th–95th percentile range of the flux.
    pub fn rvar(&self) -> f64 {
        let mut sorted = self.flux.clone();
        sorted.sort_by(|a, b| a.total_cmp(b));
        percentile(&sorted, 95.0) - percentile(&sorted, 5.0)
    }
}

/// Unchecked wire form of a `LightCurve`.
#[derive(Deserialize)]
struct RawLightCurve {
    time: Vec<f64>,
    flux: Vec<f64>,
    #[serde(default)]
    flux_err: Option<Vec<f64>>,
}

impl TryFrom<RawLightCurve> for LightCurve {
    type Error = PeriodError;

    fn try_from(raw: RawLightCurve) -> Result<Self, Self::Error> {
        match raw.flux_err {
            Some(flux_err) => LightCurve::new(raw.time, raw.flux, flux_err),
            None => LightCurve::without_errors(raw.time, raw.flux),
        }
    }
}

/// Any 1-D sampled function: periodogram power vs frequency, correlation vs
/// lag, dispersion vs period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampledCurve {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl SampledCurve {
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> Result<Self, PeriodError> {
        if x.len() != y.len() {
            return Err(PeriodError::LengthMismatch {
                what: "y",
                expected: x.len(),
                got: y.len(),
            });
        }
        Ok(Self { x, y })
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Keep only samples whose `x` satisfies the predicate.
    pub fn filter_x(&self, keep: impl Fn(f64) -> bool) -> SampledCurve {
        let (x, y) = self
            .x
            .iter()
            .zip(self.y.iter())
            .filter(|(x, _)| keep(**x))
            .map(|(x, y)| (*x, *y))
            .unzip();
        SampledCurve { x, y }
    }
}

/// How a `PeakSet` is ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeakRanking {
    /// Highest first; ties broken by ascending x.
    Height,
    /// Scan order (ascending x).
    Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Peak {
    /// Index of the peak in the source curve.
    pub index: usize,
    pub x: f64,
    pub y: f64,
}

/// Strict local maxima of a sampled curve, in ranking order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeakSet {
    pub ranking: PeakRanking,
    pub peaks: Vec<Peak>,
}

impl PeakSet {
    /// Highest-ranked peak, if any.
    pub fn best(&self) -> Option<&Peak> {
        self.peaks.first()
    }

    pub fn len(&self) -> usize {
        self.peaks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peaks.is_empty()
    }
}

/// Φ statistic over a grid of trial periods.
///
/// `phi[i]` is `None` when the statistic is undefined at `periods[i]`
/// (e.g. every bin holds at most one point).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispersionProfile {
    pub periods: Vec<f64>,
    pub phi: Vec<Option<f64>>,
    /// Index of the global minimum among defined values (first on ties).
    pub best_index: Option<usize>,
}

impl DispersionProfile {
    /// Period at the global minimum.
    pub fn best_period(&self) -> Option<f64> {
        self.best_index.map(|i| self.periods[i])
    }

    pub fn best_phi(&self) -> Option<f64> {
        self.best_index.and_then(|i| self.phi[i])
    }

    /// Number of grid points where Φ could not be evaluated.
    pub fn undefined_count(&self) -> usize {
        self.phi.iter().filter(|p| p.is_none()).count()
    }

    /// The defined part of the profile as a plain curve.
    pub fn defined_curve(&self) -> SampledCurve {
        let (x, y) = self
            .periods
            .iter()
            .zip(self.phi.iter())
            .filter_map(|(&p, phi)| phi.map(|v| (p, v)))
            .unzip();
        SampledCurve { x, y }
    }
}

/// Which estimator produced a `PeriodEstimate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    Pdm,
    Acf,
    Ls,
    Gp,
}

impl Method {
    pub fn display_name(self) -> &'static str {
        match self {
            Method::Pdm => "PDM",
            Method::Acf => "ACF",
            Method::Ls => "LS",
            Method::Gp => "GP",
        }
    }
}

/// Fitted inverted-Gaussian parameters `Φ̂(P) = b + a·exp(−(P−μ)²/(2σ²))`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GaussianParams {
    pub a: f64,
    pub b: f64,
    pub mu: f64,
    pub sigma: f64,
}

/// How much trust to put into a `PeriodEstimate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EstimateQuality {
    /// Period and error come from a converged curve fit.
    Fitted {
        params: GaussianParams,
        iterations: usize,
        sse: f64,
    },
    /// The fit failed; the period is the raw grid optimum.
    GridResolution { grid_period: f64, reason: String },
    /// Location of the highest peak of a sampled curve; no error bar.
    Peak { height: f64 },
    /// Summary of posterior samples.
    Posterior { samples: usize },
}

/// A period with its error bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodEstimate {
    pub method: Method,
    pub period: f64,
    /// `None` when the method reports no uncertainty, `Some(inf)` when it
    /// tried and failed.
    pub lower_error: Option<f64>,
    pub upper_error: Option<f64>,
    pub quality: EstimateQuality,
}

impl PeriodEstimate {
    /// True when the estimate carries a finite uncertainty.
    pub fn has_finite_error(&self) -> bool {
        matches!(
            (self.lower_error, self.upper_error),
            (Some(l), Some(u)) if l.is_finite() && u.is_finite()
        )
    }

    /// Symmetric error (mean of lower/upper) when both are present.
    pub fn symmetric_error(&self) -> Option<f64> {
        match (self.lower_error, self.upper_error) {
            (Some(l), Some(u)) => Some(0.5 * (l + u)),
            _ => None,
        }
    }
}

/// Spacing of a generated period grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum GridSpacing {
    Linear,
    Log,
}

/// Trial-period grid description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    pub min_period: f64,
    pub max_period: f64,
    pub steps: usize,
    pub spacing: GridSpacing,
}

impl GridSpec {
    pub fn build(&self) -> Result<Vec<f64>, PeriodError> {
        match self.spacing {
            GridSpacing::Linear => linear_grid(self.min_period, self.max_period, self.steps),
            GridSpacing::Log => log_grid(self.min_period, self.max_period, self.steps),
        }
    }
}

/// Observation cadence presets for the ACF regular grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Cadence {
    /// Kepler/K2 long cadence.
    Kepler,
    /// TESS 2-minute cadence.
    Tess,
    /// Median spacing of the light curve itself.
    Auto,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// `None` skips PDM.
    pub grid: Option<GridSpec>,
    pub pdm: PdmConfig,
    /// `None` skips the ACF method.
    pub acf: Option<AcfConfig>,

    /// `(frequency, power)` CSV for the LS method.
    pub periodogram: Option<PathBuf>,
    /// Posterior period samples CSV for the GP summary.
    pub posterior: Option<PathBuf>,

    pub export_json: Option<PathBuf>,
    pub export_profile: Option<PathBuf>,
}
