//! Shared rotation pipeline used by every `spot` subcommand.
//!
//! light curve -> PDM / ACF / LS / GP (whichever are configured) -> report
//!
//! The CLI front-end only decides where the light curve comes from and how
//! the report is printed.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::{LightCurve, PeriodEstimate, RunConfig};
use crate::error::AppError;
use crate::io::ingest::{load_samples, load_sampled_curve};
use crate::rotation::{PdmResult, PeakResult, RotationModel};

/// Everything computed for one light curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RotationReport {
    pub n_points: usize,
    /// Observation baseline (days).
    pub baseline: f64,
    pub rvar: f64,
    /// Ingest rows dropped for bad values (0 for synthetic input).
    pub rows_skipped: usize,

    pub pdm: Option<PdmResult>,
    pub acf: Option<PeakResult>,
    pub ls: Option<PeakResult>,
    pub gp: Option<PeriodEstimate>,

    /// One entry per method that produced a period, in PDM/ACF/LS/GP order.
    pub estimates: Vec<PeriodEstimate>,
}

impl RotationReport {
    /// The estimate produced by `method`, if it succeeded.
    pub fn estimate_for(&self, method: crate::domain::Method) -> Option<&PeriodEstimate> {
        self.estimates.iter().find(|e| e.method == method)
    }
}

/// Run every configured method on `lc`.
pub fn run_rotation(lc: LightCurve, rows_skipped: usize, config: &RunConfig) -> Result<RotationReport, AppError> {
    let model = RotationModel::new(lc);
    let lc = model.light_curve();
    info!(points = lc.len(), baseline = lc.baseline(), "running rotation pipeline");

    let pdm = match &config.grid {
        Some(spec) => {
            let grid = spec.build()?;
            Some(model.pdm_rotation(&grid, &config.pdm)?)
        }
        None => None,
    };

    let acf = match &config.acf {
        Some(acf_config) => Some(model.acf_rotation(acf_config)?),
        None => None,
    };

    let ls = match &config.periodogram {
        Some(path) => {
            let spectrum = load_sampled_curve(path, "frequency", "power")?;
            Some(RotationModel::ls_rotation_from_spectrum(spectrum)?)
        }
        None => None,
    };

    let gp = match &config.posterior {
        Some(path) => {
            let samples = load_samples(path, "period")?;
            Some(RotationModel::gp_rotation(&samples)?)
        }
        None => None,
    };

    let estimates = pdm
        .as_ref()
        .and_then(|r| r.estimate.clone())
        .into_iter()
        .chain(acf.as_ref().and_then(|r| r.estimate.clone()))
        .chain(ls.as_ref().and_then(|r| r.estimate.clone()))
        .chain(gp.clone())
        .collect();

    Ok(RotationReport {
        n_points: lc.len(),
        baseline: lc.baseline(),
        rvar: model.rvar(),
        rows_skipped,
        pdm,
        acf,
        ls,
        gp,
        estimates,
    })
}
