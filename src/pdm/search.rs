//! Exhaustive Φ search over a caller-supplied period grid.
//!
//! Each grid point is evaluated independently (parallel, order preserving).
//! Points where Φ is undefined stay in the profile as `None` so the rest of
//! the grid still completes.

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::domain::{DispersionProfile, LightCurve};
use crate::error::PeriodError;
use crate::math::population_variance;
use crate::pdm::dispersion::phi_with_total;

/// Evaluate Φ at every period in `grid`.
pub fn search_periods(
    lc: &LightCurve,
    grid: &[f64],
    nbins: usize,
) -> Result<DispersionProfile, PeriodError> {
    if grid.is_empty() {
        return Err(PeriodError::EmptyGrid);
    }
    if nbins < 2 {
        return Err(PeriodError::TooFewBins(nbins));
    }
    if let Some(&bad) = grid.iter().find(|p| !(p.is_finite() && **p > 0.0)) {
        return Err(PeriodError::InvalidPeriod(bad));
    }

    let time = lc.time();
    let flux = lc.flux();
    let total_variance = population_variance(flux);
    if total_variance <= 0.0 {
        warn!("flux has zero variance; dispersion is undefined at every trial period");
    }

    let phi = grid
        .par_iter()
        .map(|&p| phi_with_total(nbins, p, time, flux, total_variance))
        .collect::<Result<Vec<Option<f64>>, PeriodError>>()?;

    let best_index = argmin_defined(&phi);

    let profile = DispersionProfile {
        periods: grid.to_vec(),
        phi,
        best_index,
    };

    debug!(
        grid_len = grid.len(),
        nbins,
        undefined = profile.undefined_count(),
        best_period = ?profile.best_period(),
        best_phi = ?profile.best_phi(),
        "dispersion search finished"
    );
    if best_index.is_none() {
        warn!(grid_len = grid.len(), "no trial period could be evaluated");
    }

    Ok(profile)
}

/// First index of the smallest defined value.
fn argmin_defined(values: &[Option<f64>]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, v) in values.iter().enumerate() {
        let Some(v) = *v else { continue };
        match best {
            Some((_, b)) if v >= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdm::dispersion::phi;
    use crate::pdm::grid::linear_grid;
    use std::f64::consts::PI;

    fn clean_sinusoid(period: f64) -> LightCurve {
        let t: Vec<f64> = (0..1000).map(|i| 100.0 * i as f64 / 999.0).collect();
        let x = t.iter().map(|&ti| (2.0 * PI * ti / period).sin()).collect();
        LightCurve::without_errors(t, x).unwrap()
    }

    #[test]
    fn minimum_lands_on_grid_point_nearest_true_period() {
        let lc = clean_sinusoid(10.0);
        let grid = [2.5, 5.0, 7.0, 9.5, 10.0, 10.5, 13.0, 25.0];
        let profile = search_periods(&lc, &grid, 10).unwrap();
        assert_eq!(profile.best_period(), Some(10.0));
    }

    #[test]
    fn profile_values_match_single_period_statistic() {
        let lc = clean_sinusoid(10.0);
        let grid = linear_grid(1.0, 20.0, 25).unwrap();
        let profile = search_periods(&lc, &grid, 10).unwrap();
        for (p, v) in profile.periods.iter().zip(profile.phi.iter()) {
            assert_eq!(*v, phi(10, *p, lc.time(), lc.flux()).unwrap());
        }
    }

    #[test]
    fn degenerate_points_are_carried_as_markers() {
        // Four points, four bins: every bin has at most one point at most periods.
        let lc = LightCurve::without_errors(vec![0.0, 1.0, 2.0, 3.0], vec![1.0, -1.0, 1.0, -1.0]).unwrap();
        let profile = search_periods(&lc, &[4.0, 2.0], 4).unwrap();
        assert_eq!(profile.phi[0], None);
        // Period 2 folds into two bins of two points each, both with zero spread.
        assert_eq!(profile.phi[1], Some(0.0));
        assert_eq!(profile.best_index, Some(1));
    }

    #[test]
    fn rejects_empty_and_non_positive_grids() {
        let lc = clean_sinusoid(10.0);
        assert_eq!(search_periods(&lc, &[], 10), Err(PeriodError::EmptyGrid));
        assert_eq!(
            search_periods(&lc, &[1.0, -3.0], 10),
            Err(PeriodError::InvalidPeriod(-3.0))
        );
        assert_eq!(search_periods(&lc, &[1.0], 1), Err(PeriodError::TooFewBins(1)));
    }

    #[test]
    fn argmin_prefers_first_on_ties() {
        assert_eq!(argmin_defined(&[None, Some(0.3), Some(0.1), Some(0.1)]), Some(2));
        assert_eq!(argmin_defined(&[None, None]), None);
    }
}
