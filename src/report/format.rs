//! Terminal formatting for rotation reports.
//!
//! We keep formatting code in one place so:
//! - the estimator code stays free of presentation concerns
//! - output changes are localized

use crate::app::pipeline::RotationReport;
use crate::domain::{EstimateQuality, PeakSet, PeriodEstimate};
use crate::rotation::PdmResult;

/// How many peaks to list per peak-based method.
const TOP_PEAKS: usize = 3;

/// Format the full report: light-curve stats, one line per estimate, then
/// per-method diagnostics.
pub fn format_report(report: &RotationReport) -> String {
    let mut out = String::new();

    out.push_str("=== spot - rotation periods ===\n");
    out.push_str(&format!(
        "Points: n={} | baseline={:.3}d | rvar={:.5}\n",
        report.n_points, report.baseline, report.rvar
    ));
    if report.rows_skipped > 0 {
        out.push_str(&format!("Skipped rows: {}\n", report.rows_skipped));
    }

    out.push_str("\nPeriods:\n");
    if report.estimates.is_empty() {
        out.push_str("  (no method produced a period)\n");
    }
    for est in &report.estimates {
        out.push_str(&format!("  {}\n", format_estimate(est)));
    }

    if let Some(pdm) = &report.pdm {
        out.push('\n');
        out.push_str(&format_pdm(pdm));
    }
    if let Some(acf) = &report.acf {
        out.push_str("\nACF peaks (lag, correlation):\n");
        out.push_str(&format_peaks(&acf.peaks, "d"));
    }
    if let Some(ls) = &report.ls {
        out.push_str("\nLS peaks (frequency, power):\n");
        out.push_str(&format_peaks(&ls.peaks, "/d"));
    }

    out
}

/// One-line estimate, e.g. `PDM = 10.0213 +/- 0.3512 days`.
pub fn format_estimate(est: &PeriodEstimate) -> String {
    let name = est.method.display_name();
    let error = match (est.lower_error, est.upper_error) {
        (Some(l), Some(u)) if l.is_finite() && u.is_finite() => {
            if (l - u).abs() <= 1e-12 * l.abs().max(1.0) {
                format!(" +/- {l:.4}")
            } else {
                format!(" +{u:.4}/-{l:.4}")
            }
        }
        (Some(_), Some(_)) => " +/- inf".to_string(),
        _ => String::new(),
    };
    let note = match &est.quality {
        EstimateQuality::Fitted { iterations, .. } => format!("gaussian fit, {iterations} iterations"),
        EstimateQuality::GridResolution { reason, .. } => format!("grid only: {reason}"),
        EstimateQuality::Peak { height } => format!("peak height {height:.4}"),
        EstimateQuality::Posterior { samples } => format!("{samples} posterior samples"),
    };
    format!("{name:<4}= {:.4}{error} days ({note})", est.period)
}

fn format_pdm(pdm: &PdmResult) -> String {
    let profile = &pdm.profile;
    let mut out = String::new();
    out.push_str("PDM diagnostics:\n");
    out.push_str(&format!(
        "- grid: n={} | periods=[{:.4}, {:.4}] | bins={}\n",
        profile.periods.len(),
        profile.periods.first().copied().unwrap_or(f64::NAN),
        profile.periods.last().copied().unwrap_or(f64::NAN),
        pdm.nbins
    ));
    match (pdm.grid_period(), profile.best_phi()) {
        (Some(p), Some(phi)) => out.push_str(&format!("- grid minimum: P={p:.4} phi={phi:.5}\n")),
        _ => out.push_str("- grid minimum: undefined\n"),
    }
    let undefined = profile.undefined_count();
    if undefined > 0 {
        out.push_str(&format!("- undefined phi at {undefined} trial periods\n"));
    }
    if let Some(EstimateQuality::Fitted { params, sse, .. }) = pdm.estimate.as_ref().map(|e| &e.quality) {
        out.push_str(&format!(
            "- fit: a={:.5} b={:.5} mu={:.4} sigma={:.4} SSE={:.3e}\n",
            params.a, params.b, params.mu, params.sigma, sse
        ));
    }
    out
}

fn format_peaks(peaks: &PeakSet, unit: &str) -> String {
    if peaks.is_empty() {
        return "  (none)\n".to_string();
    }
    let mut out = String::new();
    for p in peaks.peaks.iter().take(TOP_PEAKS) {
        out.push_str(&format!("  {:>12.5}{unit:<3} {:>10.5}\n", p.x, p.y));
    }
    out
}
