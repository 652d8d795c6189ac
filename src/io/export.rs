//! Result exports.
//!
//! - the full rotation report as JSON (non-finite errors are written as `null`)
//! - the dispersion profile as CSV (easy to plot in spreadsheets or scripts)

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::app::pipeline::RotationReport;
use crate::domain::DispersionProfile;
use crate::error::AppError;

/// Write the rotation report as pretty JSON.
pub fn write_report_json(path: &Path, report: &RotationReport) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create report JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, report)
        .map_err(|e| AppError::new(2, format!("Failed to write report JSON: {e}")))?;
    Ok(())
}

/// Write `period,phi` rows; undefined Φ values are left empty.
pub fn write_profile_csv(path: &Path, profile: &DispersionProfile) -> Result<(), AppError> {
    let mut file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create profile CSV '{}': {e}", path.display())))?;

    writeln!(file, "period,phi")
        .map_err(|e| AppError::new(2, format!("Failed to write profile CSV header: {e}")))?;
    for (p, phi) in profile.periods.iter().zip(profile.phi.iter()) {
        let phi = phi.map(|v| format!("{v:.10}")).unwrap_or_default();
        writeln!(file, "{p:.10},{phi}")
            .map_err(|e| AppError::new(2, format!("Failed to write profile CSV row: {e}")))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_csv_leaves_undefined_cells_empty() {
        let profile = DispersionProfile {
            periods: vec![1.0, 2.0],
            phi: vec![None, Some(0.25)],
            best_index: Some(1),
        };
        let file = tempfile::NamedTempFile::new().unwrap();
        write_profile_csv(file.path(), &profile).unwrap();
        let text = std::fs::read_to_string(file.path()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec!["period,phi", "1.0000000000,", "2.0000000000,0.2500000000"]);
    }
}
