//! CSV ingest for light curves and sampled curves.
//!
//! Light-curve files need a header with a time and a flux column; a flux
//! uncertainty column is optional. Column names are matched case-insensitively
//! against a few common aliases.
//!
//! Design goals:
//! - **Strict schema** for required columns (clear errors + exit code 2)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **No estimator logic here**

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use csv::StringRecord;
use tracing::{debug, warn};

use crate::domain::{LightCurve, SampledCurve};
use crate::error::AppError;

const TIME_ALIASES: &[&str] = &["time", "t", "bjd", "btjd", "mjd", "jd"];
const FLUX_ALIASES: &[&str] = &["flux", "f", "pdcsap_flux", "sap_flux", "normalized_flux"];
const FLUX_ERR_ALIASES: &[&str] = &["flux_err", "flux_error", "err", "pdcsap_flux_err", "sap_flux_err"];

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: validated light curve + what was skipped.
#[derive(Debug, Clone)]
pub struct IngestedCurve {
    pub light_curve: LightCurve,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    pub rows_used: usize,
}

/// Load a light curve CSV (`time,flux[,flux_err]`).
///
/// Rows with unparsable or non-finite values are skipped and reported.
/// Remaining rows are sorted by time; duplicate time stamps are an error.
pub fn load_light_curve(path: &Path) -> Result<IngestedCurve, AppError> {
    let mut reader = open_reader(path)?;
    let headers = read_headers(&mut reader)?;
    let header_map = build_header_map(&headers);

    let time_col = find_column(&header_map, TIME_ALIASES)
        .ok_or_else(|| missing_column("time", TIME_ALIASES))?;
    let flux_col = find_column(&header_map, FLUX_ALIASES)
        .ok_or_else(|| missing_column("flux", FLUX_ALIASES))?;
    let err_col = find_column(&header_map, FLUX_ERR_ALIASES);

    let mut rows: Vec<(f64, f64, f64)> = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (i, record) in reader.records().enumerate() {
        rows_read += 1;
        // Header is line 1.
        let line = i + 2;
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("unreadable row: {e}"),
                });
                continue;
            }
        };

        let parsed = parse_field(&record, time_col, "time").and_then(|t| {
            let x = parse_field(&record, flux_col, "flux")?;
            let e = match err_col {
                Some(c) => parse_field(&record, c, "flux_err")?,
                None => 0.0,
            };
            Ok((t, x, e))
        });
        match parsed {
            Ok(row) => rows.push(row),
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    if !row_errors.is_empty() {
        warn!(
            path = %path.display(),
            skipped = row_errors.len(),
            "skipped light curve rows with missing or non-finite values"
        );
    }
    if rows.is_empty() {
        return Err(AppError::new(
            2,
            format!("No usable rows in '{}'.", path.display()),
        ));
    }

    rows.sort_by(|a, b| a.0.total_cmp(&b.0));
    let rows_used = rows.len();
    let (time, rest): (Vec<f64>, Vec<(f64, f64)>) = rows.into_iter().map(|(t, x, e)| (t, (x, e))).unzip();
    let (flux, flux_err): (Vec<f64>, Vec<f64>) = rest.into_iter().unzip();

    let light_curve = LightCurve::new(time, flux, flux_err).map_err(|e| {
        AppError::new(2, format!("Invalid light curve '{}': {e}", path.display()))
    })?;
    debug!(path = %path.display(), rows_read, rows_used, "light curve loaded");

    Ok(IngestedCurve {
        light_curve,
        row_errors,
        rows_read,
        rows_used,
    })
}

/// Load a two-column sampled curve, e.g. a periodogram (`frequency,power`).
///
/// Unlike light curves, any bad row is an error: sampled curves come from
/// other tools and should already be clean.
pub fn load_sampled_curve(path: &Path, x_name: &str, y_name: &str) -> Result<SampledCurve, AppError> {
    let mut reader = open_reader(path)?;
    let headers = read_headers(&mut reader)?;
    let header_map = build_header_map(&headers);

    let x_col = find_column(&header_map, &[x_name]).ok_or_else(|| missing_column(x_name, &[x_name]))?;
    let y_col = find_column(&header_map, &[y_name]).ok_or_else(|| missing_column(y_name, &[y_name]))?;

    let mut x = Vec::new();
    let mut y = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let line = i + 2;
        let record = record.map_err(|e| AppError::new(2, format!("Line {line}: unreadable row: {e}")))?;
        x.push(parse_field(&record, x_col, x_name).map_err(|m| AppError::new(2, format!("Line {line}: {m}")))?);
        y.push(parse_field(&record, y_col, y_name).map_err(|m| AppError::new(2, format!("Line {line}: {m}")))?);
    }

    SampledCurve::new(x, y).map_err(AppError::from)
}

/// Load one numeric column, e.g. posterior period samples.
pub fn load_samples(path: &Path, column: &str) -> Result<Vec<f64>, AppError> {
    let mut reader = open_reader(path)?;
    let headers = read_headers(&mut reader)?;
    let header_map = build_header_map(&headers);
    let col = find_column(&header_map, &[column]).ok_or_else(|| missing_column(column, &[column]))?;

    let mut values = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let line = i + 2;
        let record = record.map_err(|e| AppError::new(2, format!("Line {line}: unreadable row: {e}")))?;
        values.push(parse_field(&record, col, column).map_err(|m| AppError::new(2, format!("Line {line}: {m}")))?);
    }
    Ok(values)
}

fn open_reader(path: &Path) -> Result<csv::Reader<File>, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))?;
    Ok(csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_reader(file))
}

fn read_headers(reader: &mut csv::Reader<File>) -> Result<StringRecord, AppError> {
    Ok(reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone())
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.trim().to_lowercase(), i))
        .collect()
}

fn find_column(map: &HashMap<String, usize>, aliases: &[&str]) -> Option<usize> {
    aliases.iter().find_map(|a| map.get(&a.to_lowercase()).copied())
}

fn missing_column(what: &str, aliases: &[&str]) -> AppError {
    AppError::new(
        2,
        format!("Missing {what} column (expected one of: {}).", aliases.join(", ")),
    )
}

fn parse_field(record: &StringRecord, col: usize, name: &str) -> Result<f64, String> {
    let raw = record.get(col).unwrap_or("").trim();
    if raw.is_empty() {
        return Err(format!("missing {name}"));
    }
    let v: f64 = raw.parse().map_err(|_| format!("invalid {name} '{raw}'"))?;
    if !v.is_finite() {
        return Err(format!("non-finite {name}"));
    }
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_tmp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_and_sorts_rows_skipping_bad_ones() {
        let file = write_tmp("Time,Flux,Flux_Err\n2.0,1.5,0.1\n0.0,1.0,0.1\n1.0,nan,0.1\n3.0,,0.1\n1.5,2.0,0.2\n");
        let ingest = load_light_curve(file.path()).unwrap();
        assert_eq!(ingest.rows_read, 5);
        assert_eq!(ingest.rows_used, 3);
        assert_eq!(ingest.row_errors.len(), 2);
        assert_eq!(ingest.row_errors[0].line, 4);
        assert_eq!(ingest.light_curve.time(), &[0.0, 1.5, 2.0]);
        assert_eq!(ingest.light_curve.flux(), &[1.0, 2.0, 1.5]);
        assert_eq!(ingest.light_curve.flux_err(), &[0.1, 0.2, 0.1]);
    }

    #[test]
    fn flux_err_is_optional() {
        let file = write_tmp("t,f\n0,1\n1,2\n");
        let ingest = load_light_curve(file.path()).unwrap();
        assert_eq!(ingest.light_curve.flux_err(), &[0.0, 0.0]);
    }

    #[test]
    fn duplicate_times_are_rejected() {
        let file = write_tmp("time,flux\n0,1\n0,2\n");
        let err = load_light_curve(file.path()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn missing_flux_column_is_reported() {
        let file = write_tmp("time,mag\n0,1\n");
        let err = load_light_curve(file.path()).unwrap_err();
        assert!(err.to_string().contains("flux"));
    }

    #[test]
    fn loads_periodogram_columns() {
        let file = write_tmp("frequency,power\n0.1,0.0\n0.2,1.0\n0.3,0.2\n");
        let curve = load_sampled_curve(file.path(), "frequency", "power").unwrap();
        assert_eq!(curve.x, vec![0.1, 0.2, 0.3]);
        assert_eq!(curve.y, vec![0.0, 1.0, 0.2]);
    }

    #[test]
    fn sample_column_rejects_bad_rows() {
        let file = write_tmp("period,lnlike\n10.1,0\n9.9,0\n");
        assert_eq!(load_samples(file.path(), "period").unwrap(), vec![10.1, 9.9]);

        let file = write_tmp("period\n10.1\nabc\n");
        let err = load_samples(file.path(), "period").unwrap_err();
        assert!(err.to_string().contains("Line 3"));
    }
}
