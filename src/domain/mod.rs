//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the validated input series (`LightCurve`) and generic curves (`SampledCurve`)
//! - estimator outputs (`PeakSet`, `DispersionProfile`, `PeriodEstimate`)

pub mod types;

pub use types::*;
