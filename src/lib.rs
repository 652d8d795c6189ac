//! `starspot` library crate.
//!
//! Stellar rotation periods from photometric light curves: phase dispersion
//! minimization with a Gaussian-fit uncertainty, autocorrelation, and peak
//! summaries of externally computed periodograms and GP posteriors.
//!
//! The binary (`spot`) is a thin wrapper around this library so the
//! estimators are testable without spawning processes.

pub mod acf;
pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod models;
pub mod pdm;
pub mod peaks;
pub mod posterior;
pub mod report;
pub mod rotation;
pub mod spectral;
