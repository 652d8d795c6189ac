//! Command-line parsing for the `spot` rotation-period tool.
//!
//! Argument parsing stays here; `app` turns the parsed args into a
//! `RunConfig` and dispatches.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{Cadence, GridSpacing};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "spot", version, about = "Stellar rotation periods from light curves")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Estimate rotation periods from a light-curve CSV (`time,flux[,flux_err]`).
    Run(RunArgs),
    /// Generate a seeded sinusoidal light curve and analyse it.
    Demo(DemoArgs),
}

#[derive(Debug, Args, Clone)]
pub struct RunArgs {
    /// Light-curve CSV.
    #[arg(short = 'i', long, value_name = "CSV")]
    pub input: PathBuf,

    #[command(flatten)]
    pub analysis: AnalysisArgs,
}

#[derive(Debug, Args, Clone)]
pub struct DemoArgs {
    /// Injected rotation period (days).
    #[arg(long, default_value_t = 10.0)]
    pub period: f64,

    #[arg(long, default_value_t = 1.0)]
    pub amplitude: f64,

    /// White-noise standard deviation.
    #[arg(long, default_value_t = 0.01)]
    pub noise: f64,

    #[arg(short = 'n', long, default_value_t = 1000)]
    pub n_points: usize,

    /// Observation baseline (days).
    #[arg(long, default_value_t = 100.0)]
    pub t_max: f64,

    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    #[command(flatten)]
    pub analysis: AnalysisArgs,
}

/// Options shared by `run` and `demo`.
#[derive(Debug, Args, Clone)]
pub struct AnalysisArgs {
    /// Skip the PDM search.
    #[arg(long)]
    pub no_pdm: bool,

    /// Shortest trial period (days).
    #[arg(long, default_value_t = 1.0)]
    pub min_period: f64,

    /// Longest trial period (days).
    #[arg(long, default_value_t = 20.0)]
    pub max_period: f64,

    /// Number of trial periods.
    #[arg(long, default_value_t = 200)]
    pub steps: usize,

    #[arg(long, value_enum, default_value_t = GridSpacing::Linear)]
    pub spacing: GridSpacing,

    /// Number of phase bins.
    #[arg(long, default_value_t = 10)]
    pub nbins: usize,

    /// Levenberg–Marquardt iteration cap for the uncertainty fit.
    #[arg(long, default_value_t = 200)]
    pub max_iter: usize,

    /// Relative SSE change that counts as converged.
    #[arg(long, default_value_t = 1e-10)]
    pub tolerance: f64,

    /// Fit only periods within this fraction of the grid span around the minimum.
    #[arg(long, value_name = "FRACTION")]
    pub fit_window: Option<f64>,

    /// Also run the autocorrelation method.
    #[arg(long)]
    pub acf: bool,

    /// Sampling preset for the ACF grid.
    #[arg(long, value_enum, default_value_t = Cadence::Kepler)]
    pub cadence: Cadence,

    /// ACF grid spacing (days); overrides `--cadence`.
    #[arg(long)]
    pub interval: Option<f64>,

    /// Gaussian smoothing width for the ACF, in lag samples.
    #[arg(long, default_value_t = 9.0)]
    pub smooth: f64,

    /// Ignore ACF peaks at lags up to this value (days).
    #[arg(long, default_value_t = 0.0)]
    pub cutoff: f64,

    /// Longest ACF lag to compute (days).
    #[arg(long)]
    pub max_lag: Option<f64>,

    /// `frequency,power` CSV from an external periodogram (LS method).
    #[arg(long, value_name = "CSV")]
    pub periodogram: Option<PathBuf>,

    /// CSV with a `period` column of GP posterior samples.
    #[arg(long, value_name = "CSV")]
    pub posterior: Option<PathBuf>,

    /// Export the full report to JSON.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export the PDM dispersion profile to CSV.
    #[arg(long = "export-profile")]
    pub export_profile: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_defaults_match_the_reference_setup() {
        let cli = Cli::try_parse_from(["spot", "demo"]).unwrap();
        let Command::Demo(args) = cli.command else {
            panic!("expected demo");
        };
        assert_eq!(args.period, 10.0);
        assert_eq!(args.n_points, 1000);
        assert_eq!(args.analysis.steps, 200);
        assert_eq!(args.analysis.nbins, 10);
        assert!(!args.analysis.acf);
    }

    #[test]
    fn run_requires_input() {
        assert!(Cli::try_parse_from(["spot", "run"]).is_err());
        let cli = Cli::try_parse_from(["spot", "run", "-i", "lc.csv", "--spacing", "log", "--acf"]).unwrap();
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.analysis.spacing, GridSpacing::Log);
        assert!(args.analysis.acf);
    }
}
