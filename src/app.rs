//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - sets up logging
//! - parses CLI arguments
//! - loads or generates the light curve
//! - runs the rotation pipeline
//! - prints the report and writes optional exports

use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::acf::AcfConfig;
use crate::cli::{AnalysisArgs, Command, DemoArgs, RunArgs};
use crate::data::{SyntheticConfig, generate_light_curve};
use crate::domain::{Cadence, GridSpec, LightCurve, RunConfig};
use crate::error::AppError;
use crate::fit::FitOptions;
use crate::rotation::PdmConfig;

pub mod pipeline;

/// Entry point for the `spot` binary.
pub fn run() -> Result<(), AppError> {
    init_logging();
    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Run(args) => handle_run(args),
        Command::Demo(args) => handle_demo(args),
    }
}

/// Log to stderr so stdout stays clean for the report. `RUST_LOG` overrides
/// the default `info` level.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // A second init (e.g. from tests) keeps the first subscriber.
    let _ = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn handle_run(args: RunArgs) -> Result<(), AppError> {
    let ingest = crate::io::ingest::load_light_curve(&args.input)?;
    info!(
        path = %args.input.display(),
        rows_read = ingest.rows_read,
        rows_used = ingest.rows_used,
        "light curve loaded"
    );
    let skipped = ingest.row_errors.len();
    analyse(ingest.light_curve, skipped, &args.analysis)
}

fn handle_demo(args: DemoArgs) -> Result<(), AppError> {
    let synthetic = SyntheticConfig {
        period: args.period,
        amplitude: args.amplitude,
        noise: args.noise,
        n_points: args.n_points,
        t_max: args.t_max,
        seed: args.seed,
    };
    let lc = generate_light_curve(&synthetic)?;
    info!(period = args.period, seed = args.seed, "generated synthetic light curve");
    analyse(lc, 0, &args.analysis)
}

fn analyse(lc: LightCurve, rows_skipped: usize, args: &AnalysisArgs) -> Result<(), AppError> {
    let config = run_config_from_args(args, &lc)?;
    let report = pipeline::run_rotation(lc, rows_skipped, &config)?;

    println!("{}", crate::report::format_report(&report));

    if let Some(path) = &config.export_json {
        crate::io::export::write_report_json(path, &report)?;
    }
    if let Some(path) = &config.export_profile {
        match &report.pdm {
            Some(pdm) => crate::io::export::write_profile_csv(path, &pdm.profile)?,
            None => {
                return Err(AppError::new(
                    2,
                    "--export-profile needs the PDM method (drop --no-pdm).",
                ));
            }
        }
    }

    Ok(())
}

/// Build the pipeline configuration from CLI flags.
///
/// `lc` is only consulted for `--cadence auto`.
pub fn run_config_from_args(args: &AnalysisArgs, lc: &LightCurve) -> Result<RunConfig, AppError> {
    let grid = (!args.no_pdm).then(|| GridSpec {
        min_period: args.min_period,
        max_period: args.max_period,
        steps: args.steps,
        spacing: args.spacing,
    });

    let acf = if args.acf {
        let preset = match args.cadence {
            Cadence::Kepler => AcfConfig::kepler(),
            Cadence::Tess => AcfConfig::tess(),
            Cadence::Auto => {
                let interval = lc.median_cadence().ok_or_else(|| {
                    AppError::new(2, "Cannot infer the cadence of a single-point light curve.")
                })?;
                AcfConfig {
                    interval,
                    ..AcfConfig::default()
                }
            }
        };
        Some(AcfConfig {
            interval: args.interval.unwrap_or(preset.interval),
            smooth: args.smooth,
            cutoff: args.cutoff,
            max_lag: args.max_lag,
        })
    } else {
        None
    };

    Ok(RunConfig {
        grid,
        pdm: PdmConfig {
            nbins: args.nbins,
            fit: FitOptions {
                max_iterations: args.max_iter,
                tolerance: args.tolerance,
                window: args.fit_window,
            },
        },
        acf,
        periodogram: args.periodogram.clone(),
        posterior: args.posterior.clone(),
        export_json: args.export.clone(),
        export_profile: args.export_profile.clone(),
    })
}
