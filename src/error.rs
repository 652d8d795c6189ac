//! Error types.
//!
//! - `PeriodError` is the library error: every invalid-input condition the
//!   estimators can detect, plus solver non-convergence.
//! - `AppError` is the binary boundary error: a message and a process exit code.
//!
//! Degenerate outcomes (no peaks, undefined dispersion) are *not* errors; they
//! are represented as `None` / markers in the result values.

/// Coarse classification of a `PeriodError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller supplied data or configuration that cannot be evaluated.
    InvalidInput,
    /// The nonlinear fit ran out of iterations, diverged, or found no dip.
    FitDidNotConverge,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PeriodError {
    #[error("light curve is empty")]
    EmptyLightCurve,

    #[error("length mismatch: {what} has {got} values, expected {expected}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("non-finite flux at index {index}; remove NaNs before computing a period")]
    NonFiniteFlux { index: usize },

    #[error("non-finite time at index {index}")]
    NonFiniteTime { index: usize },

    #[error("time must be strictly increasing (index {index})")]
    TimeNotIncreasing { index: usize },

    #[error("invalid period {0}: must be finite and > 0")]
    InvalidPeriod(f64),

    #[error("period grid is empty")]
    EmptyGrid,

    #[error("number of phase bins must be >= 2 (got {0})")]
    TooFewBins(usize),

    #[error("sampled curve needs at least {min} points (got {got})")]
    CurveTooShort { min: usize, got: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("gaussian fit did not converge after {iterations} iterations")]
    FitDidNotConverge { iterations: usize },

    #[error("gaussian fit found no dip: {0}")]
    NoDip(String),
}

impl PeriodError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PeriodError::FitDidNotConverge { .. } | PeriodError::NoDip(_) => ErrorKind::FitDidNotConverge,
            _ => ErrorKind::InvalidInput,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<PeriodError> for AppError {
    fn from(err: PeriodError) -> Self {
        let exit_code = match err.kind() {
            ErrorKind::InvalidInput => 2,
            ErrorKind::FitDidNotConverge => 4,
        };
        AppError::new(exit_code, err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
