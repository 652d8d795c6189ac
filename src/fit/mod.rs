//! Curve fitting for period uncertainties.
//!
//! Responsibilities:
//!
//! - fit an inverted Gaussian to a dispersion profile (Levenberg–Marquardt)
//! - downgrade to grid resolution when the solver fails

pub mod uncertainty;

pub use uncertainty::*;
