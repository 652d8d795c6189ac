//! Mathematical utilities: descriptive statistics and linear least squares.

pub mod ols;
pub mod stats;

pub use ols::*;
pub use stats::*;
