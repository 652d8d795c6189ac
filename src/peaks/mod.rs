//! Peak extraction shared by the autocorrelation and periodogram estimators.

pub mod extract;

pub use extract::*;
