//! Reporting: human-readable summaries of a rotation run.

pub mod format;

pub use format::*;
