//! Light-curve sources that are not files: seeded synthetic curves.

pub mod synthetic;

pub use synthetic::*;
