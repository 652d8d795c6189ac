//! Phase dispersion minimization.
//!
//! - phase folding (`phase`)
//! - binned dispersion statistic Φ (`dispersion`)
//! - period grids and the exhaustive search over them (`grid`, `search`)

pub mod dispersion;
pub mod grid;
pub mod phase;
pub mod search;

pub use dispersion::*;
pub use grid::*;
pub use phase::*;
pub use search::*;
