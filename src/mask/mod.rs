//! Spatial mask algebra.
//!
//! Boolean and scalar grids over the map's coordinate space, with the
//! thresholding, morphology, fills and sampling used by the placement
//! generators.

mod grid;
mod distance;
mod boolean;
mod scalar;

pub use grid::Grid;
pub use distance::squared_distance_to;
pub use boolean::{BooleanMask, ThresholdDirection};
pub use scalar::ScalarMask;
