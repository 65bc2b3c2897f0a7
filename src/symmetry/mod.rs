//! Symmetry model.
//!
//! Describes the terrain, team and spawn symmetry of a map and the mirror
//! transforms used to pair every placed entity with its symmetric image.

mod types;
mod hierarchy;

pub use types::{mirror_point, mirror_points, Symmetry, SymmetryError};
pub use hierarchy::SymmetryHierarchy;
