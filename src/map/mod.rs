//! Map aggregate.
//!
//! Holds the heightmap, the paired spawns and every entity the generators
//! place: mexes, expansion markers and navigation markers.

mod game_map;
mod marker;

pub use game_map::{GameMap, WaterSettings};
pub use marker::{AiMarker, MarkerKind};
