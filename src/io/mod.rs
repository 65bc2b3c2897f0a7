//! Map folder I/O.
//!
//! A map folder holds `map.json` (size, spawns, target mex count, water and
//! the heightmap file name) next to the heightmap itself, either a 16-bit
//! grayscale PNG or RAW samples.

mod document;
mod folder;

pub use document::{MapDocument, NamedMarker};
pub use folder::{load_document, load_map, save_map, HeightmapFormat, MapIoError, MAP_FILE};
