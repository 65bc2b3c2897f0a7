//! Symmetric map post-processing.
//!
//! This crate derives passability masks from a map's heightmap and places
//! resource points (mexes), expansion markers and AI navigation markers in
//! mirrored pairs under a configurable symmetry.

pub mod symmetry;
pub mod mask;
pub mod map;
pub mod generator;
pub mod pipeline;
pub mod export;
pub mod io;

pub use symmetry::{mirror_point, mirror_points, Symmetry, SymmetryError, SymmetryHierarchy};
pub use mask::{BooleanMask, Grid, ScalarMask, ThresholdDirection};
pub use map::{AiMarker, GameMap, MarkerKind, WaterSettings};
pub use generator::{AiMarkerGenerator, MarkerConfig, MexConfig, MexGenerator};
pub use pipeline::{Pipeline, PipelineError, TransformConfig, TransformContext, TransformStage};
pub use io::{load_map, save_map, MapDocument, MapIoError};
