//! Pipeline module for orchestrating the map transform.
//!
//! Provides a trait-based architecture for the transform stages
//! (passability, mexes, AI markers, height snapping) that run over one map.

mod config;
mod context;
mod stage;

pub use config::{ConfigError, TransformConfig};
pub use context::{PassabilityMasks, TransformContext};
pub use stage::{
    TransformStage, StageId, Pipeline, PipelineError,
    PassabilityStage, MexStage, AiMarkerStage, HeightSnapStage,
};
