//! Transform stage trait and pipeline orchestration.

use std::path::Path;
use thiserror::Error;
use tracing::info;

use crate::export::{export_mask_png, export_scalar_png_auto, PngExportError, PngExportOptions};
use crate::generator::{AiMarkerGenerator, MexGenerator};
use crate::mask::BooleanMask;
use super::config::TransformConfig;
use super::context::{PassabilityMasks, TransformContext};

/// Unique identifier for transform stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageId {
    /// Land, slope and passability masks from the heightmap.
    Passability,
    /// Mex and expansion placement.
    Mexes,
    /// Navigation marker placement and linking.
    AiMarkers,
    /// Projection of every entity onto the heightmap.
    HeightSnap,
}

impl StageId {
    /// Returns the name of the stage.
    pub fn name(&self) -> &'static str {
        match self {
            StageId::Passability => "passability",
            StageId::Mexes => "mexes",
            StageId::AiMarkers => "ai_markers",
            StageId::HeightSnap => "height_snap",
        }
    }
}

/// Errors that can occur during pipeline execution.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Stage '{0}' failed: {1}")]
    StageFailed(String, String),
    #[error("Missing dependency: stage '{0}' requires '{1}'")]
    MissingDependency(String, String),
    #[error("Debug dump failed: {0}")]
    DebugDump(#[from] PngExportError),
}

/// A step of the map transform.
///
/// Stages read and extend the [`TransformContext`]; later stages declare the
/// earlier ones they rely on and the [`Pipeline`] refuses to run them out of
/// order.
pub trait TransformStage: Send + Sync {
    /// Returns the unique identifier for this stage.
    fn id(&self) -> StageId;

    /// Returns a human-readable name for the stage.
    fn name(&self) -> &str;

    /// Returns the stage IDs that must be executed before this stage.
    fn dependencies(&self) -> &[StageId] {
        &[]
    }

    /// Executes the stage, modifying the context in place.
    ///
    /// # Arguments
    /// * `ctx` - The map and the products of earlier stages
    /// * `config` - Transform configuration
    fn execute(&self, ctx: &mut TransformContext, config: &TransformConfig) -> Result<(), PipelineError>;
}

/// Runs transform stages in order.
pub struct Pipeline {
    stages: Vec<Box<dyn TransformStage>>,
    config: TransformConfig,
}

impl Pipeline {
    /// Creates a new empty pipeline with the given configuration.
    pub fn new(config: TransformConfig) -> Self {
        Self {
            stages: Vec::new(),
            config,
        }
    }

    /// Pipeline with every stage of a full map transform.
    pub fn standard(config: TransformConfig) -> Self {
        let mut pipeline = Self::new(config);
        pipeline
            .add_stage(PassabilityStage)
            .add_stage(MexStage)
            .add_stage(AiMarkerStage)
            .add_stage(HeightSnapStage);
        pipeline
    }

    /// Adds a stage to the pipeline.
    pub fn add_stage<S: TransformStage + 'static>(&mut self, stage: S) -> &mut Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Returns the number of stages in the pipeline.
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    pub fn config(&self) -> &TransformConfig {
        &self.config
    }

    /// Executes all stages in order.
    pub fn run(&self, ctx: &mut TransformContext) -> Result<(), PipelineError> {
        self.run_with_callbacks(ctx, |_, _, _| {}, |_, _, _| {})
    }

    /// Executes all stages with progress callbacks.
    ///
    /// # Arguments
    /// * `ctx` - The context to transform
    /// * `on_stage_start` - Called when each stage begins
    /// * `on_stage_complete` - Called when each stage finishes
    pub fn run_with_callbacks<F1, F2>(
        &self,
        ctx: &mut TransformContext,
        mut on_stage_start: F1,
        mut on_stage_complete: F2,
    ) -> Result<(), PipelineError>
    where
        F1: FnMut(&str, usize, usize),
        F2: FnMut(&str, usize, usize),
    {
        let total = self.stages.len();
        let mut completed: Vec<StageId> = Vec::new();

        for (i, stage) in self.stages.iter().enumerate() {
            on_stage_start(stage.name(), i, total);

            for dep in stage.dependencies() {
                if !completed.contains(dep) {
                    return Err(PipelineError::MissingDependency(
                        stage.name().to_string(),
                        dep.name().to_string(),
                    ));
                }
            }

            stage.execute(ctx, &self.config)?;
            completed.push(stage.id());

            on_stage_complete(stage.name(), i, total);
        }

        Ok(())
    }
}

fn missing_masks(stage: &dyn TransformStage) -> PipelineError {
    PipelineError::StageFailed(stage.name().to_string(), "passability masks not computed".to_string())
}

fn dump_mask(dir: &Path, name: &str, mask: &BooleanMask) -> Result<(), PipelineError> {
    std::fs::create_dir_all(dir).map_err(PngExportError::from)?;
    export_mask_png(mask, &dir.join(format!("{name}.png")), &PngExportOptions::fast())?;
    Ok(())
}

/// Derives land, slope and passability masks from the heightmap.
pub struct PassabilityStage;

impl TransformStage for PassabilityStage {
    fn id(&self) -> StageId {
        StageId::Passability
    }

    fn name(&self) -> &str {
        "Passability Masks"
    }

    fn execute(&self, ctx: &mut TransformContext, config: &TransformConfig) -> Result<(), PipelineError> {
        let masks = PassabilityMasks::compute(ctx.map.heightmap(), ctx.map.water(), config);
        info!(
            land = masks.land.count(),
            passable = masks.passable.count(),
            passable_land = masks.passable_land.count(),
            passable_water = masks.passable_water.count(),
            plateau = masks.plateau.count(),
            "passability masks computed"
        );

        if config.debug {
            let dir = config.debug_dir();
            for (name, mask) in masks.named_masks() {
                dump_mask(&dir, name, mask)?;
            }
            std::fs::create_dir_all(&dir).map_err(PngExportError::from)?;
            export_scalar_png_auto(ctx.map.heightmap(), &dir.join("heightmap.png"), &PngExportOptions::fast())?;
            export_scalar_png_auto(&masks.slope, &dir.join("slope.png"), &PngExportOptions::fast())?;
        }

        ctx.masks = Some(masks);
        Ok(())
    }
}

/// Places mexes and expansion markers.
pub struct MexStage;

impl TransformStage for MexStage {
    fn id(&self) -> StageId {
        StageId::Mexes
    }

    fn name(&self) -> &str {
        "Mex Placement"
    }

    fn dependencies(&self) -> &[StageId] {
        &[StageId::Passability]
    }

    fn execute(&self, ctx: &mut TransformContext, config: &TransformConfig) -> Result<(), PipelineError> {
        let masks = ctx.masks.as_ref().ok_or_else(|| missing_masks(self))?;
        let mut generator = MexGenerator::new(config.mex_seed(), config.mex.clone());
        let summary = generator.generate_mexes(&mut ctx.map, &masks.passable_land, &masks.plateau, &masks.passable_water);
        info!(
            placed = summary.total(),
            target = ctx.map.mex_target(),
            small_expansions = summary.small_expansions,
            large_expansions = summary.large_expansions,
            "mexes placed"
        );

        if config.debug {
            let mut placed = BooleanMask::new(ctx.map.size(), 0, ctx.map.symmetry().clone());
            for i in 0..ctx.map.mex_count() {
                placed.fill_circle(ctx.map.mex_location(i), 2.0, true);
            }
            dump_mask(&config.debug_dir(), "mexes", &placed)?;
        }

        ctx.mex_summary = Some(summary);
        Ok(())
    }
}

/// Places and links navigation markers.
pub struct AiMarkerStage;

impl TransformStage for AiMarkerStage {
    fn id(&self) -> StageId {
        StageId::AiMarkers
    }

    fn name(&self) -> &str {
        "AI Markers"
    }

    fn dependencies(&self) -> &[StageId] {
        &[StageId::Passability]
    }

    fn execute(&self, ctx: &mut TransformContext, config: &TransformConfig) -> Result<(), PipelineError> {
        let masks = ctx.masks.as_ref().ok_or_else(|| missing_masks(self))?;
        let mut generator = AiMarkerGenerator::new(config.marker_seed(), config.markers.clone());
        let summary = generator.generate_ai_markers(&mut ctx.map, &masks.passable, &masks.passable_land, &masks.passable_water);
        info!(markers = summary.total(), links = summary.links, "ai markers placed");
        ctx.marker_summary = Some(summary);
        Ok(())
    }
}

/// Snaps mexes and markers to the terrain height.
pub struct HeightSnapStage;

impl TransformStage for HeightSnapStage {
    fn id(&self) -> StageId {
        StageId::HeightSnap
    }

    fn name(&self) -> &str {
        "Height Snapping"
    }

    fn dependencies(&self) -> &[StageId] {
        &[StageId::Mexes, StageId::AiMarkers]
    }

    fn execute(&self, ctx: &mut TransformContext, _config: &TransformConfig) -> Result<(), PipelineError> {
        ctx.map.set_mex_heights();
        ctx.map.set_marker_heights();
        Ok(())
    }
}
