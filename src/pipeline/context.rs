//! State threaded through the transform stages.

use crate::generator::{MarkerSummary, MexSummary};
use crate::map::{GameMap, WaterSettings};
use crate::mask::{BooleanMask, ScalarMask, ThresholdDirection};
use super::config::TransformConfig;

/// Masks derived from the heightmap by the passability stage.
#[derive(Debug, Clone)]
pub struct PassabilityMasks {
    /// Cells above the water line.
    pub land: BooleanMask,
    /// Gradient magnitude of the heightmap.
    pub slope: ScalarMask,
    /// Flat enough to walk on, away from cliffs and the map border.
    pub passable: BooleanMask,
    /// Passable land away from the shore.
    pub passable_land: BooleanMask,
    /// Open water away from the shore and the map border.
    pub passable_water: BooleanMask,
    /// Passable land well above the water line.
    pub plateau: BooleanMask,
}

impl PassabilityMasks {
    /// Derives every mask from `heightmap`. The heightmap is not modified.
    pub fn compute(heightmap: &ScalarMask, water: WaterSettings, config: &TransformConfig) -> Self {
        let seed = config.seed;
        let water_height = water.land_threshold();

        let land = BooleanMask::threshold(heightmap, water_height, ThresholdDirection::Above, seed);

        let mut slope = heightmap.copy();
        slope.gradient();

        let mut passable = BooleanMask::threshold(&slope, config.slope_cutoff, ThresholdDirection::Above, seed);
        passable
            .invert()
            .deflate(config.passable_deflate)
            .trim_edge(config.edge_margin);

        let mut passable_land = land.copy_with_seed(seed);
        passable_land.deflate(config.land_deflate).intersect(&passable);

        let mut passable_water = land.copy_with_seed(seed);
        passable_water
            .invert()
            .deflate(config.water_deflate)
            .trim_edge(config.edge_margin);

        let mut plateau = BooleanMask::threshold(
            heightmap,
            water_height + config.plateau_offset,
            ThresholdDirection::Above,
            seed,
        );
        plateau.intersect(&passable_land);

        Self {
            land,
            slope,
            passable,
            passable_land,
            passable_water,
            plateau,
        }
    }

    /// Boolean masks with their dump names.
    pub fn named_masks(&self) -> [(&'static str, &BooleanMask); 5] {
        [
            ("land", &self.land),
            ("passable", &self.passable),
            ("passable_land", &self.passable_land),
            ("passable_water", &self.passable_water),
            ("plateau", &self.plateau),
        ]
    }
}

/// The map under transformation plus what earlier stages produced.
#[derive(Debug)]
pub struct TransformContext {
    pub map: GameMap,
    pub masks: Option<PassabilityMasks>,
    pub mex_summary: Option<MexSummary>,
    pub marker_summary: Option<MarkerSummary>,
}

impl TransformContext {
    pub fn new(map: GameMap) -> Self {
        Self {
            map,
            masks: None,
            mex_summary: None,
            marker_summary: None,
        }
    }

    pub fn into_map(self) -> GameMap {
        self.map
    }
}
