//! Transform configuration.

use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::generator::{MarkerConfig, MexConfig};

/// Errors that can occur while loading a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// Everything the transform pipeline reads besides the map itself.
///
/// Every field has a default, so a JSON file only needs the values it
/// overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformConfig {
    /// Seed for the placement generators.
    pub seed: u64,

    /// Slope above which terrain is impassable.
    pub slope_cutoff: f32,
    /// Erosion applied to the passable mask.
    pub passable_deflate: f32,
    /// Erosion applied to land before it is intersected with passable.
    pub land_deflate: f32,
    /// Erosion applied to water; keeps naval markers off the shore.
    pub water_deflate: f32,
    /// Border cleared from the passable and water masks.
    pub edge_margin: usize,
    /// Height above the water line where plateaus start.
    pub plateau_offset: f32,

    pub mex: MexConfig,
    pub markers: MarkerConfig,

    /// Write intermediate masks as PNGs.
    pub debug: bool,
    /// Where debug PNGs go; `./debug` when unset.
    pub debug_dir: Option<PathBuf>,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            slope_cutoff: 0.75,
            passable_deflate: 6.0,
            land_deflate: 4.0,
            water_deflate: 16.0,
            edge_margin: 8,
            plateau_offset: 5.0,
            mex: MexConfig::default(),
            markers: MarkerConfig::default(),
            debug: false,
            debug_dir: None,
        }
    }
}

impl TransformConfig {
    /// Default configuration with the given seed.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Default::default()
        }
    }

    /// Reads a JSON configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Directory for debug dumps.
    pub fn debug_dir(&self) -> PathBuf {
        self.debug_dir.clone().unwrap_or_else(|| PathBuf::from("debug"))
    }

    /// Seed of the mex generator.
    pub fn mex_seed(&self) -> u64 {
        self.seed
    }

    /// Seed of the AI marker generator, distinct from the mex seed.
    pub fn marker_seed(&self) -> u64 {
        self.seed.wrapping_add(1)
    }
}
