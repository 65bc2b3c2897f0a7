//! Placement generator configuration.

use serde::{Deserialize, Serialize};

/// Parameters for mex (resource point) placement.
///
/// Distances are in cells. Counts of mexes are always even because mexes are
/// placed in symmetric pairs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MexConfig {
    /// Radius of a spawn's start area; the near tier samples between
    /// `spawn_size` and `3 * spawn_size` from the spawn.
    pub spawn_size: f32,
    /// Minimum distance between mexes of the near and fallback tiers.
    pub mex_spacing: f32,

    /// Inner radius of the base annulus around each spawn.
    pub base_inner_radius: f32,
    /// Outer radius of the base annulus around each spawn.
    pub base_outer_radius: f32,
    /// Minimum distance between base mexes.
    pub base_spacing: f32,
    /// Smallest number of base pairs per spawn.
    pub base_min_pairs: usize,
    /// Largest number of base pairs per spawn.
    pub base_max_pairs: usize,
    /// Total base + near pairs per spawn before randomization.
    pub near_total_pairs: usize,

    /// Radius cleared around each spawn before the fallback tiers.
    pub spawn_clearance: f32,
    /// Radius of the no-spawn zone the plateau/land split is computed on.
    pub mex_spawn_distance: f32,

    /// Expansions are attempted only when more than this many pairs remain
    /// after the spawn tiers.
    pub expansion_pair_threshold: usize,
    /// Half-size of the square window around an expansion anchor.
    pub expansion_size: f32,
    /// Minimum distance between expansion anchors.
    pub expansion_spacing: f32,
    /// Radius of the central region that never holds an expansion.
    pub expansion_center_exclusion: f32,
    /// Minimum distance between mexes of one expansion.
    pub expansion_mex_spacing: f32,
    /// Fraction of the anchor window that must be spawnable.
    pub expansion_density: f32,
    /// Smallest number of pairs in one expansion.
    pub expansion_min_pairs: usize,
    /// Largest number of pairs in one expansion.
    pub expansion_max_pairs: usize,
    /// Expansions with at least this many mexes are marked large.
    pub large_expansion_mex_count: usize,
}

impl Default for MexConfig {
    fn default() -> Self {
        Self {
            spawn_size: 24.0,
            mex_spacing: 16.0,

            base_inner_radius: 5.0,
            base_outer_radius: 15.0,
            base_spacing: 10.0,
            base_min_pairs: 3,
            base_max_pairs: 4,
            near_total_pairs: 5,

            spawn_clearance: 24.0,
            mex_spawn_distance: 32.0,

            expansion_pair_threshold: 10,
            expansion_size: 10.0,
            expansion_spacing: 96.0,
            expansion_center_exclusion: 96.0,
            expansion_mex_spacing: 10.0,
            expansion_density: 0.5,
            expansion_min_pairs: 2,
            expansion_max_pairs: 4,
            large_expansion_mex_count: 6,
        }
    }
}

impl MexConfig {
    /// Tighter spacing for small maps or high mex counts.
    pub fn dense() -> Self {
        Self {
            mex_spacing: 10.0,
            expansion_spacing: 64.0,
            expansion_center_exclusion: 48.0,
            ..Default::default()
        }
    }

    /// Wider spacing for large maps.
    pub fn sparse() -> Self {
        Self {
            spawn_size: 32.0,
            mex_spacing: 24.0,
            expansion_spacing: 128.0,
            ..Default::default()
        }
    }
}

/// Parameters for AI navigation marker placement.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerConfig {
    /// Spacing of land and amphibious path nodes.
    pub marker_spacing: f32,
    /// Spacing of naval path nodes.
    pub naval_marker_spacing: f32,
    /// Lattice pitch of air path nodes.
    pub air_marker_spacing: usize,
    /// Nodes closer than `link_factor * spacing` are linked when the straight
    /// segment between them stays inside their mask.
    pub link_factor: f32,
    /// Place path nodes in mirrored pairs.
    pub symmetric: bool,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            marker_spacing: 8.0,
            naval_marker_spacing: 16.0,
            air_marker_spacing: 64,
            link_factor: 2.0,
            symmetric: false,
        }
    }
}
