//! The three symmetry axes a map is built with.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::types::{mirror_point, Symmetry, SymmetryError};

/// Terrain, team and spawn symmetry of a map.
///
/// Built with [`SymmetryHierarchy::new`] and finished with
/// [`SymmetryHierarchy::with_spawn_symmetry`]; masks share it behind an `Arc`
/// so it is immutable for the rest of the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymmetryHierarchy {
    terrain: Symmetry,
    team: Symmetry,
    spawn: Symmetry,
}

impl SymmetryHierarchy {
    /// Creates a hierarchy with the default spawn symmetry (`Point`).
    pub fn new(terrain: Symmetry, team: Symmetry) -> Self {
        Self {
            terrain,
            team,
            spawn: Symmetry::Point,
        }
    }

    /// Sets the spawn symmetry. Only two-fold symmetries pair spawns.
    pub fn with_spawn_symmetry(mut self, spawn: Symmetry) -> Result<Self, SymmetryError> {
        if !spawn.is_two_fold() {
            return Err(SymmetryError::InvalidSpawnSymmetry(spawn));
        }
        self.spawn = spawn;
        Ok(self)
    }

    /// Builds a hierarchy from symmetry names as given on the command line.
    pub fn parse(terrain: &str, team: &str, spawn: &str) -> Result<Self, SymmetryError> {
        Self::new(terrain.parse()?, team.parse()?).with_spawn_symmetry(spawn.parse()?)
    }

    /// Uses one symmetry for all three axes.
    pub fn uniform(symmetry: Symmetry) -> Result<Self, SymmetryError> {
        Self::new(symmetry, symmetry).with_spawn_symmetry(symmetry)
    }

    pub fn terrain_symmetry(&self) -> Symmetry {
        self.terrain
    }

    pub fn team_symmetry(&self) -> Symmetry {
        self.team
    }

    pub fn spawn_symmetry(&self) -> Symmetry {
        self.spawn
    }

    /// Mirrors `point` through the spawn symmetry, which pairs placed entities.
    pub fn symmetry_point(&self, point: Vec2, size: usize) -> Vec2 {
        mirror_point(point, self.spawn, size)
    }
}
