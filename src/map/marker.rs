//! AI markers: expansion areas and navigation graph nodes.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Category of an AI marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarkerKind {
    /// Small expansion area (fewer than the large-expansion mex count).
    Expansion,
    /// Large expansion area.
    LargeExpansion,
    /// Navigation node for land units.
    Land,
    /// Navigation node for amphibious units (land and shallow water).
    Amphibious,
    /// Navigation node for naval units.
    Naval,
    /// Navigation node for air units.
    Air,
}

impl MarkerKind {
    pub fn all() -> [MarkerKind; 6] {
        [
            MarkerKind::Expansion,
            MarkerKind::LargeExpansion,
            MarkerKind::Land,
            MarkerKind::Amphibious,
            MarkerKind::Naval,
            MarkerKind::Air,
        ]
    }

    /// Storage slot used by [`crate::map::GameMap`].
    pub fn index(&self) -> usize {
        match self {
            MarkerKind::Expansion => 0,
            MarkerKind::LargeExpansion => 1,
            MarkerKind::Land => 2,
            MarkerKind::Amphibious => 3,
            MarkerKind::Naval => 4,
            MarkerKind::Air => 5,
        }
    }

    /// Prefix of the marker names the game expects.
    pub fn prefix(&self) -> &'static str {
        match self {
            MarkerKind::Expansion => "Expansion Area",
            MarkerKind::LargeExpansion => "Large Expansion Area",
            MarkerKind::Land => "LandPN",
            MarkerKind::Amphibious => "AmphPN",
            MarkerKind::Naval => "NavalPN",
            MarkerKind::Air => "AirPN",
        }
    }
}

/// A single marker. `position` is `(x, height, z)` with `z` the map's y axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiMarker {
    pub id: usize,
    pub position: Vec3,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub neighbors: Vec<usize>,
}

impl AiMarker {
    /// Creates an unsnapped marker (height 0) at a map position.
    pub fn new(id: usize, location: Vec2) -> Self {
        Self {
            id,
            position: Vec3::new(location.x, 0.0, location.y),
            neighbors: Vec::new(),
        }
    }

    /// Map-plane position.
    pub fn location(&self) -> Vec2 {
        Vec2::new(self.position.x, self.position.z)
    }

    pub fn name(&self, kind: MarkerKind) -> String {
        format!("{} {}", kind.prefix(), self.id)
    }
}
