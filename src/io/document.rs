//! The `map.json` document.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::map::{GameMap, MarkerKind, WaterSettings};

fn default_height_scale() -> f32 {
    256.0
}

/// A marker as written to `map.json`, with neighbours referenced by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedMarker {
    pub name: String,
    pub kind: MarkerKind,
    pub position: Vec3,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub adjacent_to: Vec<String>,
}

/// Map description read from and written to a map folder.
///
/// Inputs (`size`, `spawns`, `mex_count`, `water`, `heightmap`,
/// `height_scale`) are read; `mexes` and `markers` are filled in on export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapDocument {
    #[serde(default)]
    pub name: String,
    pub size: usize,
    pub spawns: Vec<Vec2>,
    pub mex_count: usize,
    #[serde(default)]
    pub water: WaterSettings,
    /// Heightmap file name, relative to the folder.
    pub heightmap: String,
    /// Height of a full-scale 16-bit sample.
    #[serde(default = "default_height_scale")]
    pub height_scale: f32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mexes: Vec<Vec3>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub markers: Vec<NamedMarker>,
}

impl MapDocument {
    /// Document for `map`, keeping this document's inputs.
    pub fn with_entities(&self, map: &GameMap) -> Self {
        let mut markers = Vec::new();
        for kind in MarkerKind::all() {
            let list = map.markers(kind);
            markers.extend(list.iter().map(|m| NamedMarker {
                name: m.name(kind),
                kind,
                position: m.position,
                adjacent_to: m.neighbors.iter().map(|&n| list[n].name(kind)).collect(),
            }));
        }
        Self {
            mexes: map.mexes().to_vec(),
            markers,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use crate::mask::ScalarMask;
    use crate::symmetry::{Symmetry, SymmetryHierarchy};

    #[test]
    fn test_minimal_document_uses_defaults() {
        let json = r#"{
            "size": 256,
            "spawns": [[64.0, 64.0], [191.0, 191.0]],
            "mex_count": 20,
            "heightmap": "height.png"
        }"#;
        let doc: MapDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.spawns[1], Vec2::new(191.0, 191.0));
        assert_eq!(doc.height_scale, 256.0);
        assert!(!doc.water.present);
        assert!(doc.mexes.is_empty());
    }

    #[test]
    fn test_with_entities_names_neighbours() {
        let sym = Arc::new(SymmetryHierarchy::uniform(Symmetry::Point).unwrap());
        let mut map = GameMap::new(ScalarMask::new(16, sym), WaterSettings::default(), Vec::new(), 2);
        map.add_mex(Vec2::new(3.0, 4.0));
        let a = map.add_marker(MarkerKind::Naval, Vec2::new(2.0, 2.0));
        let b = map.add_marker(MarkerKind::Naval, Vec2::new(5.0, 2.0));
        map.link_markers(MarkerKind::Naval, a, b);
        map.add_expansion_marker(Vec2::new(8.0, 8.0));

        let doc = MapDocument {
            name: "test".to_string(),
            size: 16,
            spawns: Vec::new(),
            mex_count: 2,
            water: WaterSettings::default(),
            heightmap: "h.raw".to_string(),
            height_scale: 1.0,
            mexes: Vec::new(),
            markers: Vec::new(),
        }
        .with_entities(&map);

        assert_eq!(doc.mexes, vec![Vec3::new(3.0, 0.0, 4.0)]);
        assert_eq!(doc.markers.len(), 3);
        assert_eq!(doc.markers[0].name, "Expansion Area 0");
        let naval = &doc.markers[1];
        assert_eq!(naval.name, "NavalPN 0");
        assert_eq!(naval.adjacent_to, vec!["NavalPN 1".to_string()]);
    }
}
