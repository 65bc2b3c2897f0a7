//! The map aggregate the generators append entities to.

use std::sync::Arc;

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::mask::ScalarMask;
use crate::symmetry::SymmetryHierarchy;
use super::marker::{AiMarker, MarkerKind};

/// Water presence and surface elevation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaterSettings {
    pub present: bool,
    pub elevation: f32,
}

impl Default for WaterSettings {
    fn default() -> Self {
        Self {
            present: false,
            elevation: 0.0,
        }
    }
}

impl WaterSettings {
    /// Height separating land from water; `0.0` when the map has no water.
    pub fn land_threshold(&self) -> f32 {
        if self.present {
            self.elevation
        } else {
            0.0
        }
    }
}

/// In-memory map: heightmap, spawns and every generated entity.
///
/// Entity collections are append-only. Generators push symmetric entities in
/// pairs, so entries `2k` and `2k + 1` of a collection are mirror images.
#[derive(Debug, Clone)]
pub struct GameMap {
    heightmap: ScalarMask,
    water: WaterSettings,
    spawns: Vec<Vec2>,
    mex_target: usize,
    mexes: Vec<Vec3>,
    markers: [Vec<AiMarker>; 6],
}

impl GameMap {
    /// Creates a map around a heightmap.
    ///
    /// # Panics
    /// Panics if the spawn count is odd or a spawn lies outside the map.
    pub fn new(heightmap: ScalarMask, water: WaterSettings, spawns: Vec<Vec2>, mex_target: usize) -> Self {
        assert!(spawns.len() % 2 == 0, "spawns must come in symmetric pairs, got {}", spawns.len());
        for spawn in &spawns {
            assert!(heightmap.grid().in_bounds(*spawn), "spawn {spawn} outside the map");
        }
        Self {
            heightmap,
            water,
            spawns,
            mex_target,
            mexes: Vec::new(),
            markers: Default::default(),
        }
    }

    pub fn size(&self) -> usize {
        self.heightmap.size()
    }

    pub fn symmetry(&self) -> &Arc<SymmetryHierarchy> {
        self.heightmap.symmetry()
    }

    pub fn heightmap(&self) -> &ScalarMask {
        &self.heightmap
    }

    pub fn water(&self) -> WaterSettings {
        self.water
    }

    pub fn spawns(&self) -> &[Vec2] {
        &self.spawns
    }

    pub fn spawn(&self, i: usize) -> Vec2 {
        self.spawns[i]
    }

    pub fn spawn_count(&self) -> usize {
        self.spawns.len()
    }

    /// Number of mexes the generator aims for.
    pub fn mex_target(&self) -> usize {
        self.mex_target
    }

    pub fn set_mex_target(&mut self, target: usize) {
        self.mex_target = target;
    }

    pub fn mexes(&self) -> &[Vec3] {
        &self.mexes
    }

    pub fn mex_count(&self) -> usize {
        self.mexes.len()
    }

    /// Map-plane position of mex `i`.
    pub fn mex_location(&self, i: usize) -> Vec2 {
        let p = self.mexes[i];
        Vec2::new(p.x, p.z)
    }

    /// Appends an unsnapped mex.
    pub fn add_mex(&mut self, location: Vec2) {
        self.mexes.push(Vec3::new(location.x, 0.0, location.y));
    }

    pub fn markers(&self, kind: MarkerKind) -> &[AiMarker] {
        &self.markers[kind.index()]
    }

    pub fn marker_count(&self, kind: MarkerKind) -> usize {
        self.markers[kind.index()].len()
    }

    /// Appends a marker of `kind`, numbered by its position in the collection.
    pub fn add_marker(&mut self, kind: MarkerKind, location: Vec2) -> usize {
        let list = &mut self.markers[kind.index()];
        let id = list.len();
        list.push(AiMarker::new(id, location));
        id
    }

    /// Records a two-way link between markers `a` and `b` of `kind`.
    pub fn link_markers(&mut self, kind: MarkerKind, a: usize, b: usize) {
        let list = &mut self.markers[kind.index()];
        if a == b {
            return;
        }
        if !list[a].neighbors.contains(&b) {
            list[a].neighbors.push(b);
        }
        if !list[b].neighbors.contains(&a) {
            list[b].neighbors.push(a);
        }
    }

    pub fn add_expansion_marker(&mut self, location: Vec2) -> usize {
        self.add_marker(MarkerKind::Expansion, location)
    }

    pub fn add_large_expansion_marker(&mut self, location: Vec2) -> usize {
        self.add_marker(MarkerKind::LargeExpansion, location)
    }

    /// Projects a map-plane position onto the heightmap.
    pub fn place_on_heightmap(&self, location: Vec2) -> Vec3 {
        Vec3::new(location.x, self.heightmap.sample_bilinear(location), location.y)
    }

    /// Snaps every mex to the terrain height under it.
    pub fn set_mex_heights(&mut self) {
        for i in 0..self.mexes.len() {
            let location = self.mex_location(i);
            self.mexes[i] = self.place_on_heightmap(location);
        }
    }

    /// Snaps every marker to the terrain height under it.
    pub fn set_marker_heights(&mut self) {
        let heightmap = &self.heightmap;
        for list in self.markers.iter_mut() {
            for marker in list.iter_mut() {
                let location = marker.location();
                marker.position.y = heightmap.sample_bilinear(location);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symmetry::Symmetry;

    fn map() -> GameMap {
        let symmetry = Arc::new(SymmetryHierarchy::uniform(Symmetry::Point).unwrap());
        let values: Vec<f32> = (0..16 * 16).map(|i| (i % 16) as f32).collect();
        let heightmap = ScalarMask::from_values(16, values, symmetry);
        GameMap::new(
            heightmap,
            WaterSettings::default(),
            vec![Vec2::new(2.0, 2.0), Vec2::new(13.0, 13.0)],
            8,
        )
    }

    #[test]
    #[should_panic(expected = "pairs")]
    fn test_odd_spawns_rejected() {
        let symmetry = Arc::new(SymmetryHierarchy::uniform(Symmetry::Point).unwrap());
        GameMap::new(ScalarMask::new(8, symmetry), WaterSettings::default(), vec![Vec2::ZERO], 0);
    }

    #[test]
    fn test_add_and_snap_mexes() {
        let mut map = map();
        map.add_mex(Vec2::new(5.0, 1.0));
        map.add_mex(Vec2::new(10.0, 14.0));
        assert_eq!(map.mexes()[0], Vec3::new(5.0, 0.0, 1.0));

        map.set_mex_heights();
        assert_eq!(map.mexes()[0], Vec3::new(5.0, 5.0, 1.0));
        assert_eq!(map.mexes()[1].y, 10.0);
        assert_eq!(map.mex_location(1), Vec2::new(10.0, 14.0));
    }

    #[test]
    fn test_markers_are_numbered_and_linked() {
        let mut map = map();
        let a = map.add_marker(MarkerKind::Land, Vec2::new(3.0, 3.0));
        let b = map.add_marker(MarkerKind::Land, Vec2::new(6.0, 3.0));
        assert_eq!((a, b), (0, 1));
        map.link_markers(MarkerKind::Land, a, b);
        map.link_markers(MarkerKind::Land, b, a);
        assert_eq!(map.markers(MarkerKind::Land)[0].neighbors, vec![1]);
        assert_eq!(map.markers(MarkerKind::Land)[1].neighbors, vec![0]);
        assert_eq!(map.marker_count(MarkerKind::Naval), 0);

        map.set_marker_heights();
        assert_eq!(map.markers(MarkerKind::Land)[1].position.y, 6.0);
    }

    #[test]
    fn test_land_threshold() {
        assert_eq!(WaterSettings { present: true, elevation: 25.0 }.land_threshold(), 25.0);
        assert_eq!(WaterSettings { present: false, elevation: 25.0 }.land_threshold(), 0.0);
    }
}
