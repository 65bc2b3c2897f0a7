//! AI navigation marker placement and linking.

use std::collections::HashMap;

use glam::Vec2;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::map::{GameMap, MarkerKind};
use crate::mask::BooleanMask;
use super::config::MarkerConfig;

/// Markers and links placed by one [`AiMarkerGenerator::generate_ai_markers`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarkerSummary {
    pub amphibious: usize,
    pub land: usize,
    pub naval: usize,
    pub air: usize,
    /// Two-way links across all kinds.
    pub links: usize,
}

impl MarkerSummary {
    pub fn total(&self) -> usize {
        self.amphibious + self.land + self.naval + self.air
    }
}

/// Scatters navigation nodes over the passability masks and links nearby
/// nodes that can see each other.
pub struct AiMarkerGenerator {
    rng: ChaCha8Rng,
    config: MarkerConfig,
}

impl AiMarkerGenerator {
    pub fn new(seed: u64, config: MarkerConfig) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            config,
        }
    }

    /// Places amphibious nodes on `passable`, land nodes on `passable_land`,
    /// naval nodes on `passable_water` and an air lattice over the whole map.
    ///
    /// Kinds are generated in that order, each consuming one shuffle of its
    /// mask's true cells.
    pub fn generate_ai_markers(
        &mut self,
        map: &mut GameMap,
        passable: &BooleanMask,
        passable_land: &BooleanMask,
        passable_water: &BooleanMask,
    ) -> MarkerSummary {
        let spacing = self.config.marker_spacing;
        let naval_spacing = self.config.naval_marker_spacing;

        let mut summary = MarkerSummary::default();
        let (amphibious, links) = self.place_path_nodes(map, MarkerKind::Amphibious, passable, spacing);
        summary.amphibious = amphibious;
        summary.links += links;
        let (land, links) = self.place_path_nodes(map, MarkerKind::Land, passable_land, spacing);
        summary.land = land;
        summary.links += links;
        let (naval, links) = self.place_path_nodes(map, MarkerKind::Naval, passable_water, naval_spacing);
        summary.naval = naval;
        summary.links += links;
        let (air, links) = self.place_air_nodes(map);
        summary.air = air;
        summary.links += links;

        debug!(
            amphibious = summary.amphibious,
            land = summary.land,
            naval = summary.naval,
            air = summary.air,
            links = summary.links,
            "ai markers placed"
        );
        summary
    }

    fn place_path_nodes(&mut self, map: &mut GameMap, kind: MarkerKind, mask: &BooleanMask, spacing: f32) -> (usize, usize) {
        let points = scatter(mask, spacing, self.config.symmetric, &mut self.rng);
        let first = map.marker_count(kind);
        for &point in &points {
            map.add_marker(kind, point);
        }
        let links = link_markers(map, kind, first, spacing * self.config.link_factor, Some(mask));
        (points.len(), links)
    }

    fn place_air_nodes(&mut self, map: &mut GameMap) -> (usize, usize) {
        let step = self.config.air_marker_spacing.max(1);
        let size = map.size();
        let first = map.marker_count(MarkerKind::Air);
        let mut placed = 0;
        for y in (step / 2..size).step_by(step) {
            for x in (step / 2..size).step_by(step) {
                map.add_marker(MarkerKind::Air, Vec2::new(x as f32, y as f32));
                placed += 1;
            }
        }
        // Reaches the diagonal neighbours at step * sqrt(2), not the next ring.
        let radius = step as f32 * 1.5;
        let links = link_markers(map, MarkerKind::Air, first, radius, None);
        (placed, links)
    }
}

/// Picks points from `mask` no closer than `spacing` to each other.
///
/// Visiting the true cells in shuffled order and keeping the ones that are
/// still free is the same as repeatedly drawing a uniform free cell, but costs
/// one pass over the mask instead of one per point. With `symmetric`, only
/// the sampled half is visited and points are emitted as mirrored pairs;
/// candidates whose mirror falls outside `mask` are skipped.
pub fn scatter(mask: &BooleanMask, spacing: f32, symmetric: bool, rng: &mut ChaCha8Rng) -> Vec<Vec2> {
    let mut free = mask.copy_with_seed(rng.random());
    if symmetric {
        free.fill_half(false);
    }
    let mut candidates: Vec<(usize, usize)> = free.true_cells().collect();
    candidates.shuffle(rng);

    let mut points = Vec::new();
    for (x, y) in candidates {
        if !free.get(x, y) {
            continue;
        }
        let location = Vec2::new(x as f32, y as f32);
        if !symmetric {
            free.fill_circle(location, spacing, false);
            points.push(location);
            continue;
        }
        let mirror = free.get_symmetry_point(location);
        if location.distance(mirror) < spacing || !mask.get_point(mirror) {
            free.set(x, y, false);
            continue;
        }
        free.fill_circle(location, spacing, false)
            .fill_circle(mirror, spacing, false);
        points.push(location);
        points.push(mirror);
    }
    points
}

/// Links markers of `kind` from index `first` on that lie within `radius` of
/// each other and, when `mask` is given, see each other through it. Returns
/// the number of links made.
fn link_markers(map: &mut GameMap, kind: MarkerKind, first: usize, radius: f32, mask: Option<&BooleanMask>) -> usize {
    let bucket_size = radius.max(1.0);
    let bucket_of = |p: Vec2| ((p.x / bucket_size) as i32, (p.y / bucket_size) as i32);

    let locations: Vec<Vec2> = map.markers(kind)[first..].iter().map(|m| m.location()).collect();
    let mut buckets: HashMap<(i32, i32), Vec<usize>> = HashMap::new();
    for (i, &p) in locations.iter().enumerate() {
        buckets.entry(bucket_of(p)).or_default().push(i);
    }

    let mut pairs = Vec::new();
    for (i, &p) in locations.iter().enumerate() {
        let (bx, by) = bucket_of(p);
        for dy in -1..=1 {
            for dx in -1..=1 {
                let Some(bucket) = buckets.get(&(bx + dx, by + dy)) else {
                    continue;
                };
                for &j in bucket {
                    if j <= i || p.distance(locations[j]) > radius {
                        continue;
                    }
                    if mask.map_or(true, |m| line_of_sight(m, p, locations[j])) {
                        pairs.push((i, j));
                    }
                }
            }
        }
    }

    for &(a, b) in &pairs {
        map.link_markers(kind, first + a, first + b);
    }
    pairs.len()
}

/// True when every cell on the segment from `from` to `to` is set in `mask`.
pub fn line_of_sight(mask: &BooleanMask, from: Vec2, to: Vec2) -> bool {
    let steps = from.distance(to).ceil().max(1.0) as usize;
    (0..=steps).all(|s| {
        let p = from.lerp(to, s as f32 / steps as f32).round();
        mask.get(p.x as usize, p.y as usize)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use crate::map::WaterSettings;
    use crate::mask::ScalarMask;
    use crate::symmetry::{Symmetry, SymmetryHierarchy};

    fn setup(size: usize) -> (GameMap, Arc<SymmetryHierarchy>) {
        let sym = Arc::new(SymmetryHierarchy::uniform(Symmetry::Point).unwrap());
        let heightmap = ScalarMask::new(size, sym.clone());
        let map = GameMap::new(heightmap, WaterSettings::default(), Vec::new(), 0);
        (map, sym)
    }

    #[test]
    fn test_scatter_respects_spacing() {
        let (_, sym) = setup(64);
        let mut mask = BooleanMask::new(64, 0, sym);
        mask.fill(true);
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let points = scatter(&mask, 8.0, false, &mut rng);
        assert!(points.len() > 10);
        for (i, a) in points.iter().enumerate() {
            assert!(mask.get_point(*a));
            for b in &points[i + 1..] {
                assert!(a.distance(*b) > 8.0);
            }
        }
    }

    #[test]
    fn test_symmetric_scatter_emits_mirrored_pairs() {
        let (_, sym) = setup(64);
        let mut mask = BooleanMask::new(64, 0, sym);
        mask.fill(true).trim_edge(2);
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let points = scatter(&mask, 6.0, true, &mut rng);
        assert_eq!(points.len() % 2, 0);
        for pair in points.chunks(2) {
            assert_eq!(pair[1], mask.get_symmetry_point(pair[0]));
        }
    }

    #[test]
    fn test_symmetric_scatter_stays_on_asymmetric_mask() {
        let (_, sym) = setup(64);
        let mut mask = BooleanMask::new(64, 0, sym);
        mask.fill_rect(32, 0, 32, 32, true).fill_rect(0, 40, 24, 24, true);
        let mut rng = ChaCha8Rng::seed_from_u64(12);
        let points = scatter(&mask, 4.0, true, &mut rng);
        assert!(!points.is_empty());
        for p in &points {
            assert!(mask.get_point(*p), "{p} is off the mask");
        }
        for pair in points.chunks(2) {
            assert_eq!(pair[1], mask.get_symmetry_point(pair[0]));
        }
    }

    #[test]
    fn test_line_of_sight() {
        let (_, sym) = setup(16);
        let mut mask = BooleanMask::new(16, 0, sym);
        mask.fill(true);
        assert!(line_of_sight(&mask, Vec2::new(1.0, 1.0), Vec2::new(14.0, 9.0)));
        mask.fill_rect(7, 0, 1, 16, false);
        assert!(!line_of_sight(&mask, Vec2::new(1.0, 1.0), Vec2::new(14.0, 9.0)));
        assert!(line_of_sight(&mask, Vec2::new(1.0, 1.0), Vec2::new(5.0, 12.0)));
    }

    #[test]
    fn test_links_do_not_cross_walls() {
        let (mut map, sym) = setup(32);
        let mut mask = BooleanMask::new(32, 0, sym);
        mask.fill(true).fill_rect(15, 0, 2, 32, false);
        let a = map.add_marker(MarkerKind::Land, Vec2::new(10.0, 10.0));
        let b = map.add_marker(MarkerKind::Land, Vec2::new(13.0, 10.0));
        let c = map.add_marker(MarkerKind::Land, Vec2::new(19.0, 10.0));
        let links = link_markers(&mut map, MarkerKind::Land, 0, 16.0, Some(&mask));
        assert_eq!(links, 1);
        assert_eq!(map.markers(MarkerKind::Land)[a].neighbors, vec![b]);
        assert!(map.markers(MarkerKind::Land)[c].neighbors.is_empty());
    }

    #[test]
    fn test_generate_ai_markers() {
        let (mut map, sym) = setup(128);
        let mut land = BooleanMask::new(128, 0, sym.clone());
        land.fill_rect(0, 0, 64, 128, true).trim_edge(4);
        let mut water = land.copy_with_seed(0);
        water.invert().trim_edge(4);
        let mut passable = BooleanMask::new(128, 0, sym);
        passable.fill(true).trim_edge(4);

        let summary = AiMarkerGenerator::new(5, MarkerConfig::default())
            .generate_ai_markers(&mut map, &passable, &land, &water);

        assert_eq!(summary.air, 4);
        assert_eq!(map.marker_count(MarkerKind::Air), 4);
        assert_eq!(map.marker_count(MarkerKind::Land), summary.land);
        assert!(summary.amphibious > summary.land);
        assert!(summary.naval > 0);
        assert!(summary.links > 0);
        for marker in map.markers(MarkerKind::Naval) {
            assert!(water.get_point(marker.location()));
        }
        let air = map.markers(MarkerKind::Air);
        assert_eq!(air[0].location(), Vec2::new(32.0, 32.0));
        assert_eq!(air[0].neighbors.len(), 3);
    }

    #[test]
    fn test_same_seed_same_markers() {
        let (mut first, sym) = setup(64);
        let (mut second, _) = setup(64);
        let mut mask = BooleanMask::new(64, 0, sym);
        mask.fill(true).trim_edge(2);
        AiMarkerGenerator::new(7, MarkerConfig::default()).generate_ai_markers(&mut first, &mask, &mask, &mask);
        AiMarkerGenerator::new(7, MarkerConfig::default()).generate_ai_markers(&mut second, &mask, &mask, &mask);
        assert_eq!(first.markers(MarkerKind::Land), second.markers(MarkerKind::Land));
    }
}
