//! Tiered, symmetric mex (resource point) placement.

use std::ops::Range;
use std::sync::Arc;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::map::GameMap;
use crate::mask::BooleanMask;
use crate::symmetry::SymmetryHierarchy;
use super::config::MexConfig;
use super::sampling::{place_pairs, Exclusion};

/// Largest distance between a spawn's mirror and its partner for the two to
/// count as a mirrored pair (the mirror of a cell centre can land one cell off).
const MIRRORED_SPAWN_TOLERANCE: f32 = 1.5;

/// Placement tier a mex was produced by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MexTier {
    /// Tight annulus around a spawn.
    Base,
    /// Wider annulus around a spawn.
    Near,
    /// Clusters around expansion anchors.
    Expansion,
    /// Plateau share of the remaining budget.
    Plateau,
    /// Non-plateau land share of the remaining budget.
    Land,
    /// Anything still spawnable.
    Spawnable,
    /// Water, as a last resort.
    Water,
}

/// A contiguous run of mexes placed by one tier.
#[derive(Debug, Clone, PartialEq)]
pub struct TierPlacement {
    pub tier: MexTier,
    /// Indices into [`GameMap::mexes`].
    pub mexes: Range<usize>,
    /// Minimum distance between any two mexes of the run.
    pub spacing: f32,
}

impl TierPlacement {
    pub fn count(&self) -> usize {
        self.mexes.len()
    }
}

/// What one [`MexGenerator::generate_mexes`] call placed, in placement order.
#[derive(Debug, Clone, Default)]
pub struct MexSummary {
    pub tiers: Vec<TierPlacement>,
    pub small_expansions: usize,
    pub large_expansions: usize,
}

impl MexSummary {
    pub fn total(&self) -> usize {
        self.tiers.iter().map(TierPlacement::count).sum()
    }

    /// Number of mexes placed by `tier`.
    pub fn count(&self, tier: MexTier) -> usize {
        self.tiers.iter().filter(|t| t.tier == tier).map(TierPlacement::count).sum()
    }
}

/// Places mexes in mirrored pairs.
///
/// Randomness is drawn from one seeded generator in a fixed order: working
/// mask seeds, base/near pair counts, one base mask seed per spawn centre,
/// one near mask seed per spawn centre, then the expansion draws. Every working mask samples from its
/// own generator seeded from that sequence, so a seed fully determines the
/// output for a given map and mask set.
pub struct MexGenerator {
    rng: ChaCha8Rng,
    config: MexConfig,
}

impl MexGenerator {
    pub fn new(seed: u64, config: MexConfig) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            config,
        }
    }

    pub fn config(&self) -> &MexConfig {
        &self.config
    }

    /// Places up to `map.mex_target()` mexes.
    ///
    /// `spawnable` marks land eligible for mexes, `plateau` the raised part of
    /// it and `water` the last-resort area. The masks are copied; callers keep
    /// theirs untouched. Runs out of space silently: the map may end up with
    /// fewer mexes than requested.
    pub fn generate_mexes(
        &mut self,
        map: &mut GameMap,
        spawnable: &BooleanMask,
        plateau: &BooleanMask,
        water: &BooleanMask,
    ) -> MexSummary {
        let size = spawnable.size();
        let symmetry = spawnable.symmetry().clone();
        let cfg = self.config.clone();
        let mut summary = MexSummary::default();

        let mut spawnable_land = spawnable.copy_with_seed(self.rng.random());
        let mut spawnable = spawnable.copy_with_seed(self.rng.random());
        spawnable.fill_half(false);
        let mut no_spawns = spawnable.copy_with_seed(self.rng.random());
        let mut plateau = plateau.copy_with_seed(self.rng.random());
        let mut water = water.copy_with_seed(self.rng.random());

        let mut remaining = map.mex_target().saturating_sub(map.mex_count()) & !1;
        let spawn_count = map.spawn_count();

        let base_pairs = self.rng.random_range(cfg.base_min_pairs..=cfg.base_max_pairs.max(cfg.base_min_pairs));
        let near_pairs = (self.rng.random_range(0..2) + cfg.near_total_pairs).saturating_sub(base_pairs);

        let sampling_half = half_mask(size, symmetry.clone());
        let spawn_tier_start = map.mex_count();

        let centers = spawn_centers(map, &sampling_half);

        for &center in &centers {
            let mut base = annulus(size, self.rng.random(), &symmetry, center, cfg.base_outer_radius, cfg.base_inner_radius);
            base.intersect(&spawnable);
            let start = map.mex_count();
            let placed = place_pairs(
                &mut base,
                (base_pairs * 2).min(remaining),
                cfg.base_spacing,
                Some(Exclusion { mask: &mut spawnable, radius: cfg.base_spacing }),
                |a, b| {
                    map.add_mex(a);
                    map.add_mex(b);
                },
            );
            remaining -= placed;
            summary.push(MexTier::Base, start, placed, cfg.base_spacing);
        }

        for &center in &centers {
            let mut near = annulus(size, self.rng.random(), &symmetry, center, cfg.spawn_size * 3.0, cfg.spawn_size);
            near.intersect(&spawnable);
            for &other in map.spawns() {
                near.fill_circle(other, cfg.spawn_size, false);
            }
            let start = map.mex_count();
            let placed = place_pairs(
                &mut near,
                (near_pairs * 2).min(remaining),
                cfg.mex_spacing,
                Some(Exclusion { mask: &mut spawnable, radius: cfg.mex_spacing }),
                |a, b| {
                    map.add_mex(a);
                    map.add_mex(b);
                },
            );
            remaining -= placed;
            summary.push(MexTier::Near, start, placed, cfg.mex_spacing);
        }

        for &spawn in map.spawns() {
            spawnable.fill_circle(spawn, cfg.spawn_clearance, false);
            no_spawns.fill_circle(spawn, cfg.mex_spawn_distance, false);
        }
        for i in spawn_tier_start..map.mex_count() {
            spawnable.fill_circle(map.mex_location(i), cfg.mex_spacing, false);
        }

        debug!(
            base = summary.count(MexTier::Base),
            near = summary.count(MexTier::Near),
            remaining,
            "spawn mex tiers placed"
        );

        if remaining / 2 > cfg.expansion_pair_threshold {
            let per_spawn = remaining / 2 / spawn_count.max(1);
            let possible = if per_spawn == 0 {
                0
            } else {
                ((self.rng.random_range(0..per_spawn) + per_spawn) * 2).min(remaining)
            };
            let placed = self.generate_mex_expansions(map, &mut spawnable, possible, &mut summary);
            remaining -= placed;
        }

        no_spawns.intersect(&spawnable);
        plateau.intersect(&no_spawns);
        spawnable_land.intersect(&no_spawns).minus(&plateau);

        let free_area = no_spawns.count();
        let plateau_density = if free_area == 0 {
            0.0
        } else {
            plateau.count() as f32 / free_area as f32
        };
        let plateau_budget = ((plateau_density * remaining as f32 / 2.0) as usize * 2).min(remaining);

        let spacing = cfg.mex_spacing;
        remaining -= self.fallback_tier(
            map,
            &mut plateau,
            plateau_budget,
            Some(Exclusion { mask: &mut spawnable, radius: spacing }),
            MexTier::Plateau,
            &mut summary,
        );
        spawnable_land.intersect(&spawnable);
        remaining -= self.fallback_tier(
            map,
            &mut spawnable_land,
            remaining,
            Some(Exclusion { mask: &mut spawnable, radius: spacing }),
            MexTier::Land,
            &mut summary,
        );
        spawnable.intersect(spawnable_land.combine(&plateau));
        remaining -= self.fallback_tier(map, &mut spawnable, remaining, None, MexTier::Spawnable, &mut summary);
        remaining -= self.fallback_tier(map, &mut water, remaining, None, MexTier::Water, &mut summary);

        debug!(
            placed = summary.total(),
            target = map.mex_target(),
            unplaced = remaining,
            "mex placement finished"
        );
        summary
    }

    fn fallback_tier(
        &self,
        map: &mut GameMap,
        mask: &mut BooleanMask,
        budget: usize,
        exclusion: Option<Exclusion<'_>>,
        tier: MexTier,
        summary: &mut MexSummary,
    ) -> usize {
        let start = map.mex_count();
        let placed = place_pairs(mask, budget, self.config.mex_spacing, exclusion, |a, b| {
            map.add_mex(a);
            map.add_mex(b);
        });
        summary.push(tier, start, placed, self.config.mex_spacing);
        placed
    }

    /// Places clusters of mexes around expansion anchors away from the spawns
    /// and the map centre. Returns the number of mexes placed.
    pub fn generate_mex_expansions(
        &mut self,
        map: &mut GameMap,
        spawnable: &mut BooleanMask,
        possible: usize,
        summary: &mut MexSummary,
    ) -> usize {
        let cfg = self.config.clone();
        let size = spawnable.size();
        let symmetry = spawnable.symmetry().clone();
        let half = size as f32 / 2.0;

        let mut anchors = BooleanMask::new(size, self.rng.random(), symmetry.clone());
        let mut expansion = BooleanMask::new(size, self.rng.random(), symmetry);

        anchors
            .fill_circle(Vec2::splat(half), half, true)
            .fill_center(cfg.expansion_center_exclusion, false)
            .intersect(spawnable);
        for &spawn in map.spawns() {
            anchors.fill_circle(spawn, size as f32 / 4.0, false);
        }

        let window = cfg.expansion_size;
        let mut left = possible;
        let mut placed_total = 0;

        while left > 1 {
            let Some(anchor) = self.find_expansion_anchor(&mut anchors, spawnable) else {
                break;
            };
            let mirror = anchors.get_symmetry_point(anchor);

            expansion
                .fill_rect(
                    (anchor.x - window) as i64,
                    (anchor.y - window) as i64,
                    (window * 2.0) as i64,
                    (window * 2.0) as i64,
                    true,
                )
                .intersect(spawnable);

            let pairs = self
                .rng
                .random_range(cfg.expansion_min_pairs..=cfg.expansion_max_pairs.max(cfg.expansion_min_pairs));
            let planned = (pairs * 2).min(left);

            anchors
                .fill_circle(anchor, cfg.expansion_spacing, false)
                .fill_circle(mirror, cfg.expansion_spacing, false);

            let start = map.mex_count();
            let placed = place_pairs(
                &mut expansion,
                planned,
                cfg.expansion_mex_spacing,
                Some(Exclusion { mask: &mut *spawnable, radius: cfg.mex_spacing * 2.0 }),
                |a, b| {
                    map.add_mex(a);
                    map.add_mex(b);
                },
            );
            expansion.fill(false);

            if placed > 0 {
                if placed >= cfg.large_expansion_mex_count {
                    map.add_large_expansion_marker(anchor);
                    map.add_large_expansion_marker(mirror);
                    summary.large_expansions += 1;
                } else {
                    map.add_expansion_marker(anchor);
                    map.add_expansion_marker(mirror);
                    summary.small_expansions += 1;
                }
            }
            summary.push(MexTier::Expansion, start, placed, cfg.expansion_mex_spacing);

            placed_total += placed;
            left -= placed;
        }

        debug!(
            placed = placed_total,
            requested = possible,
            small = summary.small_expansions,
            large = summary.large_expansions,
            "expansions placed"
        );
        placed_total
    }

    /// Draws anchors until one passes the density check, clearing each
    /// rejected cell. `None` once the candidate mask is empty.
    fn find_expansion_anchor(&self, anchors: &mut BooleanMask, spawnable: &BooleanMask) -> Option<Vec2> {
        loop {
            let candidate = anchors.get_random_position()?;
            if self.is_expansion_valid(candidate, spawnable) {
                return Some(candidate);
            }
            anchors.set(candidate.x as usize, candidate.y as usize, false);
        }
    }

    /// True when at least `expansion_density` of the window around `location`
    /// is spawnable. The window is sampled as four mirrored quadrants of
    /// `(size/2)²` cells, clamped to the map.
    fn is_expansion_valid(&self, location: Vec2, spawnable: &BooleanMask) -> bool {
        let size = self.config.expansion_size;
        let last = spawnable.size() - 1;
        let (x, y) = (location.x as usize, location.y as usize);
        let reach = (size / 2.0).ceil() as usize;
        let mut count = 0usize;
        for dx in 0..reach {
            for dy in 0..reach {
                let (xp, xm) = ((x + dx).min(last), x.saturating_sub(dx));
                let (yp, ym) = ((y + dy).min(last), y.saturating_sub(dy));
                count += [(xp, yp), (xp, ym), (xm, yp), (xm, ym)]
                    .iter()
                    .filter(|&&(cx, cy)| spawnable.get(cx, cy))
                    .count();
            }
        }
        count as f32 / (size * size) >= self.config.expansion_density
    }
}

impl MexSummary {
    fn push(&mut self, tier: MexTier, start: usize, count: usize, spacing: f32) {
        if count == 0 {
            return;
        }
        self.tiers.push(TierPlacement {
            tier,
            mexes: start..start + count,
            spacing,
        });
    }
}

/// Mask of the cells `fill_half` keeps.
fn half_mask(size: usize, symmetry: Arc<SymmetryHierarchy>) -> BooleanMask {
    let mut mask = BooleanMask::new(size, 0, symmetry);
    mask.fill(true).fill_half(false);
    mask
}

/// The spawn of pair `(i, i + 1)` lying in the sampled half; spawn `i + 1`
/// unless only spawn `i` is on that side.
fn anchor_spawn(map: &GameMap, i: usize, sampling_half: &BooleanMask) -> Vec2 {
    let second = map.spawn(i + 1);
    let first = map.spawn(i);
    let on_line = |p: Vec2| sampling_half.get_symmetry_point(p) == p;
    if sampling_half.get_point(second) || on_line(second) || !sampling_half.get_point(first) {
        second
    } else {
        first
    }
}

/// Spawns the base and near annuli are drawn around. A pair whose members
/// mirror each other needs only its anchor spawn; otherwise both spawns get
/// their own annuli.
fn spawn_centers(map: &GameMap, sampling_half: &BooleanMask) -> Vec<Vec2> {
    let mut centers = Vec::with_capacity(map.spawn_count());
    for i in (0..map.spawn_count()).step_by(2) {
        let (first, second) = (map.spawn(i), map.spawn(i + 1));
        if sampling_half.get_symmetry_point(first).distance(second) <= MIRRORED_SPAWN_TOLERANCE {
            centers.push(anchor_spawn(map, i, sampling_half));
        } else {
            centers.push(first);
            centers.push(second);
        }
    }
    centers
}

/// Ring between `inner` and `outer` around `center` and around its mirror,
/// so sampling the half still reaches a spawn lying in the other half.
fn annulus(
    size: usize,
    seed: u64,
    symmetry: &Arc<SymmetryHierarchy>,
    center: Vec2,
    outer: f32,
    inner: f32,
) -> BooleanMask {
    let mut mask = BooleanMask::new(size, seed, symmetry.clone());
    let mirror = mask.get_symmetry_point(center);
    mask.fill_circle(center, outer, true)
        .fill_circle(mirror, outer, true)
        .fill_circle(center, inner, false)
        .fill_circle(mirror, inner, false);
    mask
}
