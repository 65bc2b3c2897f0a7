//! Mirrored sampling shared by the placement generators.

use glam::Vec2;

use crate::mask::BooleanMask;

/// Draws a position from `mask` together with its mirror image.
///
/// Candidates closer than `min_separation` to their own mirror are cleared
/// from the mask and redrawn, so each draw either returns a well separated
/// pair or `None` once the mask is exhausted. At most `size²` draws.
pub fn sample_pair(mask: &mut BooleanMask, min_separation: f32) -> Option<(Vec2, Vec2)> {
    loop {
        let location = mask.get_random_position()?;
        let mirror = mask.get_symmetry_point(location);
        if location.distance(mirror) >= min_separation {
            return Some((location, mirror));
        }
        let (x, y) = (location.x as usize, location.y as usize);
        mask.set(x, y, false);
    }
}

/// Exclusion applied to a second mask after every placed pair.
pub struct Exclusion<'a> {
    pub mask: &'a mut BooleanMask,
    pub radius: f32,
}

/// Samples up to `max_points / 2` mirrored pairs from `mask`, handing each to
/// `place` and clearing `spacing` around both points of the pair.
///
/// Returns the number of points placed (always even).
pub fn place_pairs<F>(
    mask: &mut BooleanMask,
    max_points: usize,
    spacing: f32,
    mut exclusion: Option<Exclusion<'_>>,
    mut place: F,
) -> usize
where
    F: FnMut(Vec2, Vec2),
{
    let mut placed = 0;
    while placed + 2 <= max_points {
        let Some((location, mirror)) = sample_pair(mask, spacing) else {
            break;
        };
        place(location, mirror);
        mask.fill_circle(location, spacing, false)
            .fill_circle(mirror, spacing, false);
        if let Some(ex) = exclusion.as_mut() {
            ex.mask
                .fill_circle(location, ex.radius, false)
                .fill_circle(mirror, ex.radius, false);
        }
        placed += 2;
    }
    placed
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use crate::symmetry::{Symmetry, SymmetryHierarchy};

    fn mask(s: Symmetry) -> BooleanMask {
        BooleanMask::new(64, 5, Arc::new(SymmetryHierarchy::uniform(s).unwrap()))
    }

    #[test]
    fn test_sample_pair_rejects_self_mirrors() {
        let mut m = mask(Symmetry::XY);
        // Only diagonal cells: every candidate is its own mirror.
        for i in 0..64 {
            m.set(i, i, true);
        }
        assert_eq!(sample_pair(&mut m, 1.0), None);
        assert!(m.is_empty());
    }

    #[test]
    fn test_sample_pair_is_mirrored() {
        let mut m = mask(Symmetry::Point);
        m.fill(true).fill_half(false);
        for _ in 0..20 {
            let (p, q) = sample_pair(&mut m, 4.0).unwrap();
            assert_eq!(q, m.get_symmetry_point(p));
            assert!(p.distance(q) >= 4.0);
        }
    }

    #[test]
    fn test_place_pairs_respects_cap_and_spacing() {
        let mut m = mask(Symmetry::X);
        m.fill(true).fill_half(false);
        let mut other = mask(Symmetry::X);
        other.fill(true);
        let before = other.count();

        let mut points = Vec::new();
        let placed = place_pairs(
            &mut m,
            7,
            6.0,
            Some(Exclusion { mask: &mut other, radius: 3.0 }),
            |a, b| {
                points.push(a);
                points.push(b);
            },
        );
        assert_eq!(placed, 6);
        assert_eq!(points.len(), 6);
        assert!(other.count() < before);
        for (i, a) in points.iter().enumerate() {
            for b in &points[i + 1..] {
                assert!(a.distance(*b) >= 6.0, "{a} and {b} too close");
            }
        }
    }
}
