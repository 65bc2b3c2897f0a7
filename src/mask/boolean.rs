//! Boolean masks: passability, spawnable areas and placement exclusions.

use std::sync::Arc;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::symmetry::SymmetryHierarchy;
use super::distance::squared_distance_to;
use super::grid::Grid;
use super::scalar::ScalarMask;

/// Which side of the cutoff becomes `true` when thresholding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThresholdDirection {
    /// `value > cutoff`
    Above,
    /// `value < cutoff`
    Below,
}

/// A grid of booleans with its own random source for position sampling.
///
/// Mutating operations work in place and return `&mut Self` so they chain:
///
/// ```
/// # use std::sync::Arc;
/// # use symmap::mask::BooleanMask;
/// # use symmap::symmetry::{Symmetry, SymmetryHierarchy};
/// let symmetry = Arc::new(SymmetryHierarchy::uniform(Symmetry::Point).unwrap());
/// let mut mask = BooleanMask::new(64, 7, symmetry);
/// mask.invert().deflate(2.0).trim_edge(4);
/// assert_eq!(mask.count(), 56 * 56);
/// ```
#[derive(Debug, Clone)]
pub struct BooleanMask {
    grid: Grid<bool>,
    rng: ChaCha8Rng,
}

impl BooleanMask {
    /// Creates an all-false mask whose sampler is seeded with `seed`.
    pub fn new(size: usize, seed: u64, symmetry: Arc<SymmetryHierarchy>) -> Self {
        Self {
            grid: Grid::new(size, false, symmetry),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Wraps an existing boolean grid.
    pub fn from_grid(grid: Grid<bool>, seed: u64) -> Self {
        Self {
            grid,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// True where `scalar` crosses `cutoff` in `direction`.
    pub fn threshold(scalar: &ScalarMask, cutoff: f32, direction: ThresholdDirection, seed: u64) -> Self {
        let cells = scalar
            .values()
            .iter()
            .map(|&v| match direction {
                ThresholdDirection::Above => v > cutoff,
                ThresholdDirection::Below => v < cutoff,
            })
            .collect();
        Self::from_grid(
            Grid::from_cells(scalar.size(), cells, scalar.symmetry().clone()),
            seed,
        )
    }

    /// Deep copy of the cells with a freshly seeded sampler.
    pub fn copy_with_seed(&self, seed: u64) -> Self {
        Self::from_grid(self.grid.clone(), seed)
    }

    pub fn size(&self) -> usize {
        self.grid.size()
    }

    pub fn symmetry(&self) -> &Arc<SymmetryHierarchy> {
        self.grid.symmetry()
    }

    pub fn grid(&self) -> &Grid<bool> {
        &self.grid
    }

    /// Bounds-checked read.
    ///
    /// # Panics
    /// Panics if `(x, y)` is outside the mask.
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.grid.get(x, y)
    }

    /// Reads the cell a point lies on.
    pub fn get_point(&self, point: Vec2) -> bool {
        let (x, y) = self.grid.cell_of(point);
        self.grid.get(x, y)
    }

    pub fn set(&mut self, x: usize, y: usize, value: bool) -> &mut Self {
        self.grid.set(x, y, value);
        self
    }

    /// Number of true cells.
    pub fn count(&self) -> usize {
        self.grid.cells().iter().filter(|&&c| c).count()
    }

    pub fn is_empty(&self) -> bool {
        !self.grid.cells().iter().any(|&c| c)
    }

    pub fn invert(&mut self) -> &mut Self {
        for cell in self.grid.cells_mut() {
            *cell = !*cell;
        }
        self
    }

    /// Cell-wise AND.
    ///
    /// # Panics
    /// Panics if the masks differ in size or symmetry.
    pub fn intersect(&mut self, other: &BooleanMask) -> &mut Self {
        self.zip_with(other, |a, b| a && b)
    }

    /// Keeps cells that are true here and false in `other`.
    ///
    /// # Panics
    /// Panics if the masks differ in size or symmetry.
    pub fn minus(&mut self, other: &BooleanMask) -> &mut Self {
        self.zip_with(other, |a, b| a && !b)
    }

    /// Cell-wise OR.
    ///
    /// # Panics
    /// Panics if the masks differ in size or symmetry.
    pub fn combine(&mut self, other: &BooleanMask) -> &mut Self {
        self.zip_with(other, |a, b| a || b)
    }

    fn zip_with<F>(&mut self, other: &BooleanMask, op: F) -> &mut Self
    where
        F: Fn(bool, bool) -> bool,
    {
        self.grid.assert_compatible(&other.grid);
        for (a, &b) in self.grid.cells_mut().iter_mut().zip(other.grid.cells()) {
            *a = op(*a, b);
        }
        self
    }

    /// Erosion: a true cell stays true only if every cell within Euclidean
    /// distance `distance` is true. Cells beyond the border do not erode.
    pub fn deflate(&mut self, distance: f32) -> &mut Self {
        let size = self.size();
        let limit = (distance.max(0.0) as f64).powi(2);
        let to_false = squared_distance_to(self.grid.cells(), size, false);
        for (cell, d) in self.grid.cells_mut().iter_mut().zip(to_false) {
            if *cell && d <= limit {
                *cell = false;
            }
        }
        self
    }

    /// Dilation: a false cell becomes true if any true cell lies within
    /// Euclidean distance `distance`.
    pub fn inflate(&mut self, distance: f32) -> &mut Self {
        let size = self.size();
        let limit = (distance.max(0.0) as f64).powi(2);
        let to_true = squared_distance_to(self.grid.cells(), size, true);
        for (cell, d) in self.grid.cells_mut().iter_mut().zip(to_true) {
            if !*cell && d <= limit {
                *cell = true;
            }
        }
        self
    }

    /// Clears every cell within `margin` cells of the border.
    pub fn trim_edge(&mut self, margin: usize) -> &mut Self {
        self.grid.fill_edge(margin, false);
        self
    }

    pub fn fill(&mut self, value: bool) -> &mut Self {
        self.grid.fill(value);
        self
    }

    pub fn fill_circle(&mut self, center: Vec2, radius: f32, value: bool) -> &mut Self {
        self.grid.fill_circle(center, radius, value);
        self
    }

    pub fn fill_rect(&mut self, x: i64, y: i64, width: i64, height: i64, value: bool) -> &mut Self {
        self.grid.fill_rect(x, y, width, height, value);
        self
    }

    pub fn fill_center(&mut self, radius: f32, value: bool) -> &mut Self {
        self.grid.fill_center(radius, value);
        self
    }

    pub fn fill_half(&mut self, value: bool) -> &mut Self {
        self.grid.fill_half(value);
        self
    }

    /// Uniformly chosen true cell, or `None` if the mask is empty.
    ///
    /// Draws exactly one number from the mask's sampler when the mask is
    /// non-empty and none otherwise.
    pub fn get_random_position(&mut self) -> Option<Vec2> {
        let count = self.count();
        if count == 0 {
            return None;
        }
        let target = self.rng.random_range(0..count);
        let size = self.size();
        self.grid
            .cells()
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c)
            .nth(target)
            .map(|(i, _)| Vec2::new((i % size) as f32, (i / size) as f32))
    }

    /// Mirrors `point` through the mask's spawn symmetry.
    pub fn get_symmetry_point(&self, point: Vec2) -> Vec2 {
        self.grid.symmetry_point(point)
    }

    /// Iterates over the coordinates of all true cells in row-major order.
    pub fn true_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let size = self.size();
        self.grid
            .cells()
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c)
            .map(move |(i, _)| (i % size, i / size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symmetry::Symmetry;

    fn symmetry(s: Symmetry) -> Arc<SymmetryHierarchy> {
        Arc::new(SymmetryHierarchy::uniform(s).unwrap())
    }

    fn blob(size: usize) -> BooleanMask {
        let mut mask = BooleanMask::new(size, 1, symmetry(Symmetry::Point));
        mask.fill_circle(Vec2::new(10.0, 12.0), 6.0, true)
            .fill_rect(20, 4, 7, 15, true)
            .fill_circle(Vec2::new(24.0, 24.0), 3.0, true);
        mask
    }

    #[test]
    fn test_threshold_directions() {
        let heights = ScalarMask::from_values(
            2,
            vec![-1.0, 0.0, 0.5, 2.0],
            symmetry(Symmetry::Point),
        );
        let above = BooleanMask::threshold(&heights, 0.0, ThresholdDirection::Above, 0);
        assert_eq!(above.grid().cells(), &[false, false, true, true]);
        let below = BooleanMask::threshold(&heights, 0.5, ThresholdDirection::Below, 0);
        assert_eq!(below.grid().cells(), &[true, true, false, false]);
    }

    #[test]
    fn test_set_algebra() {
        let sym = symmetry(Symmetry::Point);
        let mut a = BooleanMask::new(4, 0, sym.clone());
        let mut b = BooleanMask::new(4, 0, sym);
        a.fill_rect(0, 0, 2, 4, true); // left half
        b.fill_rect(0, 0, 4, 2, true); // top half

        assert_eq!(a.clone().intersect(&b).count(), 4);
        assert_eq!(a.clone().combine(&b).count(), 12);
        assert_eq!(a.clone().minus(&b).count(), 4);
        assert_eq!(a.clone().invert().count(), 8);
    }

    #[test]
    #[should_panic(expected = "size mismatch")]
    fn test_intersect_size_mismatch_panics() {
        let mut a = BooleanMask::new(8, 0, symmetry(Symmetry::Point));
        let b = BooleanMask::new(16, 0, symmetry(Symmetry::Point));
        a.intersect(&b);
    }

    #[test]
    #[should_panic(expected = "symmetry mismatch")]
    fn test_intersect_symmetry_mismatch_panics() {
        let mut a = BooleanMask::new(8, 0, symmetry(Symmetry::Point));
        let b = BooleanMask::new(8, 0, symmetry(Symmetry::X));
        a.intersect(&b);
    }

    #[test]
    fn test_deflate_and_inflate_are_monotone() {
        let original = blob(32);
        let n = original.count();
        for d in [0.0, 0.5, 1.0, 2.0, 3.5, 8.0] {
            assert!(original.clone().deflate(d).count() <= n, "deflate({d}) grew the mask");
            assert!(original.clone().inflate(d).count() >= n, "inflate({d}) shrank the mask");
        }
        assert_eq!(original.clone().deflate(0.0).count(), n);
        assert_eq!(original.clone().inflate(0.0).count(), n);
    }

    #[test]
    fn test_deflate_disk() {
        let mut mask = BooleanMask::new(32, 0, symmetry(Symmetry::Point));
        mask.fill_circle(Vec2::new(16.0, 16.0), 6.0, true);
        mask.deflate(2.0);
        let mut expected = BooleanMask::new(32, 0, symmetry(Symmetry::Point));
        // Every survivor must be at least 3 cells from the original rim.
        expected.fill_circle(Vec2::new(16.0, 16.0), 6.0, true);
        for (x, y) in mask.true_cells() {
            for dy in -2i64..=2 {
                for dx in -2i64..=2 {
                    if dx * dx + dy * dy <= 4 {
                        assert!(expected.get((x as i64 + dx) as usize, (y as i64 + dy) as usize));
                    }
                }
            }
        }
        assert!(mask.get(16, 16));
        assert!(!mask.get(16, 21));
    }

    #[test]
    fn test_deflate_ignores_border() {
        let mut mask = BooleanMask::new(16, 0, symmetry(Symmetry::Point));
        mask.fill(true).deflate(4.0);
        assert_eq!(mask.count(), 256);
    }

    #[test]
    fn test_inflate_single_cell() {
        let mut mask = BooleanMask::new(16, 0, symmetry(Symmetry::Point));
        mask.set(8, 8, true).inflate(1.0);
        assert_eq!(mask.count(), 5);
        mask.inflate(1.5);
        // Radius-1 cross grown by 1.5 covers the 5x5 diamond-ish region.
        assert!(mask.get(8, 10) && mask.get(9, 9) && !mask.get(10, 10));
    }

    #[test]
    fn test_trim_edge_clears_border() {
        let mut mask = BooleanMask::new(32, 0, symmetry(Symmetry::Point));
        mask.fill(true).trim_edge(5);
        for (x, y) in mask.true_cells() {
            assert!(x >= 5 && y >= 5 && x < 27 && y < 27);
        }
        assert_eq!(mask.count(), 22 * 22);
    }

    #[test]
    fn test_random_position_empty_is_none() {
        let mut mask = BooleanMask::new(16, 3, symmetry(Symmetry::Point));
        assert_eq!(mask.get_random_position(), None);
    }

    #[test]
    fn test_random_position_hits_true_cells_only() {
        let mut mask = blob(32);
        for _ in 0..200 {
            let p = mask.get_random_position().unwrap();
            assert!(mask.get_point(p));
        }
    }

    #[test]
    fn test_random_position_is_deterministic() {
        let mut a = blob(32);
        let mut b = blob(32);
        for _ in 0..50 {
            assert_eq!(a.get_random_position(), b.get_random_position());
        }
    }

    #[test]
    fn test_random_position_covers_all_cells() {
        let mut mask = BooleanMask::new(8, 11, symmetry(Symmetry::Point));
        mask.fill_rect(2, 2, 2, 2, true);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..400 {
            let p = mask.get_random_position().unwrap();
            seen.insert((p.x as usize, p.y as usize));
        }
        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn test_copy_with_seed_is_deep() {
        let original = blob(32);
        let mut copy = original.copy_with_seed(9);
        copy.fill(false);
        assert_eq!(original.count(), blob(32).count());
        assert_eq!(copy.count(), 0);
    }

    #[test]
    fn test_symmetry_point() {
        let mask = BooleanMask::new(16, 0, symmetry(Symmetry::YX));
        assert_eq!(mask.get_symmetry_point(Vec2::new(2.0, 3.0)), Vec2::new(12.0, 13.0));
    }
}
