//! Floating point masks: heightmaps and quantities derived from them.

use std::sync::Arc;

use glam::Vec2;

use crate::symmetry::SymmetryHierarchy;
use super::grid::Grid;

/// A grid of `f32` values, typically heights or slope magnitudes.
#[derive(Debug, Clone)]
pub struct ScalarMask {
    grid: Grid<f32>,
}

impl ScalarMask {
    /// Creates a mask filled with `0.0`.
    pub fn new(size: usize, symmetry: Arc<SymmetryHierarchy>) -> Self {
        Self {
            grid: Grid::new(size, 0.0, symmetry),
        }
    }

    /// Wraps row-major values.
    ///
    /// # Panics
    /// Panics if `values.len() != size * size`.
    pub fn from_values(size: usize, values: Vec<f32>, symmetry: Arc<SymmetryHierarchy>) -> Self {
        Self {
            grid: Grid::from_cells(size, values, symmetry),
        }
    }

    pub fn size(&self) -> usize {
        self.grid.size()
    }

    pub fn symmetry(&self) -> &Arc<SymmetryHierarchy> {
        self.grid.symmetry()
    }

    pub fn grid(&self) -> &Grid<f32> {
        &self.grid
    }

    /// Row-major values.
    pub fn values(&self) -> &[f32] {
        self.grid.cells()
    }

    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.grid.get(x, y)
    }

    pub fn set(&mut self, x: usize, y: usize, value: f32) -> &mut Self {
        self.grid.set(x, y, value);
        self
    }

    /// Independent deep copy; mutating the copy never touches `self`.
    pub fn copy(&self) -> Self {
        self.clone()
    }

    pub fn min(&self) -> f32 {
        self.values().iter().copied().fold(f32::MAX, f32::min)
    }

    pub fn max(&self) -> f32 {
        self.values().iter().copied().fold(f32::MIN, f32::max)
    }

    /// Returns (min, max) over all cells.
    pub fn range(&self) -> (f32, f32) {
        (self.min(), self.max())
    }

    /// Replaces every value with its local slope magnitude.
    ///
    /// `gx` is the central difference `(h[x+1] - h[x-1]) / 2` on interior columns
    /// and the one-sided difference on the first and last column; `gy` likewise
    /// along rows. The result is `sqrt(gx² + gy²)`. A 1×1 mask becomes `0.0`.
    pub fn gradient(&mut self) -> &mut Self {
        let size = self.size();
        let src = self.grid.cells().to_vec();
        let h = |x: usize, y: usize| src[y * size + x];
        let derivative = |lo: f32, mid: f32, hi: f32, i: usize| -> f32 {
            if size == 1 {
                0.0
            } else if i == 0 {
                hi - mid
            } else if i == size - 1 {
                mid - lo
            } else {
                (hi - lo) / 2.0
            }
        };

        let out = self.grid.cells_mut();
        for y in 0..size {
            for x in 0..size {
                let mid = h(x, y);
                let left = h(x.saturating_sub(1), y);
                let right = h((x + 1).min(size - 1), y);
                let up = h(x, y.saturating_sub(1));
                let down = h(x, (y + 1).min(size - 1));
                let gx = derivative(left, mid, right, x);
                let gy = derivative(up, mid, down, y);
                out[y * size + x] = (gx * gx + gy * gy).sqrt();
            }
        }
        self
    }

    /// Bilinearly interpolated value at a fractional point, clamped to the grid.
    pub fn sample_bilinear(&self, point: Vec2) -> f32 {
        let max = (self.size() - 1) as f32;
        let x = point.x.clamp(0.0, max);
        let y = point.y.clamp(0.0, max);
        let x0 = x.floor() as usize;
        let y0 = y.floor() as usize;
        let x1 = (x0 + 1).min(self.size() - 1);
        let y1 = (y0 + 1).min(self.size() - 1);
        let tx = x - x0 as f32;
        let ty = y - y0 as f32;

        let top = self.get(x0, y0) * (1.0 - tx) + self.get(x1, y0) * tx;
        let bottom = self.get(x0, y1) * (1.0 - tx) + self.get(x1, y1) * tx;
        top * (1.0 - ty) + bottom * ty
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symmetry::Symmetry;

    fn symmetry() -> Arc<SymmetryHierarchy> {
        Arc::new(SymmetryHierarchy::uniform(Symmetry::Point).unwrap())
    }

    #[test]
    fn test_gradient_of_flat_is_zero() {
        let mut mask = ScalarMask::from_values(8, vec![3.0; 64], symmetry());
        mask.gradient();
        assert!(mask.values().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_gradient_of_ramp() {
        // h = 2x: interior central difference and edge one-sided difference both give 2.
        let size = 6;
        let values: Vec<f32> = (0..size * size).map(|i| 2.0 * (i % size) as f32).collect();
        let mut mask = ScalarMask::from_values(size, values, symmetry());
        mask.gradient();
        assert!(mask.values().iter().all(|&v| (v - 2.0).abs() < 1e-6));
    }

    #[test]
    fn test_gradient_single_step() {
        let mut mask = ScalarMask::new(5, symmetry());
        mask.set(2, 2, 4.0);
        mask.gradient();
        assert_eq!(mask.get(2, 2), 0.0);
        assert_eq!(mask.get(1, 2), 2.0);
        assert_eq!(mask.get(2, 3), 2.0);
        assert_eq!(mask.get(0, 0), 0.0);
    }

    #[test]
    fn test_copy_is_independent() {
        let original = ScalarMask::from_values(4, vec![1.0; 16], symmetry());
        let mut copy = original.copy();
        copy.set(0, 0, 9.0).gradient();
        assert_eq!(original.get(0, 0), 1.0);
        assert_eq!(original.values(), &[1.0; 16]);
    }

    #[test]
    fn test_sample_bilinear() {
        let mut mask = ScalarMask::new(4, symmetry());
        mask.set(1, 1, 4.0);
        assert_eq!(mask.sample_bilinear(Vec2::new(1.0, 1.0)), 4.0);
        assert_eq!(mask.sample_bilinear(Vec2::new(1.5, 1.0)), 2.0);
        assert_eq!(mask.sample_bilinear(Vec2::new(1.5, 1.5)), 1.0);
        assert_eq!(mask.sample_bilinear(Vec2::new(-3.0, 10.0)), 0.0);
    }

    #[test]
    fn test_range() {
        let mut mask = ScalarMask::new(4, symmetry());
        mask.set(0, 0, -2.0).set(3, 3, 5.0);
        assert_eq!(mask.range(), (-2.0, 5.0));
    }
}
