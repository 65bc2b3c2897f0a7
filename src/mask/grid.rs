//! Square cell grid shared by the boolean and scalar masks.

use std::sync::Arc;

use glam::Vec2;

use crate::symmetry::{Symmetry, SymmetryHierarchy};

/// A `size × size` array of cells in row-major order.
///
/// Every grid carries the map's [`SymmetryHierarchy`]; it is shared, never
/// owned, so copies of a grid point at the same symmetry settings.
#[derive(Debug, Clone)]
pub struct Grid<T> {
    size: usize,
    symmetry: Arc<SymmetryHierarchy>,
    cells: Vec<T>,
}

impl<T: Copy> Grid<T> {
    /// Creates a grid with every cell set to `fill`.
    ///
    /// # Panics
    /// Panics if `size` is zero.
    pub fn new(size: usize, fill: T, symmetry: Arc<SymmetryHierarchy>) -> Self {
        assert!(size > 0, "grid size must be positive");
        Self {
            size,
            symmetry,
            cells: vec![fill; size * size],
        }
    }

    /// Wraps existing row-major cell data.
    ///
    /// # Panics
    /// Panics if `cells.len() != size * size`.
    pub fn from_cells(size: usize, cells: Vec<T>, symmetry: Arc<SymmetryHierarchy>) -> Self {
        assert!(size > 0, "grid size must be positive");
        assert_eq!(cells.len(), size * size, "cell data does not match a {size}x{size} grid");
        Self { size, symmetry, cells }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn symmetry(&self) -> &Arc<SymmetryHierarchy> {
        &self.symmetry
    }

    /// Row-major cell data.
    pub fn cells(&self) -> &[T] {
        &self.cells
    }

    pub fn cells_mut(&mut self) -> &mut [T] {
        &mut self.cells
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> usize {
        assert!(
            x < self.size && y < self.size,
            "cell ({x}, {y}) outside {0}x{0} grid",
            self.size
        );
        y * self.size + x
    }

    /// Returns the value at `(x, y)`.
    ///
    /// # Panics
    /// Panics if the coordinate is out of bounds.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> T {
        self.cells[self.index(x, y)]
    }

    /// Sets the value at `(x, y)`.
    ///
    /// # Panics
    /// Panics if the coordinate is out of bounds.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: T) {
        let i = self.index(x, y);
        self.cells[i] = value;
    }

    /// True if the (possibly fractional) point lies on a cell of this grid.
    pub fn in_bounds(&self, point: Vec2) -> bool {
        point.x >= 0.0 && point.y >= 0.0 && point.x < self.size as f32 && point.y < self.size as f32
    }

    /// Converts a point to the cell it lies on.
    ///
    /// # Panics
    /// Panics if the point is outside the grid.
    pub fn cell_of(&self, point: Vec2) -> (usize, usize) {
        assert!(self.in_bounds(point), "point {point} outside {0}x{0} grid", self.size);
        (point.x as usize, point.y as usize)
    }

    /// Sets every cell to `value`.
    pub fn fill(&mut self, value: T) -> &mut Self {
        self.cells.fill(value);
        self
    }

    /// Sets every cell within Euclidean distance `radius` of `center`.
    ///
    /// The centre may lie outside the grid; only covered cells are touched.
    pub fn fill_circle(&mut self, center: Vec2, radius: f32, value: T) -> &mut Self {
        if radius < 0.0 {
            return self;
        }
        let max = (self.size - 1) as f32;
        let x0 = (center.x - radius).floor().clamp(0.0, max) as usize;
        let x1 = (center.x + radius).ceil().clamp(0.0, max) as usize;
        let y0 = (center.y - radius).floor().clamp(0.0, max) as usize;
        let y1 = (center.y + radius).ceil().clamp(0.0, max) as usize;
        let r2 = radius * radius;
        for y in y0..=y1 {
            let dy = y as f32 - center.y;
            for x in x0..=x1 {
                let dx = x as f32 - center.x;
                if dx * dx + dy * dy <= r2 {
                    let i = y * self.size + x;
                    self.cells[i] = value;
                }
            }
        }
        self
    }

    /// Sets the `width × height` block whose corner is `(x, y)`, clipped to the grid.
    pub fn fill_rect(&mut self, x: i64, y: i64, width: i64, height: i64, value: T) -> &mut Self {
        let size = self.size as i64;
        let x0 = x.clamp(0, size);
        let y0 = y.clamp(0, size);
        let x1 = (x + width).clamp(0, size);
        let y1 = (y + height).clamp(0, size);
        for cy in y0..y1 {
            for cx in x0..x1 {
                let i = (cy * size + cx) as usize;
                self.cells[i] = value;
            }
        }
        self
    }

    /// Sets the central region of the map, shaped by the terrain symmetry.
    ///
    /// Rotational symmetries get a disk of `radius` around the centre; mirror
    /// symmetries get the band of half-width `radius` around their mirror line.
    pub fn fill_center(&mut self, radius: f32, value: T) -> &mut Self {
        let m = (self.size - 1) as f32;
        let c = m / 2.0;
        match self.symmetry.terrain_symmetry() {
            Symmetry::Point | Symmetry::Quad | Symmetry::Diagonal => {
                self.fill_circle(Vec2::splat(c), radius, value)
            }
            Symmetry::X => self.fill_where(|x, _| (x - c).abs() <= radius, value),
            Symmetry::Y => self.fill_where(|_, y| (y - c).abs() <= radius, value),
            Symmetry::XY => {
                self.fill_where(|x, y| (x - y).abs() / std::f32::consts::SQRT_2 <= radius, value)
            }
            Symmetry::YX => self.fill_where(
                |x, y| (x + y - m).abs() / std::f32::consts::SQRT_2 <= radius,
                value,
            ),
        }
    }

    /// Sets the half of the grid whose cells are the spawn-symmetry images of the
    /// other half. Cells on the mirror line itself are left untouched.
    pub fn fill_half(&mut self, value: T) -> &mut Self {
        let half = (self.size / 2) as f32;
        let m = (self.size - 1) as f32;
        match self.symmetry.spawn_symmetry() {
            Symmetry::Point | Symmetry::X | Symmetry::Quad | Symmetry::Diagonal => {
                self.fill_where(|x, _| x < half, value)
            }
            Symmetry::Y => self.fill_where(|_, y| y < half, value),
            Symmetry::XY => self.fill_where(|x, y| x < y, value),
            Symmetry::YX => self.fill_where(|x, y| x + y < m, value),
        }
    }

    /// Sets every cell within `margin` cells of any border.
    pub fn fill_edge(&mut self, margin: usize, value: T) -> &mut Self {
        let size = self.size;
        self.fill_where(
            |x, y| {
                let (x, y) = (x as usize, y as usize);
                x < margin || y < margin || x + margin >= size || y + margin >= size
            },
            value,
        )
    }

    fn fill_where<F>(&mut self, predicate: F, value: T) -> &mut Self
    where
        F: Fn(f32, f32) -> bool,
    {
        let size = self.size;
        for (i, cell) in self.cells.iter_mut().enumerate() {
            let x = (i % size) as f32;
            let y = (i / size) as f32;
            if predicate(x, y) {
                *cell = value;
            }
        }
        self
    }

    /// Mirrors `point` through the grid's spawn symmetry.
    pub fn symmetry_point(&self, point: Vec2) -> Vec2 {
        self.symmetry.symmetry_point(point, self.size)
    }

    /// Checks that `other` can take part in a cell-wise operation with `self`.
    ///
    /// # Panics
    /// Panics if the sizes differ or the grids use different symmetry settings.
    pub fn assert_compatible<U>(&self, other: &Grid<U>) {
        assert_eq!(
            self.size, other.size,
            "grid size mismatch: {} vs {}",
            self.size, other.size
        );
        assert!(
            Arc::ptr_eq(&self.symmetry, &other.symmetry) || *self.symmetry == *other.symmetry,
            "grid symmetry mismatch: {:?} vs {:?}",
            self.symmetry,
            other.symmetry
        );
    }

    /// Iterates over all `(x, y)` cell coordinates in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let size = self.size;
        (0..size).flat_map(move |y| (0..size).map(move |x| (x, y)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symmetry(s: Symmetry) -> Arc<SymmetryHierarchy> {
        Arc::new(SymmetryHierarchy::uniform(s).unwrap())
    }

    fn count(grid: &Grid<bool>) -> usize {
        grid.cells().iter().filter(|&&c| c).count()
    }

    #[test]
    fn test_get_set() {
        let mut grid = Grid::new(8, 0.0f32, symmetry(Symmetry::Point));
        grid.set(3, 5, 2.5);
        assert_eq!(grid.get(3, 5), 2.5);
        assert_eq!(grid.cells()[5 * 8 + 3], 2.5);
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn test_out_of_bounds_panics() {
        let grid = Grid::new(8, false, symmetry(Symmetry::Point));
        grid.get(8, 0);
    }

    #[test]
    fn test_fill_circle_clipped() {
        let mut grid = Grid::new(16, false, symmetry(Symmetry::Point));
        grid.fill_circle(Vec2::new(0.0, 0.0), 2.0, true);
        // Quarter disk of radius 2 at the corner: (0,0),(1,0),(2,0),(0,1),(1,1),(0,2)
        assert_eq!(count(&grid), 6);
        assert!(grid.get(1, 1));
        assert!(!grid.get(2, 1));
    }

    #[test]
    fn test_fill_rect_clipped() {
        let mut grid = Grid::new(8, false, symmetry(Symmetry::Point));
        grid.fill_rect(-2, 6, 4, 10, true);
        assert_eq!(count(&grid), 2 * 2);
        assert!(grid.get(0, 7));
        assert!(grid.get(1, 6));
        assert!(!grid.get(2, 6));
    }

    #[test]
    fn test_fill_edge() {
        let mut grid = Grid::new(10, true, symmetry(Symmetry::Point));
        grid.fill_edge(2, false);
        assert_eq!(count(&grid), 6 * 6);
        assert!(!grid.get(1, 5));
        assert!(!grid.get(8, 5));
        assert!(grid.get(2, 7));
    }

    #[test]
    fn test_fill_half_leaves_complementary_half() {
        for s in [Symmetry::Point, Symmetry::X, Symmetry::Y, Symmetry::XY, Symmetry::YX] {
            let mut grid = Grid::new(16, true, symmetry(s));
            grid.fill_half(false);
            for (x, y) in grid.coords() {
                let p = Vec2::new(x as f32, y as f32);
                let q = grid.symmetry_point(p);
                if p == q {
                    continue;
                }
                let (qx, qy) = grid.cell_of(q);
                assert_ne!(grid.get(x, y), grid.get(qx, qy), "{s}: {p} and {q} in the same half");
            }
        }
    }

    #[test]
    fn test_fill_center_band() {
        let mut grid = Grid::new(16, false, symmetry(Symmetry::X));
        grid.fill_center(1.0, true);
        // Centre line at 7.5 so columns 7 and 8 are within 1.0.
        assert_eq!(count(&grid), 2 * 16);
        assert!(grid.get(7, 0) && grid.get(8, 15));
    }

    #[test]
    #[should_panic(expected = "size mismatch")]
    fn test_incompatible_sizes() {
        let a = Grid::new(8, false, symmetry(Symmetry::Point));
        let b = Grid::new(16, false, symmetry(Symmetry::Point));
        a.assert_compatible(&b);
    }
}
