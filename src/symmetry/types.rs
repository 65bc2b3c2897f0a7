//! Symmetry types and the coordinate transforms they induce.

use std::fmt;
use std::str::FromStr;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while building or parsing symmetry settings.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SymmetryError {
    #[error("Unknown symmetry '{0}' (expected one of Point, X, Y, XY, YX, Quad, Diag)")]
    Unknown(String),
    #[error("Spawn symmetry must be two-fold (Point, X, Y, XY or YX), got {0}")]
    InvalidSpawnSymmetry(Symmetry),
}

/// A mirror transform applied to grid coordinates.
///
/// All transforms map the cell grid `[0, size)²` onto itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Symmetry {
    /// 180° rotation about the grid centre.
    Point,
    /// Reflection across the vertical centre line.
    X,
    /// Reflection across the horizontal centre line.
    Y,
    /// Reflection across the main diagonal (`x == y`).
    XY,
    /// Reflection across the anti diagonal (`x + y == size - 1`).
    YX,
    /// Four-way rotation about the grid centre.
    Quad,
    /// Reflection across both diagonals.
    Diagonal,
}

impl Symmetry {
    /// All symmetry types, in declaration order.
    pub fn all() -> [Symmetry; 7] {
        [
            Symmetry::Point,
            Symmetry::X,
            Symmetry::Y,
            Symmetry::XY,
            Symmetry::YX,
            Symmetry::Quad,
            Symmetry::Diagonal,
        ]
    }

    /// Returns the canonical name of the symmetry.
    pub fn name(&self) -> &'static str {
        match self {
            Symmetry::Point => "Point",
            Symmetry::X => "X",
            Symmetry::Y => "Y",
            Symmetry::XY => "XY",
            Symmetry::YX => "YX",
            Symmetry::Quad => "Quad",
            Symmetry::Diagonal => "Diag",
        }
    }

    /// Number of symmetric copies of every point, the point itself included.
    pub fn fold(&self) -> usize {
        match self {
            Symmetry::Quad | Symmetry::Diagonal => 4,
            _ => 2,
        }
    }

    /// True for symmetries whose mirror transform is an involution.
    pub fn is_two_fold(&self) -> bool {
        self.fold() == 2
    }
}

impl fmt::Display for Symmetry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Symmetry {
    type Err = SymmetryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "POINT" => Ok(Symmetry::Point),
            "X" => Ok(Symmetry::X),
            "Y" => Ok(Symmetry::Y),
            "XY" => Ok(Symmetry::XY),
            "YX" => Ok(Symmetry::YX),
            "QUAD" => Ok(Symmetry::Quad),
            "DIAG" | "DIAGONAL" => Ok(Symmetry::Diagonal),
            _ => Err(SymmetryError::Unknown(s.to_string())),
        }
    }
}

/// Maps `point` to its designated partner under `symmetry` on a grid of `size` cells.
///
/// Two-fold symmetries are involutions. For `Quad` and `Diagonal` the designated
/// partner is the 180° image, which is the one image both share and is itself an
/// involution; use [`mirror_points`] to enumerate all three images.
pub fn mirror_point(point: Vec2, symmetry: Symmetry, size: usize) -> Vec2 {
    let m = size.saturating_sub(1) as f32;
    match symmetry {
        Symmetry::Point | Symmetry::Quad | Symmetry::Diagonal => Vec2::new(m - point.x, m - point.y),
        Symmetry::X => Vec2::new(m - point.x, point.y),
        Symmetry::Y => Vec2::new(point.x, m - point.y),
        Symmetry::XY => Vec2::new(point.y, point.x),
        Symmetry::YX => Vec2::new(m - point.y, m - point.x),
    }
}

/// Returns every image of `point` under `symmetry`, excluding `point` itself.
///
/// Two-fold symmetries yield one image; `Quad` yields the 90°, 180° and 270°
/// rotations, `Diagonal` the two diagonal reflections followed by the 180° image.
pub fn mirror_points(point: Vec2, symmetry: Symmetry, size: usize) -> Vec<Vec2> {
    let m = size.saturating_sub(1) as f32;
    match symmetry {
        Symmetry::Quad => vec![
            Vec2::new(m - point.y, point.x),
            Vec2::new(m - point.x, m - point.y),
            Vec2::new(point.y, m - point.x),
        ],
        Symmetry::Diagonal => vec![
            Vec2::new(point.y, point.x),
            Vec2::new(m - point.y, m - point.x),
            Vec2::new(m - point.x, m - point.y),
        ],
        _ => vec![mirror_point(point, symmetry, size)],
    }
}
