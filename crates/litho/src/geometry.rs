//! Core geometry types for litho.
//!
//! Every coordinate here lives in exactly one space: real-world meters
//! (section coordinates) or page millimeters. Nothing in this module knows
//! which one; callers keep them apart and convert through
//! [`ScaleContext`](crate::units::ScaleContext).

use serde::{Deserialize, Serialize};

/// A 2D point with x,y coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// A closed ring of points bounding a layer.
///
/// The first point may or may not be repeated at the end; both forms
/// describe the same region. The ring need not be convex.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Polygon {
    pub points: Vec<Point>,
}

/// Axis-aligned box used to bound a tiling grid.
///
/// Stored in `(x_min, x_max, y_min, y_max)` order. It is a fitting hint for
/// the grid walk, not a clip region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

// ============================================================================
// IMPLEMENTATIONS
// ============================================================================

impl Point {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Distance to another point.
    #[inline]
    pub fn distance(&self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Point::new(x, y)
    }
}

impl Polygon {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Build a polygon from `(x, y)` pairs.
    pub fn from_pairs(pairs: &[(f64, f64)]) -> Self {
        Self::new(pairs.iter().copied().map(Point::from).collect())
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Bounding box of the ring, or `None` for an empty polygon.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(&self.points)
    }

    /// Map every vertex through `f`, e.g. to move the ring into page space.
    pub fn map_points<F>(&self, f: F) -> Polygon
    where
        F: FnMut(&Point) -> Point,
    {
        Polygon::new(self.points.iter().map(f).collect())
    }
}

impl BoundingBox {
    pub const fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Self {
        Self { x_min, x_max, y_min, y_max }
    }

    /// Tightest box around `points`, or `None` if there are none.
    pub fn from_points(points: &[Point]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }

        let x_min = points.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
        let x_max = points.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
        let y_min = points.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
        let y_max = points.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);

        Some(Self::new(x_min, x_max, y_min, y_max))
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }
}

// ============================================================================
// POINT-SET TRANSFORMS
// ============================================================================
//
// A motif is drawn by composing rotate -> scale -> translate. Rotation and
// scale happen in the motif's own frame, so an off-centre shape turns about
// its defined origin and not about the grid point it lands on.

/// Rotate points counter-clockwise about the origin.
pub fn rotate(points: &[Point], angle_degrees: f64) -> Vec<Point> {
    let (sin, cos) = angle_degrees.to_radians().sin_cos();
    points
        .iter()
        .map(|p| Point::new(p.x * cos - p.y * sin, p.x * sin + p.y * cos))
        .collect()
}

/// Multiply both coordinates of every point by `factor`.
pub fn scale(points: &[Point], factor: f64) -> Vec<Point> {
    points
        .iter()
        .map(|p| Point::new(p.x * factor, p.y * factor))
        .collect()
}

/// Add `offset` to every point.
pub fn translate(points: &[Point], offset: Point) -> Vec<Point> {
    points
        .iter()
        .map(|p| Point::new(p.x + offset.x, p.y + offset.y))
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
