//! Meters ↔ page millimeters.
//!
//! A section is surveyed in meters but drawn on paper at two independent
//! scales: the horizontal one (e.g. 1:1000) and a vertically exaggerated
//! one (e.g. 1:100). [`ScaleContext`] carries both plus the additive offsets
//! that move the section's origin onto the unit's origin.

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// Scale and offset state of a scaled canvas unit.
///
/// `scale_horizontal = 1000.0` means 1:1000, so one meter is one
/// millimeter on paper.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaleContext {
    pub scale_horizontal: f64,
    pub scale_vertical: f64,
    pub x_offset_m: f64,
    pub y_offset_m: f64,
}

impl Default for ScaleContext {
    fn default() -> Self {
        Self {
            scale_horizontal: 1000.0,
            scale_vertical: 100.0,
            x_offset_m: 0.0,
            y_offset_m: 0.0,
        }
    }
}

impl ScaleContext {
    pub fn new(scale_horizontal: f64, scale_vertical: f64) -> Self {
        Self {
            scale_horizontal,
            scale_vertical,
            ..Self::default()
        }
    }

    pub fn with_offsets(mut self, x_offset_m: f64, y_offset_m: f64) -> Self {
        self.x_offset_m = x_offset_m;
        self.y_offset_m = y_offset_m;
        self
    }

    /// Snapshot for a linked unit. Later changes to `self` are not seen by
    /// the copy.
    pub fn linked(&self) -> Self {
        *self
    }

    /// Millimeters of paper per meter, horizontally.
    #[inline]
    pub fn horizontal_mm_per_m(&self) -> f64 {
        1000.0 / self.scale_horizontal
    }

    /// Millimeters of paper per meter, vertically.
    #[inline]
    pub fn vertical_mm_per_m(&self) -> f64 {
        1000.0 / self.scale_vertical
    }

    /// Position in meters → position in unit millimeters, offsets applied.
    #[inline]
    pub fn scale(&self, point: Point) -> Point {
        Point::new(
            self.horizontal_mm_per_m() * (point.x + self.x_offset_m),
            self.vertical_mm_per_m() * (point.y + self.y_offset_m),
        )
    }

    /// Inverse of [`scale`](Self::scale).
    #[inline]
    pub fn unscale(&self, point: Point) -> Point {
        Point::new(
            point.x / self.horizontal_mm_per_m() - self.x_offset_m,
            point.y / self.vertical_mm_per_m() - self.y_offset_m,
        )
    }

    // Length conversions: no offsets involved.

    #[inline]
    pub fn mm_to_m_horizontal(&self, mm: f64) -> f64 {
        mm / self.horizontal_mm_per_m()
    }

    #[inline]
    pub fn mm_to_m_vertical(&self, mm: f64) -> f64 {
        mm / self.vertical_mm_per_m()
    }

    #[inline]
    pub fn m_to_mm_horizontal(&self, m: f64) -> f64 {
        m * self.horizontal_mm_per_m()
    }

    #[inline]
    pub fn m_to_mm_vertical(&self, m: f64) -> f64 {
        m * self.vertical_mm_per_m()
    }
}
