//! Drawing sinks.
//!
//! A [`Target`] receives primitives in page millimeters with the origin at
//! the bottom-left corner of the page. Everything above this trait (units,
//! shapes, fills) is independent of the output format.

mod recorder;
mod svg;

pub use recorder::{Primitive, Recorder};
pub use svg::SvgTarget;

use crate::error::TargetError;
use crate::geometry::Point;
use crate::style::{CircleStyle, LineStyle, RectangleStyle, TableStyle, TextStyle};

/// The primitive set a drawing backend must provide.
pub trait Target {
    /// Open polyline, or a closed filled path when `style.fill` is set.
    fn draw_lines(&mut self, points: &[Point], style: &LineStyle) -> Result<(), TargetError>;

    fn draw_circle(
        &mut self,
        center: Point,
        radius: f64,
        style: &CircleStyle,
    ) -> Result<(), TargetError>;

    /// `origin` is the bottom-left corner, `size` is `(width, height)`.
    fn draw_rectangle(
        &mut self,
        origin: Point,
        size: (f64, f64),
        style: &RectangleStyle,
    ) -> Result<(), TargetError>;

    fn draw_text(&mut self, origin: Point, text: &str, style: &TextStyle)
    -> Result<(), TargetError>;

    /// `origin` is the top-left corner of the table.
    fn draw_table(
        &mut self,
        origin: Point,
        values: &[Vec<String>],
        style: &TableStyle,
    ) -> Result<(), TargetError>;
}
