//! Vertical hatching (peat, topsoil).

use crate::canvas::CanvasUnit;
use crate::error::Result;
use crate::geometry::{BoundingBox, Point, Polygon};
use crate::style::{Color, LineStyle};

use super::FillStats;
use super::util::{grid_start, grid_steps};

/// Width of every hatch line, in page millimeters.
pub const HATCH_LINE_WIDTH: f64 = 0.1;

/// Fill `polygon` with vertical lines `dx_mm` apart on paper.
///
/// The first line sits one pitch to the right of the grid start, and the
/// last at the first grid value at or beyond the right edge of the box.
pub fn fill_vertical_lines(
    unit: &mut CanvasUnit<'_>,
    polygon: &Polygon,
    bounding_box: &BoundingBox,
    dx_mm: f64,
    color: Color,
) -> Result<FillStats> {
    let dx = unit.horizontal_mm_to_input(dx_mm);
    let BoundingBox { x_min, x_max, y_min, y_max } = *bounding_box;
    let mut stats = FillStats::default();
    if grid_steps(x_min, x_max, dx).is_none() {
        log::warn!("vertical fill skipped: pitch {dx_mm} mm is not usable for this box");
        return Ok(stats);
    }

    let region = unit.input_region(polygon)?;
    let style = LineStyle::new(HATCH_LINE_WIDTH).color(color);

    let mut lines = Vec::new();
    let mut x = grid_start(x_min, dx);
    while x < x_max {
        x += dx;
        lines.push((vec![Point::new(x, y_min), Point::new(x, y_max)], style));
    }
    stats.candidates = lines.len();
    stats.drawn = unit.draw_batch_m_inside(&region, &lines)?;

    log::debug!(
        "vertical fill: {} candidate lines, {} pieces drawn",
        stats.candidates,
        stats.drawn
    );
    Ok(stats)
}
