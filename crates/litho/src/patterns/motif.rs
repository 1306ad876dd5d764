//! Motif tiling: the grid walk behind every symbol fill.
//!
//! Rows are `dy` apart and every second row is shifted right by half a
//! column, giving a staggered field. Each grid point gets one motif, turned
//! to follow the local dip. Members of a cycling motif are chosen by the
//! running draw index, counted from zero for each pass.

use crate::canvas::CanvasUnit;
use crate::dip::{DipFunction, dip_angle_degrees};
use crate::error::Result;
use crate::geometry::{BoundingBox, Point, Polygon};
use crate::shapes::Motif;

use super::util::{MAX_GRID_STEPS, grid_start, grid_steps};
use super::{FillOptions, FillStats};

pub fn fill_with_motif(
    unit: &mut CanvasUnit<'_>,
    polygon: &Polygon,
    bounding_box: &BoundingBox,
    dip: Option<&dyn DipFunction>,
    motif: &Motif,
    options: &FillOptions,
) -> Result<FillStats> {
    let (dx_mm, dy_mm) = motif.pitch_mm();
    let stretch = options.scale * options.offset_factor;
    let dx = unit.horizontal_mm_to_input(dx_mm) * stretch;
    let dy = unit.vertical_mm_to_input(dy_mm) * stretch;

    let BoundingBox { x_min, x_max, y_min, y_max } = *bounding_box;
    let mut stats = FillStats::default();
    let columns = grid_steps(x_min, x_max + dx, dx);
    let rows = grid_steps(y_min, y_max + dy, dy);
    let usable = matches!((columns, rows), (Some(c), Some(r)) if c * r <= MAX_GRID_STEPS);
    if !usable {
        log::warn!(
            "{} fill skipped: pitch ({dx}, {dy}) is not usable for this box",
            motif.name()
        );
        return Ok(stats);
    }

    // Motifs are placed in page millimeters, so the polygon is too.
    let region = if polygon.is_empty() {
        None
    } else {
        Some(unit.page_region(polygon)?)
    };

    let x_start = grid_start(x_min, dx);
    let mut y = grid_start(y_min, 2.0 * dy);
    let mut shifted = false;
    let mut index = 0usize;

    while y < y_max + dy {
        let mut x = if shifted { x_start + 0.5 * dx } else { x_start };
        shifted = !shifted;

        while x < x_max + dx {
            let position = Point::new(x, y);
            let angle = dip_angle_degrees(dip.and_then(|d| d.dip_at(position)));
            stats.drawn += motif.draw(
                index,
                position,
                angle,
                unit,
                region.as_ref(),
                options.color,
                options.scale,
            )?;
            stats.candidates += 1;
            index += 1;
            x += dx;
        }

        y += dy;
    }

    log::debug!(
        "{} fill: {} grid points, {} pieces drawn",
        motif.name(),
        stats.candidates,
        stats.drawn
    );
    Ok(stats)
}
