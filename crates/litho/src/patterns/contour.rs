//! Contour hatching: copies of a layer's lower boundary stacked upward.

use crate::canvas::CanvasUnit;
use crate::error::Result;
use crate::geometry::{BoundingBox, Point, Polygon};
use crate::style::{Color, LineStyle, LineType};

use super::FillStats;
use super::util::{grid_start, grid_steps};
use super::vertical::HATCH_LINE_WIDTH;

/// Paper distance between successive copies.
pub const CONTOUR_PITCH_MM: f64 = 3.0;

/// Draw `bottom` dashed inside `polygon`, then again shifted up by the
/// pitch, until the copies pass the top of the box.
pub fn fill_with_contour_lines(
    unit: &mut CanvasUnit<'_>,
    polygon: &Polygon,
    bounding_box: &BoundingBox,
    bottom: &[Point],
    color: Color,
) -> Result<FillStats> {
    let dy = unit.vertical_mm_to_input(CONTOUR_PITCH_MM);
    let mut stats = FillStats::default();
    if bottom.len() < 2 {
        return Ok(stats);
    }
    if grid_steps(bounding_box.y_min, bounding_box.y_max + dy, dy).is_none() {
        log::warn!("contour fill skipped: pitch {CONTOUR_PITCH_MM} mm is not usable for this box");
        return Ok(stats);
    }

    let region = unit.input_region(polygon)?;
    let style = LineStyle::new(HATCH_LINE_WIDTH)
        .line_type(LineType::Dash)
        .color(color);

    let mut copies = Vec::new();
    let mut points = bottom.to_vec();
    let mut y = grid_start(bounding_box.y_min, 2.0 * dy);
    while y < bounding_box.y_max + dy {
        copies.push((points.clone(), style));
        y += dy;
        for p in &mut points {
            p.y += dy;
        }
    }
    stats.candidates = copies.len();
    stats.drawn = unit.draw_batch_m_inside(&region, &copies)?;

    log::debug!(
        "contour fill: {} copies, {} pieces drawn",
        stats.candidates,
        stats.drawn
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::UnitFrame;
    use crate::target::Recorder;
    use crate::units::ScaleContext;

    #[test]
    fn copies_stack_up_to_the_top() {
        let mut rec = Recorder::new();
        let mut unit = CanvasUnit::new(&mut rec, UnitFrame::new(Point::new(0.0, 0.0), 50.0, 50.0));
        let polygon = Polygon::from_pairs(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
        let bbox = polygon.bounding_box().unwrap();
        let bottom = [Point::new(0.0, 0.0), Point::new(10.0, 0.0)];

        let stats = fill_with_contour_lines(&mut unit, &polygon, &bbox, &bottom, Color::Black).unwrap();
        // Offsets 0, 3, 6, 9 land inside; 12 does not.
        assert_eq!(stats.candidates, 5);
        assert_eq!(stats.drawn, 4);

        let ys: Vec<f64> = rec.lines().map(|(pts, _)| pts[0].y).collect();
        assert_eq!(ys, [0.0, 3.0, 6.0, 9.0]);
        assert!(rec.lines().all(|(_, s)| s.line_type == LineType::Dash));
    }

    #[test]
    fn bent_boundary_is_clipped_piecewise() {
        let mut rec = Recorder::new();
        let mut unit = CanvasUnit::new(&mut rec, UnitFrame::new(Point::new(0.0, 0.0), 50.0, 50.0));
        let polygon = Polygon::from_pairs(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
        let bbox = BoundingBox::new(0.0, 10.0, 0.0, 4.0);
        // A V dipping below the layer: its arms are cut at y = 0.
        let bottom = [Point::new(0.0, 2.0), Point::new(5.0, -3.0), Point::new(10.0, 2.0)];

        let stats = fill_with_contour_lines(&mut unit, &polygon, &bbox, &bottom, Color::Black).unwrap();
        assert_eq!(stats.candidates, 3);
        // First copy: two arms; the others sit above the floor.
        assert_eq!(stats.drawn, 4);
    }

    #[test]
    fn vanishing_pitch_is_skipped() {
        let mut rec = Recorder::new();
        let frame = UnitFrame::new(Point::new(0.0, 0.0), 50.0, 50.0)
            .scaled(ScaleContext::new(1.0e-18, 1.0e-18));
        let mut unit = CanvasUnit::new(&mut rec, frame);
        let polygon = Polygon::from_pairs(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
        let bbox = polygon.bounding_box().unwrap();
        let bottom = [Point::new(0.0, 0.0), Point::new(10.0, 0.0)];

        let stats = fill_with_contour_lines(&mut unit, &polygon, &bbox, &bottom, Color::Black).unwrap();
        assert_eq!(stats, FillStats::default());
        assert_eq!(rec.line_count(), 0);
    }
}
