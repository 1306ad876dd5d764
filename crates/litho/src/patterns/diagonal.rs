//! Diagonal hatching for consolidated rock.
//!
//! Lines are long enough (fifty box widths each way) to cross any part of
//! the box from their anchor, so only the row pitch matters. On a scaled
//! unit the rise is a tenth of the run in meters, which the usual vertical
//! exaggeration turns back into roughly 45° on paper.

use crate::canvas::CanvasUnit;
use crate::error::Result;
use crate::geometry::{BoundingBox, Point, Polygon};
use crate::style::{Color, LineStyle, LineType};

use super::FillStats;
use super::util::{floor_div, grid_start, grid_steps};
use super::vertical::HATCH_LINE_WIDTH;

/// How far each line reaches from its anchor, in box spans.
const REACH: f64 = 50.0;

/// Settings of one diagonal pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiagonalOptions {
    /// Vertical pitch in page millimeters. The anchor column snaps to half
    /// of it horizontally.
    pub d_mm: f64,
    /// Toggle dash/solid every row.
    pub alternating: bool,
    /// Line type when not alternating.
    pub line_type: Option<LineType>,
    pub color: Color,
}

impl Default for DiagonalOptions {
    fn default() -> Self {
        Self {
            d_mm: 3.0,
            alternating: false,
            line_type: None,
            color: Color::Black,
        }
    }
}

pub fn fill_diagonal_lines(
    unit: &mut CanvasUnit<'_>,
    polygon: &Polygon,
    bounding_box: &BoundingBox,
    options: &DiagonalOptions,
) -> Result<FillStats> {
    let BoundingBox { x_min, x_max, y_min, y_max } = *bounding_box;
    let run = x_max - x_min;

    let row_pitch = unit.vertical_mm_to_input(options.d_mm);
    let column_pitch = unit.horizontal_mm_to_input(0.5 * options.d_mm);
    let rise = if unit.is_scaled() { run / 10.0 } else { run };

    let mut stats = FillStats::default();
    let rows = grid_steps(y_min - rise, y_max + REACH * rise, row_pitch);
    if rows.is_none() || grid_steps(x_min, x_max, column_pitch).is_none() {
        log::warn!(
            "diagonal fill skipped: pitch {} mm is not usable for this box",
            options.d_mm
        );
        return Ok(stats);
    }

    let region = unit.input_region(polygon)?;

    let mut y = grid_start(y_min - rise, row_pitch);
    let mut x = grid_start(x_min, column_pitch);
    if floor_div(x, column_pitch).rem_euclid(2.0) != 0.0 {
        x += column_pitch;
    }

    // Phase of the anchor column; the first row toggles it before drawing.
    let mut dashed = floor_div(x, column_pitch).rem_euclid(4.0) == 0.0;

    let (x_left, x_right) = (x - REACH * run, x + REACH * run);
    let mut lines = Vec::new();
    while y - REACH * rise < y_max {
        let line = [
            Point::new(x_left, y - REACH * rise),
            Point::new(x_right, y + REACH * rise),
        ];
        y += row_pitch;

        let line_type = if options.alternating {
            dashed = !dashed;
            if dashed { LineType::Dash } else { LineType::Solid }
        } else {
            options.line_type.unwrap_or_default()
        };

        let style = LineStyle::new(HATCH_LINE_WIDTH)
            .line_type(line_type)
            .color(options.color);
        lines.push((line.to_vec(), style));
    }
    stats.candidates = lines.len();
    stats.drawn = unit.draw_batch_m_inside(&region, &lines)?;

    log::debug!(
        "diagonal fill: {} candidate lines, {} pieces drawn",
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

    fn inset_square() -> Polygon {
        Polygon::from_pairs(&[(0.5, 0.5), (29.5, 0.5), (29.5, 29.5), (0.5, 29.5)])
    }

    #[test]
    fn solid_rows_at_two_millimeters() {
        let mut rec = Recorder::new();
        let mut unit = CanvasUnit::new(&mut rec, UnitFrame::new(Point::new(0.0, 0.0), 40.0, 40.0));
        let polygon = inset_square();
        let bbox = polygon.bounding_box().unwrap();
        let options = DiagonalOptions { d_mm: 2.0, ..DiagonalOptions::default() };

        let stats = fill_diagonal_lines(&mut unit, &polygon, &bbox, &options).unwrap();
        // Unscaled lines have slope 1 through (0, c) for even c; those with
        // -29 < c < 29 cross the polygon.
        assert_eq!(stats.drawn, 29);
        assert!(stats.candidates > stats.drawn);
        for (points, style) in rec.lines() {
            assert_eq!(style.line_type, LineType::Solid);
            let (a, b) = (points[0], points[points.len() - 1]);
            assert!(((b.y - a.y) - (b.x - a.x)).abs() < 1e-9);
        }
    }

    #[test]
    fn alternating_rows_toggle_dash_and_solid() {
        let mut rec = Recorder::new();
        let mut unit = CanvasUnit::new(&mut rec, UnitFrame::new(Point::new(0.0, 0.0), 40.0, 40.0));
        let polygon = inset_square();
        let bbox = polygon.bounding_box().unwrap();
        let options = DiagonalOptions { alternating: true, ..DiagonalOptions::default() };

        fill_diagonal_lines(&mut unit, &polygon, &bbox, &options).unwrap();
        let types: Vec<LineType> = rec.lines().map(|(_, s)| s.line_type).collect();
        assert!(types.len() > 4);
        for pair in types.windows(2) {
            assert_ne!(pair[0], pair[1]);
        }
    }

    #[test]
    fn first_row_phase_follows_anchor_column() {
        // Anchor column 0 is a multiple of four pitches, so the phase starts
        // dashed and the first row flips it to solid. Give the polygon the
        // whole reach of the first candidate line so that row is drawn.
        let mut rec = Recorder::new();
        let mut unit = CanvasUnit::new(&mut rec, UnitFrame::new(Point::new(0.0, 0.0), 40.0, 40.0));
        let polygon = Polygon::from_pairs(&[(-1000.0, -1000.0), (1000.0, -1000.0), (1000.0, 1000.0), (-1000.0, 1000.0)]);
        let bbox = BoundingBox::new(0.0, 10.0, 0.0, 10.0);
        let options = DiagonalOptions { alternating: true, ..DiagonalOptions::default() };

        fill_diagonal_lines(&mut unit, &polygon, &bbox, &options).unwrap();
        let first = rec.lines().next().map(|(_, s)| s.line_type);
        assert_eq!(first, Some(LineType::Solid));
    }

    #[test]
    fn scaled_rise_is_a_tenth_of_the_run() {
        let mut rec = Recorder::new();
        let frame = UnitFrame::new(Point::new(0.0, 0.0), 200.0, 200.0)
            .scaled(ScaleContext::default());
        let mut unit = CanvasUnit::new(&mut rec, frame);
        let polygon = Polygon::from_pairs(&[(0.0, 0.0), (100.0, 0.0), (100.0, 10.0), (0.0, 10.0)]);
        let bbox = polygon.bounding_box().unwrap();

        let stats = fill_diagonal_lines(&mut unit, &polygon, &bbox, &DiagonalOptions::default()).unwrap();
        assert!(stats.drawn > 0);
        // 1:1000 / 1:100 makes a 1:10 slope in meters run at 45° on paper.
        for (points, _) in rec.lines() {
            let (a, b) = (points[0], points[points.len() - 1]);
            assert!(((b.y - a.y) - (b.x - a.x)).abs() < 1e-6);
        }
    }

    #[test]
    fn vanishing_pitch_is_skipped() {
        let mut rec = Recorder::new();
        let frame = UnitFrame::new(Point::new(0.0, 0.0), 200.0, 200.0)
            .scaled(ScaleContext::new(1.0e-18, 1.0e-18));
        let mut unit = CanvasUnit::new(&mut rec, frame);
        let polygon = Polygon::from_pairs(&[(0.0, 0.0), (100.0, 0.0), (100.0, 10.0), (0.0, 10.0)]);
        let bbox = polygon.bounding_box().unwrap();

        let stats = fill_diagonal_lines(&mut unit, &polygon, &bbox, &DiagonalOptions::default()).unwrap();
        assert_eq!(stats, FillStats::default());
        assert_eq!(rec.line_count(), 0);
    }
}
