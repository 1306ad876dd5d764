//! Canvas units: rectangular regions of the page with their own origin.
//!
//! A unit draws in millimeters relative to its bottom-left corner. A scaled
//! unit additionally accepts meters through the `_m` methods and converts
//! them with its [`ScaleContext`]. Fills work in the unit's *input space*:
//! meters when scaled, millimeters otherwise.

use crate::clip::{ClipConfig, ClipRegion};
use crate::error::Result;
use crate::geometry::{BoundingBox, Point, Polygon};
use crate::style::{CircleStyle, Color, LineStyle, RectangleStyle, TableStyle, TextStyle};
use crate::target::Target;
use crate::units::ScaleContext;

// ============================================================================
// FRAME
// ============================================================================

/// Placement and scale of a unit on the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitFrame {
    /// Bottom-left corner in page millimeters.
    pub origin: Point,
    pub width_mm: f64,
    pub height_mm: f64,
    pub scale: Option<ScaleContext>,
}

impl UnitFrame {
    pub fn new(origin: Point, width_mm: f64, height_mm: f64) -> Self {
        Self {
            origin,
            width_mm,
            height_mm,
            scale: None,
        }
    }

    pub fn scaled(mut self, scale: ScaleContext) -> Self {
        self.scale = Some(scale);
        self
    }

    /// A new frame that takes a snapshot of this frame's scale context.
    pub fn linked(&self, origin: Point, width_mm: f64, height_mm: f64) -> Self {
        Self {
            origin,
            width_mm,
            height_mm,
            scale: self.scale.as_ref().map(ScaleContext::linked),
        }
    }

    pub fn left(&self) -> f64 {
        self.origin.x
    }

    pub fn right(&self) -> f64 {
        self.origin.x + self.width_mm
    }

    pub fn bottom(&self) -> f64 {
        self.origin.y
    }

    pub fn top(&self) -> f64 {
        self.origin.y + self.height_mm
    }

    pub fn area(&self) -> BoundingBox {
        BoundingBox::new(self.left(), self.right(), self.bottom(), self.top())
    }

    /// Interiors intersect. Frames that only share an edge do not overlap.
    pub fn overlaps(&self, other: &UnitFrame) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.bottom() < other.top()
            && other.bottom() < self.top()
    }

    /// Page position of a point given relative to this frame's origin.
    #[inline]
    pub fn point_from_origin(&self, p: Point) -> Point {
        Point::new(self.origin.x + p.x, self.origin.y + p.y)
    }
}

// ============================================================================
// CANVAS UNIT
// ============================================================================

/// A frame bound to a drawing target.
pub struct CanvasUnit<'t> {
    target: &'t mut dyn Target,
    frame: UnitFrame,
    clip: ClipConfig,
}

impl<'t> CanvasUnit<'t> {
    pub fn new(target: &'t mut dyn Target, frame: UnitFrame) -> Self {
        Self {
            target,
            frame,
            clip: ClipConfig::default(),
        }
    }

    pub fn frame(&self) -> &UnitFrame {
        &self.frame
    }

    pub fn is_scaled(&self) -> bool {
        self.frame.scale.is_some()
    }

    pub fn scale_context(&self) -> Option<&ScaleContext> {
        self.frame.scale.as_ref()
    }

    /// Input-space point → unit millimeters.
    #[inline]
    pub fn to_unit_mm(&self, p: Point) -> Point {
        match &self.frame.scale {
            Some(ctx) => ctx.scale(p),
            None => p,
        }
    }

    /// Horizontal page length in millimeters → input-space length.
    pub fn horizontal_mm_to_input(&self, mm: f64) -> f64 {
        self.frame
            .scale
            .as_ref()
            .map_or(mm, |ctx| ctx.mm_to_m_horizontal(mm))
    }

    /// Vertical page length in millimeters → input-space length.
    pub fn vertical_mm_to_input(&self, mm: f64) -> f64 {
        self.frame
            .scale
            .as_ref()
            .map_or(mm, |ctx| ctx.mm_to_m_vertical(mm))
    }

    /// Clip region of an input-space polygon, prepared in unit millimeters.
    pub fn page_region(&self, polygon: &Polygon) -> Result<ClipRegion> {
        let mm = polygon.map_points(|&p| self.to_unit_mm(p));
        Ok(ClipRegion::with_config(&mm, self.clip)?)
    }

    /// Clip region of an input-space polygon, prepared as given.
    pub fn input_region(&self, polygon: &Polygon) -> Result<ClipRegion> {
        Ok(ClipRegion::with_config(polygon, self.clip)?)
    }

    // ------------------------------------------------------------------------
    // Lines
    // ------------------------------------------------------------------------

    /// Points in unit millimeters.
    pub fn draw_lines(&mut self, points: &[Point], style: &LineStyle) -> Result<()> {
        let page: Vec<Point> = points
            .iter()
            .map(|&p| self.frame.point_from_origin(p))
            .collect();
        self.target.draw_lines(&page, style)?;
        Ok(())
    }

    /// Clip unit-millimeter points against a region from
    /// [`page_region`](Self::page_region) and draw what survives.
    ///
    /// Returns the number of pieces drawn.
    pub fn draw_lines_inside(
        &mut self,
        region: &ClipRegion,
        points: &[Point],
        style: &LineStyle,
    ) -> Result<usize> {
        let pieces = region.clip(points)?;
        for piece in &pieces {
            self.draw_lines(piece, style)?;
        }
        Ok(pieces.len())
    }

    /// Points in the input space.
    pub fn draw_lines_m(&mut self, points: &[Point], style: &LineStyle) -> Result<()> {
        let mm: Vec<Point> = points.iter().map(|&p| self.to_unit_mm(p)).collect();
        self.draw_lines(&mm, style)
    }

    /// Clip a batch of input-space lines against a region from
    /// [`input_region`](Self::input_region) in one pass, then convert and
    /// draw every surviving piece with its line's style.
    ///
    /// Returns the number of pieces drawn.
    pub fn draw_batch_m_inside(
        &mut self,
        region: &ClipRegion,
        lines: &[(Vec<Point>, LineStyle)],
    ) -> Result<usize> {
        let paths: Vec<&[Point]> = lines.iter().map(|(points, _)| points.as_slice()).collect();
        let clipped = region.clip_all(&paths)?;

        let mut drawn = 0;
        for (pieces, (_, style)) in clipped.iter().zip(lines) {
            for piece in pieces {
                self.draw_lines_m(piece, style)?;
            }
            drawn += pieces.len();
        }
        Ok(drawn)
    }

    // ------------------------------------------------------------------------
    // Other primitives
    // ------------------------------------------------------------------------

    pub fn draw_circle(&mut self, center: Point, radius: f64, style: &CircleStyle) -> Result<()> {
        let center = self.frame.point_from_origin(center);
        self.target.draw_circle(center, radius, style)?;
        Ok(())
    }

    /// `radius` stays in millimeters.
    pub fn draw_circle_m(&mut self, center: Point, radius: f64, style: &CircleStyle) -> Result<()> {
        self.draw_circle(self.to_unit_mm(center), radius, style)
    }

    pub fn draw_rectangle(
        &mut self,
        origin: Point,
        size: (f64, f64),
        style: &RectangleStyle,
    ) -> Result<()> {
        let origin = self.frame.point_from_origin(origin);
        self.target.draw_rectangle(origin, size, style)?;
        Ok(())
    }

    pub fn draw_rectangle_m(
        &mut self,
        origin: Point,
        size: (f64, f64),
        style: &RectangleStyle,
    ) -> Result<()> {
        let size = match &self.frame.scale {
            Some(ctx) => (ctx.m_to_mm_horizontal(size.0), ctx.m_to_mm_vertical(size.1)),
            None => size,
        };
        self.draw_rectangle(self.to_unit_mm(origin), size, style)
    }

    pub fn draw_text(&mut self, origin: Point, text: &str, style: &TextStyle) -> Result<()> {
        let origin = self.frame.point_from_origin(origin);
        self.target.draw_text(origin, text, style)?;
        Ok(())
    }

    pub fn draw_text_m(&mut self, origin: Point, text: &str, style: &TextStyle) -> Result<()> {
        self.draw_text(self.to_unit_mm(origin), text, style)
    }

    /// `origin` is the table's top-left corner in unit millimeters.
    pub fn draw_table(
        &mut self,
        origin: Point,
        values: &[Vec<String>],
        style: &TableStyle,
    ) -> Result<()> {
        let origin = self.frame.point_from_origin(origin);
        self.target.draw_table(origin, values, style)?;
        Ok(())
    }

    /// Red outline of the unit's frame.
    pub fn draw_border(&mut self) -> Result<()> {
        let (w, h) = (self.frame.width_mm, self.frame.height_mm);
        let outline = [
            Point::new(0.0, 0.0),
            Point::new(w, 0.0),
            Point::new(w, h),
            Point::new(0.0, h),
            Point::new(0.0, 0.0),
        ];
        self.draw_lines(&outline, &LineStyle::new(0.1).color(Color::Red))
    }

    /// Fill the whole frame.
    pub fn draw_background(&mut self, color: Color) -> Result<()> {
        let style = RectangleStyle {
            fill: Some(color),
            edge: None,
            width: 0.0,
        };
        self.draw_rectangle(
            Point::new(0.0, 0.0),
            (self.frame.width_mm, self.frame.height_mm),
            &style,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::{Primitive, Recorder};

    fn square_m(side: f64) -> Polygon {
        Polygon::from_pairs(&[(0.0, 0.0), (side, 0.0), (side, side), (0.0, side)])
    }

    #[test]
    fn frame_edges_and_overlap() {
        let a = UnitFrame::new(Point::new(10.0, 20.0), 30.0, 40.0);
        assert_eq!((a.left(), a.right(), a.bottom(), a.top()), (10.0, 40.0, 20.0, 60.0));

        let touching = UnitFrame::new(Point::new(40.0, 20.0), 10.0, 10.0);
        assert!(!a.overlaps(&touching));
        let inside = UnitFrame::new(Point::new(15.0, 25.0), 5.0, 5.0);
        assert!(a.overlaps(&inside));
        assert!(inside.overlaps(&a));
    }

    #[test]
    fn linked_frame_snapshots_scale() {
        let mut parent = UnitFrame::new(Point::new(0.0, 0.0), 100.0, 100.0)
            .scaled(ScaleContext::new(500.0, 50.0));
        let child = parent.linked(Point::new(100.0, 0.0), 20.0, 100.0);
        if let Some(ctx) = parent.scale.as_mut() {
            ctx.scale_horizontal = 2000.0;
        }
        assert_eq!(child.scale.map(|c| c.scale_horizontal), Some(500.0));
    }

    #[test]
    fn lines_are_offset_by_origin() {
        let mut rec = Recorder::new();
        let mut unit = CanvasUnit::new(&mut rec, UnitFrame::new(Point::new(5.0, 7.0), 50.0, 50.0));
        unit.draw_lines(&[Point::new(0.0, 0.0), Point::new(1.0, 1.0)], &LineStyle::default())
            .unwrap();
        let (points, _) = rec.lines().next().unwrap();
        assert_eq!(points, &[Point::new(5.0, 7.0), Point::new(6.0, 8.0)]);
    }

    #[test]
    fn meters_go_through_the_scale_context() {
        let mut rec = Recorder::new();
        let frame = UnitFrame::new(Point::new(0.0, 0.0), 100.0, 100.0)
            .scaled(ScaleContext::default());
        let mut unit = CanvasUnit::new(&mut rec, frame);
        unit.draw_lines_m(&[Point::new(0.0, 0.0), Point::new(4.0, 2.0)], &LineStyle::default())
            .unwrap();
        let (points, _) = rec.lines().next().unwrap();
        // 1:1000 horizontally, 1:100 vertically
        assert_eq!(points[1], Point::new(4.0, 20.0));
    }

    #[test]
    fn inside_drawing_clips_in_both_spaces() {
        let mut rec = Recorder::new();
        let frame = UnitFrame::new(Point::new(0.0, 0.0), 100.0, 100.0)
            .scaled(ScaleContext::new(1000.0, 1000.0));
        let mut unit = CanvasUnit::new(&mut rec, frame);
        let polygon = square_m(10.0);

        let input = unit.input_region(&polygon).unwrap();
        let line = (vec![Point::new(5.0, -5.0), Point::new(5.0, 15.0)], LineStyle::default());
        let drawn = unit.draw_batch_m_inside(&input, &[line]).unwrap();
        assert_eq!(drawn, 1);

        let page = unit.page_region(&polygon).unwrap();
        let missed = unit
            .draw_lines_inside(
                &page,
                &[Point::new(20.0, 0.0), Point::new(30.0, 0.0)],
                &LineStyle::default(),
            )
            .unwrap();
        assert_eq!(missed, 0);

        let (points, _) = rec.lines().next().unwrap();
        assert_eq!(points, &[Point::new(5.0, 0.0), Point::new(5.0, 10.0)]);
        assert_eq!(rec.line_count(), 1);
    }

    #[test]
    fn batch_drawing_keeps_each_line_style() {
        let mut rec = Recorder::new();
        let mut unit = CanvasUnit::new(&mut rec, UnitFrame::new(Point::new(0.0, 0.0), 50.0, 50.0));
        let region = unit.input_region(&square_m(10.0)).unwrap();
        let thick = LineStyle { width: 0.5, ..LineStyle::default() };
        let lines = vec![
            (vec![Point::new(2.0, -5.0), Point::new(2.0, 15.0)], LineStyle::default()),
            (vec![Point::new(20.0, 2.0), Point::new(30.0, 2.0)], LineStyle::default()),
            (vec![Point::new(-5.0, 4.0), Point::new(15.0, 4.0)], thick),
        ];
        let drawn = unit.draw_batch_m_inside(&region, &lines).unwrap();
        assert_eq!(drawn, 2);

        let drawn_lines: Vec<_> = rec.lines().collect();
        assert_eq!(drawn_lines.len(), 2);
        assert_eq!(drawn_lines[1].1, &thick);
        assert!((drawn_lines[1].0[1].x - 10.0).abs() < 1e-9);
    }

    #[test]
    fn malformed_polygon_is_an_error() {
        let mut rec = Recorder::new();
        let unit = CanvasUnit::new(&mut rec, UnitFrame::new(Point::new(0.0, 0.0), 10.0, 10.0));
        let line = Polygon::from_pairs(&[(0.0, 0.0), (1.0, 1.0)]);
        assert!(unit.page_region(&line).is_err());
    }

    #[test]
    fn border_and_background() {
        let mut rec = Recorder::new();
        let mut unit = CanvasUnit::new(&mut rec, UnitFrame::new(Point::new(1.0, 2.0), 10.0, 20.0));
        unit.draw_background(Color::White).unwrap();
        unit.draw_border().unwrap();

        match &rec.primitives[0] {
            Primitive::Rectangle { origin, width, height, style } => {
                assert_eq!(*origin, Point::new(1.0, 2.0));
                assert_eq!((*width, *height), (10.0, 20.0));
                assert_eq!(style.fill, Some(Color::White));
            }
            other => panic!("expected rectangle, got {other:?}"),
        }
        let (outline, style) = rec.lines().next().unwrap();
        assert_eq!(outline.len(), 5);
        assert_eq!(outline[2], Point::new(11.0, 22.0));
        assert_eq!(style.color, Color::Red);
    }

    #[test]
    fn rectangle_in_meters() {
        let mut rec = Recorder::new();
        let frame = UnitFrame::new(Point::new(0.0, 0.0), 100.0, 100.0)
            .scaled(ScaleContext::default());
        let mut unit = CanvasUnit::new(&mut rec, frame);
        unit.draw_rectangle_m(Point::new(1.0, 1.0), (2.0, 2.0), &RectangleStyle::default())
            .unwrap();
        match &rec.primitives[0] {
            Primitive::Rectangle { origin, width, height, .. } => {
                assert_eq!(*origin, Point::new(1.0, 10.0));
                assert_eq!((*width, *height), (2.0, 20.0));
            }
            other => panic!("expected rectangle, got {other:?}"),
        }
    }
}
