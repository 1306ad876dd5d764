//! The motif catalog.
//!
//! A [`Shape`] is a small point template drawn at every grid point of a
//! motif fill. A [`MultiShape`] cycles through several shapes; which member
//! is drawn is a pure function of the caller's draw index, so catalog
//! entries hold no state and are shared freely.

use crate::canvas::CanvasUnit;
use crate::clip::ClipRegion;
use crate::error::Result;
use crate::geometry::{self, Point, Polygon};
use crate::style::{Color, LineStyle};

/// An immutable motif template.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shape {
    pub name: &'static str,
    /// Template in motif units, before `size` is applied.
    pub points: &'static [Point],
    pub size: f64,
    /// Tiling pitch in page millimeters.
    pub dx_mm: f64,
    pub dy_mm: f64,
    pub line_width: f64,
}

impl Shape {
    pub const fn new(name: &'static str, points: &'static [Point], size: f64) -> Self {
        Self {
            name,
            points,
            size,
            dx_mm: 3.0,
            dy_mm: 3.0,
            line_width: 0.1,
        }
    }

    /// Same pitch on both axes.
    pub const fn pitch(mut self, d_mm: f64) -> Self {
        self.dx_mm = d_mm;
        self.dy_mm = d_mm;
        self
    }

    /// Template placed at `position` (input space) in unit millimeters:
    /// size, then rotate, then scale, then translate.
    pub fn placed(&self, position: Point, angle_degrees: f64, unit: &CanvasUnit<'_>, scale: f64) -> Vec<Point> {
        let sized = geometry::scale(self.points, self.size);
        let turned = geometry::rotate(&sized, angle_degrees);
        let scaled = geometry::scale(&turned, scale);
        geometry::translate(&scaled, unit.to_unit_mm(position))
    }

    /// Draw one instance.
    ///
    /// `region` must come from [`CanvasUnit::page_region`]. Without one the
    /// whole motif is drawn. Returns the number of polylines emitted.
    pub fn draw(
        &self,
        position: Point,
        angle_degrees: f64,
        unit: &mut CanvasUnit<'_>,
        region: Option<&ClipRegion>,
        color: Color,
        scale: f64,
    ) -> Result<usize> {
        let points = self.placed(position, angle_degrees, unit, scale);
        let style = LineStyle::new(self.line_width * scale).color(color);
        match region {
            Some(region) => unit.draw_lines_inside(region, &points, &style),
            None => {
                unit.draw_lines(&points, &style)?;
                Ok(1)
            }
        }
    }

    /// Like [`draw`](Self::draw), preparing the clip region on the spot.
    ///
    /// An empty polygon draws unclipped. Prefer preparing the region once
    /// when drawing many instances against the same polygon.
    pub fn draw_in_polygon(
        &self,
        position: Point,
        angle_degrees: f64,
        unit: &mut CanvasUnit<'_>,
        polygon: Option<&Polygon>,
        color: Color,
        scale: f64,
    ) -> Result<usize> {
        let region = match polygon {
            Some(polygon) if !polygon.is_empty() => Some(unit.page_region(polygon)?),
            _ => None,
        };
        self.draw(position, angle_degrees, unit, region.as_ref(), color, scale)
    }
}

/// A finite cycle of shapes drawn in turn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MultiShape {
    pub name: &'static str,
    pub shapes: &'static [&'static Shape],
    pub dx_mm: f64,
    pub dy_mm: f64,
}

impl MultiShape {
    /// Member for draw number `index`.
    pub fn shape_at(&self, index: usize) -> &'static Shape {
        self.shapes[index % self.shapes.len()]
    }
}

/// Anything a motif fill can tile with.
#[derive(Debug, Clone, PartialEq)]
pub enum Motif {
    Simple(&'static Shape),
    Multi(&'static MultiShape),
    /// A rock's members followed by its aggregates' members.
    Composite {
        shapes: Vec<&'static Shape>,
        dx_mm: f64,
        dy_mm: f64,
    },
}

impl Motif {
    pub fn name(&self) -> &'static str {
        match self {
            Motif::Simple(shape) => shape.name,
            Motif::Multi(multi) => multi.name,
            Motif::Composite { .. } => "composite",
        }
    }

    /// Tiling pitch `(dx, dy)` in page millimeters.
    pub fn pitch_mm(&self) -> (f64, f64) {
        match self {
            Motif::Simple(shape) => (shape.dx_mm, shape.dy_mm),
            Motif::Multi(multi) => (multi.dx_mm, multi.dy_mm),
            Motif::Composite { dx_mm, dy_mm, .. } => (*dx_mm, *dy_mm),
        }
    }

    /// The cycle, in draw order.
    pub fn members(&self) -> &[&'static Shape] {
        match self {
            Motif::Simple(shape) => std::slice::from_ref(shape),
            Motif::Multi(multi) => multi.shapes,
            Motif::Composite { shapes, .. } => shapes,
        }
    }

    pub fn shape_at(&self, index: usize) -> &'static Shape {
        let members = self.members();
        members[index % members.len()]
    }

    /// Extend the cycle with aggregate motifs. The pitch stays the rock's.
    pub fn with_aggregates(&self, aggregates: &[Motif]) -> Motif {
        if aggregates.is_empty() {
            return self.clone();
        }
        let (dx_mm, dy_mm) = self.pitch_mm();
        let shapes = self
            .members()
            .iter()
            .chain(aggregates.iter().flat_map(Motif::members))
            .copied()
            .collect();
        Motif::Composite { shapes, dx_mm, dy_mm }
    }

    /// Draw the member for draw number `index`.
    #[allow(clippy::too_many_arguments)]
    pub fn draw(
        &self,
        index: usize,
        position: Point,
        angle_degrees: f64,
        unit: &mut CanvasUnit<'_>,
        region: Option<&ClipRegion>,
        color: Color,
        scale: f64,
    ) -> Result<usize> {
        self.shape_at(index)
            .draw(position, angle_degrees, unit, region, color, scale)
    }
}

// ============================================================================
// CATALOG
// ============================================================================

const fn p(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

const COS_30: f64 = 0.866_025_403_784_438_7;
const HALF_COS_30: f64 = 0.433_012_701_892_219_3;

/// A 2:1 ellipse sampled every 30 degrees, closed.
static ELLIPSE: [Point; 13] = [
    p(1.0, 0.0),
    p(COS_30, 0.25),
    p(0.5, HALF_COS_30),
    p(0.0, 0.5),
    p(-0.5, HALF_COS_30),
    p(-COS_30, 0.25),
    p(-1.0, 0.0),
    p(-COS_30, -0.25),
    p(-0.5, -HALF_COS_30),
    p(0.0, -0.5),
    p(0.5, -HALF_COS_30),
    p(COS_30, -0.25),
    p(1.0, 0.0),
];

static DIAMOND: [Point; 5] = [p(1.0, 0.0), p(0.0, 1.0), p(-1.0, 0.0), p(0.0, -1.0), p(1.0, 0.0)];

/// Closed angular fragment.
static SHARD: [Point; 4] = [p(-1.0, 0.2), p(0.1, 0.6), p(-0.2, -0.8), p(-1.0, 0.2)];

static DASH: [Point; 2] = [p(-0.5, 0.0), p(0.5, 0.0)];
static RIPPLE: [Point; 4] = [p(-0.5, 0.0), p(-0.25, 0.1), p(0.25, -0.1), p(0.5, 0.0)];
static VEE: [Point; 3] = [p(-0.5, 1.0), p(0.0, 0.0), p(0.5, 1.0)];
static CARET: [Point; 3] = [p(-0.5, 0.0), p(0.0, 1.0), p(0.5, 0.0)];
static CORNER: [Point; 3] = [p(-0.5, 1.0), p(-0.5, 0.0), p(0.5, 0.0)];
static TICK_LEFT: [Point; 2] = [p(-0.5, 1.0), p(0.0, 0.0)];
static TICK_RIGHT: [Point; 2] = [p(0.0, 0.0), p(0.5, 1.0)];
static TICK_UP: [Point; 2] = [p(0.0, 0.0), p(1.0, 0.5)];
static TICK_DOWN: [Point; 2] = [p(1.0, -0.5), p(0.0, 0.0)];
/// A plus sign, drawn as one stroke that doubles back through the centre.
static PLUS: [Point; 5] = [p(-0.5, 0.0), p(0.5, 0.0), p(0.0, 0.0), p(0.0, 0.5), p(0.0, -0.5)];
/// A saltire, drawn the same way.
static SALTIRE: [Point; 5] = [p(-0.4, -0.4), p(0.4, 0.4), p(0.0, 0.0), p(-0.4, 0.4), p(0.4, -0.4)];

pub static CLAY: Shape = Shape::new("clay", &DASH, 2.0);
pub static SILT: Shape = Shape::new("silt", &RIPPLE, 2.0);
pub static PEBBLES: Shape = Shape::new("pebbles", &ELLIPSE, 1.0);
pub static BOULDERS: Shape = Shape::new("boulders", &ELLIPSE, 2.0).pitch(5.0);
pub static GRAVEL: Shape = Shape::new("gravel", &ELLIPSE, 0.5).pitch(2.0);
pub static SAND: Shape = Shape::new("sand", &DIAMOND, 0.1).pitch(2.0);
pub static GRUS: Shape = Shape::new("grus", &SHARD, 0.5).pitch(2.0);
pub static RUBBLE: Shape = Shape::new("rubble", &SHARD, 1.0);

pub static ANDESITE: Shape = Shape::new("andesite", &VEE, 1.0);
pub static DACITE: Shape = Shape::new("dacite", &CARET, 1.0);
pub static BASALT: Shape = Shape::new("basalt", &CORNER, 1.0);
pub static RHYOLITE_LEFT: Shape = Shape::new("rhyolite-left", &TICK_LEFT, 1.0);
pub static RHYOLITE_RIGHT: Shape = Shape::new("rhyolite-right", &TICK_RIGHT, 1.0);
pub static RHYOLITE_UP: Shape = Shape::new("rhyolite-up", &TICK_UP, 1.0);
pub static RHYOLITE_DOWN: Shape = Shape::new("rhyolite-down", &TICK_DOWN, 1.0);
pub static GRANITE: Shape = Shape::new("granite", &PLUS, 1.0);
pub static DIORITE: Shape = Shape::new("diorite", &SALTIRE, 1.0);

pub static RUBBLE_GRAVEL: MultiShape = MultiShape {
    name: "rubble-gravel",
    shapes: &[&RUBBLE, &GRAVEL],
    dx_mm: 2.0,
    dy_mm: 2.0,
};
pub static RHYOLITE: MultiShape = MultiShape {
    name: "rhyolite",
    shapes: &[&RHYOLITE_LEFT, &RHYOLITE_UP, &RHYOLITE_RIGHT, &RHYOLITE_DOWN],
    dx_mm: 3.0,
    dy_mm: 3.0,
};
pub static ANDESIBASALT: MultiShape = MultiShape {
    name: "andesibasalt",
    shapes: &[&ANDESITE, &BASALT],
    dx_mm: 3.0,
    dy_mm: 3.0,
};
pub static ANDESIDACITE: MultiShape = MultiShape {
    name: "andesidacite",
    shapes: &[&ANDESITE, &DACITE],
    dx_mm: 3.0,
    dy_mm: 3.0,
};
pub static ANDESIBASALT_TUFF: MultiShape = MultiShape {
    name: "andesibasalt-tuff",
    shapes: &[&ANDESITE, &SAND, &BASALT, &SAND],
    dx_mm: 3.0,
    dy_mm: 3.0,
};
pub static GRANODIORITE: MultiShape = MultiShape {
    name: "granodiorite",
    shapes: &[&GRANITE, &DIORITE],
    dx_mm: 3.0,
    dy_mm: 3.0,
};
