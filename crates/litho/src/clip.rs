//! Polyline clipping against a closed layer polygon.
//!
//! This is the HOT PATH: a page-sized fill at a 2 mm pitch clips tens of
//! thousands of polylines, all against the same polygon. The polygon is
//! therefore validated and converted once into a [`ClipRegion`] and reused
//! for the whole tiling pass. Line passes hand all of their candidates to
//! [`ClipRegion::clip_all`] so the clipper runs once per pass.
//!
//! ## Fixed-point domain
//!
//! Floating point is not precise enough to decide "on the edge" versus
//! "just outside", so every coordinate is snapped to a grid of
//! 1 / [`ClipConfig::scale`] (2^31 by default). Ring validation runs exactly
//! in `i128` on the snapped integers, and the intersection itself is
//! Clipper's (through geo-clipper) at the same factor.
//!
//! Semantics are `CLIP ∩ SUBJECT` for a closed clip ring and an open subject
//! path: results keep the subject's direction, come back in the order they
//! occur along it, and the boundary counts as inside. Clipper leaves open
//! stretches running exactly along a clip edge to its fill rule, so those
//! are found from the snapped integers and added back.

use geo::algorithm::coordinate_position::{CoordPos, CoordinatePosition};
use geo::{Coord, LineString, MultiLineString};
use geo_clipper::ClipperOpen;

use crate::error::ClipError;
use crate::geometry::{Point, Polygon};

/// Default fixed-point scale, 2^31.
pub const DEFAULT_CLIP_SCALE: f64 = 2_147_483_648.0;

/// Largest magnitude a scaled coordinate may have. Keeps every cross product
/// of coordinate differences inside `i128` and below Clipper's high range.
const MAX_FIXED: f64 = 1_152_921_504_606_846_976.0; // 2^60

/// Grid units a clipped point may sit off its subject and still belong to it.
const SNAP_UNITS: f64 = 4.0;

/// Fixed-point settings for clipping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipConfig {
    /// Multiplier applied before rounding to integers. Must be large enough
    /// to keep sub-millimetre precision in the caller's units.
    pub scale: f64,
}

impl Default for ClipConfig {
    fn default() -> Self {
        Self { scale: DEFAULT_CLIP_SCALE }
    }
}

impl ClipConfig {
    fn to_fixed(&self, p: Point) -> Result<FixedPoint, ClipError> {
        Ok(FixedPoint {
            x: self.fixed(p.x)?,
            y: self.fixed(p.y)?,
        })
    }

    fn fixed(&self, value: f64) -> Result<i64, ClipError> {
        let scaled = (value * self.scale).round();
        if !scaled.is_finite() || scaled.abs() > MAX_FIXED {
            return Err(ClipError::OutOfRange { value, scale: self.scale });
        }
        Ok(scaled as i64)
    }

    /// Snapped point back in the caller's units.
    #[inline]
    fn point(&self, p: FixedPoint) -> Point {
        Point::new(p.x as f64 / self.scale, p.y as f64 / self.scale)
    }

    /// Snap a path, dropping repeated vertices.
    fn snap_path(&self, path: &[Point]) -> Result<Vec<FixedPoint>, ClipError> {
        let mut fixed: Vec<FixedPoint> = Vec::with_capacity(path.len());
        for &p in path {
            let q = self.to_fixed(p)?;
            if fixed.last() != Some(&q) {
                fixed.push(q);
            }
        }
        Ok(fixed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FixedPoint {
    x: i64,
    y: i64,
}

impl FixedPoint {
    #[inline]
    fn sub(self, other: FixedPoint) -> (i128, i128) {
        (
            self.x as i128 - other.x as i128,
            self.y as i128 - other.y as i128,
        )
    }
}

#[inline]
fn cross(a: (i128, i128), b: (i128, i128)) -> i128 {
    a.0 * b.1 - a.1 * b.0
}

#[inline]
fn dot(a: (i128, i128), b: (i128, i128)) -> i128 {
    a.0 * b.0 + a.1 * b.1
}

/// Sign of the turn a -> b -> c: positive for counter-clockwise.
#[inline]
fn orient(a: FixedPoint, b: FixedPoint, c: FixedPoint) -> i128 {
    cross(b.sub(a), c.sub(a)).signum()
}

/// `c` is collinear with `a`-`b` and lies within its extent.
#[inline]
fn on_segment(a: FixedPoint, b: FixedPoint, c: FixedPoint) -> bool {
    orient(a, b, c) == 0
        && c.x >= a.x.min(b.x)
        && c.x <= a.x.max(b.x)
        && c.y >= a.y.min(b.y)
        && c.y <= a.y.max(b.y)
}

/// Closed-segment intersection test, endpoints included.
fn segments_intersect(p1: FixedPoint, p2: FixedPoint, p3: FixedPoint, p4: FixedPoint) -> bool {
    let d1 = orient(p3, p4, p1);
    let d2 = orient(p3, p4, p2);
    let d3 = orient(p1, p2, p3);
    let d4 = orient(p1, p2, p4);

    if d1 * d2 < 0 && d3 * d4 < 0 {
        return true;
    }

    (d1 == 0 && on_segment(p3, p4, p1))
        || (d2 == 0 && on_segment(p3, p4, p2))
        || (d3 == 0 && on_segment(p1, p2, p3))
        || (d4 == 0 && on_segment(p1, p2, p4))
}

// ============================================================================
// CLIP REGION
// ============================================================================

/// A polygon prepared for repeated clipping.
///
/// Building one validates the ring: fewer than three distinct vertices, zero
/// area, self-intersection or coordinates outside the fixed-point range are
/// errors, since each points at an upstream data defect.
#[derive(Debug, Clone)]
pub struct ClipRegion {
    ring: Vec<FixedPoint>,
    shape: geo::Polygon<f64>,
    min: FixedPoint,
    max: FixedPoint,
    config: ClipConfig,
}

impl ClipRegion {
    /// Prepare `polygon` with the default 2^31 scale.
    pub fn new(polygon: &Polygon) -> Result<Self, ClipError> {
        Self::with_config(polygon, ClipConfig::default())
    }

    pub fn with_config(polygon: &Polygon, config: ClipConfig) -> Result<Self, ClipError> {
        let mut ring = config.snap_path(&polygon.points)?;
        // Closing vertex is implicit.
        while ring.len() > 1 && ring.first() == ring.last() {
            ring.pop();
        }

        if ring.len() < 3 {
            return Err(ClipError::TooFewVertices { count: ring.len() });
        }

        // A ring folded onto one line would also fold onto itself; report
        // the missing area. Lobes of a bowtie can cancel to zero area, so
        // crossings are checked before any area sum.
        let (a, b) = (ring[0], ring[1]);
        if ring[2..].iter().all(|&c| orient(a, b, c) == 0) {
            return Err(ClipError::ZeroArea);
        }

        if let Some((first, second)) = find_self_intersection(&ring) {
            return Err(ClipError::SelfIntersecting { first, second });
        }

        let min = FixedPoint {
            x: ring.iter().map(|p| p.x).min().unwrap_or(0),
            y: ring.iter().map(|p| p.y).min().unwrap_or(0),
        };
        let max = FixedPoint {
            x: ring.iter().map(|p| p.x).max().unwrap_or(0),
            y: ring.iter().map(|p| p.y).max().unwrap_or(0),
        };

        let exterior: Vec<Coord<f64>> = ring.iter().map(|&p| coord(config.point(p))).collect();
        let shape = geo::Polygon::new(LineString::from(exterior), vec![]);

        Ok(Self { ring, shape, min, max, config })
    }

    /// Number of distinct ring vertices after normalization.
    pub fn vertex_count(&self) -> usize {
        self.ring.len()
    }

    /// Inside-or-on-boundary test for a single point.
    pub fn contains(&self, point: Point) -> Result<bool, ClipError> {
        let p = self.config.point(self.config.to_fixed(point)?);
        Ok(self.shape.coordinate_position(&coord(p)) != CoordPos::Outside)
    }

    /// Clip an open polyline to the region.
    ///
    /// Returns the disjoint pieces of `path` that lie inside or on the
    /// boundary, each in the original traversal direction. A path wholly
    /// outside yields nothing; a path wholly inside yields itself.
    pub fn clip(&self, path: &[Point]) -> Result<Vec<Vec<Point>>, ClipError> {
        Ok(self.clip_all(&[path])?.into_iter().next().unwrap_or_default())
    }

    /// Clip many open polylines in one clipper run.
    ///
    /// `result[i]` holds the pieces of `paths[i]`, as [`clip`](Self::clip)
    /// would return them.
    pub fn clip_all<P: AsRef<[Point]>>(
        &self,
        paths: &[P],
    ) -> Result<Vec<Vec<Vec<Point>>>, ClipError> {
        let mut subjects: Vec<Vec<FixedPoint>> = Vec::with_capacity(paths.len());
        let mut snapped: Vec<Vec<Point>> = Vec::with_capacity(paths.len());
        let mut lines: Vec<LineString<f64>> = Vec::new();
        let mut owners: Vec<usize> = Vec::new();

        for (index, path) in paths.iter().enumerate() {
            let fixed = self.config.snap_path(path.as_ref())?;
            let points: Vec<Point> = fixed.iter().map(|&p| self.config.point(p)).collect();
            if fixed.len() >= 2 && self.overlaps_bounds(&fixed) {
                lines.push(points.iter().map(|&p| coord(p)).collect::<LineString<f64>>());
                owners.push(index);
            }
            subjects.push(fixed);
            snapped.push(points);
        }

        let mut result: Vec<Vec<Vec<Point>>> = vec![Vec::new(); paths.len()];
        if lines.is_empty() {
            return Ok(result);
        }

        let tolerance = SNAP_UNITS / self.config.scale;
        let clipped = MultiLineString::new(lines).intersection(&self.shape, self.config.scale);
        for line in clipped.0 {
            let mut piece: Vec<Point> = line.coords().map(|c| Point::new(c.x, c.y)).collect();
            piece.dedup();
            if piece.len() < 2 {
                continue;
            }
            if let Some(owner) = owner_of(&piece, &owners, &snapped, tolerance) {
                result[owner].push(piece);
            }
        }

        for &owner in &owners {
            let pieces = &mut result[owner];
            for stretch in self.boundary_stretches(&subjects[owner]) {
                let mid = midpoint(stretch[0], stretch[1]);
                let covered = pieces
                    .iter()
                    .any(|piece| distance_to_path(mid, piece) <= tolerance);
                if !covered {
                    pieces.push(stretch);
                }
            }
            arrange(pieces, &snapped[owner], tolerance);
        }

        Ok(result)
    }

    fn edges(&self) -> impl Iterator<Item = (FixedPoint, FixedPoint)> + '_ {
        let n = self.ring.len();
        (0..n).map(move |i| (self.ring[i], self.ring[(i + 1) % n]))
    }

    fn overlaps_bounds(&self, path: &[FixedPoint]) -> bool {
        let min_x = path.iter().map(|p| p.x).min().unwrap_or(i64::MAX);
        let max_x = path.iter().map(|p| p.x).max().unwrap_or(i64::MIN);
        let min_y = path.iter().map(|p| p.y).min().unwrap_or(i64::MAX);
        let max_y = path.iter().map(|p| p.y).max().unwrap_or(i64::MIN);

        !(max_x < self.min.x || min_x > self.max.x || max_y < self.min.y || min_y > self.max.y)
    }

    /// Stretches of `path` lying exactly on a clip edge.
    fn boundary_stretches(&self, path: &[FixedPoint]) -> Vec<Vec<Point>> {
        let mut stretches = Vec::new();
        for pair in path.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let r = b.sub(a);
            let rr = dot(r, r) as f64;

            for (c, d) in self.edges() {
                if cross(r, d.sub(c)) != 0 || cross(c.sub(a), r) != 0 {
                    continue;
                }
                let tc = dot(c.sub(a), r) as f64 / rr;
                let td = dot(d.sub(a), r) as f64 / rr;
                let lo = tc.min(td).max(0.0);
                let hi = tc.max(td).min(1.0);
                if lo < hi {
                    stretches.push(vec![self.lerp(a, b, lo), self.lerp(a, b, hi)]);
                }
            }
        }
        stretches
    }

    /// Point at parameter `t` along `a`-`b`. The ends are returned exactly.
    fn lerp(&self, a: FixedPoint, b: FixedPoint, t: f64) -> Point {
        if t == 0.0 {
            return self.config.point(a);
        }
        if t == 1.0 {
            return self.config.point(b);
        }
        let (pa, pb) = (self.config.point(a), self.config.point(b));
        Point::new(pa.x + t * (pb.x - pa.x), pa.y + t * (pb.y - pa.y))
    }
}

#[inline]
fn coord(p: Point) -> Coord<f64> {
    Coord { x: p.x, y: p.y }
}

#[inline]
fn midpoint(a: Point, b: Point) -> Point {
    Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}

/// Subject whose path runs through the middle of the piece's first
/// segment.
fn owner_of(
    piece: &[Point],
    owners: &[usize],
    subjects: &[Vec<Point>],
    tolerance: f64,
) -> Option<usize> {
    let mid = midpoint(piece[0], piece[1]);
    owners
        .iter()
        .map(|&owner| (owner, distance_to_path(mid, &subjects[owner])))
        .filter(|&(_, distance)| distance <= tolerance)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(owner, _)| owner)
}

/// Parameter of the closest point on `a`-`b`, clamped to the segment.
fn project(p: Point, a: Point, b: Point) -> f64 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return 0.0;
    }
    (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0)
}

fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let t = project(p, a, b);
    p.distance(Point::new(a.x + t * (b.x - a.x), a.y + t * (b.y - a.y)))
}

fn distance_to_path(p: Point, path: &[Point]) -> f64 {
    path.windows(2)
        .map(|w| distance_to_segment(p, w[0], w[1]))
        .fold(f64::INFINITY, f64::min)
}

/// Positions of `p` along `path` as `segment index + t`: the earliest and
/// latest among the segments passing within `tolerance`, else the nearest.
fn positions(p: Point, path: &[Point], tolerance: f64) -> (f64, f64) {
    let mut nearest = (f64::INFINITY, 0.0);
    let mut range: Option<(f64, f64)> = None;

    for (i, w) in path.windows(2).enumerate() {
        let t = project(p, w[0], w[1]);
        let position = i as f64 + t;
        let distance = distance_to_segment(p, w[0], w[1]);
        if distance < nearest.0 {
            nearest = (distance, position);
        }
        if distance <= tolerance {
            range = Some(match range {
                Some((lo, hi)) => (lo.min(position), hi.max(position)),
                None => (position, position),
            });
        }
    }
    range.unwrap_or((nearest.1, nearest.1))
}

/// Turn every piece to run with `subject`, sort them along it and join
/// pieces that meet end to start.
fn arrange(pieces: &mut Vec<Vec<Point>>, subject: &[Point], tolerance: f64) {
    let mut keyed: Vec<(f64, Vec<Point>)> = pieces
        .drain(..)
        .map(|mut piece| {
            let (first_lo, _) = positions(piece[0], subject, tolerance);
            let (last_lo, last_hi) = positions(piece[piece.len() - 1], subject, tolerance);
            if first_lo > last_hi {
                piece.reverse();
                (last_lo, piece)
            } else {
                (first_lo, piece)
            }
        })
        .collect();
    keyed.sort_by(|a, b| a.0.total_cmp(&b.0));

    for (_, piece) in keyed {
        match pieces.last_mut() {
            Some(last) if last[last.len() - 1].distance(piece[0]) <= tolerance => {
                last.extend_from_slice(&piece[1..]);
            }
            _ => pieces.push(piece),
        }
    }
}

/// First pair of edges that touch other than at their shared vertex.
fn find_self_intersection(ring: &[FixedPoint]) -> Option<(usize, usize)> {
    let n = ring.len();
    let edge = |i: usize| (ring[i], ring[(i + 1) % n]);

    for i in 0..n {
        let (a, b) = edge(i);
        for j in (i + 1)..n {
            let (c, d) = edge(j);
            let adjacent = j == i + 1 || (i == 0 && j == n - 1);

            if adjacent {
                // Neighbours share one vertex; they only conflict when they
                // fold back over each other.
                let (shared, p, q) = if j == i + 1 { (b, a, d) } else { (a, b, c) };
                if orient(p, shared, q) == 0 && dot(p.sub(shared), q.sub(shared)) > 0 {
                    return Some((i, j));
                }
                continue;
            }

            if segments_intersect(a, b, c, d) {
                return Some((i, j));
            }
        }
    }
    None
}

// ============================================================================
// CONVENIENCE
// ============================================================================

/// Clip `path` to `polygon` without keeping the prepared region.
///
/// Prefer building a [`ClipRegion`] once when clipping many paths against
/// the same polygon.
pub fn clip_polyline(polygon: &Polygon, path: &[Point]) -> Result<Vec<Vec<Point>>, ClipError> {
    ClipRegion::new(polygon)?.clip(path)
}

// ============================================================================
// TESTS
// ============================================================================
