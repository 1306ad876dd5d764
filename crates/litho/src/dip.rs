//! Dip functions: the local slope of bedding at a point.
//!
//! Motifs are tilted to follow bedding. The slope is measured in the
//! section's own coordinates, and sections are drawn with a vertically
//! exaggerated scale, so the tilt angle is `atan(slope * DIP_EXAGGERATION)`.

use crate::geometry::Point;

/// Slope multiplier applied before converting a dip to an angle.
pub const DIP_EXAGGERATION: f64 = 10.0;

/// Maps a point to an optional signed slope. `None` means zero dip.
pub trait DipFunction {
    fn dip_at(&self, point: Point) -> Option<f64>;
}

impl<F> DipFunction for F
where
    F: Fn(Point) -> Option<f64>,
{
    fn dip_at(&self, point: Point) -> Option<f64> {
        self(point)
    }
}

/// Motif rotation in degrees for a dip value.
#[inline]
pub fn dip_angle_degrees(dip: Option<f64>) -> f64 {
    (dip.unwrap_or(0.0) * DIP_EXAGGERATION).atan().to_degrees()
}

/// The same slope everywhere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantDip(pub f64);

impl DipFunction for ConstantDip {
    fn dip_at(&self, _point: Point) -> Option<f64> {
        Some(self.0)
    }
}

/// Slope of a boundary polyline, taken from the segment spanning the
/// query's x.
///
/// Outside the polyline's x range, and on vertical segments, there is no
/// dip.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileDip {
    points: Vec<Point>,
}

impl ProfileDip {
    /// Vertices are sorted by x.
    pub fn new(mut points: Vec<Point>) -> Self {
        points.sort_by(|a, b| a.x.total_cmp(&b.x));
        Self { points }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }
}

impl DipFunction for ProfileDip {
    fn dip_at(&self, point: Point) -> Option<f64> {
        self.points
            .windows(2)
            .find(|w| w[0].x <= point.x && point.x <= w[1].x)
            .and_then(|w| {
                let run = w[1].x - w[0].x;
                (run > 0.0).then(|| (w[1].y - w[0].y) / run)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slope_of_a_tenth_is_forty_five_degrees() {
        assert!((dip_angle_degrees(Some(0.1)) - 45.0).abs() < 1e-9);
        assert_eq!(dip_angle_degrees(None), 0.0);
        assert!((dip_angle_degrees(Some(-0.1)) + 45.0).abs() < 1e-9);
    }

    #[test]
    fn closures_are_dip_functions() {
        let f = |p: Point| (p.x > 0.0).then_some(0.5);
        assert_eq!(f.dip_at(Point::new(1.0, 0.0)), Some(0.5));
        assert_eq!(f.dip_at(Point::new(-1.0, 0.0)), None);
        assert_eq!(ConstantDip(0.2).dip_at(Point::new(9.0, 9.0)), Some(0.2));
    }

    #[test]
    fn profile_uses_spanning_segment() {
        let profile = ProfileDip::new(vec![
            Point::new(10.0, 5.0),
            Point::new(0.0, 0.0),
            Point::new(20.0, 5.0),
        ]);
        assert_eq!(profile.dip_at(Point::new(5.0, 100.0)), Some(0.5));
        assert_eq!(profile.dip_at(Point::new(15.0, 0.0)), Some(0.0));
        assert_eq!(profile.dip_at(Point::new(25.0, 0.0)), None);
    }
}
