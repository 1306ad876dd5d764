//! In-memory target that keeps every primitive it is handed.

use serde::Serialize;

use super::Target;
use crate::error::TargetError;
use crate::geometry::Point;
use crate::style::{CircleStyle, LineStyle, RectangleStyle, TableStyle, TextStyle};

/// One recorded drawing call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Primitive {
    Lines {
        points: Vec<Point>,
        style: LineStyle,
    },
    Circle {
        center: Point,
        radius: f64,
        style: CircleStyle,
    },
    Rectangle {
        origin: Point,
        width: f64,
        height: f64,
        style: RectangleStyle,
    },
    Text {
        origin: Point,
        text: String,
        style: TextStyle,
    },
    Table {
        origin: Point,
        values: Vec<Vec<String>>,
        style: TableStyle,
    },
}

/// Records primitives in call order.
#[derive(Debug, Default, Clone, Serialize)]
pub struct Recorder {
    pub primitives: Vec<Primitive>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `draw_lines` call, in order.
    pub fn lines(&self) -> impl Iterator<Item = (&[Point], &LineStyle)> {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Lines { points, style } => Some((points.as_slice(), style)),
            _ => None,
        })
    }

    pub fn line_count(&self) -> usize {
        self.lines().count()
    }

    /// Hand every recorded primitive to `target`, in order.
    pub fn replay(&self, target: &mut dyn Target) -> Result<(), TargetError> {
        for primitive in &self.primitives {
            match primitive {
                Primitive::Lines { points, style } => target.draw_lines(points, style)?,
                Primitive::Circle { center, radius, style } => {
                    target.draw_circle(*center, *radius, style)?
                }
                Primitive::Rectangle { origin, width, height, style } => {
                    target.draw_rectangle(*origin, (*width, *height), style)?
                }
                Primitive::Text { origin, text, style } => target.draw_text(*origin, text, style)?,
                Primitive::Table { origin, values, style } => {
                    target.draw_table(*origin, values, style)?
                }
            }
        }
        Ok(())
    }
}

impl Target for Recorder {
    fn draw_lines(&mut self, points: &[Point], style: &LineStyle) -> Result<(), TargetError> {
        self.primitives.push(Primitive::Lines {
            points: points.to_vec(),
            style: *style,
        });
        Ok(())
    }

    fn draw_circle(
        &mut self,
        center: Point,
        radius: f64,
        style: &CircleStyle,
    ) -> Result<(), TargetError> {
        self.primitives.push(Primitive::Circle {
            center,
            radius,
            style: *style,
        });
        Ok(())
    }

    fn draw_rectangle(
        &mut self,
        origin: Point,
        size: (f64, f64),
        style: &RectangleStyle,
    ) -> Result<(), TargetError> {
        self.primitives.push(Primitive::Rectangle {
            origin,
            width: size.0,
            height: size.1,
            style: *style,
        });
        Ok(())
    }

    fn draw_text(
        &mut self,
        origin: Point,
        text: &str,
        style: &TextStyle,
    ) -> Result<(), TargetError> {
        self.primitives.push(Primitive::Text {
            origin,
            text: text.to_string(),
            style: *style,
        });
        Ok(())
    }

    fn draw_table(
        &mut self,
        origin: Point,
        values: &[Vec<String>],
        style: &TableStyle,
    ) -> Result<(), TargetError> {
        self.primitives.push(Primitive::Table {
            origin,
            values: values.to_vec(),
            style: *style,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Color;

    #[test]
    fn replay_preserves_order() {
        let mut rec = Recorder::new();
        rec.draw_lines(&[Point::new(0.0, 0.0), Point::new(1.0, 1.0)], &LineStyle::default())
            .unwrap();
        rec.draw_circle(Point::new(2.0, 2.0), 0.5, &CircleStyle::default()).unwrap();
        rec.draw_text(Point::new(3.0, 3.0), "sand", &TextStyle::default()).unwrap();

        let mut copy = Recorder::new();
        rec.replay(&mut copy).unwrap();
        assert_eq!(copy.primitives, rec.primitives);
        assert_eq!(copy.line_count(), 1);
    }

    #[test]
    fn serializes_with_a_kind_tag() {
        let mut rec = Recorder::new();
        rec.draw_lines(
            &[Point::new(0.0, 0.0), Point::new(1.0, 0.0)],
            &LineStyle::new(0.1).color(Color::Red),
        )
        .unwrap();

        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["primitives"][0]["kind"], "lines");
        assert_eq!(json["primitives"][0]["points"][1]["x"], 1.0);
    }
}
