//! SVG document target.
//!
//! Page millimeters map 1:1 onto the viewBox. SVG's y axis points down, so
//! every y is flipped against the page height on the way out.

use std::fmt::Write as _;

use super::Target;
use crate::error::TargetError;
use crate::geometry::Point;
use crate::style::{
    CircleStyle, Color, LineStyle, LineType, RectangleStyle, TableStyle, TextAlignment, TextStyle,
};
use crate::text::{approximate_width, wrap_text};

const MM_PER_POINT: f64 = 25.4 / 72.0;

/// Builds an SVG document from drawing primitives.
#[derive(Debug, Clone)]
pub struct SvgTarget {
    width_mm: f64,
    height_mm: f64,
    background: Option<Color>,
    body: String,
}

impl SvgTarget {
    pub fn new(width_mm: f64, height_mm: f64) -> Self {
        Self {
            width_mm,
            height_mm,
            background: Some(Color::White),
            body: String::new(),
        }
    }

    pub fn with_background(mut self, background: Option<Color>) -> Self {
        self.background = background;
        self
    }

    /// The complete document.
    pub fn finish(&self) -> String {
        let mut svg = String::with_capacity(self.body.len() + 512);
        svg.push_str(&format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="{w}mm" height="{h}mm" viewBox="0 0 {w} {h}">
"#,
            w = self.width_mm,
            h = self.height_mm
        ));
        if let Some(bg) = self.background {
            svg.push_str(&format!(
                "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>\n",
                rgb(bg)
            ));
        }
        svg.push_str(&self.body);
        svg.push_str("</svg>\n");
        svg
    }

    #[inline]
    fn flip(&self, p: Point) -> (f64, f64) {
        (p.x, self.height_mm - p.y)
    }

    fn text_lines(
        &mut self,
        origin: Point,
        text: &str,
        style: &TextStyle,
    ) -> Result<(), TargetError> {
        let size_mm = style.size * MM_PER_POINT;
        let lines = wrap_text(text, style.wrap_width, |s| approximate_width(s, size_mm));
        let (x, y) = self.flip(origin);
        let anchor = match style.alignment {
            TextAlignment::TopCenter | TextAlignment::Center | TextAlignment::BottomCenter => {
                "middle"
            }
            TextAlignment::TopRight | TextAlignment::Right | TextAlignment::BottomRight => "end",
            _ => "start",
        };
        let baseline = match style.alignment {
            TextAlignment::TopLeft | TextAlignment::TopCenter | TextAlignment::TopRight => {
                "hanging"
            }
            TextAlignment::Left | TextAlignment::Center | TextAlignment::Right => "middle",
            _ => "auto",
        };

        if style.white_background {
            let width = lines
                .iter()
                .map(|l| approximate_width(l, size_mm))
                .fold(0.0, f64::max);
            let height = lines.len() as f64 * size_mm * 1.2;
            emit(
                &mut self.body,
                format_args!(
                    "<rect x=\"{:.3}\" y=\"{:.3}\" width=\"{:.3}\" height=\"{:.3}\" fill=\"white\"/>\n",
                    x,
                    y - size_mm,
                    width,
                    height
                ),
            )?;
        }

        emit(
            &mut self.body,
            format_args!(
                "<text x=\"{x:.3}\" y=\"{y:.3}\" font-family=\"Open Sans, sans-serif\" font-size=\"{size_mm:.3}\" fill=\"{}\" text-anchor=\"{anchor}\" dominant-baseline=\"{baseline}\" transform=\"rotate({:.3} {x:.3} {y:.3})\">",
                rgb(style.color),
                -style.angle,
            ),
        )?;
        for (i, line) in lines.iter().enumerate() {
            let dy = if i == 0 { 0.0 } else { size_mm * 1.2 };
            emit(
                &mut self.body,
                format_args!(
                    "<tspan x=\"{x:.3}\" dy=\"{dy:.3}\">{}</tspan>",
                    escape(line)
                ),
            )?;
        }
        self.body.push_str("</text>\n");
        Ok(())
    }
}

fn emit(body: &mut String, args: std::fmt::Arguments<'_>) -> Result<(), TargetError> {
    body.write_fmt(args)
        .map_err(|e| TargetError::Render(e.to_string()))
}

fn rgb(color: Color) -> String {
    let (r, g, b) = color.rgb();
    format!("#{r:02x}{g:02x}{b:02x}")
}

fn dash_array(line_type: LineType, width: f64) -> Option<String> {
    let w = width.max(0.1);
    match line_type {
        LineType::Solid => None,
        LineType::Dot => Some(format!("{:.3} {:.3}", w, w * 4.0)),
        LineType::Dash => Some(format!("{:.3} {:.3}", w * 15.0, w * 7.5)),
        LineType::Thawed => Some(format!(
            "{:.3} {:.3} {:.3} {:.3}",
            w * 30.0,
            w * 7.5,
            w * 4.0,
            w * 7.5
        )),
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

impl Target for SvgTarget {
    fn draw_lines(&mut self, points: &[Point], style: &LineStyle) -> Result<(), TargetError> {
        if points.len() < 2 {
            return Ok(());
        }

        let coords: String = points
            .iter()
            .map(|&p| {
                let (x, y) = self.flip(p);
                format!("{x:.3},{y:.3}")
            })
            .collect::<Vec<_>>()
            .join(" ");

        let element = if style.fill.is_some() { "polygon" } else { "polyline" };
        let fill = style.fill.map(rgb).unwrap_or_else(|| "none".to_string());
        let dash = dash_array(style.line_type, style.width)
            .map(|d| format!(" stroke-dasharray=\"{d}\""))
            .unwrap_or_default();

        emit(
            &mut self.body,
            format_args!(
                "<{element} points=\"{coords}\" stroke=\"{}\" stroke-width=\"{:.3}\" fill=\"{fill}\"{dash} stroke-linecap=\"round\"/>\n",
                rgb(style.color),
                style.width,
            ),
        )
    }

    fn draw_circle(
        &mut self,
        center: Point,
        radius: f64,
        style: &CircleStyle,
    ) -> Result<(), TargetError> {
        let (x, y) = self.flip(center);
        let dash = dash_array(style.line_type, style.width)
            .map(|d| format!(" stroke-dasharray=\"{d}\""))
            .unwrap_or_default();
        emit(
            &mut self.body,
            format_args!(
                "<circle cx=\"{x:.3}\" cy=\"{y:.3}\" r=\"{radius:.3}\" stroke=\"{}\" stroke-width=\"{:.3}\" fill=\"none\"{dash}/>\n",
                rgb(style.color),
                style.width,
            ),
        )
    }

    fn draw_rectangle(
        &mut self,
        origin: Point,
        size: (f64, f64),
        style: &RectangleStyle,
    ) -> Result<(), TargetError> {
        let (width, height) = size;
        // SVG anchors rectangles at their top-left corner.
        let (x, y) = self.flip(Point::new(origin.x, origin.y + height));
        let fill = style.fill.map(rgb).unwrap_or_else(|| "none".to_string());
        let stroke = style
            .edge
            .map(|c| format!(" stroke=\"{}\" stroke-width=\"{:.3}\"", rgb(c), style.width))
            .unwrap_or_default();
        emit(
            &mut self.body,
            format_args!(
                "<rect x=\"{x:.3}\" y=\"{y:.3}\" width=\"{width:.3}\" height=\"{height:.3}\" fill=\"{fill}\"{stroke}/>\n"
            ),
        )
    }

    fn draw_text(
        &mut self,
        origin: Point,
        text: &str,
        style: &TextStyle,
    ) -> Result<(), TargetError> {
        self.text_lines(origin, text, style)
    }

    fn draw_table(
        &mut self,
        origin: Point,
        values: &[Vec<String>],
        style: &TableStyle,
    ) -> Result<(), TargetError> {
        let cols = values.iter().map(Vec::len).max().unwrap_or(0);
        if values.is_empty() || cols == 0 {
            return Ok(());
        }

        let grid = LineStyle::new(0.2);
        let text = TextStyle {
            size: style.text_height / MM_PER_POINT,
            alignment: TextAlignment::Center,
            ..TextStyle::default()
        };
        let table_width = cols as f64 * style.col_width;

        let mut top = origin.y;
        for (row_index, row) in values.iter().enumerate() {
            let height = if row_index == 0 && style.heading {
                style.heading_height
            } else {
                style.row_height
            };
            let bottom = top - height;

            self.draw_lines(
                &[Point::new(origin.x, top), Point::new(origin.x + table_width, top)],
                &grid,
            )?;
            for (col_index, value) in row.iter().enumerate() {
                let cell_x = origin.x + col_index as f64 * style.col_width;
                let heading_text = TextStyle {
                    wrap_width: (row_index == 0 && style.heading).then_some(style.col_width),
                    ..text
                };
                self.text_lines(
                    Point::new(cell_x + style.col_width / 2.0, (top + bottom) / 2.0),
                    value,
                    &heading_text,
                )?;
            }
            top = bottom;
        }

        self.draw_lines(
            &[Point::new(origin.x, top), Point::new(origin.x + table_width, top)],
            &grid,
        )?;
        for col in 0..=cols {
            let x = origin.x + col as f64 * style.col_width;
            self.draw_lines(&[Point::new(x, origin.y), Point::new(x, top)], &grid)?;
        }
        Ok(())
    }
}
