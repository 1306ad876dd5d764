//! Line styles, palette and per-primitive style structs.

use serde::{Deserialize, Serialize};

/// Line types understood by every target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineType {
    #[default]
    Solid,
    Dot,
    Dash,
    /// Boundary of a thawed zone inside permafrost.
    Thawed,
}

/// The fixed palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    #[default]
    Black,
    White,
    Red,
    Blue,
    Orange,
    Gray,
    Green,
}

impl Color {
    pub fn all() -> &'static [Color] {
        &[
            Color::Black,
            Color::White,
            Color::Red,
            Color::Blue,
            Color::Orange,
            Color::Gray,
            Color::Green,
        ]
    }

    /// 8-bit RGB triple.
    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            Color::Black => (0, 0, 0),
            Color::White => (255, 255, 255),
            Color::Red => (255, 0, 0),
            Color::Blue => (0, 0, 255),
            Color::Orange => (255, 128, 0),
            Color::Gray => (179, 179, 179),
            Color::Green => (0, 255, 0),
        }
    }

    /// Palette entry closest to an arbitrary RGB value.
    pub fn nearest(red: u8, green: u8, blue: u8) -> Color {
        let distance = |c: &Color| {
            let (r, g, b) = c.rgb();
            let dr = r as i32 - red as i32;
            let dg = g as i32 - green as i32;
            let db = b as i32 - blue as i32;
            dr * dr + dg * dg + db * db
        };
        Color::all()
            .iter()
            .copied()
            .min_by_key(distance)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextAlignment {
    TopLeft,
    TopCenter,
    TopRight,
    #[default]
    Left,
    Center,
    Right,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

/// Style of a `draw_lines` call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    pub width: f64,
    pub color: Color,
    pub line_type: LineType,
    /// When set the path is implicitly closed and filled.
    pub fill: Option<Color>,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            width: 0.3,
            color: Color::Black,
            line_type: LineType::Solid,
            fill: None,
        }
    }
}

impl LineStyle {
    pub fn new(width: f64) -> Self {
        Self { width, ..Self::default() }
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn line_type(mut self, line_type: LineType) -> Self {
        self.line_type = line_type;
        self
    }

    pub fn fill(mut self, fill: Color) -> Self {
        self.fill = Some(fill);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CircleStyle {
    pub color: Color,
    pub line_type: LineType,
    pub width: f64,
}

impl Default for CircleStyle {
    fn default() -> Self {
        Self {
            color: Color::Black,
            line_type: LineType::Solid,
            width: 0.3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectangleStyle {
    pub fill: Option<Color>,
    pub edge: Option<Color>,
    pub width: f64,
}

impl Default for RectangleStyle {
    fn default() -> Self {
        Self {
            fill: Some(Color::Black),
            edge: None,
            width: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    /// Font size in points.
    pub size: f64,
    pub color: Color,
    pub white_background: bool,
    /// Rotation in degrees, counter-clockwise.
    pub angle: f64,
    /// Wrap lines so none is wider than this many millimeters.
    pub wrap_width: Option<f64>,
    pub alignment: TextAlignment,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            size: 10.0,
            color: Color::Black,
            white_background: false,
            angle: 0.0,
            wrap_width: None,
            alignment: TextAlignment::Left,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TableStyle {
    pub row_height: f64,
    pub col_width: f64,
    pub text_height: f64,
    pub heading: bool,
    pub heading_height: f64,
}

impl Default for TableStyle {
    fn default() -> Self {
        Self {
            row_height: 3.0,
            col_width: 18.0,
            text_height: 2.4,
            heading: true,
            heading_height: 12.0,
        }
    }
}
