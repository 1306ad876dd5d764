//! Section files: declarative cross-sections surveyed in meters.
//!
//! A section file is YAML describing the page, one scaled drawing unit and
//! the layers drawn inside it (bottom to top):
//!
//! ```yaml
//! name: Profile 7
//! page: { width: 297, height: 210 }
//! unit:
//!   origin: [20, 20]
//!   width: 250
//!   height: 160
//!   border: true
//! scale:
//!   scale_horizontal: 1000
//!   scale_vertical: 100
//!   y_offset_m: -80
//! legend: [200, 200]
//! layers:
//!   - name: alluvium
//!     rock: песок
//!     aggregates: [gravel]
//!     polygon: [[0, 96], [200, 95], [200, 98], [0, 100]]
//!     dip: 0.02
//!     color: blue
//!   - name: basement
//!     rock: granite
//!     polygon: [[0, 80], [200, 80], [200, 95], [0, 96]]
//!     dip: [[0, 96], [200, 95]]
//! ```
//!
//! `dip` is either a constant slope or a boundary profile whose local
//! slope is used. `contour_base` adds dashed copies of a boundary stacked
//! upward through the layer.

use std::path::{Path, PathBuf};

use clap::Args;
use serde::{Deserialize, Serialize};

use litho::style::{TableStyle, TextStyle};
use litho::{
    CanvasUnit, Color, ConstantDip, DipFunction, Error, FillOptions, FillRequest, Point,
    Polygon, ProfileDip, Recorder, ScaleContext, UnitFrame, fill_polygon_with_pattern,
    fill_with_contour_lines,
};

use super::common::{Drawing, OutputArgs, read_input};
use super::fill::LayerReport;

#[derive(Debug, Args)]
pub struct SectionArgs {
    /// Section file (YAML), or - for stdin
    pub input: PathBuf,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// A complete section definition.
#[derive(Debug, Clone, Deserialize)]
pub struct Section {
    /// Title drawn above the unit
    #[serde(default)]
    pub name: Option<String>,

    pub page: Page,

    pub unit: Unit,

    /// Meters to unit millimeters
    #[serde(default)]
    pub scale: ScaleContext,

    /// Top-left corner of a layer legend, in page millimeters
    #[serde(default)]
    pub legend: Option<(f64, f64)>,

    /// Layers in drawing order
    pub layers: Vec<Layer>,
}

/// Page size in millimeters.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Page {
    pub width: f64,
    pub height: f64,
}

/// The scaled drawing unit on the page.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Unit {
    /// Bottom-left corner in page millimeters
    #[serde(default)]
    pub origin: (f64, f64),
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub border: bool,
}

/// One layer, in meters.
#[derive(Debug, Clone, Deserialize)]
pub struct Layer {
    pub name: String,

    pub rock: String,

    #[serde(default)]
    pub aggregates: Vec<String>,

    pub polygon: Vec<(f64, f64)>,

    #[serde(default)]
    pub dip: Option<DipSpec>,

    /// Boundary copied upward as dashed contour lines
    #[serde(default)]
    pub contour_base: Option<Vec<(f64, f64)>>,

    #[serde(default)]
    pub color: Color,

    #[serde(default = "default_factor")]
    pub scale: f64,

    #[serde(default = "default_factor")]
    pub offset_factor: f64,

    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_factor() -> f64 {
    1.0
}

fn default_enabled() -> bool {
    true
}

/// Layer dip: a constant slope or a boundary profile.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum DipSpec {
    Constant(f64),
    Profile(Vec<(f64, f64)>),
}

impl DipSpec {
    pub fn to_function(&self) -> Box<dyn DipFunction> {
        match self {
            DipSpec::Constant(slope) => Box::new(ConstantDip(*slope)),
            DipSpec::Profile(points) => {
                Box::new(ProfileDip::new(points.iter().copied().map(Point::from).collect()))
            }
        }
    }
}

/// Summary of a rendered section, for JSON output.
#[derive(Debug, Serialize)]
pub struct SectionReport {
    pub name: Option<String>,
    pub layers: Vec<LayerReport>,
}

impl Section {
    /// Load a section from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let content = read_input(path.as_ref())?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, String> {
        serde_yaml::from_str(content).map_err(|e| format!("Failed to parse section YAML: {}", e))
    }

    /// Draw every enabled layer, then the border, title and legend.
    pub fn render(&self) -> Result<Drawing<SectionReport>, String> {
        let (ox, oy) = self.unit.origin;
        let frame = UnitFrame::new(Point::new(ox, oy), self.unit.width, self.unit.height)
            .scaled(self.scale);

        let mut recorder = Recorder::new();
        let mut reports = Vec::new();
        {
            let mut unit = CanvasUnit::new(&mut recorder, frame);
            for layer in self.layers.iter().filter(|l| l.enabled) {
                if let Some(report) = render_layer(&mut unit, layer)? {
                    reports.push(report);
                }
            }
            if self.unit.border {
                unit.draw_border().map_err(|e| e.to_string())?;
            }
        }

        {
            let page = UnitFrame::new(Point::new(0.0, 0.0), self.page.width, self.page.height);
            let mut page_unit = CanvasUnit::new(&mut recorder, page);

            if let Some(name) = &self.name {
                let style = TextStyle {
                    size: 12.0,
                    ..TextStyle::default()
                };
                page_unit
                    .draw_text(Point::new(frame.left(), frame.top() + 4.0), name, &style)
                    .map_err(|e| e.to_string())?;
            }

            if let Some((x, y)) = self.legend {
                page_unit
                    .draw_table(Point::new(x, y), &self.legend_rows(), &TableStyle::default())
                    .map_err(|e| e.to_string())?;
            }
        }

        Ok(Drawing {
            width_mm: self.page.width,
            height_mm: self.page.height,
            recorder,
            report: SectionReport {
                name: self.name.clone(),
                layers: reports,
            },
        })
    }

    fn legend_rows(&self) -> Vec<Vec<String>> {
        let mut rows = vec![vec!["Layer".to_string(), "Rock".to_string()]];
        for layer in self.layers.iter().filter(|l| l.enabled) {
            rows.push(vec![layer.name.clone(), layer.rock.clone()]);
        }
        rows
    }
}

/// Fill one layer. A malformed polygon skips the layer with a warning.
fn render_layer(unit: &mut CanvasUnit<'_>, layer: &Layer) -> Result<Option<LayerReport>, String> {
    let polygon = Polygon::from_pairs(&layer.polygon);
    let dip = layer.dip.as_ref().map(DipSpec::to_function);
    let options = FillOptions {
        color: layer.color,
        scale: layer.scale,
        offset_factor: layer.offset_factor,
    };

    let mut request = FillRequest::new(&layer.rock, &polygon)
        .aggregates(&layer.aggregates)
        .options(options);
    if let Some(dip) = dip.as_deref() {
        request = request.dip(dip);
    }

    let result = fill_polygon_with_pattern(unit, &request).and_then(|mut stats| {
        if let Some(base) = &layer.contour_base {
            let base: Vec<Point> = base.iter().copied().map(Point::from).collect();
            stats += fill_with_contour_lines(unit, &polygon, &request.bounding_box, &base, layer.color)?;
        }
        Ok(stats)
    });

    let stats = match result {
        Ok(stats) => stats,
        Err(Error::Clip(e)) => {
            log::warn!("layer {:?}: {}, skipped", layer.name, e);
            return Ok(None);
        }
        Err(e) => return Err(format!("Layer {}: {}", layer.name, e)),
    };

    log::debug!("layer {:?} ({}): {} pieces", layer.name, layer.rock, stats.drawn);
    Ok(Some(LayerReport {
        id: layer.name.clone(),
        rock: layer.rock.clone(),
        stats,
    }))
}

/// Execute the section command.
pub fn cmd_section(args: &SectionArgs) -> Result<(), String> {
    let section = Section::load(&args.input)?;
    log::info!(
        "loaded section {} with {} layers",
        section.name.as_deref().unwrap_or("(untitled)"),
        section.layers.len()
    );
    section.render()?.write(&args.output)
}
