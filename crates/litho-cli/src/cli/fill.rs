//! Fill command implementation.
//!
//! Reads an SVG drawing, fills every path carrying a `data-rock` attribute
//! and writes the hatching. SVG user units are taken as millimeters.

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use litho::{
    CanvasUnit, ConstantDip, Error, FillOptions, FillRequest, FillStats, LineStyle, Point,
    Polygon, Recorder, UnitFrame, extract_layers_from_svg, fill_polygon_with_pattern,
};

use super::common::{Drawing, OutputArgs, read_input};

#[derive(Debug, Args)]
pub struct FillArgs {
    /// Annotated SVG drawing, or - for stdin
    pub input: PathBuf,

    #[command(flatten)]
    pub output: OutputArgs,

    /// Motif size multiplier
    #[arg(long, default_value_t = 1.0)]
    pub scale: f64,

    /// Extra motif spacing multiplier
    #[arg(long, default_value_t = 1.0)]
    pub offset_factor: f64,

    /// Also draw each layer's outline
    #[arg(long)]
    pub outline: bool,
}

/// Per-layer summary in JSON output.
#[derive(Debug, Serialize)]
pub struct LayerReport {
    pub id: String,
    pub rock: String,
    #[serde(flatten)]
    pub stats: FillStats,
}

/// JSON report of a fill run.
#[derive(Debug, Serialize)]
pub struct FillReport {
    pub layers: Vec<LayerReport>,
}

/// Execute the fill command.
pub fn cmd_fill(args: &FillArgs) -> Result<(), String> {
    let content = read_input(&args.input)?;
    let doc = extract_layers_from_svg(&content).map_err(|e| e.to_string())?;
    log::info!(
        "loaded {} layers from {} ({}x{})",
        doc.layers.len(),
        args.input.display(),
        doc.width,
        doc.height
    );

    let mut recorder = Recorder::new();
    let mut reports = Vec::with_capacity(doc.layers.len());
    {
        let frame = UnitFrame::new(Point::new(0.0, 0.0), doc.width, doc.height);
        let mut unit = CanvasUnit::new(&mut recorder, frame);

        for layer in &doc.layers {
            let options = FillOptions {
                color: layer.color.unwrap_or_default(),
                scale: args.scale,
                offset_factor: args.offset_factor,
            };
            let dip = layer.dip.map(ConstantDip);
            let mut request = FillRequest::new(&layer.rock, &layer.polygon)
                .aggregates(&layer.aggregates)
                .options(options);
            if let Some(dip) = &dip {
                request = request.dip(dip);
            }

            let stats = match fill_polygon_with_pattern(&mut unit, &request) {
                Ok(stats) => stats,
                Err(Error::Clip(e)) => {
                    log::warn!("layer {:?}: {}, skipped", layer.id, e);
                    continue;
                }
                Err(e) => return Err(format!("Layer {}: {}", layer.id, e)),
            };

            if args.outline {
                unit.draw_lines(&closed(&layer.polygon), &LineStyle::new(0.2).color(options.color))
                    .map_err(|e| e.to_string())?;
            }

            log::debug!("layer {:?} ({}): {} pieces", layer.id, layer.rock, stats.drawn);
            reports.push(LayerReport {
                id: layer.id.clone(),
                rock: layer.rock.clone(),
                stats,
            });
        }
    }

    let drawing = Drawing {
        width_mm: doc.width,
        height_mm: doc.height,
        recorder,
        report: FillReport { layers: reports },
    };
    drawing.write(&args.output)
}

/// The polygon ring with its first point repeated at the end.
fn closed(polygon: &Polygon) -> Vec<Point> {
    let mut ring = polygon.points.clone();
    if let Some(&first) = ring.first() {
        ring.push(first);
    }
    ring
}
