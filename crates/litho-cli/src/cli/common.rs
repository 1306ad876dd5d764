//! Common utilities shared across CLI commands.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::{Args, ValueEnum};
use resvg::usvg;
use serde::Serialize;

use litho::target::Primitive;
use litho::{Recorder, SvgTarget};

/// Output format for rendered drawings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Svg,
    Json,
    Png,
}

impl OutputFormat {
    /// Format implied by a file extension.
    pub fn from_extension(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "svg" => Some(OutputFormat::Svg),
            "json" => Some(OutputFormat::Json),
            "png" => Some(OutputFormat::Png),
            _ => None,
        }
    }
}

/// Output flags shared by the drawing commands.
#[derive(Debug, Clone, Args)]
pub struct OutputArgs {
    /// Output file (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format (default: from the output extension, else svg)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// PNG resolution in pixels per millimeter
    #[arg(long, default_value_t = 4.0)]
    pub png_scale: f64,
}

impl OutputArgs {
    pub fn resolved_format(&self) -> OutputFormat {
        self.format
            .or_else(|| self.output.as_deref().and_then(OutputFormat::from_extension))
            .unwrap_or(OutputFormat::Svg)
    }
}

/// Read a file, or stdin when the path is `-`.
pub fn read_input(path: &Path) -> Result<String, String> {
    if path.as_os_str() == "-" {
        let mut content = String::new();
        io::stdin()
            .read_to_string(&mut content)
            .map_err(|e| format!("Failed to read stdin: {}", e))?;
        return Ok(content);
    }
    fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path.display(), e))
}

/// A rendered page: primitives in page millimeters plus a per-command
/// summary that goes into JSON output.
pub struct Drawing<R> {
    pub width_mm: f64,
    pub height_mm: f64,
    pub recorder: Recorder,
    pub report: R,
}

#[derive(Serialize)]
struct JsonOutput<'a, R> {
    width_mm: f64,
    height_mm: f64,
    report: &'a R,
    primitives: &'a [Primitive],
}

impl<R: Serialize> Drawing<R> {
    pub fn to_svg(&self) -> Result<String, String> {
        let mut svg = SvgTarget::new(self.width_mm, self.height_mm);
        self.recorder
            .replay(&mut svg)
            .map_err(|e| format!("Failed to render SVG: {}", e))?;
        Ok(svg.finish())
    }

    pub fn to_json(&self) -> Result<String, String> {
        let output = JsonOutput {
            width_mm: self.width_mm,
            height_mm: self.height_mm,
            report: &self.report,
            primitives: &self.recorder.primitives,
        };
        serde_json::to_string_pretty(&output).map_err(|e| format!("Failed to encode JSON: {}", e))
    }

    pub fn write(&self, args: &OutputArgs) -> Result<(), String> {
        match args.resolved_format() {
            OutputFormat::Svg => emit(&self.to_svg()?, args.output.as_deref()),
            OutputFormat::Json => emit(&self.to_json()?, args.output.as_deref()),
            OutputFormat::Png => {
                let path = args
                    .output
                    .as_deref()
                    .ok_or("PNG output needs an --output file")?;
                render_png(&self.to_svg()?, path, args.png_scale)
            }
        }
    }
}

fn emit(content: &str, output: Option<&Path>) -> Result<(), String> {
    match output {
        Some(path) => {
            fs::write(path, content)
                .map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;
            log::info!("wrote {}", path.display());
        }
        None => print!("{}", content),
    }
    Ok(())
}

/// Rasterize an SVG document with resvg.
pub fn render_png(svg_content: &str, png_path: &Path, px_per_mm: f64) -> Result<(), String> {
    let options = usvg::Options::default();
    let tree = usvg::Tree::from_str(svg_content, &options)
        .map_err(|e| format!("Failed to parse generated SVG: {}", e))?;

    // usvg sizes the document in CSS pixels, 96 per inch.
    let zoom = (px_per_mm * 25.4 / 96.0) as f32;
    let width = (tree.size().width() * zoom).ceil() as u32;
    let height = (tree.size().height() * zoom).ceil() as u32;

    let mut pixmap = tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| format!("Could not create a {}x{} pixmap", width, height))?;
    pixmap.fill(tiny_skia::Color::WHITE);

    resvg::render(&tree, tiny_skia::Transform::from_scale(zoom, zoom), &mut pixmap.as_mut());

    pixmap
        .save_png(png_path)
        .map_err(|e| format!("Failed to write {}: {}", png_path.display(), e))?;
    log::info!("wrote {} ({}x{})", png_path.display(), width, height);
    Ok(())
}
