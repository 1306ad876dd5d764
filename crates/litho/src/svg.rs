//! Layer polygons from annotated SVG drawings.
//!
//! Uses usvg for complete SVG resolution (CSS, transforms, shapes to paths)
//! then walks the tree for path geometry. usvg drops unknown attributes, so
//! a second pass with quick-xml collects the `data-*` annotations by element
//! id:
//!
//! ```text
//! <path id="l1" data-rock="sand" data-aggregate="gravel, clay"
//!       data-dip="0.05" data-color="#ff0000" d="..."/>
//! ```
//!
//! Only elements with a `data-rock` become layers. SVG's y axis points
//! down; layer polygons are flipped so y points up like a section.
//!
//! usvg measures documents in CSS pixels, so a root `width="100mm"` turns
//! every coordinate into pixels. Drawings meant to be read in user units
//! should carry only a `viewBox`.
//!
//! ## Curve Flattening
//!
//! Bézier segments are flattened with lyon_geom at [`CURVE_TOLERANCE`]
//! user units.

use std::collections::HashMap;

use lyon_geom::{CubicBezierSegment, QuadraticBezierSegment, point};
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use serde::Serialize;

use crate::error::SvgError;
use crate::geometry::{Point, Polygon};
use crate::style::Color;

/// Flattening tolerance in SVG user units.
pub const CURVE_TOLERANCE: f32 = 0.1;

/// One annotated layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SvgLayer {
    pub id: String,
    pub rock: String,
    pub aggregates: Vec<String>,
    pub dip: Option<f64>,
    pub color: Option<Color>,
    pub polygon: Polygon,
}

/// Everything read from one document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SvgDocument {
    pub width: f64,
    pub height: f64,
    pub layers: Vec<SvgLayer>,
}

#[derive(Debug, Default)]
struct Annotation {
    rock: Option<String>,
    aggregates: Vec<String>,
    dip: Option<f64>,
    color: Option<Color>,
}

/// Extract every annotated layer polygon, in document order.
pub fn extract_layers_from_svg(svg_content: &str) -> Result<SvgDocument, SvgError> {
    let annotations = scan_annotations(svg_content)?;

    let options = usvg::Options::default();
    let tree = usvg::Tree::from_str(svg_content, &options)
        .map_err(|e| SvgError::Parse(e.to_string()))?;
    let width = tree.size().width() as f64;
    let height = tree.size().height() as f64;

    let mut layers = Vec::new();
    collect_from_group(tree.root(), &annotations, height, &mut layers);

    if layers.is_empty() {
        return Err(SvgError::NoLayers);
    }
    log::debug!("read {} layers from SVG", layers.len());
    Ok(SvgDocument { width, height, layers })
}

fn collect_from_group(
    group: &usvg::Group,
    annotations: &HashMap<String, Annotation>,
    height: f64,
    layers: &mut Vec<SvgLayer>,
) {
    for child in group.children() {
        match child {
            usvg::Node::Group(group) => collect_from_group(group, annotations, height, layers),
            usvg::Node::Path(path) => {
                let Some(annotation) = annotations.get(path.id()) else {
                    continue;
                };
                let Some(rock) = annotation.rock.clone() else {
                    continue;
                };
                match path_to_polygon(path, height) {
                    Some(polygon) => layers.push(SvgLayer {
                        id: path.id().to_string(),
                        rock,
                        aggregates: annotation.aggregates.clone(),
                        dip: annotation.dip,
                        color: annotation.color,
                        polygon,
                    }),
                    None => log::warn!("layer {:?} has fewer than 3 points, skipped", path.id()),
                }
            }
            _ => {}
        }
    }
}

/// First subpath of `path`, in absolute coordinates with y flipped.
fn path_to_polygon(path: &usvg::Path, height: f64) -> Option<Polygon> {
    let transform = path.abs_transform();
    let place = |x: f32, y: f32| {
        let (x, y) = (x as f64, y as f64);
        let ax = transform.sx as f64 * x + transform.kx as f64 * y + transform.tx as f64;
        let ay = transform.ky as f64 * x + transform.sy as f64 * y + transform.ty as f64;
        Point::new(ax, height - ay)
    };

    let mut points = Vec::new();
    let mut last: Option<(f32, f32)> = None;

    for segment in path.data().segments() {
        match segment {
            usvg::tiny_skia_path::PathSegment::MoveTo(p) => {
                if !points.is_empty() {
                    break;
                }
                points.push(place(p.x, p.y));
                last = Some((p.x, p.y));
            }
            usvg::tiny_skia_path::PathSegment::LineTo(p) => {
                points.push(place(p.x, p.y));
                last = Some((p.x, p.y));
            }
            usvg::tiny_skia_path::PathSegment::QuadTo(ctrl, p) => {
                if let Some((lx, ly)) = last {
                    let curve = QuadraticBezierSegment {
                        from: point(lx, ly),
                        ctrl: point(ctrl.x, ctrl.y),
                        to: point(p.x, p.y),
                    };
                    curve.for_each_flattened(CURVE_TOLERANCE, &mut |line| {
                        points.push(place(line.to.x, line.to.y));
                    });
                } else {
                    points.push(place(p.x, p.y));
                }
                last = Some((p.x, p.y));
            }
            usvg::tiny_skia_path::PathSegment::CubicTo(ctrl1, ctrl2, p) => {
                if let Some((lx, ly)) = last {
                    let curve = CubicBezierSegment {
                        from: point(lx, ly),
                        ctrl1: point(ctrl1.x, ctrl1.y),
                        ctrl2: point(ctrl2.x, ctrl2.y),
                        to: point(p.x, p.y),
                    };
                    curve.for_each_flattened(CURVE_TOLERANCE, &mut |line| {
                        points.push(place(line.to.x, line.to.y));
                    });
                } else {
                    points.push(place(p.x, p.y));
                }
                last = Some((p.x, p.y));
            }
            usvg::tiny_skia_path::PathSegment::Close => {}
        }
    }

    points.dedup_by(|a, b| (a.x - b.x).abs() < 1e-6 && (a.y - b.y).abs() < 1e-6);
    (points.len() >= 3).then(|| Polygon::new(points))
}

// ============================================================================
// ANNOTATIONS
// ============================================================================

fn scan_annotations(svg_content: &str) -> Result<HashMap<String, Annotation>, SvgError> {
    let mut reader = Reader::from_str(svg_content);
    reader.config_mut().trim_text(true);

    let mut annotations = HashMap::new();
    loop {
        match reader.read_event()? {
            Event::Start(ref e) | Event::Empty(ref e) => {
                if let Some((id, annotation)) = read_annotation(e)? {
                    annotations.insert(id, annotation);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(annotations)
}

fn read_annotation(e: &BytesStart<'_>) -> Result<Option<(String, Annotation)>, SvgError> {
    let mut id = None;
    let mut annotation = Annotation::default();

    for attr in e.attributes().flatten() {
        let value = attr.unescape_value()?;
        match attr.key.as_ref() {
            b"id" => id = Some(value.into_owned()),
            b"data-rock" => annotation.rock = Some(value.trim().to_string()),
            b"data-aggregate" | b"data-aggregates" => {
                annotation.aggregates = value
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect();
            }
            b"data-dip" => match value.trim().parse::<f64>() {
                Ok(dip) => annotation.dip = Some(dip),
                Err(_) => log::warn!("ignoring unparsable data-dip {value:?}"),
            },
            b"data-color" => match value.trim().parse::<svgtypes::Color>() {
                Ok(c) => annotation.color = Some(Color::nearest(c.red, c.green, c.blue)),
                Err(_) => log::warn!("ignoring unparsable data-color {value:?}"),
            },
            _ => {}
        }
    }

    Ok(id.map(|id| (id, annotation)))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn annotated_rect_becomes_a_flipped_layer() {
        let svg = r##"
            <svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100">
                <rect id="sand-1" data-rock="sand" data-aggregate="gravel, clay"
                      data-dip="0.05" data-color="#f01010"
                      x="10" y="10" width="80" height="20"/>
                <rect id="frame" x="0" y="0" width="5" height="5"/>
            </svg>
        "##;

        let doc = extract_layers_from_svg(svg).unwrap();
        assert_eq!((doc.width, doc.height), (100.0, 100.0));
        assert_eq!(doc.layers.len(), 1);

        let layer = &doc.layers[0];
        assert_eq!(layer.id, "sand-1");
        assert_eq!(layer.rock, "sand");
        assert_eq!(layer.aggregates, ["gravel", "clay"]);
        assert_eq!(layer.dip, Some(0.05));
        assert_eq!(layer.color, Some(Color::Red));
        assert_eq!(layer.polygon.len(), 4);

        let bbox = layer.polygon.bounding_box().unwrap();
        assert!((bbox.y_min - 70.0).abs() < 1e-4);
        assert!((bbox.y_max - 90.0).abs() < 1e-4);
    }

    #[test]
    fn group_transforms_are_applied() {
        let svg = r#"
            <svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100">
                <g transform="translate(20 0)">
                    <polygon id="p" data-rock="clay" points="0,0 10,0 10,10 0,10"/>
                </g>
            </svg>
        "#;

        let doc = extract_layers_from_svg(svg).unwrap();
        let bbox = doc.layers[0].polygon.bounding_box().unwrap();
        assert!((bbox.x_min - 20.0).abs() < 1e-4);
        assert!((bbox.x_max - 30.0).abs() < 1e-4);
    }

    #[test]
    fn curves_are_flattened() {
        let svg = r#"
            <svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100">
                <circle id="lens" data-rock="granite" cx="50" cy="50" r="40"/>
            </svg>
        "#;

        let doc = extract_layers_from_svg(svg).unwrap();
        assert!(doc.layers[0].polygon.len() > 20);
    }

    #[test]
    fn bad_annotations_are_ignored() {
        let svg = r#"
            <svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100">
                <rect id="a" data-rock="silt" data-dip="steep" data-color="nope"
                      x="0" y="0" width="10" height="10"/>
            </svg>
        "#;

        let doc = extract_layers_from_svg(svg).unwrap();
        assert_eq!(doc.layers[0].dip, None);
        assert_eq!(doc.layers[0].color, None);
    }

    #[test]
    fn no_layers_error() {
        let svg = r#"
            <svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100">
                <rect x="0" y="0" width="10" height="10"/>
            </svg>
        "#;

        assert!(matches!(extract_layers_from_svg(svg), Err(SvgError::NoLayers)));
    }

    #[test]
    fn malformed_svg_is_a_parse_error() {
        assert!(extract_layers_from_svg("<svg").is_err());
    }
}
