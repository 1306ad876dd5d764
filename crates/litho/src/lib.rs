//! # litho
//!
//! Geological cross-section hatching: fills layer polygons with rock
//! patterns, clipped to the layer and scaled from meters to paper.
//!
//! The pieces, leaves first:
//! - [`geometry`]: points, polygons and point-set transforms
//! - [`clip`]: fixed-point polyline clipping against a layer polygon
//! - [`units`]: meters ↔ millimeters at independent axis scales
//! - [`shapes`]: the motif catalog
//! - [`patterns`]: rock names → fills, and the tiling passes
//! - [`canvas`] and [`target`]: where the lines go

pub mod canvas;
pub mod clip;
pub mod dip;
pub mod error;
pub mod geometry;
pub mod patterns;
pub mod shapes;
pub mod style;
pub mod svg;
pub mod target;
pub mod text;
pub mod units;

// Re-export common types at crate root for convenience.
pub use canvas::{CanvasUnit, UnitFrame};
pub use clip::{ClipConfig, ClipRegion, clip_polyline};
pub use dip::{ConstantDip, DipFunction, ProfileDip, dip_angle_degrees};
pub use error::{ClipError, Error, ResolveError, Result, SvgError, TargetError};
pub use geometry::{BoundingBox, Point, Polygon};
pub use patterns::{
    FillKind, FillOptions, FillRequest, FillStats, Rock, fill_polygon_with_pattern,
    fill_with_contour_lines,
};
pub use shapes::{Motif, MultiShape, Shape};
pub use style::{Color, LineStyle, LineType};
pub use svg::{SvgDocument, SvgLayer, extract_layers_from_svg};
pub use target::{Recorder, SvgTarget, Target};
pub use units::ScaleContext;
