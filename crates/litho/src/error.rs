//! Error types.
//!
//! Expected domain misses (an unknown rock name) are reported as
//! [`ResolveError`] and degraded by the fill entry point. Structural
//! failures (bad geometry, a failing sink) propagate to the caller.

use thiserror::Error;

/// Errors raised while preparing or running a polygon clip.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ClipError {
    #[error("clip polygon needs at least 3 distinct vertices, got {count}")]
    TooFewVertices { count: usize },

    #[error("clip polygon has zero area")]
    ZeroArea,

    #[error("clip polygon edges {first} and {second} intersect")]
    SelfIntersecting { first: usize, second: usize },

    #[error("coordinate {value} does not fit the fixed-point clip domain at scale {scale}")]
    OutOfRange { value: f64, scale: f64 },
}

/// Errors raised by a drawing sink.
#[derive(Debug, Error)]
pub enum TargetError {
    #[error("render failed: {0}")]
    Render(String),
}

/// A rock or aggregate name that has no fill in the catalog.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("no fill pattern for rock {0:?}")]
    UnknownRock(String),

    #[error("no motif for aggregate {0:?}")]
    UnknownAggregate(String),
}

/// Errors raised while reading layers out of an SVG document.
#[derive(Debug, Error)]
pub enum SvgError {
    #[error("SVG parse error: {0}")]
    Parse(String),

    #[error("SVG attribute scan failed")]
    Xml(#[from] quick_xml::Error),

    #[error("no layer polygons found in SVG")]
    NoLayers,
}

/// Crate-level error.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Clip(#[from] ClipError),

    #[error(transparent)]
    Target(#[from] TargetError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Svg(#[from] SvgError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
