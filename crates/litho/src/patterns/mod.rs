//! Rock fills for layer polygons.
//!
//! Every rock name resolves once to a [`FillKind`]: vertical hatching,
//! diagonal hatching or a motif field. The fill entry point then dispatches
//! on that value.

pub mod util;

mod contour;
mod diagonal;
mod motif;
mod vertical;

pub use contour::{CONTOUR_PITCH_MM, fill_with_contour_lines};
pub use diagonal::{DiagonalOptions, fill_diagonal_lines};
pub use motif::fill_with_motif;
pub use vertical::{HATCH_LINE_WIDTH, fill_vertical_lines};

use serde::{Deserialize, Serialize};

use crate::canvas::CanvasUnit;
use crate::dip::DipFunction;
use crate::error::{ResolveError, Result};
use crate::geometry::{BoundingBox, Polygon};
use crate::shapes::{self, Motif};
use crate::style::Color;

// ============================================================================
// ROCKS
// ============================================================================

/// Every rock with a fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rock {
    Peat,
    Topsoil,
    Bedrock,
    Shale,
    FracturedBedrock,
    Pebbles,
    Boulders,
    Gravel,
    Silt,
    Sand,
    Clay,
    Grus,
    Rubble,
    RubbleGravel,
    Andesite,
    Dacite,
    Basalt,
    Andesibasalt,
    Andesidacite,
    AndesibasaltTuff,
    Rhyolite,
    Granodiorite,
    Diorite,
    Granite,
}

impl Rock {
    pub fn all() -> &'static [Rock] {
        &[
            Rock::Peat,
            Rock::Topsoil,
            Rock::Bedrock,
            Rock::Shale,
            Rock::FracturedBedrock,
            Rock::Pebbles,
            Rock::Boulders,
            Rock::Gravel,
            Rock::Silt,
            Rock::Sand,
            Rock::Clay,
            Rock::Grus,
            Rock::Rubble,
            Rock::RubbleGravel,
            Rock::Andesite,
            Rock::Dacite,
            Rock::Basalt,
            Rock::Andesibasalt,
            Rock::Andesidacite,
            Rock::AndesibasaltTuff,
            Rock::Rhyolite,
            Rock::Granodiorite,
            Rock::Diorite,
            Rock::Granite,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Rock::Peat => "peat",
            Rock::Topsoil => "topsoil",
            Rock::Bedrock => "bedrock",
            Rock::Shale => "shale",
            Rock::FracturedBedrock => "fractured-bedrock",
            Rock::Pebbles => "pebbles",
            Rock::Boulders => "boulders",
            Rock::Gravel => "gravel",
            Rock::Silt => "silt",
            Rock::Sand => "sand",
            Rock::Clay => "clay",
            Rock::Grus => "grus",
            Rock::Rubble => "rubble",
            Rock::RubbleGravel => "rubble-gravel",
            Rock::Andesite => "andesite",
            Rock::Dacite => "dacite",
            Rock::Basalt => "basalt",
            Rock::Andesibasalt => "andesibasalt",
            Rock::Andesidacite => "andesidacite",
            Rock::AndesibasaltTuff => "andesibasalt-tuff",
            Rock::Rhyolite => "rhyolite",
            Rock::Granodiorite => "granodiorite",
            Rock::Diorite => "diorite",
            Rock::Granite => "granite",
        }
    }

    /// Name used in Russian survey logs.
    pub fn survey_name(&self) -> &'static str {
        match self {
            Rock::Peat => "торф",
            Rock::Topsoil => "прс",
            Rock::Bedrock => "коренные породы",
            Rock::Shale => "сланцы",
            Rock::FracturedBedrock => "переходный слой (трещиноватый коренник)",
            Rock::Pebbles => "галечник",
            Rock::Boulders => "валунник",
            Rock::Gravel => "гравий",
            Rock::Silt => "ил",
            Rock::Sand => "песок",
            Rock::Clay => "глина",
            Rock::Grus => "дресва",
            Rock::Rubble => "щебень",
            Rock::RubbleGravel => "спай",
            Rock::Andesite => "андезит",
            Rock::Dacite => "дацит",
            Rock::Basalt => "базальт",
            Rock::Andesibasalt => "андезибазальт",
            Rock::Andesidacite => "андезидацит",
            Rock::AndesibasaltTuff => "андезибазальт туф",
            Rock::Rhyolite => "риолит",
            Rock::Granodiorite => "гранодиорит",
            Rock::Diorite => "диорит",
            Rock::Granite => "гранит",
        }
    }

    /// Parse an English or survey name. Case and surrounding whitespace are
    /// ignored; `_` is read as `-`.
    pub fn from_name(name: &str) -> Option<Rock> {
        let name = name.trim().to_lowercase().replace('_', "-");
        match name.as_str() {
            "peat" | "торф" => Some(Rock::Peat),
            "topsoil" | "soil" | "прс" => Some(Rock::Topsoil),
            "bedrock" | "коренные породы" => Some(Rock::Bedrock),
            "shale" | "сланцы" => Some(Rock::Shale),
            "fractured-bedrock" | "fractured" | "transition"
            | "переходный слой (трещиноватый коренник)" => Some(Rock::FracturedBedrock),
            "pebbles" | "pebble" | "галечник" => Some(Rock::Pebbles),
            "boulders" | "boulder" | "валунник" => Some(Rock::Boulders),
            "gravel" | "гравий" => Some(Rock::Gravel),
            "silt" | "ил" => Some(Rock::Silt),
            "sand" | "песок" => Some(Rock::Sand),
            "clay" | "глина" => Some(Rock::Clay),
            "grus" | "дресва" => Some(Rock::Grus),
            "rubble" | "debris" | "щебень" => Some(Rock::Rubble),
            "rubble-gravel" | "спай" => Some(Rock::RubbleGravel),
            "andesite" | "андезит" => Some(Rock::Andesite),
            "dacite" | "дацит" => Some(Rock::Dacite),
            "basalt" | "базальт" => Some(Rock::Basalt),
            "andesibasalt" | "basaltic-andesite" | "андезибазальт" => Some(Rock::Andesibasalt),
            "andesidacite" | "андезидацит" => Some(Rock::Andesidacite),
            "andesibasalt-tuff" | "andesibasalt tuff" | "андезибазальт туф" => {
                Some(Rock::AndesibasaltTuff)
            }
            "rhyolite" | "риолит" => Some(Rock::Rhyolite),
            "granodiorite" | "гранодиорит" => Some(Rock::Granodiorite),
            "diorite" | "диорит" => Some(Rock::Diorite),
            "granite" | "гранит" => Some(Rock::Granite),
            _ => None,
        }
    }

    pub fn fill_kind(&self) -> FillKind {
        let simple = |shape| FillKind::Motif(Motif::Simple(shape));
        let multi = |multi| FillKind::Motif(Motif::Multi(multi));
        match self {
            Rock::Peat => FillKind::VerticalLines { dx_mm: 2.0 },
            Rock::Topsoil => FillKind::VerticalLines { dx_mm: 1.0 },
            Rock::Bedrock => FillKind::DiagonalLines {
                alternating: true,
                d_mm: 3.0,
            },
            Rock::Shale | Rock::FracturedBedrock => FillKind::DiagonalLines {
                alternating: false,
                d_mm: 2.0,
            },
            Rock::Pebbles => simple(&shapes::PEBBLES),
            Rock::Boulders => simple(&shapes::BOULDERS),
            Rock::Gravel => simple(&shapes::GRAVEL),
            Rock::Silt => simple(&shapes::SILT),
            Rock::Sand => simple(&shapes::SAND),
            Rock::Clay => simple(&shapes::CLAY),
            Rock::Grus => simple(&shapes::GRUS),
            Rock::Rubble => simple(&shapes::RUBBLE),
            Rock::RubbleGravel => multi(&shapes::RUBBLE_GRAVEL),
            Rock::Andesite => simple(&shapes::ANDESITE),
            Rock::Dacite => simple(&shapes::DACITE),
            Rock::Basalt => simple(&shapes::BASALT),
            Rock::Andesibasalt => multi(&shapes::ANDESIBASALT),
            Rock::Andesidacite => multi(&shapes::ANDESIDACITE),
            Rock::AndesibasaltTuff => multi(&shapes::ANDESIBASALT_TUFF),
            Rock::Rhyolite => multi(&shapes::RHYOLITE),
            Rock::Granodiorite => multi(&shapes::GRANODIORITE),
            Rock::Diorite => simple(&shapes::DIORITE),
            Rock::Granite => simple(&shapes::GRANITE),
        }
    }

    /// The motif, for rocks drawn with one.
    pub fn motif(&self) -> Option<Motif> {
        match self.fill_kind() {
            FillKind::Motif(motif) => Some(motif),
            _ => None,
        }
    }
}

// ============================================================================
// FILL KINDS
// ============================================================================

/// How a layer is hatched.
#[derive(Debug, Clone, PartialEq)]
pub enum FillKind {
    VerticalLines { dx_mm: f64 },
    DiagonalLines { alternating: bool, d_mm: f64 },
    Motif(Motif),
}

impl FillKind {
    /// Resolve a rock name plus aggregate names.
    ///
    /// Aggregates only apply to motif rocks and must themselves name motif
    /// rocks; line rocks ignore them.
    pub fn resolve<S: AsRef<str>>(rock: &str, aggregates: &[S]) -> Result<FillKind, ResolveError> {
        let rock = Rock::from_name(rock).ok_or_else(|| ResolveError::UnknownRock(rock.to_string()))?;

        match rock.fill_kind() {
            FillKind::Motif(motif) if !aggregates.is_empty() => {
                let extra = aggregates
                    .iter()
                    .map(|name| {
                        let name = name.as_ref();
                        Rock::from_name(name)
                            .and_then(|r| r.motif())
                            .ok_or_else(|| ResolveError::UnknownAggregate(name.to_string()))
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(FillKind::Motif(motif.with_aggregates(&extra)))
            }
            kind => Ok(kind),
        }
    }

    /// Short human description, e.g. for listings.
    pub fn describe(&self) -> String {
        match self {
            FillKind::VerticalLines { dx_mm } => format!("vertical lines, {dx_mm} mm"),
            FillKind::DiagonalLines { alternating: true, d_mm } => {
                format!("diagonal lines, {d_mm} mm, dash/solid")
            }
            FillKind::DiagonalLines { alternating: false, d_mm } => {
                format!("diagonal lines, {d_mm} mm")
            }
            FillKind::Motif(motif) => {
                let (dx, dy) = motif.pitch_mm();
                let members: Vec<&str> = motif.members().iter().map(|s| s.name).collect();
                format!("motif {} at {dx}x{dy} mm", members.join(", "))
            }
        }
    }
}

// ============================================================================
// FILL REQUESTS
// ============================================================================

/// Per-fill overrides.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FillOptions {
    pub color: Color,
    /// Motif size multiplier. Also widens the motif pitch.
    pub scale: f64,
    /// Extra pitch multiplier that leaves the motif size alone.
    pub offset_factor: f64,
}

impl Default for FillOptions {
    fn default() -> Self {
        Self {
            color: Color::Black,
            scale: 1.0,
            offset_factor: 1.0,
        }
    }
}

/// Counts from one fill pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FillStats {
    /// Lines or grid points considered.
    pub candidates: usize,
    /// Polylines handed to the target after clipping.
    pub drawn: usize,
}

impl std::ops::AddAssign for FillStats {
    fn add_assign(&mut self, other: Self) {
        self.candidates += other.candidates;
        self.drawn += other.drawn;
    }
}

/// Everything one layer fill needs.
#[derive(Clone, Copy)]
pub struct FillRequest<'a> {
    pub rock: &'a str,
    pub aggregates: &'a [String],
    /// In the unit's input space.
    pub polygon: &'a Polygon,
    pub bounding_box: BoundingBox,
    pub dip: Option<&'a dyn DipFunction>,
    pub options: FillOptions,
}

impl<'a> FillRequest<'a> {
    /// Request bounded by the polygon's own box.
    pub fn new(rock: &'a str, polygon: &'a Polygon) -> Self {
        Self {
            rock,
            aggregates: &[],
            polygon,
            bounding_box: polygon
                .bounding_box()
                .unwrap_or(BoundingBox::new(0.0, 0.0, 0.0, 0.0)),
            dip: None,
            options: FillOptions::default(),
        }
    }

    pub fn aggregates(mut self, aggregates: &'a [String]) -> Self {
        self.aggregates = aggregates;
        self
    }

    pub fn bounding_box(mut self, bounding_box: BoundingBox) -> Self {
        self.bounding_box = bounding_box;
        self
    }

    pub fn dip(mut self, dip: &'a dyn DipFunction) -> Self {
        self.dip = Some(dip);
        self
    }

    pub fn options(mut self, options: FillOptions) -> Self {
        self.options = options;
        self
    }
}

/// Fill one layer polygon with its rock's pattern.
///
/// An unknown rock or aggregate skips the fill with a warning and returns
/// empty stats. A malformed polygon or a failing target is an error.
pub fn fill_polygon_with_pattern(
    unit: &mut CanvasUnit<'_>,
    request: &FillRequest<'_>,
) -> Result<FillStats> {
    let kind = match FillKind::resolve(request.rock, request.aggregates) {
        Ok(kind) => kind,
        Err(e) => {
            log::warn!("{e}, fill skipped");
            return Ok(FillStats::default());
        }
    };

    let FillRequest { polygon, bounding_box, options, .. } = request;
    match kind {
        FillKind::VerticalLines { dx_mm } => {
            fill_vertical_lines(unit, polygon, bounding_box, dx_mm, options.color)
        }
        FillKind::DiagonalLines { alternating, d_mm } => {
            let diagonal = DiagonalOptions {
                d_mm,
                alternating,
                line_type: None,
                color: options.color,
            };
            fill_diagonal_lines(unit, polygon, bounding_box, &diagonal)
        }
        FillKind::Motif(motif) => {
            fill_with_motif(unit, polygon, bounding_box, request.dip, &motif, options)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::UnitFrame;
    use crate::dip::ConstantDip;
    use crate::geometry::Point;
    use crate::style::LineType;
    use crate::target::Recorder;
    use crate::units::ScaleContext;

    fn square(side: f64) -> Polygon {
        Polygon::from_pairs(&[(0.0, 0.0), (side, 0.0), (side, side), (0.0, side)])
    }

    #[test]
    fn all_rocks_round_trip_through_both_names() {
        for rock in Rock::all() {
            assert_eq!(Rock::from_name(rock.name()), Some(*rock));
            assert_eq!(Rock::from_name(rock.survey_name()), Some(*rock));
        }
        assert_eq!(Rock::from_name("  Rubble_Gravel "), Some(Rock::RubbleGravel));
        assert_eq!(Rock::from_name("ГРАНИТ"), Some(Rock::Granite));
        assert_eq!(Rock::from_name("obsidian"), None);
    }

    #[test]
    fn fill_kinds() {
        assert_eq!(Rock::Peat.fill_kind(), FillKind::VerticalLines { dx_mm: 2.0 });
        assert_eq!(Rock::Topsoil.fill_kind(), FillKind::VerticalLines { dx_mm: 1.0 });
        assert_eq!(
            Rock::Bedrock.fill_kind(),
            FillKind::DiagonalLines { alternating: true, d_mm: 3.0 }
        );
        assert_eq!(
            Rock::FracturedBedrock.fill_kind(),
            FillKind::DiagonalLines { alternating: false, d_mm: 2.0 }
        );
        for rock in Rock::all() {
            let is_motif = matches!(rock.fill_kind(), FillKind::Motif(_));
            assert_eq!(is_motif, rock.motif().is_some(), "{}", rock.name());
        }
    }

    #[test]
    fn resolve_with_aggregates() {
        let kind = FillKind::resolve("clay", &["sand", "gravel"]).unwrap();
        let FillKind::Motif(motif) = kind else {
            panic!("expected a motif");
        };
        let names: Vec<_> = motif.members().iter().map(|s| s.name).collect();
        assert_eq!(names, ["clay", "sand", "gravel"]);

        // Line rocks ignore aggregates.
        let kind = FillKind::resolve("peat", &["sand"]).unwrap();
        assert_eq!(kind, FillKind::VerticalLines { dx_mm: 2.0 });
    }

    #[test]
    fn resolve_errors() {
        let none: &[&str] = &[];
        assert_eq!(
            FillKind::resolve("obsidian", none),
            Err(ResolveError::UnknownRock("obsidian".into()))
        );
        assert_eq!(
            FillKind::resolve("clay", &["peat"]),
            Err(ResolveError::UnknownAggregate("peat".into()))
        );
    }

    #[test]
    fn peat_fill_on_ten_meter_square() {
        let mut rec = Recorder::new();
        let frame = UnitFrame::new(Point::new(0.0, 0.0), 100.0, 100.0)
            .scaled(ScaleContext::new(1000.0, 1000.0));
        let mut unit = CanvasUnit::new(&mut rec, frame);
        let polygon = square(10.0);

        let stats = fill_polygon_with_pattern(&mut unit, &FillRequest::new("торф", &polygon)).unwrap();
        assert_eq!(stats.drawn, 5);
        let xs: Vec<f64> = rec.lines().map(|(p, _)| p[0].x).collect();
        assert_eq!(xs, [2.0, 4.0, 6.0, 8.0, 10.0]);
    }

    #[test]
    fn bedrock_alternates() {
        let mut rec = Recorder::new();
        let mut unit = CanvasUnit::new(&mut rec, UnitFrame::new(Point::new(0.0, 0.0), 100.0, 100.0));
        let polygon = square(30.0);

        fill_polygon_with_pattern(&mut unit, &FillRequest::new("bedrock", &polygon)).unwrap();
        let types: Vec<LineType> = rec.lines().map(|(_, s)| s.line_type).collect();
        assert!(types.contains(&LineType::Dash));
        assert!(types.contains(&LineType::Solid));
    }

    #[test]
    fn unknown_rock_draws_nothing() {
        let mut rec = Recorder::new();
        let mut unit = CanvasUnit::new(&mut rec, UnitFrame::new(Point::new(0.0, 0.0), 100.0, 100.0));
        let polygon = square(10.0);

        let stats = fill_polygon_with_pattern(&mut unit, &FillRequest::new("obsidian", &polygon)).unwrap();
        assert_eq!(stats, FillStats::default());

        let aggregates = vec!["unobtainium".to_string()];
        let request = FillRequest::new("clay", &polygon).aggregates(&aggregates);
        let stats = fill_polygon_with_pattern(&mut unit, &request).unwrap();
        assert_eq!(stats, FillStats::default());
        assert!(rec.primitives.is_empty());
    }

    #[test]
    fn malformed_polygon_is_an_error() {
        let mut rec = Recorder::new();
        let mut unit = CanvasUnit::new(&mut rec, UnitFrame::new(Point::new(0.0, 0.0), 100.0, 100.0));
        let bowtie = Polygon::from_pairs(&[(0.0, 0.0), (10.0, 10.0), (10.0, 0.0), (0.0, 4.0)]);

        let result = fill_polygon_with_pattern(&mut unit, &FillRequest::new("sand", &bowtie));
        assert!(matches!(
            result,
            Err(crate::Error::Clip(crate::ClipError::SelfIntersecting { .. }))
        ));
    }

    #[test]
    fn dip_and_options_reach_the_motifs() {
        let mut rec = Recorder::new();
        let mut unit = CanvasUnit::new(&mut rec, UnitFrame::new(Point::new(0.0, 0.0), 100.0, 100.0));
        let polygon = square(12.0);
        let dip = ConstantDip(0.1);
        let options = FillOptions {
            color: crate::style::Color::Red,
            ..FillOptions::default()
        };

        let request = FillRequest::new("clay", &polygon).dip(&dip).options(options);
        let stats = fill_polygon_with_pattern(&mut unit, &request).unwrap();
        assert!(stats.drawn > 0);
        for (points, style) in rec.lines() {
            assert_eq!(style.color, crate::style::Color::Red);
            let (a, b) = (points[0], points[points.len() - 1]);
            assert!(((b.y - a.y) - (b.x - a.x)).abs() < 1e-6);
        }
    }
}
