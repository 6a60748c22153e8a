//! The projection value type and its descriptor parser.
//!
//! A `Projection` pairs a registered name/id with the concrete transform
//! math and is treated as a value: equality compares name (case-
//! insensitively), datum, and zone, never the registry id, because two
//! logically identical projections constructed in different orders can
//! receive different ids.

use crate::registry::ProjectionRegistry;
use crate::{Geographic, Hrap, Utm};
use map_common::{MapError, MapResult};
use std::fmt;

/// Canonical family names as they appear in descriptors.
pub const GEOGRAPHIC_NAME: &str = "Geographic";
pub const HRAP_NAME: &str = "HRAP";
pub const UTM_NAME: &str = "UTM";
pub const UNKNOWN_NAME: &str = "Unknown";

/// The closed set of projection families.
#[derive(Debug, Clone, PartialEq)]
pub enum ProjectionKind {
    Geographic(Geographic),
    Hrap(Hrap),
    Utm(Utm),
    /// Sentinel for layers whose projection could not be resolved.
    /// Never requires reprojection against anything.
    Unknown,
}

/// A constructed projection instance.
///
/// Saved configuration round-trips through [`Projection::to_descriptor`]
/// and [`Projection::parse`] so reconstruction always goes back through
/// the registry.
#[derive(Debug, Clone)]
pub struct Projection {
    id: u32,
    pub kind: ProjectionKind,
}

impl Projection {
    pub fn geographic() -> Self {
        Self::from_kind(ProjectionKind::Geographic(Geographic))
    }

    pub fn hrap() -> Self {
        Self::from_kind(ProjectionKind::Hrap(Hrap))
    }

    /// A UTM zone with NAD83 defaults.
    pub fn utm(zone: i32) -> MapResult<Self> {
        Ok(Self::from_kind(ProjectionKind::Utm(Utm::new(zone)?)))
    }

    pub fn unknown() -> Self {
        Self::from_kind(ProjectionKind::Unknown)
    }

    /// Wrap an already-built transform, registering its name.
    pub fn from_kind(kind: ProjectionKind) -> Self {
        let id = ProjectionRegistry::global().register(kind_name(&kind));
        Self { id, kind }
    }

    /// Parse a comma-separated projection descriptor:
    /// `Geographic` | `HRAP` | `Unknown` | `UTM,<zone>[,...]`.
    pub fn parse(descriptor: &str) -> MapResult<Self> {
        let tokens: Vec<&str> = descriptor.split(',').map(str::trim).collect();
        let family = tokens.first().copied().unwrap_or("");
        tracing::debug!(descriptor, "parsing projection descriptor");

        if family.eq_ignore_ascii_case(GEOGRAPHIC_NAME) {
            Ok(Self::geographic())
        } else if family.eq_ignore_ascii_case(HRAP_NAME) {
            Ok(Self::hrap())
        } else if family.eq_ignore_ascii_case(UNKNOWN_NAME) {
            Ok(Self::unknown())
        } else if family.eq_ignore_ascii_case(UTM_NAME) {
            Ok(Self::from_kind(ProjectionKind::Utm(Utm::from_tokens(
                &tokens[1..],
            )?)))
        } else {
            Err(MapError::UnrecognizedProjection(family.to_string()))
        }
    }

    /// Emit the canonical descriptor string; round-trips through
    /// [`Projection::parse`].
    pub fn to_descriptor(&self) -> String {
        match &self.kind {
            ProjectionKind::Geographic(_) => GEOGRAPHIC_NAME.to_string(),
            ProjectionKind::Hrap(_) => HRAP_NAME.to_string(),
            ProjectionKind::Unknown => UNKNOWN_NAME.to_string(),
            ProjectionKind::Utm(utm) => format!(
                "{},{},{},{},{},{},{},{}",
                UTM_NAME,
                utm.zone,
                utm.datum.name(),
                utm.false_easting,
                utm.false_northing,
                utm.lon_center.to_degrees(),
                utm.lat_origin.to_degrees(),
                utm.scale_factor
            ),
        }
    }

    /// Canonical name of the projection family.
    pub fn name(&self) -> &'static str {
        kind_name(&self.kind)
    }

    /// Registry id assigned at construction. Diagnostic only; equality
    /// goes through `==`.
    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self.kind, ProjectionKind::Unknown)
    }

    /// Forward transform: geodetic degrees to projected units.
    pub fn forward(&self, lon: f64, lat: f64) -> MapResult<(f64, f64)> {
        match &self.kind {
            ProjectionKind::Geographic(p) => Ok(p.forward(lon, lat)),
            ProjectionKind::Hrap(p) => Ok(p.forward(lon, lat)),
            ProjectionKind::Utm(p) => p.forward(lon, lat),
            ProjectionKind::Unknown => Ok((lon, lat)),
        }
    }

    /// Inverse transform: projected units to geodetic degrees.
    pub fn inverse(&self, x: f64, y: f64) -> MapResult<(f64, f64)> {
        match &self.kind {
            ProjectionKind::Geographic(p) => Ok(p.inverse(x, y)),
            ProjectionKind::Hrap(p) => Ok(p.inverse(x, y)),
            ProjectionKind::Utm(p) => p.inverse(x, y),
            ProjectionKind::Unknown => Ok((x, y)),
        }
    }

    /// Indicative kilometers per projected unit near a sample point.
    pub fn kilometers_per_unit(&self, x: f64, y: f64) -> f64 {
        match &self.kind {
            ProjectionKind::Geographic(p) => p.kilometers_per_unit(x, y),
            ProjectionKind::Hrap(p) => p.kilometers_per_unit(x, y),
            ProjectionKind::Utm(p) => p.kilometers_per_unit(x, y),
            ProjectionKind::Unknown => 1.0,
        }
    }
}

impl PartialEq for Projection {
    fn eq(&self, other: &Self) -> bool {
        if !self.name().eq_ignore_ascii_case(other.name()) {
            return false;
        }
        match (&self.kind, &other.kind) {
            (ProjectionKind::Utm(a), ProjectionKind::Utm(b)) => {
                a.datum == b.datum && a.zone == b.zone
            }
            _ => true,
        }
    }
}

impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_descriptor())
    }
}

fn kind_name(kind: &ProjectionKind) -> &'static str {
    match kind {
        ProjectionKind::Geographic(_) => GEOGRAPHIC_NAME,
        ProjectionKind::Hrap(_) => HRAP_NAME,
        ProjectionKind::Utm(_) => UTM_NAME,
        ProjectionKind::Unknown => UNKNOWN_NAME,
    }
}

/// Gate used before any reprojection work is attempted: false if either
/// side is absent or unresolvable, or the two projections are equal.
pub fn need_to_project(from: Option<&Projection>, to: Option<&Projection>) -> bool {
    match (from, to) {
        (Some(a), Some(b)) => !a.is_unknown() && !b.is_unknown() && a != b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spheroid::Datum;

    #[test]
    fn test_parse_families() {
        assert!(Projection::parse("Geographic").unwrap().name() == GEOGRAPHIC_NAME);
        assert!(Projection::parse("hrap").unwrap().name() == HRAP_NAME);
        assert!(Projection::parse("UNKNOWN").unwrap().is_unknown());

        let utm = Projection::parse("UTM,19").unwrap();
        assert_eq!(utm.name(), UTM_NAME);
        match &utm.kind {
            ProjectionKind::Utm(p) => {
                assert_eq!(p.zone, 19);
                assert_eq!(p.datum, Datum::Nad83);
            }
            other => panic!("expected UTM, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_failures() {
        assert!(matches!(
            Projection::parse("Bogus"),
            Err(MapError::UnrecognizedProjection(_))
        ));
        assert!(matches!(
            Projection::parse("UTM,61"),
            Err(MapError::InvalidZone(61))
        ));
        assert!(matches!(
            Projection::parse(""),
            Err(MapError::UnrecognizedProjection(_))
        ));
    }

    #[test]
    fn test_descriptor_roundtrip() {
        for descriptor in ["Geographic", "HRAP", "Unknown", "UTM,13", "UTM,-56,NAD27"] {
            let proj = Projection::parse(descriptor).unwrap();
            let reparsed = Projection::parse(&proj.to_descriptor()).unwrap();
            assert_eq!(proj, reparsed, "descriptor {descriptor}");
        }
    }

    #[test]
    fn test_equality_ignores_id() {
        let a = Projection::parse("UTM,13").unwrap();
        let b = Projection::utm(13).unwrap();
        assert_eq!(a, b);

        let c = Projection::utm(14).unwrap();
        assert_ne!(a, c);

        let nad27 = Projection::parse("UTM,13,NAD27").unwrap();
        assert_ne!(a, nad27);
    }

    #[test]
    fn test_need_to_project_gates() {
        let geo = Projection::geographic();
        let hrap = Projection::hrap();
        let unknown = Projection::unknown();

        assert!(!need_to_project(Some(&geo), Some(&geo)));
        assert!(!need_to_project(Some(&geo), None));
        assert!(!need_to_project(None, Some(&geo)));
        assert!(!need_to_project(Some(&unknown), Some(&hrap)));
        assert!(!need_to_project(Some(&geo), Some(&unknown)));
        assert!(need_to_project(Some(&geo), Some(&hrap)));
    }

    #[test]
    fn test_same_name_different_zone_projects() {
        let a = Projection::utm(13).unwrap();
        let b = Projection::utm(14).unwrap();
        assert!(need_to_project(Some(&a), Some(&b)));
    }

    #[test]
    fn test_registry_id_stable_across_constructions() {
        let a = Projection::hrap();
        let b = Projection::parse("HRAP").unwrap();
        assert_eq!(a.id(), b.id());
    }
}
