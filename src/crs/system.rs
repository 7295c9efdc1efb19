//! Coordinate reference system model

use crate::crs::axis::{Axis, AxisDirection};
use crate::crs::datum::GeodeticDatum;

/// An authority identifier, e.g. ("EPSG", "4326")
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier {
    /// Authority name, upper case
    pub authority: String,
    /// Code within the authority namespace
    pub code: String,
}

impl Identifier {
    /// Create a new identifier; the authority token is case-insensitive
    pub fn new(authority: &str, code: &str) -> Self {
        Identifier {
            authority: authority.to_uppercase(),
            code: code.to_string(),
        }
    }
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.authority, self.code)
    }
}

/// Map projection method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectionMethod {
    /// Spherical pseudo-Mercator (EPSG method 1024)
    WebMercator,
    /// Ellipsoidal Mercator, one standard parallel (EPSG method 9804)
    Mercator1SP,
    /// Transverse Mercator (EPSG method 9807)
    TransverseMercator,
    /// Polar stereographic, variant B (EPSG method 9829)
    PolarStereographic,
}

impl ProjectionMethod {
    /// WKT projection name
    pub fn wkt_name(&self) -> &'static str {
        match self {
            ProjectionMethod::WebMercator => "Popular Visualisation Pseudo Mercator",
            ProjectionMethod::Mercator1SP => "Mercator_1SP",
            ProjectionMethod::TransverseMercator => "Transverse_Mercator",
            ProjectionMethod::PolarStereographic => "Polar_Stereographic",
        }
    }
}

/// Map projection parameters
///
/// Not every method reads every field; unused fields keep their
/// defaults of zero (scale factor defaults to one).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionParams {
    /// Latitude of natural origin, degrees
    pub latitude_of_origin: f64,
    /// Longitude of natural origin / central meridian, degrees
    pub central_meridian: f64,
    /// Latitude of standard parallel, degrees (polar stereographic B)
    pub standard_parallel: f64,
    /// Scale factor at natural origin
    pub scale_factor: f64,
    /// False easting, metres
    pub false_easting: f64,
    /// False northing, metres
    pub false_northing: f64,
}

impl Default for ProjectionParams {
    fn default() -> Self {
        ProjectionParams {
            latitude_of_origin: 0.0,
            central_meridian: 0.0,
            standard_parallel: 0.0,
            scale_factor: 1.0,
            false_easting: 0.0,
            false_northing: 0.0,
        }
    }
}

impl ProjectionParams {
    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    /// Structural comparison with numeric tolerance
    pub fn equals_ignore_metadata(&self, other: &ProjectionParams) -> bool {
        Self::close(self.latitude_of_origin, other.latitude_of_origin)
            && Self::close(self.central_meridian, other.central_meridian)
            && Self::close(self.standard_parallel, other.standard_parallel)
            && Self::close(self.scale_factor, other.scale_factor)
            && Self::close(self.false_easting, other.false_easting)
            && Self::close(self.false_northing, other.false_northing)
    }
}

/// A fully specified map projection
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionSpec {
    /// Projection method
    pub method: ProjectionMethod,
    /// Method parameters
    pub params: ProjectionParams,
}

impl ProjectionSpec {
    /// Structural comparison
    pub fn equals_ignore_metadata(&self, other: &ProjectionSpec) -> bool {
        self.method == other.method && self.params.equals_ignore_metadata(&other.params)
    }
}

/// Kind of coordinate system backing a CRS
#[derive(Debug, Clone)]
pub enum CrsKind {
    /// Ellipsoidal latitude/longitude
    Geographic,
    /// Cartesian plane produced by a map projection
    Projected(ProjectionSpec),
    /// Gravity-related height or depth
    Vertical,
    /// Local engineering grid with no earth anchor
    Engineering,
    /// Concatenation of component systems
    Compound(Vec<Crs>),
}

/// A coordinate reference system
///
/// Two CRS built from the same authority code but under different
/// axis-order policies are distinct objects and do not compare equal
/// under `equals_ignore_metadata`, even though they share the same
/// authority definition.
#[derive(Debug, Clone)]
pub struct Crs {
    /// Authority identifier, when the CRS came from an authority
    pub identifier: Option<Identifier>,
    /// CRS name
    pub name: String,
    /// Coordinate system kind
    pub kind: CrsKind,
    /// Ordered axis sequence; order is semantically load-bearing
    pub axes: Vec<Axis>,
    /// Backing datum
    pub datum: GeodeticDatum,
}

impl Crs {
    /// Number of dimensions
    pub fn dimension(&self) -> usize {
        self.axes.len()
    }

    /// Axis at the given index
    pub fn axis(&self, index: usize) -> Option<&Axis> {
        self.axes.get(index)
    }

    /// Check whether this is a geographic CRS
    pub fn is_geographic(&self) -> bool {
        matches!(self.kind, CrsKind::Geographic)
    }

    /// Check whether this is a projected CRS
    pub fn is_projected(&self) -> bool {
        matches!(self.kind, CrsKind::Projected(_))
    }

    /// The projection spec, for projected CRS
    pub fn projection(&self) -> Option<&ProjectionSpec> {
        match &self.kind {
            CrsKind::Projected(spec) => Some(spec),
            _ => None,
        }
    }

    /// Index of the first axis pointing east or west, if any
    pub fn east_axis_index(&self) -> Option<usize> {
        self.axes.iter().position(|a| {
            matches!(a.direction, AxisDirection::East | AxisDirection::West)
        })
    }

    /// Return a copy with the first two axes swapped
    ///
    /// Used by the decoder when forcing east/longitude-first order.
    /// The identifier is preserved: the result still answers to the
    /// same authority code, under a different axis policy.
    pub fn with_swapped_axes(&self) -> Crs {
        let mut swapped = self.clone();
        if swapped.axes.len() >= 2 {
            swapped.axes.swap(0, 1);
        }
        swapped
    }

    /// Structural comparison ignoring names and identifiers but NOT
    /// axis order
    pub fn equals_ignore_metadata(&self, other: &Crs) -> bool {
        if self.axes.len() != other.axes.len() {
            return false;
        }
        for (a, b) in self.axes.iter().zip(other.axes.iter()) {
            if !a.equals_ignore_metadata(b) {
                return false;
            }
        }
        let kinds_match = match (&self.kind, &other.kind) {
            (CrsKind::Geographic, CrsKind::Geographic) => true,
            (CrsKind::Projected(a), CrsKind::Projected(b)) => a.equals_ignore_metadata(b),
            (CrsKind::Vertical, CrsKind::Vertical) => true,
            (CrsKind::Engineering, CrsKind::Engineering) => true,
            (CrsKind::Compound(a), CrsKind::Compound(b)) => {
                a.len() == b.len()
                    && a.iter().zip(b.iter()).all(|(x, y)| x.equals_ignore_metadata(y))
            }
            _ => false,
        };
        kinds_match && self.datum.equals_ignore_metadata(&other.datum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crs::datum::GeodeticDatum;

    fn wgs84_geographic() -> Crs {
        Crs {
            identifier: Some(Identifier::new("epsg", "4326")),
            name: "WGS 84".to_string(),
            kind: CrsKind::Geographic,
            axes: vec![Axis::latitude(), Axis::longitude()],
            datum: GeodeticDatum::wgs84(),
        }
    }

    #[test]
    fn test_identifier_uppercases_authority() {
        let id = Identifier::new("epsg", "4326");
        assert_eq!(id.authority, "EPSG");
        assert_eq!(id.to_string(), "EPSG:4326");
    }

    #[test]
    fn test_axis_swap_changes_structural_equality() {
        let crs = wgs84_geographic();
        let swapped = crs.with_swapped_axes();
        assert!(!crs.equals_ignore_metadata(&swapped));
        assert_eq!(swapped.axes[0].abbreviation, "Lon");
        assert_eq!(swapped.identifier, crs.identifier);
    }

    #[test]
    fn test_structural_equality_ignores_names() {
        let a = wgs84_geographic();
        let mut b = wgs84_geographic();
        b.name = "WGS 1984 (renamed)".to_string();
        b.identifier = None;
        assert!(a.equals_ignore_metadata(&b));
    }
}
