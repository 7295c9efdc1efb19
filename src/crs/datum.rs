//! Geodetic datums, ellipsoids and prime meridians

use std::sync::Arc;

use crate::crs::errors::{GeoError, GeoResult};

/// An ellipsoid of revolution approximating the figure of the earth
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    /// Semi-major axis in metres
    pub semi_major: f64,
    /// Inverse flattening (a / (a - b))
    pub inverse_flattening: f64,
}

impl Ellipsoid {
    /// WGS 84 ellipsoid (EPSG:7030)
    pub const WGS84: Ellipsoid = Ellipsoid {
        semi_major: 6_378_137.0,
        inverse_flattening: 298.257_223_563,
    };

    /// GRS 1980 ellipsoid (EPSG:7019)
    pub const GRS80: Ellipsoid = Ellipsoid {
        semi_major: 6_378_137.0,
        inverse_flattening: 298.257_222_101,
    };

    /// International 1924 ellipsoid (EPSG:7022)
    pub const INTERNATIONAL_1924: Ellipsoid = Ellipsoid {
        semi_major: 6_378_388.0,
        inverse_flattening: 297.0,
    };

    /// Clarke 1866 ellipsoid (EPSG:7008)
    pub const CLARKE_1866: Ellipsoid = Ellipsoid {
        semi_major: 6_378_206.4,
        inverse_flattening: 294.978_698_2,
    };

    /// Create an ellipsoid from semi-major axis and inverse flattening
    ///
    /// # Arguments
    /// * `semi_major` - Semi-major axis in metres
    /// * `inverse_flattening` - Inverse flattening, must be > 1
    ///
    /// # Returns
    /// The ellipsoid, or a factory error for malformed parameters
    pub fn new(semi_major: f64, inverse_flattening: f64) -> GeoResult<Self> {
        if !semi_major.is_finite() || semi_major <= 0.0 {
            return Err(GeoError::Factory(format!(
                "Invalid semi-major axis: {}", semi_major
            )));
        }
        if !inverse_flattening.is_finite() || inverse_flattening <= 1.0 {
            return Err(GeoError::Factory(format!(
                "Invalid inverse flattening: {}", inverse_flattening
            )));
        }
        Ok(Ellipsoid { semi_major, inverse_flattening })
    }

    /// Create an ellipsoid from its two semi-axes
    pub fn from_semi_axes(semi_major: f64, semi_minor: f64) -> GeoResult<Self> {
        if !semi_major.is_finite() || !semi_minor.is_finite()
            || semi_minor <= 0.0 || semi_minor >= semi_major
        {
            return Err(GeoError::Factory(format!(
                "Invalid semi-axes: a={}, b={}", semi_major, semi_minor
            )));
        }
        Ok(Ellipsoid {
            semi_major,
            inverse_flattening: semi_major / (semi_major - semi_minor),
        })
    }

    /// Flattening f = 1 / inverse_flattening
    pub fn flattening(&self) -> f64 {
        1.0 / self.inverse_flattening
    }

    /// Semi-minor axis b = a (1 - f)
    pub fn semi_minor(&self) -> f64 {
        self.semi_major * (1.0 - self.flattening())
    }

    /// First eccentricity squared e2 = f (2 - f)
    pub fn eccentricity_squared(&self) -> f64 {
        let f = self.flattening();
        f * (2.0 - f)
    }

    /// First eccentricity
    pub fn eccentricity(&self) -> f64 {
        self.eccentricity_squared().sqrt()
    }

    /// Third flattening n = f / (2 - f)
    pub fn third_flattening(&self) -> f64 {
        let f = self.flattening();
        f / (2.0 - f)
    }

    /// Structural comparison with a small relative tolerance
    pub fn equals_ignore_metadata(&self, other: &Ellipsoid) -> bool {
        (self.semi_major - other.semi_major).abs() < 1e-3
            && (self.inverse_flattening - other.inverse_flattening).abs() < 1e-6
    }
}

/// A prime meridian, expressed as a Greenwich longitude in degrees
#[derive(Debug, Clone, PartialEq)]
pub struct PrimeMeridian {
    /// Meridian name
    pub name: String,
    /// Longitude relative to Greenwich, in degrees, positive east
    pub greenwich_longitude: f64,
}

impl PrimeMeridian {
    /// The Greenwich meridian (EPSG:8901)
    pub fn greenwich() -> Self {
        PrimeMeridian {
            name: "Greenwich".to_string(),
            greenwich_longitude: 0.0,
        }
    }

    /// Structural comparison ignoring the name
    pub fn equals_ignore_metadata(&self, other: &PrimeMeridian) -> bool {
        (self.greenwich_longitude - other.greenwich_longitude).abs() < 1e-9
    }
}

/// Bursa-Wolf parameters: a seven-parameter similarity transform
/// toward WGS 84
///
/// Translations are in metres, rotations in arc-seconds, scale
/// difference in parts per million.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BursaWolf {
    /// X translation (m)
    pub dx: f64,
    /// Y translation (m)
    pub dy: f64,
    /// Z translation (m)
    pub dz: f64,
    /// X rotation (arc-seconds)
    pub ex: f64,
    /// Y rotation (arc-seconds)
    pub ey: f64,
    /// Z rotation (arc-seconds)
    pub ez: f64,
    /// Scale difference (ppm)
    pub ppm: f64,
}

impl BursaWolf {
    /// Translation-only parameters
    pub fn translation(dx: f64, dy: f64, dz: f64) -> Self {
        BursaWolf { dx, dy, dz, ..Default::default() }
    }

    /// Check whether these parameters describe the identity transform
    pub fn is_identity(&self) -> bool {
        self.dx == 0.0 && self.dy == 0.0 && self.dz == 0.0
            && self.ex == 0.0 && self.ey == 0.0 && self.ez == 0.0
            && self.ppm == 0.0
    }
}

/// A geodetic datum: an ellipsoid anchored to the earth
#[derive(Debug, Clone)]
pub struct GeodeticDatum {
    /// Primary datum name
    pub name: String,
    /// Reference ellipsoid
    pub ellipsoid: Ellipsoid,
    /// Prime meridian
    pub prime_meridian: PrimeMeridian,
    /// Transformation toward WGS 84, when published
    pub to_wgs84: Option<BursaWolf>,
    /// Alias names attached by the datum alias index. Shared so that
    /// alias-cache eviction can detect datums still holding a reference.
    pub aliases: Arc<Vec<String>>,
}

impl GeodeticDatum {
    /// Create a datum with no aliases attached
    pub fn new(name: &str, ellipsoid: Ellipsoid, prime_meridian: PrimeMeridian) -> Self {
        GeodeticDatum {
            name: name.to_string(),
            ellipsoid,
            prime_meridian,
            to_wgs84: None,
            aliases: Arc::new(Vec::new()),
        }
    }

    /// Attach Bursa-Wolf parameters
    pub fn with_to_wgs84(mut self, params: BursaWolf) -> Self {
        self.to_wgs84 = Some(params);
        self
    }

    /// The WGS 84 datum
    pub fn wgs84() -> Self {
        GeodeticDatum::new(
            "World Geodetic System 1984",
            Ellipsoid::WGS84,
            PrimeMeridian::greenwich(),
        )
        .with_to_wgs84(BursaWolf::default())
    }

    /// Check whether a name matches this datum's primary name or any alias
    pub fn is_known_as(&self, name: &str) -> bool {
        let key = normalize_datum_name(name);
        if normalize_datum_name(&self.name) == key {
            return true;
        }
        self.aliases.iter().any(|a| normalize_datum_name(a) == key)
    }

    /// Structural comparison: same ellipsoid and prime meridian, and
    /// either matching names/aliases or matching shift parameters
    pub fn equals_ignore_metadata(&self, other: &GeodeticDatum) -> bool {
        if !self.ellipsoid.equals_ignore_metadata(&other.ellipsoid) {
            return false;
        }
        if !self.prime_meridian.equals_ignore_metadata(&other.prime_meridian) {
            return false;
        }
        self.is_known_as(&other.name) || other.is_known_as(&self.name)
            || self.to_wgs84 == other.to_wgs84
    }
}

/// Normalize a datum name for alias matching: fold case and drop
/// punctuation, spaces and underscores
pub fn normalize_datum_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(|c| c.to_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wgs84_derived_parameters() {
        let e = Ellipsoid::WGS84;
        assert!((e.semi_minor() - 6_356_752.314_245).abs() < 1e-3);
        assert!((e.eccentricity_squared() - 0.006_694_379_990_14).abs() < 1e-12);
    }

    #[test]
    fn test_malformed_ellipsoid() {
        assert!(Ellipsoid::new(f64::NAN, 298.0).is_err());
        assert!(Ellipsoid::new(6378137.0, 0.5).is_err());
        assert!(Ellipsoid::new(-1.0, 298.0).is_err());
        assert!(Ellipsoid::from_semi_axes(6378137.0, 6378138.0).is_err());
    }

    #[test]
    fn test_name_normalization() {
        assert_eq!(normalize_datum_name("WGS_1984"), "wgs1984");
        assert_eq!(normalize_datum_name("WGS 1984"), "wgs1984");
        assert_eq!(normalize_datum_name("D_WGS-1984"), "dwgs1984");
    }

    #[test]
    fn test_bursa_wolf_identity() {
        assert!(BursaWolf::default().is_identity());
        assert!(!BursaWolf::translation(-8.0, 160.0, 176.0).is_identity());
    }
}
