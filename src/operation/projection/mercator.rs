//! Mercator projections
//!
//! Two variants: the spherical pseudo-Mercator used by web map tiles
//! (EPSG method 1024) and the ellipsoidal Mercator with one standard
//! parallel (EPSG method 9804).

use std::f64::consts::FRAC_PI_4;

use crate::crs::datum::Ellipsoid;
use crate::crs::errors::{GeoError, GeoResult};
use crate::crs::system::ProjectionParams;
use crate::operation::projection::Projection;

/// Latitude bound of the square web-Mercator world
pub const WEB_MERCATOR_MAX_LAT: f64 = 85.051_128_779_806_59;

/// Spherical pseudo-Mercator on the semi-major axis
pub struct WebMercator {
    radius: f64,
    central_meridian: f64,
    false_easting: f64,
    false_northing: f64,
}

impl WebMercator {
    pub fn new(ellipsoid: &Ellipsoid, params: &ProjectionParams) -> Self {
        WebMercator {
            radius: ellipsoid.semi_major,
            central_meridian: params.central_meridian,
            false_easting: params.false_easting,
            false_northing: params.false_northing,
        }
    }
}

impl Projection for WebMercator {
    fn forward(&self, lon: f64, lat: f64) -> GeoResult<(f64, f64)> {
        // Clamp to the square world bound instead of diverging
        let lat = lat.clamp(-WEB_MERCATOR_MAX_LAT, WEB_MERCATOR_MAX_LAT);
        let x = self.radius * (lon - self.central_meridian).to_radians();
        let y = self.radius * (FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln();
        Ok((x + self.false_easting, y + self.false_northing))
    }

    fn inverse(&self, easting: f64, northing: f64) -> GeoResult<(f64, f64)> {
        let x = easting - self.false_easting;
        let y = northing - self.false_northing;
        let lon = (x / self.radius).to_degrees() + self.central_meridian;
        let lat = (2.0 * (y / self.radius).exp().atan() - std::f64::consts::FRAC_PI_2).to_degrees();
        Ok((lon, lat))
    }
}

/// Ellipsoidal Mercator, one standard parallel
pub struct Mercator1Sp {
    semi_major: f64,
    e: f64,
    k0: f64,
    central_meridian: f64,
    false_easting: f64,
    false_northing: f64,
}

impl Mercator1Sp {
    pub fn new(ellipsoid: &Ellipsoid, params: &ProjectionParams) -> Self {
        Mercator1Sp {
            semi_major: ellipsoid.semi_major,
            e: ellipsoid.eccentricity(),
            k0: params.scale_factor,
            central_meridian: params.central_meridian,
            false_easting: params.false_easting,
            false_northing: params.false_northing,
        }
    }

    fn isometric(&self, lat_rad: f64) -> f64 {
        let s = lat_rad.sin();
        let es = self.e * s;
        ((FRAC_PI_4 + lat_rad / 2.0).tan() * ((1.0 - es) / (1.0 + es)).powf(self.e / 2.0)).ln()
    }
}

impl Projection for Mercator1Sp {
    fn forward(&self, lon: f64, lat: f64) -> GeoResult<(f64, f64)> {
        if lat.abs() >= 90.0 {
            return Err(GeoError::Transform(format!(
                "Mercator projection diverges at latitude {}", lat
            )));
        }
        let x = self.semi_major * self.k0 * (lon - self.central_meridian).to_radians();
        let y = self.semi_major * self.k0 * self.isometric(lat.to_radians());
        Ok((x + self.false_easting, y + self.false_northing))
    }

    fn inverse(&self, easting: f64, northing: f64) -> GeoResult<(f64, f64)> {
        let x = easting - self.false_easting;
        let y = northing - self.false_northing;
        let lon = (x / (self.semi_major * self.k0)).to_degrees() + self.central_meridian;
        let t = (-y / (self.semi_major * self.k0)).exp();
        // Fixed-point iteration on the conformal latitude
        let mut lat = std::f64::consts::FRAC_PI_2 - 2.0 * t.atan();
        for _ in 0..15 {
            let es = self.e * lat.sin();
            let next = std::f64::consts::FRAC_PI_2
                - 2.0 * (t * ((1.0 - es) / (1.0 + es)).powf(self.e / 2.0)).atan();
            if (next - lat).abs() < 1e-14 {
                lat = next;
                break;
            }
            lat = next;
        }
        Ok((lon, lat.to_degrees()))
    }
}
