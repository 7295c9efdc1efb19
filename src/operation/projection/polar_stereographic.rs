//! Polar stereographic projection, variant B
//!
//! Parameterized by a standard parallel whose sign selects the aspect:
//! negative parallels project about the south pole, positive about the
//! north pole. Formulas follow EPSG guidance note 7-2 method 9829.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use crate::crs::datum::Ellipsoid;
use crate::crs::errors::{GeoError, GeoResult};
use crate::crs::system::ProjectionParams;
use crate::operation::projection::Projection;

/// Polar stereographic with precomputed scale at the standard parallel
pub struct PolarStereographic {
    semi_major: f64,
    e: f64,
    south: bool,
    /// k0 * 2a / sqrt((1+e)^(1+e) (1-e)^(1-e)), the rho-per-t factor
    rho_factor: f64,
    central_meridian: f64,
    false_easting: f64,
    false_northing: f64,
}

impl PolarStereographic {
    pub fn new(ellipsoid: &Ellipsoid, params: &ProjectionParams) -> GeoResult<Self> {
        let sp = params.standard_parallel;
        if sp.abs() >= 90.0 || sp == 0.0 {
            return Err(GeoError::Factory(format!(
                "Invalid polar stereographic standard parallel: {}", sp
            )));
        }
        let e = ellipsoid.eccentricity();
        let south = sp < 0.0;
        // Work in the north-pole frame; the south aspect mirrors both
        // latitude and the northing axis
        let phi_f = sp.abs().to_radians();
        let sin_f = phi_f.sin();
        let t_f = (FRAC_PI_4 - phi_f / 2.0).tan()
            * ((1.0 + e * sin_f) / (1.0 - e * sin_f)).powf(e / 2.0);
        let m_f = phi_f.cos() / (1.0 - e * e * sin_f * sin_f).sqrt();
        let root = ((1.0 + e).powf(1.0 + e) * (1.0 - e).powf(1.0 - e)).sqrt();
        let k0 = m_f * root / (2.0 * t_f);
        Ok(PolarStereographic {
            semi_major: ellipsoid.semi_major,
            e,
            south,
            rho_factor: 2.0 * ellipsoid.semi_major * k0 / root,
            central_meridian: params.central_meridian,
            false_easting: params.false_easting,
            false_northing: params.false_northing,
        })
    }

    fn t_of(&self, phi: f64) -> f64 {
        let es = self.e * phi.sin();
        (FRAC_PI_4 - phi / 2.0).tan() * ((1.0 + es) / (1.0 - es)).powf(self.e / 2.0)
    }
}

impl Projection for PolarStereographic {
    fn forward(&self, lon: f64, lat: f64) -> GeoResult<(f64, f64)> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(GeoError::Transform(format!(
                "Latitude {} out of range [-90, 90]", lat
            )));
        }
        // Mirror into the north-pole frame for the south aspect
        let phi = if self.south { -lat } else { lat }.to_radians();
        let theta = {
            let d = lon - self.central_meridian;
            if self.south { -d } else { d }.to_radians()
        };
        let rho = self.rho_factor * self.t_of(phi);
        let de = rho * theta.sin();
        let dn = -rho * theta.cos();
        let (de, dn) = if self.south { (-de, -dn) } else { (de, dn) };
        Ok((de + self.false_easting, dn + self.false_northing))
    }

    fn inverse(&self, easting: f64, northing: f64) -> GeoResult<(f64, f64)> {
        let mut de = easting - self.false_easting;
        let mut dn = northing - self.false_northing;
        if self.south {
            de = -de;
            dn = -dn;
        }
        let rho = de.hypot(dn);
        let t = rho / self.rho_factor;
        // Fixed-point iteration on the conformal latitude
        let mut phi = FRAC_PI_2 - 2.0 * t.atan();
        for _ in 0..15 {
            let es = self.e * phi.sin();
            let next =
                FRAC_PI_2 - 2.0 * (t * ((1.0 - es) / (1.0 + es)).powf(self.e / 2.0)).atan();
            if (next - phi).abs() < 1e-14 {
                phi = next;
                break;
            }
            phi = next;
        }
        let theta = if rho == 0.0 { 0.0 } else { de.atan2(-dn) };
        let lat = if self.south { -phi } else { phi }.to_degrees();
        let lon = self.central_meridian
            + if self.south { -theta } else { theta }.to_degrees();
        Ok((lon, lat))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn antarctic() -> PolarStereographic {
        PolarStereographic::new(
            &Ellipsoid::WGS84,
            &ProjectionParams {
                standard_parallel: -71.0,
                ..Default::default()
            },
        )
        .unwrap()
    }

    #[test]
    fn test_south_aspect_equator_point() {
        // (0, 0) lies on the projection plane opposite the pole
        let (x, y) = antarctic().forward(0.0, 0.0).unwrap();
        assert!(x.abs() < 1e-6);
        assert!((y - 12_367_396.218_459_858).abs() < 1e-6);
    }

    #[test]
    fn test_south_pole_maps_to_origin() {
        let (x, y) = antarctic().forward(0.0, -90.0).unwrap();
        assert!(x.abs() < 1e-6);
        assert!(y.abs() < 1e-6);
    }

    #[test]
    fn test_scale_true_at_standard_parallel() {
        // One degree of longitude along the standard parallel should
        // measure very nearly its true ellipsoidal length
        let proj = antarctic();
        let (x1, y1) = proj.forward(0.0, -71.0).unwrap();
        let (x2, y2) = proj.forward(1.0, -71.0).unwrap();
        let chord = (x2 - x1).hypot(y2 - y1);
        let e2 = Ellipsoid::WGS84.eccentricity_squared();
        let sin_lat = (-71.0_f64).to_radians().sin();
        let true_arc = (Ellipsoid::WGS84.semi_major / (1.0 - e2 * sin_lat * sin_lat).sqrt())
            * (-71.0_f64).to_radians().cos().abs()
            * 1.0_f64.to_radians();
        assert!((chord - true_arc).abs() / true_arc < 1e-4);
    }

    #[test]
    fn test_round_trip_south() {
        let proj = antarctic();
        for &(lon, lat) in &[(0.0, -75.0), (90.0, -80.0), (-140.0, -71.0), (45.0, -89.9)] {
            let (x, y) = proj.forward(lon, lat).unwrap();
            let (lon2, lat2) = proj.inverse(x, y).unwrap();
            assert!((lon - lon2).abs() < 1e-9, "lon {} -> {}", lon, lon2);
            assert!((lat - lat2).abs() < 1e-9, "lat {} -> {}", lat, lat2);
        }
    }

    #[test]
    fn test_north_aspect_round_trip() {
        let proj = PolarStereographic::new(
            &Ellipsoid::WGS84,
            &ProjectionParams {
                standard_parallel: 71.0,
                central_meridian: -45.0,
                ..Default::default()
            },
        )
        .unwrap();
        let (x, y) = proj.forward(10.0, 78.0).unwrap();
        let (lon, lat) = proj.inverse(x, y).unwrap();
        assert!((lon - 10.0).abs() < 1e-9);
        assert!((lat - 78.0).abs() < 1e-9);
    }

    #[test]
    fn test_offset_aspect_false_origin() {
        // Australian Antarctic parameters
        let proj = PolarStereographic::new(
            &Ellipsoid::WGS84,
            &ProjectionParams {
                standard_parallel: -71.0,
                central_meridian: 70.0,
                false_easting: 6_000_000.0,
                false_northing: 6_000_000.0,
                ..Default::default()
            },
        )
        .unwrap();
        let (x, y) = proj.forward(70.0, -90.0).unwrap();
        assert!((x - 6_000_000.0).abs() < 1e-6);
        assert!((y - 6_000_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_rejects_equatorial_standard_parallel() {
        assert!(PolarStereographic::new(
            &Ellipsoid::WGS84,
            &ProjectionParams::default()
        )
        .is_err());
    }
}
