//! Geocentric conversion and Bursa-Wolf datum shift
//!
//! Datum shifts run through earth-centred cartesian space: geographic
//! coordinates are converted to geocentric X/Y/Z on the source
//! ellipsoid, shifted by the seven-parameter similarity transform, and
//! converted back on the target ellipsoid. Heights are taken as zero on
//! the way in and discarded on the way out.

use std::f64::consts::PI;
use std::sync::Arc;

use crate::crs::datum::{BursaWolf, Ellipsoid};
use crate::crs::errors::{GeoError, GeoResult};
use crate::operation::transform::{check_dimension, MathTransform};

const ARC_SECOND_TO_RADIAN: f64 = PI / (180.0 * 3600.0);

/// Geographic (lon, lat) degrees to geocentric (X, Y, Z) metres
pub struct GeocentricTransform {
    semi_major: f64,
    e2: f64,
    forward: bool,
}

impl GeocentricTransform {
    /// Geographic-to-geocentric on the given ellipsoid
    pub fn forward(ellipsoid: &Ellipsoid) -> Arc<Self> {
        Arc::new(GeocentricTransform {
            semi_major: ellipsoid.semi_major,
            e2: ellipsoid.eccentricity_squared(),
            forward: true,
        })
    }

    /// Geocentric-to-geographic on the given ellipsoid
    pub fn backward(ellipsoid: &Ellipsoid) -> Arc<Self> {
        Arc::new(GeocentricTransform {
            semi_major: ellipsoid.semi_major,
            e2: ellipsoid.eccentricity_squared(),
            forward: false,
        })
    }

    fn to_geocentric(&self, lon: f64, lat: f64) -> GeoResult<Vec<f64>> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(GeoError::Transform(format!(
                "Latitude {} out of range [-90, 90]", lat
            )));
        }
        let phi = lat.to_radians();
        let lam = lon.to_radians();
        let sin_phi = phi.sin();
        let nu = self.semi_major / (1.0 - self.e2 * sin_phi * sin_phi).sqrt();
        Ok(vec![
            nu * phi.cos() * lam.cos(),
            nu * phi.cos() * lam.sin(),
            nu * (1.0 - self.e2) * sin_phi,
        ])
    }

    fn to_geographic(&self, x: f64, y: f64, z: f64) -> Vec<f64> {
        let p = x.hypot(y);
        let lon = y.atan2(x);
        // Fixed-point iteration on the latitude; converges in a handful
        // of rounds for points near the ellipsoid surface
        let mut phi = z.atan2(p * (1.0 - self.e2));
        for _ in 0..10 {
            let sin_phi = phi.sin();
            let nu = self.semi_major / (1.0 - self.e2 * sin_phi * sin_phi).sqrt();
            let next = (z + self.e2 * nu * sin_phi).atan2(p);
            if (next - phi).abs() < 1e-14 {
                phi = next;
                break;
            }
            phi = next;
        }
        vec![lon.to_degrees(), phi.to_degrees()]
    }
}

impl MathTransform for GeocentricTransform {
    fn source_dimensions(&self) -> usize {
        if self.forward { 2 } else { 3 }
    }

    fn target_dimensions(&self) -> usize {
        if self.forward { 3 } else { 2 }
    }

    fn transform_point(&self, point: &[f64]) -> GeoResult<Vec<f64>> {
        if self.forward {
            check_dimension(point, 2)?;
            self.to_geocentric(point[0], point[1])
        } else {
            check_dimension(point, 3)?;
            Ok(self.to_geographic(point[0], point[1], point[2]))
        }
    }

    fn inverse(&self) -> GeoResult<Arc<dyn MathTransform>> {
        Ok(Arc::new(GeocentricTransform {
            semi_major: self.semi_major,
            e2: self.e2,
            forward: !self.forward,
        }))
    }
}

/// Seven-parameter similarity transform in geocentric space
/// (position vector rotation convention, EPSG method 9606)
pub struct BursaWolfTransform {
    params: BursaWolf,
    inverted: bool,
}

impl BursaWolfTransform {
    pub fn new(params: BursaWolf) -> Arc<Self> {
        Arc::new(BursaWolfTransform { params, inverted: false })
    }
}

impl MathTransform for BursaWolfTransform {
    fn source_dimensions(&self) -> usize {
        3
    }

    fn target_dimensions(&self) -> usize {
        3
    }

    fn transform_point(&self, point: &[f64]) -> GeoResult<Vec<f64>> {
        check_dimension(point, 3)?;
        let sign = if self.inverted { -1.0 } else { 1.0 };
        let rx = sign * self.params.ex * ARC_SECOND_TO_RADIAN;
        let ry = sign * self.params.ey * ARC_SECOND_TO_RADIAN;
        let rz = sign * self.params.ez * ARC_SECOND_TO_RADIAN;
        let scale = 1.0 + sign * self.params.ppm * 1e-6;
        let (x, y, z) = (point[0], point[1], point[2]);
        Ok(vec![
            scale * (x - rz * y + ry * z) + sign * self.params.dx,
            scale * (rz * x + y - rx * z) + sign * self.params.dy,
            scale * (-ry * x + rx * y + z) + sign * self.params.dz,
        ])
    }

    fn inverse(&self) -> GeoResult<Arc<dyn MathTransform>> {
        Ok(Arc::new(BursaWolfTransform {
            params: self.params,
            inverted: !self.inverted,
        }))
    }

    fn is_identity(&self) -> bool {
        self.params.is_identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geocentric_known_points() {
        let fwd = GeocentricTransform::forward(&Ellipsoid::WGS84);
        let origin = fwd.transform_point(&[0.0, 0.0]).unwrap();
        assert!((origin[0] - 6_378_137.0).abs() < 1e-6);
        assert!(origin[1].abs() < 1e-6);
        assert!(origin[2].abs() < 1e-6);
        let pole = fwd.transform_point(&[0.0, 90.0]).unwrap();
        assert!(pole[0].abs() < 1e-6);
        assert!((pole[2] - 6_356_752.314_245_179).abs() < 1e-6);
    }

    #[test]
    fn test_geocentric_round_trip() {
        let fwd = GeocentricTransform::forward(&Ellipsoid::WGS84);
        let back = fwd.inverse().unwrap();
        for &(lon, lat) in &[(2.3, 48.8), (-70.7, -33.4), (151.2, -33.9), (0.0, -89.99)] {
            let xyz = fwd.transform_point(&[lon, lat]).unwrap();
            let ll = back.transform_point(&xyz).unwrap();
            assert!((ll[0] - lon).abs() < 1e-10);
            assert!((ll[1] - lat).abs() < 1e-10);
        }
    }

    #[test]
    fn test_bursa_wolf_translation() {
        let shift = BursaWolfTransform::new(BursaWolf::translation(-8.0, 160.0, 176.0));
        let out = shift.transform_point(&[1000.0, 2000.0, 3000.0]).unwrap();
        assert_eq!(out, vec![992.0, 2160.0, 3176.0]);
    }

    #[test]
    fn test_bursa_wolf_inverse_round_trip() {
        let params = BursaWolf {
            dx: 84.87, dy: 96.49, dz: 116.95,
            ex: 0.1, ey: 0.2, ez: 0.3,
            ppm: 1.5,
        };
        let shift = BursaWolfTransform::new(params);
        let inverse = shift.inverse().unwrap();
        let point = [4_000_000.0, 1_000_000.0, 4_700_000.0];
        let shifted = shift.transform_point(&point).unwrap();
        let restored = inverse.transform_point(&shifted).unwrap();
        // Negated-parameter inverse is approximate; error stays far
        // below the accuracy of any published Bursa-Wolf set
        for i in 0..3 {
            assert!((restored[i] - point[i]).abs() < 1e-4);
        }
    }

    #[test]
    fn test_identity_shift() {
        assert!(BursaWolfTransform::new(BursaWolf::default()).is_identity());
    }
}
