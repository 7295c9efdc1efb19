//! Geodetic calculations on an ellipsoid
//!
//! Solves the direct problem (destination from start, azimuth and
//! distance) and the inverse problem (azimuth and distance between two
//! points) with the NOAA NGS formulations: modified Rainsford's method
//! with Helmert's elliptical terms, effective at any azimuth and
//! distance short of antipodal. Near-antipodal pairs and the rare
//! non-converging geometries fall back to a spherical solution and are
//! flagged imprecise instead of failing.
//!
//! A calculator instance is not thread-safe; create one per thread.

use std::f64::consts::PI;

use log::warn;

use crate::crs::datum::Ellipsoid;
use crate::crs::errors::{GeoError, GeoResult};
use crate::utils::angles::cast_to_angle_range;

// Tolerance factors from the strictest to the most relaxed
const TOLERANCE_0: f64 = 5.0e-15;
const TOLERANCE_1: f64 = 5.0e-14;
const TOLERANCE_2: f64 = 5.0e-13;
const TOLERANCE_3: f64 = 7.0e-3;

/// Geodetic solver bound to one ellipsoid
pub struct GeodeticCalculator {
    ellipsoid: Ellipsoid,
    semi_major: f64,
    semi_minor: f64,
    eccentricity_squared: f64,
    max_orthodromic_distance: f64,

    // Meridian arc series coefficients (GPNARC)
    ma: f64,
    mb: f64,
    mc: f64,
    md: f64,
    me: f64,
    mf: f64,

    // Inverse problem coefficients (GPNHRI)
    fo: f64,
    f: f64,
    t1: f64,
    t2: f64,
    t4: f64,
    t6: f64,
    a01: f64,
    a02: f64,
    a03: f64,
    a21: f64,
    a22: f64,
    a23: f64,
    a42: f64,
    a43: f64,
    a63: f64,

    // Positions and direction, in radians
    lat1: f64,
    lon1: f64,
    lat2: f64,
    lon2: f64,
    distance: f64,
    azimuth: f64,

    destination_valid: bool,
    direction_valid: bool,
    /// False when the last solution came from the spherical fallback
    /// or a near-antipodal geometry
    precise: bool,
}

impl GeodeticCalculator {
    /// Create a calculator for the WGS 84 ellipsoid
    pub fn wgs84() -> Self {
        // The WGS 84 constant always passes validation
        GeodeticCalculator::new(Ellipsoid::WGS84).unwrap()
    }

    /// Create a calculator for an ellipsoid
    pub fn new(ellipsoid: Ellipsoid) -> GeoResult<Self> {
        // Re-validate: the ellipsoid may have been built from raw parts
        let ellipsoid = Ellipsoid::new(ellipsoid.semi_major, ellipsoid.inverse_flattening)?;
        let semi_major = ellipsoid.semi_major;
        let semi_minor = ellipsoid.semi_minor();
        let f = (semi_major - semi_minor) / semi_major;
        let fo = 1.0 - f;
        let f2 = f * f;
        let f3 = f * f2;
        let f4 = f * f3;
        let e2 = f * (2.0 - f);
        let e4 = e2 * e2;
        let e6 = e4 * e2;
        let e8 = e6 * e2;
        let ex = e8 * e2;

        let ma = 1.0 + 0.75 * e2 + 0.703125 * e4 + 0.68359375 * e6
            + 0.67291259765625 * e8 + 0.6661834716796875 * ex;
        let mb = 0.75 * e2 + 0.9375 * e4 + 1.025390625 * e6
            + 1.07666015625 * e8 + 1.1103057861328125 * ex;
        let mc = 0.234375 * e4 + 0.41015625 * e6 + 0.538330078125 * e8
            + 0.63446044921875 * ex;
        let md = 0.068359375 * e6 + 0.15380859375 * e8 + 0.23792266845703125 * ex;
        let me = 0.01922607421875 * e8 + 0.0528717041015625 * ex;
        let mf = 0.00528717041015625 * ex;

        let a = f3 * (1.0 + 2.25 * f);
        Ok(GeodeticCalculator {
            ellipsoid,
            semi_major,
            semi_minor,
            eccentricity_squared: e2,
            max_orthodromic_distance: semi_major * (1.0 - e2) * PI * ma - 1.0,
            ma,
            mb,
            mc,
            md,
            me,
            mf,
            fo,
            f,
            t1: 1.0,
            t2: -0.25 * f * (1.0 + f + f2),
            t4: 0.1875 * f2 * (1.0 + 2.25 * f),
            t6: 0.1953125 * f3,
            a01: -f2 * (1.0 + f + f2) / 4.0,
            a02: 0.1875 * a,
            a03: -0.1953125 * f4,
            a21: f2 * (1.0 + f + f2) / 4.0,
            a22: -0.25 * a,
            a23: 0.29296875 * f4,
            a42: 0.03125 * a,
            a43: 0.05859375 * f4,
            a63: 5.0 * f4 / 768.0,
            lat1: 0.0,
            lon1: 0.0,
            lat2: 0.0,
            lon2: 0.0,
            distance: 0.0,
            azimuth: 0.0,
            destination_valid: false,
            direction_valid: false,
            precise: true,
        })
    }

    /// The ellipsoid all calculations refer to
    pub fn ellipsoid(&self) -> &Ellipsoid {
        &self.ellipsoid
    }

    /// Longest distance this ellipsoid can express, just short of the
    /// antipodal meridian arc
    pub fn max_orthodromic_distance(&self) -> f64 {
        self.max_orthodromic_distance
    }

    /// Whether the last solution is fully precise
    ///
    /// False after a spherical fallback or a near-antipodal inverse
    /// solution.
    pub fn is_precise(&self) -> bool {
        self.precise
    }

    /// Set the starting point
    ///
    /// # Arguments
    /// * `lon` - Longitude in decimal degrees, [-180, 180]
    /// * `lat` - Latitude in decimal degrees, [-90, 90]
    pub fn set_start(&mut self, lon: f64, lat: f64) -> GeoResult<()> {
        let lat = check_latitude(lat)?;
        let lon = check_longitude(lon)?;
        self.lat1 = lat;
        self.lon1 = lon;
        self.destination_valid = false;
        self.direction_valid = false;
        Ok(())
    }

    /// Set the destination point, invalidating any previously set
    /// direction
    pub fn set_destination(&mut self, lon: f64, lat: f64) -> GeoResult<()> {
        let lat = check_latitude(lat)?;
        let lon = check_longitude(lon)?;
        self.lat2 = lat;
        self.lon2 = lon;
        self.destination_valid = true;
        self.direction_valid = false;
        Ok(())
    }

    /// Set the azimuth and distance, invalidating any previously set
    /// destination
    ///
    /// # Arguments
    /// * `azimuth` - Azimuth in decimal degrees clockwise from north,
    ///   [-180, 180]
    /// * `distance` - Orthodromic distance in metres
    pub fn set_direction(&mut self, azimuth: f64, distance: f64) -> GeoResult<()> {
        let azimuth = check_azimuth(azimuth)?;
        if !(distance >= 0.0 && distance <= self.max_orthodromic_distance) {
            return Err(GeoError::Transform(format!(
                "Distance {} out of range [0, {}]",
                distance, self.max_orthodromic_distance
            )));
        }
        self.azimuth = azimuth;
        self.distance = distance;
        self.destination_valid = false;
        self.direction_valid = true;
        Ok(())
    }

    /// The starting point as (longitude, latitude) in degrees
    pub fn start(&self) -> (f64, f64) {
        (self.lon1.to_degrees(), self.lat1.to_degrees())
    }

    /// The azimuth from start to destination, degrees clockwise from
    /// north in [-180, 180]
    pub fn azimuth(&mut self) -> GeoResult<f64> {
        if !self.direction_valid {
            self.compute_direction()?;
        }
        Ok(self.azimuth.to_degrees())
    }

    /// The orthodromic distance from start to destination, metres
    pub fn orthodromic_distance(&mut self) -> GeoResult<f64> {
        if !self.direction_valid {
            self.compute_direction()?;
        }
        Ok(self.distance)
    }

    /// The destination point as (longitude, latitude) in degrees
    pub fn destination(&mut self) -> GeoResult<(f64, f64)> {
        if !self.destination_valid {
            self.compute_destination()?;
        }
        Ok((self.lon2.to_degrees(), self.lat2.to_degrees()))
    }

    /// Vertices of the geodesic path from start to destination
    ///
    /// Returns `segments + 1` points including both endpoints, as
    /// (longitude, latitude) degree pairs.
    pub fn path(&mut self, segments: usize) -> GeoResult<Vec<(f64, f64)>> {
        if segments == 0 {
            return Err(GeoError::Transform(
                "Path needs at least one segment".to_string(),
            ));
        }
        if !self.direction_valid {
            self.compute_direction()?;
        }
        if !self.destination_valid {
            self.compute_destination()?;
        }
        let (lat2, lon2, total) = (self.lat2, self.lon2, self.distance);
        let mut path = Vec::with_capacity(segments + 1);
        path.push((self.lon1.to_degrees(), self.lat1.to_degrees()));
        for i in 1..segments {
            self.distance = total * i as f64 / segments as f64;
            self.compute_destination()?;
            path.push((self.lon2.to_degrees(), self.lat2.to_degrees()));
        }
        self.lat2 = lat2;
        self.lon2 = lon2;
        self.distance = total;
        path.push((lon2.to_degrees(), lat2.to_degrees()));
        Ok(path)
    }

    /// The meridian arc length between two latitudes, in metres
    ///
    /// # Arguments
    /// * `latitude1` - First latitude in decimal degrees
    /// * `latitude2` - Second latitude in decimal degrees
    pub fn meridian_arc_length(&self, latitude1: f64, latitude2: f64) -> GeoResult<f64> {
        Ok(self.meridian_arc_radians(check_latitude(latitude1)?, check_latitude(latitude2)?))
    }

    // NOAA NGS subroutine GPNARC
    fn meridian_arc_radians(&self, p1: f64, p2: f64) -> f64 {
        let s1 = p1.abs();
        let mut s2 = p2.abs();
        let da = p2 - p1;
        // Check for a 90 degree lookup
        if s1 > TOLERANCE_0
            || s2 <= PI / 2.0 - TOLERANCE_0
            || s2 >= PI / 2.0 + TOLERANCE_0
        {
            let db = (p2 * 2.0).sin() - (p1 * 2.0).sin();
            let dc = (p2 * 4.0).sin() - (p1 * 4.0).sin();
            let dd = (p2 * 6.0).sin() - (p1 * 6.0).sin();
            let de = (p2 * 8.0).sin() - (p1 * 8.0).sin();
            let df = (p2 * 10.0).sin() - (p1 * 10.0).sin();
            s2 = -db * self.mb / 2.0 + dc * self.mc / 4.0 - dd * self.md / 6.0
                + de * self.me / 8.0 - df * self.mf / 10.0;
        } else {
            s2 = 0.0;
        }
        let s1 = da * self.ma;
        (self.semi_major * (1.0 - self.eccentricity_squared) * (s1 + s2)).abs()
    }

    // Direct problem: NOAA NGS subroutine DIRECT1, T. Vincenty's
    // modified Rainsford method with Helmert's elliptical terms
    fn compute_destination(&mut self) -> GeoResult<()> {
        if !self.direction_valid {
            return Err(GeoError::Transform(
                "Direction not set: call set_direction first".to_string(),
            ));
        }
        let (lat1, lon1, azimuth, distance) = (self.lat1, self.lon1, self.azimuth, self.distance);
        let mut tu = self.fo * lat1.sin() / lat1.cos();
        let sf = azimuth.sin();
        let cf = azimuth.cos();
        let mut baz = if cf != 0.0 { tu.atan2(cf) * 2.0 } else { 0.0 };
        let cu = 1.0 / (tu * tu + 1.0).sqrt();
        let su = tu * cu;
        let sa = cu * sf;
        let c2a = 1.0 - sa * sa;
        let mut x = ((1.0 / self.fo / self.fo - 1.0) * c2a + 1.0).sqrt() + 1.0;
        x = (x - 2.0) / x;
        let mut c = 1.0 - x;
        c = (x * x / 4.0 + 1.0) / c;
        let d = (0.375 * x * x - 1.0) * x;
        tu = distance / self.fo / self.semi_major / c;
        let mut y = tu;
        let (mut sy, mut cy, mut cz, mut e);
        loop {
            sy = y.sin();
            cy = y.cos();
            cz = (baz + y).cos();
            e = cz * cz * 2.0 - 1.0;
            c = y;
            x = e * cy;
            y = e + e - 1.0;
            y = (((sy * sy * 4.0 - 3.0) * y * cz * d / 6.0 + x) * d / 4.0 - cz) * sy * d + tu;
            if (y - c).abs() <= TOLERANCE_1 {
                break;
            }
        }
        baz = cu * cy * cf - su * sy;
        c = self.fo * sa.hypot(baz);
        let d2 = su * cy + cu * sy * cf;
        self.lat2 = d2.atan2(c);
        c = cu * cy - su * sy * cf;
        x = (sy * sf).atan2(c);
        c = ((-3.0 * c2a + 4.0) * self.f + 4.0) * c2a * self.f / 16.0;
        let d3 = ((e * cy * c + cz) * sy * c + y) * sa;
        self.lon2 = cast_to_angle_range(lon1 + x - (1.0 - c) * d3 * self.f);
        self.destination_valid = true;
        Ok(())
    }

    // Inverse problem: NOAA NGS subroutine GPNHRI
    fn compute_direction(&mut self) -> GeoResult<()> {
        if !self.destination_valid {
            return Err(GeoError::Transform(
                "Destination not set: call set_destination first".to_string(),
            ));
        }
        let (lon1, lat1, lon2, lat2) = (self.lon1, self.lat1, self.lon2, self.lat2);
        self.precise = true;
        let dlon = cast_to_angle_range(lon2 - lon1);
        let ss = dlon.abs();
        if ss < TOLERANCE_1 {
            // Same meridian
            self.distance = self.meridian_arc_radians(lat1, lat2);
            self.azimuth = if lat2 > lat1 { 0.0 } else { PI };
            self.direction_valid = true;
            return Ok(());
        }
        let antipodal = (PI - ss < 2.0 * TOLERANCE_3) && ((lat1 + lat2).abs() < 2.0 * TOLERANCE_3);

        let esqp = self.eccentricity_squared / (1.0 - self.eccentricity_squared);
        // Longitude limit: twice the pole distance measured along the
        // equator
        let alimit = PI * self.fo;
        if ss >= alimit && lat1.abs() < TOLERANCE_3 && lat2.abs() < TOLERANCE_3 {
            // Both points near the equator, nearly antinodal in
            // longitude: the geodesic leaves the equator
            let cons = (PI - ss) / (PI * self.f);
            let mut az = cons.asin();
            let mut ao = 0.0;
            let mut s;
            let mut converged = false;
            for _ in 0..8 {
                s = az.cos();
                let c2 = s * s;
                ao = self.t1 + self.t2 * c2 + self.t4 * c2 * c2 + self.t6 * c2 * c2 * c2;
                let cs = cons / ao;
                s = cs.asin();
                let previous = az;
                az = s;
                if (s - previous).abs() < TOLERANCE_2 {
                    converged = true;
                    break;
                }
            }
            if !converged {
                return self.spherical_fallback();
            }
            let az1 = if dlon < 0.0 { 2.0 * PI - az } else { az };
            self.azimuth = cast_to_angle_range(az1);
            let s = az1.cos();
            let u2 = esqp * s * s;
            let u4 = u2 * u2;
            let u6 = u4 * u2;
            let u8 = u6 * u2;
            let bo = 1.0 + 0.25 * u2 + 0.046875 * u4 + 0.01953125 * u6
                - 0.01068115234375 * u8;
            let s = az1.sin();
            let sms = self.semi_major * PI * (1.0 - self.f * s.abs() * ao - bo * self.fo);
            self.distance = self.semi_major * ss - sms;
            self.direction_valid = true;
            if antipodal {
                warn!("Inverse solution is inaccurate for near-antipodal points");
                self.precise = false;
            }
            return Ok(());
        }

        // Reduced latitudes
        let u1 = (self.fo * lat1.sin() / lat1.cos()).atan();
        let u2 = (self.fo * lat2.sin() / lat2.cos()).atan();
        let su1 = u1.sin();
        let cu1 = u1.cos();
        let su2 = u2.sin();
        let cu2 = u2.cos();
        let mut ab = dlon;
        let (mut w, mut ssig, mut sig, mut sinalf) = (0.0, 0.0, 0.0, 0.0);
        let (mut q2, mut q4, mut q6, mut r2, mut r3) = (0.0, 0.0, 0.0, 0.0, 0.0);
        let mut clon;
        let mut slon = 0.0;
        let mut converged = false;
        for _ in 0..8 {
            clon = ab.cos();
            slon = ab.sin();
            let csig = su1 * su2 + cu1 * cu2 * clon;
            ssig = (slon * cu2).hypot(su2 * cu1 - su1 * cu2 * clon);
            sig = ssig.atan2(csig);
            sinalf = cu1 * cu2 * slon / ssig;
            w = 1.0 - sinalf * sinalf;
            let t4 = w * w;
            let t6 = w * t4;

            let ao = self.f + self.a01 * w + self.a02 * t4 + self.a03 * t6;
            let a2 = self.a21 * w + self.a22 * t4 + self.a23 * t6;
            let a4 = self.a42 * t4 + self.a43 * t6;
            let a6 = self.a63 * t6;

            let qo = if w > TOLERANCE_0 { -2.0 * su1 * su2 / w } else { 0.0 };
            q2 = csig + qo;
            q4 = 2.0 * q2 * q2 - 1.0;
            q6 = q2 * (4.0 * q2 * q2 - 3.0);
            r2 = 2.0 * ssig * csig;
            r3 = ssig * (3.0 - 4.0 * ssig * ssig);

            let s = sinalf * (ao * sig + a2 * ssig * q2 + a4 * r2 * q4 + a6 * r3 * q6);
            let xz = dlon + s;
            let xy = (xz - ab).abs();
            ab = dlon + s;
            if xy < TOLERANCE_1 {
                converged = true;
                break;
            }
        }
        if !converged {
            return self.spherical_fallback();
        }

        let z = esqp * w;
        let bo = 1.0 + z * (1.0 / 4.0 + z * (-3.0 / 64.0 + z * (5.0 / 256.0 - z * (175.0 / 16384.0))));
        let b2 = z * (-1.0 / 4.0 + z * (1.0 / 16.0 + z * (-15.0 / 512.0 + z * (35.0 / 2048.0))));
        let b4 = z * z * (-1.0 / 128.0 + z * (3.0 / 512.0 - z * (35.0 / 8192.0)));
        let b6 = z * z * z * (-1.0 / 1536.0 + z * (5.0 / 6144.0));

        self.distance = self.semi_minor * (bo * sig + b2 * ssig * q2 + b4 * r2 * q4 + b6 * r3 * q6);
        let mut az1 = if dlon < 0.0 { PI * 1.5 } else { PI / 2.0 };
        if su1.abs() >= TOLERANCE_0 || su2.abs() >= TOLERANCE_0 {
            let clon = ab.cos();
            let tana1 = slon * cu2 / (su2 * cu1 - clon * su1 * cu2);
            let sina1 = sinalf / cu1;
            az1 = sina1.atan2(sina1 / tana1);
        }
        self.azimuth = cast_to_angle_range(az1);
        self.direction_valid = true;
        if antipodal {
            warn!("Inverse solution is inaccurate for near-antipodal points");
            self.precise = false;
        }
        Ok(())
    }

    // Great-circle solution on the mean-radius sphere, used when the
    // ellipsoidal iteration does not converge
    fn spherical_fallback(&mut self) -> GeoResult<()> {
        warn!("Ellipsoidal inverse did not converge; using spherical approximation");
        let radius = (2.0 * self.semi_major + self.semi_minor) / 3.0;
        let dlon = cast_to_angle_range(self.lon2 - self.lon1);
        let (s1, c1) = (self.lat1.sin(), self.lat1.cos());
        let (s2, c2) = (self.lat2.sin(), self.lat2.cos());
        let sd = ((c2 * dlon.sin()).hypot(c1 * s2 - s1 * c2 * dlon.cos()))
            .atan2(s1 * s2 + c1 * c2 * dlon.cos());
        self.distance = radius * sd;
        self.azimuth = cast_to_angle_range(
            (dlon.sin() * c2).atan2(c1 * s2 - s1 * c2 * dlon.cos()),
        );
        self.direction_valid = true;
        self.precise = false;
        Ok(())
    }
}

impl Default for GeodeticCalculator {
    fn default() -> Self {
        GeodeticCalculator::wgs84()
    }
}

fn check_latitude(latitude: f64) -> GeoResult<f64> {
    if (-90.0..=90.0).contains(&latitude) {
        Ok(latitude.to_radians())
    } else {
        Err(GeoError::Transform(format!(
            "Latitude {} out of range [-90, 90]", latitude
        )))
    }
}

fn check_longitude(longitude: f64) -> GeoResult<f64> {
    if (-180.0..=180.0).contains(&longitude) {
        Ok(longitude.to_radians())
    } else {
        Err(GeoError::Transform(format!(
            "Longitude {} out of range [-180, 180]", longitude
        )))
    }
}

fn check_azimuth(azimuth: f64) -> GeoResult<f64> {
    if (-180.0..=180.0).contains(&azimuth) {
        Ok(azimuth.to_radians())
    } else {
        Err(GeoError::Transform(format!(
            "Azimuth {} out of range [-180, 180]", azimuth
        )))
    }
}
