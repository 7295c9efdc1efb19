//! Angle arithmetic and ordinate parsing helpers

use crate::crs::errors::{GeoError, GeoResult};

/// Fold an angle in radians into [-PI, PI)
pub fn cast_to_angle_range(alpha: f64) -> f64 {
    alpha - (2.0 * std::f64::consts::PI) * (alpha / (2.0 * std::f64::consts::PI) + 0.5).floor()
}

/// Fold a longitude in degrees into [-180, 180)
pub fn wrap_longitude(degrees: f64) -> f64 {
    degrees - 360.0 * ((degrees + 180.0) / 360.0).floor()
}

/// Parse a comma-separated ordinate pair like `"12.5,-3.25"`
pub fn parse_ordinate_pair(text: &str) -> GeoResult<(f64, f64)> {
    let mut parts = text.splitn(2, ',');
    let first = parts.next().unwrap_or("").trim();
    let second = parts.next().unwrap_or("").trim();
    let a: f64 = first
        .parse()
        .map_err(|_| GeoError::Factory(format!("Invalid ordinate: '{}'", first)))?;
    let b: f64 = second
        .parse()
        .map_err(|_| GeoError::Factory(format!("Invalid ordinate: '{}'", second)))?;
    Ok((a, b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_cast_to_angle_range() {
        assert!((cast_to_angle_range(3.0 * PI) + PI).abs() < 1e-12);
        assert!((cast_to_angle_range(-3.0 * PI) + PI).abs() < 1e-12);
        assert_eq!(cast_to_angle_range(0.25), 0.25);
    }

    #[test]
    fn test_wrap_longitude() {
        assert_eq!(wrap_longitude(190.0), -170.0);
        assert_eq!(wrap_longitude(-190.0), 170.0);
        assert_eq!(wrap_longitude(45.0), 45.0);
        assert_eq!(wrap_longitude(180.0), -180.0);
    }

    #[test]
    fn test_parse_ordinate_pair() {
        assert_eq!(parse_ordinate_pair("12.5, -3.25").unwrap(), (12.5, -3.25));
        assert_eq!(parse_ordinate_pair("0,0").unwrap(), (0.0, 0.0));
        assert!(parse_ordinate_pair("12.5").is_err());
        assert!(parse_ordinate_pair("a,b").is_err());
    }
}
