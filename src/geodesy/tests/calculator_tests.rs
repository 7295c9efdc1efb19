//! Tests for the geodesic calculator

use crate::crs::datum::Ellipsoid;
use crate::geodesy::GeodeticCalculator;

#[test]
fn test_quarter_meridian() {
    let calc = GeodeticCalculator::wgs84();
    let arc = calc.meridian_arc_length(0.0, 90.0).unwrap();
    assert!((arc - 10_001_965.729_312_124).abs() < 1e-2);
}

#[test]
fn test_meridian_arc_is_symmetric() {
    let calc = GeodeticCalculator::wgs84();
    let up = calc.meridian_arc_length(-30.0, 20.0).unwrap();
    let down = calc.meridian_arc_length(20.0, -30.0).unwrap();
    assert_eq!(up, down);
    assert!(up > 0.0);
}

#[test]
fn test_quarter_equator() {
    let mut calc = GeodeticCalculator::wgs84();
    calc.set_start(0.0, 0.0).unwrap();
    calc.set_destination(90.0, 0.0).unwrap();
    let expected = 6_378_137.0 * std::f64::consts::FRAC_PI_2;
    assert!((calc.orthodromic_distance().unwrap() - expected).abs() < 1e-3);
    assert!((calc.azimuth().unwrap() - 90.0).abs() < 1e-9);
    assert!(calc.is_precise());
}

#[test]
fn test_same_meridian_shortcut() {
    let mut calc = GeodeticCalculator::wgs84();
    calc.set_start(10.0, -30.0).unwrap();
    calc.set_destination(10.0, 20.0).unwrap();
    let distance = calc.orthodromic_distance().unwrap();
    let arc = calc.meridian_arc_length(-30.0, 20.0).unwrap();
    assert!((distance - arc).abs() < 1e-9);
    assert_eq!(calc.azimuth().unwrap(), 0.0);

    calc.set_destination(10.0, -60.0).unwrap();
    assert_eq!(calc.azimuth().unwrap(), 180.0);
}

#[test]
fn test_direct_and_inverse_agree() {
    let mut direct = GeodeticCalculator::wgs84();
    direct.set_start(2.35, 48.85).unwrap();
    direct.set_direction(65.0, 3_000_000.0).unwrap();
    let (lon, lat) = direct.destination().unwrap();

    let mut inverse = GeodeticCalculator::wgs84();
    inverse.set_start(2.35, 48.85).unwrap();
    inverse.set_destination(lon, lat).unwrap();
    assert!((inverse.orthodromic_distance().unwrap() - 3_000_000.0).abs() < 0.1);
    assert!((inverse.azimuth().unwrap() - 65.0).abs() < 1e-4);
    assert!(inverse.is_precise());
}

#[test]
fn test_southward_direction_round_trip() {
    let mut direct = GeodeticCalculator::wgs84();
    direct.set_start(-70.0, -33.0).unwrap();
    direct.set_direction(-135.0, 1_500_000.0).unwrap();
    let (lon, lat) = direct.destination().unwrap();
    assert!(lat < -33.0);
    assert!(lon < -70.0);

    let mut inverse = GeodeticCalculator::wgs84();
    inverse.set_start(-70.0, -33.0).unwrap();
    inverse.set_destination(lon, lat).unwrap();
    assert!((inverse.azimuth().unwrap() + 135.0).abs() < 1e-4);
    assert!((inverse.orthodromic_distance().unwrap() - 1_500_000.0).abs() < 0.1);
}

#[test]
fn test_near_antipodal_is_flagged_imprecise() {
    let mut calc = GeodeticCalculator::wgs84();
    calc.set_start(0.0, 0.0).unwrap();
    calc.set_destination(179.8, 0.2).unwrap();
    let distance = calc.orthodromic_distance().unwrap();
    assert!(distance > 1.9e7);
    assert!(distance <= calc.max_orthodromic_distance());
    assert!(!calc.is_precise());
}

#[test]
fn test_coincident_points() {
    let mut calc = GeodeticCalculator::wgs84();
    calc.set_start(12.5, -33.0).unwrap();
    calc.set_destination(12.5, -33.0).unwrap();
    assert_eq!(calc.orthodromic_distance().unwrap(), 0.0);
    assert!(calc.azimuth().unwrap().is_finite());
    assert!(calc.is_precise());
}

#[test]
fn test_path_sampling() {
    let mut calc = GeodeticCalculator::wgs84();
    calc.set_start(0.0, 0.0).unwrap();
    calc.set_direction(90.0, 1_000_000.0).unwrap();
    let (end_lon, end_lat) = calc.destination().unwrap();

    let path = calc.path(4).unwrap();
    assert_eq!(path.len(), 5);
    assert_eq!(path[0], (0.0, 0.0));
    assert_eq!(path[4], (end_lon, end_lat));
    for pair in path.windows(2) {
        assert!(pair[1].0 > pair[0].0);
    }
    // Path sampling restores the full-distance state
    assert_eq!(calc.destination().unwrap(), (end_lon, end_lat));
}

#[test]
fn test_state_machine_requires_inputs() {
    let mut calc = GeodeticCalculator::wgs84();
    calc.set_start(5.0, 50.0).unwrap();
    assert!(calc.azimuth().is_err());
    assert!(calc.destination().is_err());

    calc.set_direction(10.0, 1000.0).unwrap();
    assert!(calc.destination().is_ok());

    // A new destination discards the direction; it is recomputed
    calc.set_destination(6.0, 51.0).unwrap();
    let azimuth = calc.azimuth().unwrap();
    assert!(azimuth > 0.0 && azimuth < 90.0);
}

#[test]
fn test_input_validation() {
    let mut calc = GeodeticCalculator::wgs84();
    assert!(calc.set_start(0.0, 91.0).is_err());
    assert!(calc.set_start(181.0, 0.0).is_err());
    assert!(calc.set_destination(0.0, -90.5).is_err());
    assert!(calc.set_direction(200.0, 1000.0).is_err());
    assert!(calc.set_direction(0.0, -1.0).is_err());
    assert!(calc.set_direction(0.0, calc.max_orthodromic_distance() + 1.0).is_err());
}

#[test]
fn test_rejects_malformed_ellipsoid() {
    let flat = Ellipsoid { semi_major: 6_378_137.0, inverse_flattening: 0.5 };
    assert!(GeodeticCalculator::new(flat).is_err());
}

#[test]
fn test_international_ellipsoid_differs() {
    let mut wgs = GeodeticCalculator::wgs84();
    let mut intl = GeodeticCalculator::new(Ellipsoid::INTERNATIONAL_1924).unwrap();
    for calc in [&mut wgs, &mut intl] {
        calc.set_start(0.0, 45.0).unwrap();
        calc.set_destination(10.0, 50.0).unwrap();
    }
    let d1 = wgs.orthodromic_distance().unwrap();
    let d2 = intl.orthodromic_distance().unwrap();
    assert!((d1 - d2).abs() > 1.0);
    assert!((d1 - d2).abs() < 1000.0);
}
