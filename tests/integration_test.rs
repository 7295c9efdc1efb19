//! Integration tests for the public CrsKit API

use crskit::{CrsKit, Envelope, TileSource};

struct CatalogLayer {
    crs: &'static str,
    bounds: Envelope,
}

impl TileSource for CatalogLayer {
    fn crs_identifier(&self) -> &str {
        self.crs
    }

    fn bounds(&self) -> Envelope {
        self.bounds
    }
}

#[test]
fn test_complete_referencing_workflow() {
    let _ = env_logger::builder().is_test(true).try_init();
    let kit = CrsKit::new(Some("integration_test.log")).unwrap();

    // Resolve a geographic and a projected CRS
    let description = kit.describe("EPSG:4326").unwrap();
    assert!(description.contains("WGS 84"));
    assert!(description.contains("Geographic"));

    let description = kit.describe("EPSG:32633").unwrap();
    assert!(description.contains("Projected"));

    // Identify a decoded CRS
    let identifier = kit.lookup("EPSG:3857").unwrap();
    assert_eq!(identifier.as_deref(), Some("EPSG:3857"));

    // Transform the origin of UTM zone 33N back to geographic
    let (lat, lon) = kit.transform("EPSG:32633", "EPSG:4326", 500_000.0, 0.0, false).unwrap();
    assert!(lat.abs() < 1e-9);
    assert!((lon - 15.0).abs() < 1e-9);

    // Reproject a bounding box; latitude-first source axis order
    let bounds = kit
        .transform_bounds("EPSG:4326", "EPSG:3857", (-10.0, -20.0, 10.0, 20.0), false)
        .unwrap();
    assert!(bounds.0 < 0.0 && bounds.2 > 0.0);
    assert!((bounds.2 + bounds.0).abs() < 1e-6);

    // Geodesic round trip
    let (azimuth, distance) = kit.geodesic_inverse(0.0, 0.0, 10.0, 10.0).unwrap();
    let (lon, lat) = kit.geodesic_direct(0.0, 0.0, azimuth, distance).unwrap();
    assert!((lon - 10.0).abs() < 1e-6);
    assert!((lat - 10.0).abs() < 1e-6);

    // Path sampling includes both endpoints
    let path = kit.geodesic_path(0.0, 0.0, 10.0, 10.0, 8).unwrap();
    assert_eq!(path.len(), 9);
    assert_eq!(path[0], (0.0, 0.0));
}

#[test]
fn test_tile_source_bounds_reprojection() {
    let kit = CrsKit::new(Some("integration_test_tiles.log")).unwrap();
    let layer = CatalogLayer {
        crs: "EPSG:3857",
        bounds: Envelope::new(-2_000_000.0, -1_000_000.0, 2_000_000.0, 1_000_000.0).unwrap(),
    };
    let out = kit.source_bounds_in(&layer, "EPSG:4326", false).unwrap();
    // Latitude-first target: dimension 1 carries longitude
    assert!((out.minimum(1) + out.maximum(1)).abs() < 1e-9);
    assert!(out.maximum(1) < 20.0 && out.maximum(1) > 17.0);
}

#[test]
fn test_unknown_code_is_reported() {
    let kit = CrsKit::new(Some("integration_test_unknown.log")).unwrap();
    let err = kit.describe("EPSG:999999").unwrap_err();
    assert!(err.to_string().contains("999999"));
}
