//! Identifier lookup tests against the built-in EPSG backend

use crate::authority::registry::AuthorityFactoryRegistry;

#[test]
fn test_lookup_by_carried_identifier() {
    let registry = AuthorityFactoryRegistry::with_defaults();
    let crs = registry.resolve("EPSG:4326").unwrap();
    assert_eq!(
        registry.lookup_identifier(&crs, false).as_deref(),
        Some("EPSG:4326")
    );
}

#[test]
fn test_lookup_by_name_without_identifier() {
    let registry = AuthorityFactoryRegistry::with_defaults();
    let mut crs = registry.resolve("EPSG:32633").unwrap();
    crs.identifier = None;
    assert_eq!(
        registry.lookup_identifier(&crs, false).as_deref(),
        Some("EPSG:32633")
    );
}

#[test]
fn test_lookup_renamed_crs_needs_full_scan() {
    let registry = AuthorityFactoryRegistry::with_defaults();
    let mut crs = registry.resolve("EPSG:4267").unwrap();
    crs.identifier = None;
    crs.name = "Some local NAD27 variant".to_string();
    assert_eq!(registry.lookup_identifier(&crs, false), None);
    assert_eq!(
        registry.lookup_identifier(&crs, true).as_deref(),
        Some("EPSG:4267")
    );
}

#[test]
fn test_lookup_swapped_axes_does_not_match() {
    let registry = AuthorityFactoryRegistry::with_defaults();
    let crs = registry.resolve("EPSG:4326").unwrap().with_swapped_axes();
    let mut anonymous = crs;
    anonymous.identifier = None;
    anonymous.name = "lon/lat WGS 84".to_string();
    // Axis order is load-bearing: the longitude-first variant is not
    // the authority's definition
    assert_eq!(registry.lookup_identifier(&anonymous, true), None);
}
