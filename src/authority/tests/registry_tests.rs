//! Registry selection tests: priority ranking and version tie-breaks

use std::sync::Arc;

use crate::authority::registry::{
    AuthorityFactoryRegistry, CrsAuthorityFactory, NORMAL_PRIORITY,
};
use crate::crs::axis::Axis;
use crate::crs::datum::GeodeticDatum;
use crate::crs::errors::{GeoError, GeoResult};
use crate::crs::system::{Crs, CrsKind, Identifier};

/// Mock backend answering for one authority with a fixed marker name
struct MockFactory {
    authority: &'static str,
    version: &'static str,
    marker: &'static str,
}

impl MockFactory {
    fn new(authority: &'static str, version: &'static str, marker: &'static str) -> Arc<Self> {
        Arc::new(MockFactory { authority, version, marker })
    }
}

impl CrsAuthorityFactory for MockFactory {
    fn authority(&self) -> &str {
        self.authority
    }

    fn version(&self) -> &str {
        self.version
    }

    fn create_crs(&self, code: &str) -> GeoResult<Crs> {
        Ok(Crs {
            identifier: Some(Identifier::new(self.authority, code)),
            name: self.marker.to_string(),
            kind: CrsKind::Engineering,
            axes: vec![Axis::easting(), Axis::northing()],
            datum: GeodeticDatum::wgs84(),
        })
    }

    fn codes(&self) -> Vec<String> {
        vec!["1".to_string()]
    }
}

fn resolved_marker(registry: &AuthorityFactoryRegistry, code: &str) -> String {
    registry.resolve(code).unwrap().name
}

#[test]
fn test_higher_priority_wins() {
    let mut registry = AuthorityFactoryRegistry::new();
    registry.register(MockFactory::new("MOCK", "", "first"), NORMAL_PRIORITY);
    registry.register(MockFactory::new("MOCK", "", "second"), NORMAL_PRIORITY + 10);
    assert_eq!(resolved_marker(&registry, "MOCK:1"), "second");
}

#[test]
fn test_registration_order_breaks_priority_ties() {
    let mut registry = AuthorityFactoryRegistry::new();
    registry.register(MockFactory::new("MOCK", "", "first"), NORMAL_PRIORITY);
    registry.register(MockFactory::new("MOCK", "", "second"), NORMAL_PRIORITY);
    assert_eq!(resolved_marker(&registry, "MOCK:1"), "first");
}

#[test]
fn test_exact_version_match_beats_priority() {
    let mut registry = AuthorityFactoryRegistry::new();
    registry.register(MockFactory::new("MOCK", "1.0", "old"), NORMAL_PRIORITY + 10);
    registry.register(MockFactory::new("MOCK", "2.2", "new"), NORMAL_PRIORITY);
    assert_eq!(
        resolved_marker(&registry, "urn:ogc:def:crs:MOCK:2.2:1"),
        "new"
    );
    // Without a requested version, priority decides
    assert_eq!(resolved_marker(&registry, "MOCK:1"), "old");
}

#[test]
fn test_versioned_factory_preferred_when_version_requested() {
    let mut registry = AuthorityFactoryRegistry::new();
    registry.register(MockFactory::new("MOCK", "", "unversioned"), NORMAL_PRIORITY);
    registry.register(MockFactory::new("MOCK", "2.2", "versioned"), NORMAL_PRIORITY);
    // Requested version matches neither exactly; the version-bearing
    // factory still outranks the blank one
    assert_eq!(
        resolved_marker(&registry, "urn:ogc:def:crs:MOCK:3.0:1"),
        "versioned"
    );
}

#[test]
fn test_blank_and_versioned_factories_side_by_side() {
    // Three backends for one authority: two blank-version ones at
    // different priorities, and a "3.0" one ranked between them
    let mut registry = AuthorityFactoryRegistry::new();
    registry.register(MockFactory::new("MOCK", "", "first"), NORMAL_PRIORITY);
    registry.register(MockFactory::new("MOCK", "", "second"), NORMAL_PRIORITY - 10);
    registry.register(MockFactory::new("MOCK", "3.0", "third"), NORMAL_PRIORITY - 5);
    // No version requested: highest priority wins
    assert_eq!(resolved_marker(&registry, "MOCK:1"), "first");
    // Exact version match outranks priority
    assert_eq!(
        resolved_marker(&registry, "urn:ogc:def:crs:MOCK:3.0:1"),
        "third"
    );
    // Unmatched version falls back to priority order
    assert_eq!(
        resolved_marker(&registry, "urn:ogc:def:crs:MOCK:2.0:1"),
        "first"
    );
}

#[test]
fn test_unknown_authority() {
    let registry = AuthorityFactoryRegistry::new();
    let err = registry.resolve("NOWHERE:1").unwrap_err();
    match err {
        GeoError::NoSuchAuthorityCode { authority, code } => {
            assert_eq!(authority, "NOWHERE");
            assert_eq!(code, "1");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_authority_matching_is_case_insensitive() {
    let mut registry = AuthorityFactoryRegistry::new();
    registry.register(MockFactory::new("MOCK", "", "only"), NORMAL_PRIORITY);
    assert_eq!(resolved_marker(&registry, "mock:1"), "only");
}
