//! Authority code decoding and axis-order policy
//!
//! The decoder front door resolves authority codes through the global
//! registry, applies the longitude-first axis policy, and interns the
//! results: two decodes of the same code under the same effective policy
//! return the same shared object, so callers can rely on pointer
//! identity for cheap "same CRS" checks.
//!
//! The effective policy for a decode is resolved in order: the per-call
//! override, then the process-wide hint, then the `CRSKIT_FORCE_XY`
//! environment variable, then the authority default (latitude first for
//! geographic EPSG codes).

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use lazy_static::lazy_static;
use log::{debug, info};

use crate::authority::identifier;
use crate::authority::registry::AuthorityFactoryRegistry;
use crate::crs::axis::AxisDirection;
use crate::crs::errors::{GeoError, GeoResult};
use crate::crs::system::Crs;

/// Environment variable forcing longitude-first decoding process-wide
pub const FORCE_XY_ENV: &str = "CRSKIT_FORCE_XY";

lazy_static! {
    static ref REGISTRY: AuthorityFactoryRegistry = AuthorityFactoryRegistry::with_defaults();
    static ref CACHE: RwLock<HashMap<(String, bool), Arc<Crs>>> = RwLock::new(HashMap::new());
    static ref HINT: RwLock<Option<bool>> = RwLock::new(None);
}

/// Horizontal axis order of a CRS
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisOrder {
    /// Geographic, longitude before latitude
    LonLat,
    /// Geographic, latitude before longitude
    LatLon,
    /// Projected, easting before northing
    EastNorth,
    /// Projected, northing before easting
    NorthEast,
    /// No recognizable horizontal axis pair
    Inapplicable,
}

/// Classify the horizontal axis order of a CRS
///
/// Only geographic and projected systems carry a determinate order;
/// vertical, engineering and compound systems classify as inapplicable
/// regardless of their axis directions.
pub fn axis_order(crs: &Crs) -> AxisOrder {
    if crs.dimension() < 2 || !(crs.is_geographic() || crs.is_projected()) {
        return AxisOrder::Inapplicable;
    }
    let first = &crs.axes[0].direction;
    let second = &crs.axes[1].direction;
    let east_first = matches!(first, AxisDirection::East | AxisDirection::West)
        && matches!(second, AxisDirection::North | AxisDirection::South);
    let north_first = matches!(first, AxisDirection::North | AxisDirection::South)
        && matches!(second, AxisDirection::East | AxisDirection::West);
    match (east_first, north_first, crs.is_geographic()) {
        (true, _, true) => AxisOrder::LonLat,
        (_, true, true) => AxisOrder::LatLon,
        (true, _, false) => AxisOrder::EastNorth,
        (_, true, false) => AxisOrder::NorthEast,
        _ => AxisOrder::Inapplicable,
    }
}

/// Set or clear the process-wide longitude-first hint
///
/// Takes effect for subsequent decodes; already-interned objects keep
/// the policy they were built under until `reset` clears the cache.
pub fn set_longitude_first_hint(value: Option<bool>) {
    let mut hint = HINT.write().unwrap();
    *hint = value;
    info!("Longitude-first hint set to {:?}", value);
}

fn env_force_xy() -> bool {
    match std::env::var(FORCE_XY_ENV) {
        Ok(v) => v.eq_ignore_ascii_case("true") || v == "1",
        Err(_) => false,
    }
}

/// The longitude-first flag a decode will use, given a per-call override
fn effective_longitude_first(call_override: Option<bool>) -> bool {
    if let Some(forced) = call_override {
        return forced;
    }
    if let Some(hinted) = *HINT.read().unwrap() {
        return hinted;
    }
    env_force_xy()
}

fn apply_axis_policy(crs: Crs, longitude_first: bool) -> Crs {
    if !longitude_first {
        return crs;
    }
    match axis_order(&crs) {
        AxisOrder::LatLon | AxisOrder::NorthEast => crs.with_swapped_axes(),
        _ => crs,
    }
}

fn decode_cached(code: &str, call_override: Option<bool>) -> GeoResult<Arc<Crs>> {
    let parsed = identifier::parse(code)?;
    let longitude_first = effective_longitude_first(call_override);
    let key = (parsed.compact(), longitude_first);
    {
        let cache = CACHE.read().unwrap();
        if let Some(interned) = cache.get(&key) {
            return Ok(Arc::clone(interned));
        }
    }
    // Construct under the write lock so concurrent decodes of the same
    // key end up with one shared object, not a winner-takes-last race
    let mut cache = CACHE.write().unwrap();
    if let Some(interned) = cache.get(&key) {
        return Ok(Arc::clone(interned));
    }
    debug!(
        "Decoding {} (longitude_first={})",
        key.0, longitude_first
    );
    let crs = REGISTRY.resolve(code)?;
    let interned = Arc::new(apply_axis_policy(crs, longitude_first));
    cache.insert(key, Arc::clone(&interned));
    Ok(interned)
}

/// Decode an authority code under the current process policy
///
/// # Arguments
/// * `code` - Identifier in compact, bare-numeric or URN form
///
/// # Returns
/// The interned CRS, or an error for unknown or malformed codes
pub fn decode(code: &str) -> GeoResult<Arc<Crs>> {
    decode_cached(code, None)
}

/// Decode an authority code with an explicit axis-order override
///
/// # Arguments
/// * `code` - Identifier in compact, bare-numeric or URN form
/// * `longitude_first` - Force east/longitude-first axis order for this
///   call, overriding the process hint and environment
pub fn decode_forced(code: &str, longitude_first: bool) -> GeoResult<Arc<Crs>> {
    decode_cached(code, Some(longitude_first))
}

/// Look up the authority identifier of a CRS via the global registry
pub fn lookup_identifier(crs: &Crs, full_scan: bool) -> Option<String> {
    REGISTRY.lookup_identifier(crs, full_scan)
}

/// Clear decoder state
///
/// Scope `"cache"` empties the interning cache; scope `"all"` also
/// clears the process-wide axis-order hint. Any other scope is an
/// error.
pub fn reset(scope: &str) -> GeoResult<()> {
    match scope {
        "cache" => {
            CACHE.write().unwrap().clear();
            info!("Decoder cache cleared");
            Ok(())
        }
        "all" => {
            CACHE.write().unwrap().clear();
            *HINT.write().unwrap() = None;
            info!("Decoder cache and axis-order hint cleared");
            Ok(())
        }
        other => Err(GeoError::Factory(format!(
            "Unknown reset scope: \"{}\"", other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // The interning cache and hint are process-global, so these tests
    // only use per-call overrides and scoped cleanup to stay
    // independent of execution order.

    #[test]
    fn test_decode_interns_per_policy() {
        let a = decode_forced("EPSG:4326", false).unwrap();
        let b = decode_forced("EPSG:4326", false).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        let forced = decode_forced("EPSG:4326", true).unwrap();
        assert!(!Arc::ptr_eq(&a, &forced));
        assert_eq!(forced.axes[0].abbreviation, "Lon");
        assert_eq!(a.axes[0].abbreviation, "Lat");
    }

    #[test]
    fn test_equivalent_spellings_share_one_object() {
        let compact = decode_forced("EPSG:4326", false).unwrap();
        let bare = decode_forced("4326", false).unwrap();
        let urn = decode_forced("urn:ogc:def:crs:EPSG::4326", false).unwrap();
        assert!(Arc::ptr_eq(&compact, &bare));
        assert!(Arc::ptr_eq(&compact, &urn));
    }

    #[test]
    fn test_forced_decode_preserves_identifier() {
        let forced = decode_forced("EPSG:4326", true).unwrap();
        assert_eq!(forced.identifier.as_ref().unwrap().to_string(), "EPSG:4326");
    }

    #[test]
    fn test_projected_codes_unaffected_by_forcing() {
        let plain = decode_forced("EPSG:32633", false).unwrap();
        let forced = decode_forced("EPSG:32633", true).unwrap();
        // Already easting-first; forcing changes the cache key only
        assert!(plain.equals_ignore_metadata(&forced));
    }

    #[test]
    fn test_axis_order_classification() {
        let geographic = decode_forced("EPSG:4326", false).unwrap();
        assert_eq!(axis_order(&geographic), AxisOrder::LatLon);
        assert_eq!(axis_order(&geographic.with_swapped_axes()), AxisOrder::LonLat);
        let projected = decode_forced("EPSG:3857", false).unwrap();
        assert_eq!(axis_order(&projected), AxisOrder::EastNorth);
        let vertical = decode_forced("EPSG:5714", false).unwrap();
        assert_eq!(axis_order(&vertical), AxisOrder::Inapplicable);
    }

    #[test]
    fn test_engineering_crs_is_inapplicable() {
        // East/north axis directions alone do not give an engineering
        // grid a determinate order
        let engineering = decode_forced("EPSG:404000", false).unwrap();
        assert_eq!(axis_order(&engineering), AxisOrder::Inapplicable);
        // Forcing never swaps it either
        let forced = decode_forced("EPSG:404000", true).unwrap();
        assert!(engineering.equals_ignore_metadata(&forced));
    }

    #[test]
    fn test_unknown_reset_scope() {
        assert!(reset("everything").is_err());
    }

    #[test]
    fn test_decode_unknown_code() {
        let err = decode("EPSG:99999").unwrap_err();
        assert!(matches!(err, GeoError::NoSuchAuthorityCode { .. }));
    }
}
