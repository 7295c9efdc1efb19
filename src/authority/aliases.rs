//! Datum alias index
//!
//! Historical data carries the same datum under many spellings
//! ("WGS_1984", "WGS 84", "D_WGS_1984", ...). This module wraps a datum
//! factory and attaches the known alias set to every datum it creates,
//! so that structural comparison can recognize renamed datums. The
//! alias table ships embedded in the binary and is parsed once at
//! startup.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use lazy_static::lazy_static;
use log::{debug, warn};

use crate::crs::datum::{normalize_datum_name, Ellipsoid, GeodeticDatum, PrimeMeridian};
use crate::crs::errors::GeoResult;

lazy_static! {
    // Parse the alias table at startup
    static ref ALIAS_TABLE: AliasTable = {
        let content = include_str!("../../datum_aliases.toml");
        AliasTable::from_str(content).unwrap_or_else(|e| {
            warn!("Failed to parse datum alias table: {}", e);
            AliasTable::default()
        })
    };
}

/// Parsed alias table: normalized name -> full alias row
#[derive(Debug, Default)]
struct AliasTable {
    rows: HashMap<String, Vec<String>>,
}

impl AliasTable {
    /// Parse the alias table from a TOML string
    fn from_str(content: &str) -> Result<Self, String> {
        let value: toml::Value = content
            .parse()
            .map_err(|e| format!("Failed to parse TOML: {}", e))?;
        let mut table = AliasTable::default();
        if let Some(aliases) = value.get("aliases").and_then(|v| v.as_table()) {
            for (canonical, list) in aliases {
                let mut row = vec![canonical.clone()];
                if let Some(entries) = list.as_array() {
                    for entry in entries {
                        if let Some(name) = entry.as_str() {
                            row.push(name.to_string());
                        }
                    }
                }
                for name in &row {
                    table.rows.insert(normalize_datum_name(name), row.clone());
                }
            }
        }
        Ok(table)
    }

    /// Find the alias row matching a name, after normalization
    fn find(&self, name: &str) -> Option<&Vec<String>> {
        self.rows.get(&normalize_datum_name(name))
    }
}

/// A factory creating geodetic datums
pub trait DatumFactory: Send + Sync {
    /// Create a geodetic datum
    fn create_geodetic_datum(
        &self,
        name: &str,
        ellipsoid: Ellipsoid,
        prime_meridian: PrimeMeridian,
    ) -> GeoResult<GeodeticDatum>;
}

/// Plain datum factory with no alias handling
pub struct SimpleDatumFactory;

impl DatumFactory for SimpleDatumFactory {
    fn create_geodetic_datum(
        &self,
        name: &str,
        ellipsoid: Ellipsoid,
        prime_meridian: PrimeMeridian,
    ) -> GeoResult<GeodeticDatum> {
        Ok(GeodeticDatum::new(name, ellipsoid, prime_meridian))
    }
}

/// Decorator attaching alias sets to datums created by an inner factory
///
/// Alias rows are cached per canonical name. `free_unused` evicts rows
/// no longer referenced by any live datum; an equivalent lookup after
/// eviction rebuilds a row with identical content (though not the
/// identical shared object).
pub struct DatumAliasIndex {
    inner: Box<dyn DatumFactory>,
    cache: Mutex<HashMap<String, Arc<Vec<String>>>>,
}

impl DatumAliasIndex {
    /// Wrap a datum factory
    pub fn new(inner: Box<dyn DatumFactory>) -> Self {
        DatumAliasIndex {
            inner,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// The alias row for a datum name, from cache or the static table
    fn aliases_for(&self, name: &str) -> Arc<Vec<String>> {
        let key = normalize_datum_name(name);
        let mut cache = self.cache.lock().unwrap();
        if let Some(row) = cache.get(&key) {
            return Arc::clone(row);
        }
        let row = match ALIAS_TABLE.find(name) {
            Some(names) => Arc::new(names.clone()),
            None => Arc::new(Vec::new()),
        };
        cache.insert(key, Arc::clone(&row));
        row
    }

    /// Evict alias-cache entries not referenced by any live datum
    ///
    /// An entry is live while some datum still holds the shared alias
    /// row; such entries survive the sweep.
    pub fn free_unused(&self) {
        let mut cache = self.cache.lock().unwrap();
        let before = cache.len();
        cache.retain(|_, row| Arc::strong_count(row) > 1);
        debug!("Alias cache sweep: {} -> {} entries", before, cache.len());
    }

    /// Number of cached alias rows
    pub fn cached_entries(&self) -> usize {
        self.cache.lock().unwrap().len()
    }
}

impl DatumFactory for DatumAliasIndex {
    fn create_geodetic_datum(
        &self,
        name: &str,
        ellipsoid: Ellipsoid,
        prime_meridian: PrimeMeridian,
    ) -> GeoResult<GeodeticDatum> {
        let mut datum = self
            .inner
            .create_geodetic_datum(name, ellipsoid, prime_meridian)?;
        let aliases = self.aliases_for(name);
        if !aliases.is_empty() {
            datum.aliases = aliases;
        }
        Ok(datum)
    }
}

lazy_static! {
    /// Process-wide alias index used by the built-in EPSG backend
    pub static ref DEFAULT_ALIAS_INDEX: DatumAliasIndex =
        DatumAliasIndex::new(Box::new(SimpleDatumFactory));
}
