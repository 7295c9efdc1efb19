//! Authority factory registry
//!
//! The registry owns the set of authority backends and resolves codes
//! against them. It is built explicitly at process start from a static
//! list of backends; there is no runtime classpath discovery. When
//! several factories claim the same authority, version and priority
//! decide deterministically which one answers.

use std::sync::Arc;

use log::debug;

use crate::authority::identifier::{self, ParsedCode};
use crate::crs::errors::{GeoError, GeoResult};
use crate::crs::system::Crs;

/// Default registration priority
pub const NORMAL_PRIORITY: i32 = 50;

/// A backend resolving codes of one authority to CRS objects
pub trait CrsAuthorityFactory: Send + Sync {
    /// Authority name this factory answers for (e.g. "EPSG")
    fn authority(&self) -> &str;

    /// Authority database version; empty when unversioned
    fn version(&self) -> &str {
        ""
    }

    /// Create the CRS for a code within this authority's namespace
    fn create_crs(&self, code: &str) -> GeoResult<Crs>;

    /// All codes this factory can resolve, for full-scan lookups
    fn codes(&self) -> Vec<String>;

    /// Find a code whose primary CRS name matches, without a full scan
    fn find_code_by_name(&self, _name: &str) -> Option<String> {
        None
    }
}

/// A registered factory with its selection metadata
pub struct Registration {
    /// The backend
    pub factory: Arc<dyn CrsAuthorityFactory>,
    /// Priority rank; higher wins
    pub priority: i32,
    /// Position in registration order, used as the final tie-break
    order: usize,
}

/// Registry of authority factories
pub struct AuthorityFactoryRegistry {
    registrations: Vec<Registration>,
}

impl AuthorityFactoryRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        AuthorityFactoryRegistry {
            registrations: Vec::new(),
        }
    }

    /// Create a registry with the built-in EPSG backend registered
    pub fn with_defaults() -> Self {
        let mut registry = AuthorityFactoryRegistry::new();
        registry.register(
            Arc::new(crate::authority::epsg::EpsgFactory::new()),
            NORMAL_PRIORITY,
        );
        registry
    }

    /// Register a factory with the given priority
    pub fn register(&mut self, factory: Arc<dyn CrsAuthorityFactory>, priority: i32) {
        let order = self.registrations.len();
        self.registrations.push(Registration {
            factory,
            priority,
            order,
        });
    }

    /// All registrations claiming the given authority
    fn candidates(&self, authority: &str) -> Vec<&Registration> {
        self.registrations
            .iter()
            .filter(|r| r.factory.authority().eq_ignore_ascii_case(authority))
            .collect()
    }

    /// Select the factory that should answer a parsed request
    ///
    /// Selection order: exact version match when a version was
    /// requested, then priority, then (when a version was requested)
    /// version-bearing factories over blank-version ones, then
    /// registration order.
    fn select<'a>(&'a self, parsed: &ParsedCode) -> Option<&'a Registration> {
        let mut candidates = self.candidates(&parsed.authority);
        if candidates.is_empty() {
            return None;
        }
        let requested = parsed.version.as_deref();
        candidates.sort_by(|a, b| {
            let a_exact = requested.is_some() && requested == Some(a.factory.version());
            let b_exact = requested.is_some() && requested == Some(b.factory.version());
            b_exact
                .cmp(&a_exact)
                .then(b.priority.cmp(&a.priority))
                .then_with(|| {
                    if requested.is_some() {
                        let a_versioned = !a.factory.version().is_empty();
                        let b_versioned = !b.factory.version().is_empty();
                        b_versioned.cmp(&a_versioned)
                    } else {
                        std::cmp::Ordering::Equal
                    }
                })
                .then(a.order.cmp(&b.order))
        });
        candidates.into_iter().next()
    }

    /// Resolve an identifier string to a CRS
    ///
    /// # Arguments
    /// * `code` - Identifier in compact, bare-numeric or URN form
    ///
    /// # Returns
    /// The resolved CRS, a NoSuchAuthorityCode error when no factory
    /// claims the code, or a Factory error for malformed input
    pub fn resolve(&self, code: &str) -> GeoResult<Crs> {
        let parsed = identifier::parse(code)?;
        let registration = self.select(&parsed).ok_or_else(|| {
            GeoError::NoSuchAuthorityCode {
                authority: parsed.authority.clone(),
                code: parsed.code.clone(),
            }
        })?;
        debug!(
            "Resolving {} via factory {} (version \"{}\")",
            parsed.compact(),
            registration.factory.authority(),
            registration.factory.version()
        );
        registration.factory.create_crs(&parsed.code)
    }

    /// Look up the authority identifier of a CRS
    ///
    /// Without full scan this matches only by identifier or primary
    /// name (fast path, may miss). With full scan it iterates every
    /// code of every matching factory performing structural comparison
    /// until a match or exhaustion; an expensive O(n) fallback the
    /// caller opts into explicitly.
    ///
    /// # Arguments
    /// * `crs` - The CRS to identify
    /// * `full_scan` - Whether to fall back to the exhaustive scan
    ///
    /// # Returns
    /// The "AUTHORITY:CODE" string, or None when not found
    pub fn lookup_identifier(&self, crs: &Crs, full_scan: bool) -> Option<String> {
        // Fast path 1: the CRS carries an identifier that checks out
        if let Some(id) = &crs.identifier {
            if let Ok(resolved) = self.resolve(&id.to_string()) {
                if resolved.equals_ignore_metadata(crs) {
                    return Some(id.to_string());
                }
            }
        }
        // Fast path 2: a factory knows the CRS name
        for registration in &self.registrations {
            if let Some(code) = registration.factory.find_code_by_name(&crs.name) {
                if let Ok(candidate) = registration.factory.create_crs(&code) {
                    if candidate.equals_ignore_metadata(crs) {
                        return Some(format!(
                            "{}:{}",
                            registration.factory.authority(),
                            code
                        ));
                    }
                }
            }
        }
        if !full_scan {
            return None;
        }
        for registration in &self.registrations {
            for code in registration.factory.codes() {
                if let Ok(candidate) = registration.factory.create_crs(&code) {
                    if candidate.equals_ignore_metadata(crs) {
                        return Some(format!(
                            "{}:{}",
                            registration.factory.authority(),
                            code
                        ));
                    }
                }
            }
        }
        None
    }
}

impl Default for AuthorityFactoryRegistry {
    fn default() -> Self {
        AuthorityFactoryRegistry::new()
    }
}
