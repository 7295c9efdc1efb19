//! Authority code resolution
//!
//! Parsing of authority identifiers, the factory registry, the embedded
//! EPSG backend, datum alias handling and the caching decoder front
//! door.

pub mod identifier;
pub mod registry;
pub mod epsg;
pub mod aliases;
pub mod decoder;

#[cfg(test)]
mod tests;

pub use decoder::{decode, decode_forced, lookup_identifier, reset, AxisOrder};
pub use registry::{AuthorityFactoryRegistry, CrsAuthorityFactory, NORMAL_PRIORITY};
