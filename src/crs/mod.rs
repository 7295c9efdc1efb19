//! Coordinate reference system data model
//!
//! This module provides the structures describing coordinate reference
//! systems: axes, units, datums, ellipsoids and the CRS type itself,
//! plus WKT serialization.

pub mod errors;
pub mod axis;
pub mod datum;
pub mod system;
pub mod wkt;

pub use errors::{GeoError, GeoResult};
pub use axis::{Axis, AxisDirection, Unit};
pub use datum::{BursaWolf, Ellipsoid, GeodeticDatum, PrimeMeridian};
pub use system::{Crs, CrsKind, Identifier, ProjectionMethod, ProjectionParams, ProjectionSpec};
pub use wkt::{to_wkt, CrsDefinition};
