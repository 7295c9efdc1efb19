pub mod crs;
pub mod authority;
pub mod operation;
pub mod geometry;
pub mod geodesy;
pub mod utils;
pub mod commands;
pub mod api;

pub use crate::api::{CrsKit, TileSource};

pub use authority::decoder::{decode, decode_forced, lookup_identifier};
pub use crs::errors::{GeoError, GeoResult};
pub use crs::system::Crs;
pub use geodesy::GeodeticCalculator;
pub use geometry::{Envelope, Point};
pub use operation::resolver::find_math_transform;
